//! Scenario 1 (spec §8) and P2 (write durability after commit).

mod common;

use common::Fixture;
use mntfs::client::Client;

#[tokio::test]
async fn create_write_commit_release_then_reopen_reads_back() {
    let fixture = Fixture::new().await;
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let handle = client.create("/a.txt", 0o644, libc::O_RDWR as u32).await.expect("create");
    let written = client.write(handle, b"hello".to_vec(), 0).await.expect("write");
    assert_eq!(written, 5);

    client.commit_write(handle).await.expect("commit");
    client.release(handle).await.expect("release");

    let reopened = client.open("/a.txt", libc::O_RDONLY as u32).await.expect("reopen");
    let buf = client.read(reopened, 5, 0).await.expect("read");
    assert_eq!(buf, b"hello");
    client.release(reopened).await.expect("release");
}

#[tokio::test]
async fn multiple_writes_then_commit_are_all_durable() {
    let fixture = Fixture::new().await;
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let handle = client.create("/b.txt", 0o644, libc::O_RDWR as u32).await.expect("create");
    client.write(handle, b"abc".to_vec(), 0).await.expect("write 1");
    client.write(handle, b"def".to_vec(), 3).await.expect("write 2");
    client.commit_write(handle).await.expect("commit");
    client.release(handle).await.expect("release");

    let reopened = client.open("/b.txt", libc::O_RDONLY as u32).await.expect("reopen");
    let buf = client.read(reopened, 6, 0).await.expect("read");
    assert_eq!(buf, b"abcdef");
}

#[tokio::test]
async fn write_through_readonly_handle_fails_with_ebadf() {
    let fixture = Fixture::new().await;
    fixture.write_file("ro.txt", b"immutable");
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let handle = client.open("/ro.txt", libc::O_RDONLY as u32).await.expect("open readonly");
    let err = client.write(handle, b"x".to_vec(), 0).await.expect_err("write must fail");
    match err {
        mntfs::error::FacadeError::Domain(mntfs::error::Errno(code)) => {
            assert_eq!(code, libc::EBADF);
        }
        other => panic!("expected a domain EBADF error, got {other:?}"),
    }
}
