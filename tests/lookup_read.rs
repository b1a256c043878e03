//! P1 (round-trip open/read/release) and the ignore list (P7).

mod common;

use common::Fixture;
use mntfs::client::Client;

#[tokio::test]
async fn round_trip_open_read_release_matches_contents() {
    let fixture = Fixture::new().await;
    fixture.write_file("notes.txt", b"abcdefghijklmnopqrstuvwxyz");
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let handle = client.open("/notes.txt", libc::O_RDONLY as u32).await.expect("open");
    let buf = client.read(handle, 27, 0).await.expect("read");
    assert_eq!(buf, b"abcdefghijklmnopqrstuvwxyz");
    client.release(handle).await.expect("release");
}

#[tokio::test]
async fn read_past_end_of_file_returns_short_buffer() {
    let fixture = Fixture::new().await;
    fixture.write_file("short.txt", b"abc");
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let handle = client.open("/short.txt", libc::O_RDONLY as u32).await.expect("open");
    let buf = client.read(handle, 100, 0).await.expect("read");
    assert_eq!(buf, b"abc", "buffer is truncated to the bytes actually read");
}

#[tokio::test]
async fn getattr_reflects_file_size() {
    let fixture = Fixture::new().await;
    fixture.write_file("sized.bin", b"0123456789");
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let attr = client.getattr("/sized.bin").await.expect("getattr");
    assert_eq!(attr.size, 10);
}

#[tokio::test]
async fn getattr_on_ignored_path_returns_zeroed_attr_without_touching_disk() {
    let fixture = Fixture::new().await;
    // deliberately do not create .Trash on disk
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let attr = client.getattr("/.Trash").await.expect("getattr succeeds for ignored path");
    assert_eq!(attr.size, 0);
    assert_eq!(attr.mode, 0);
}

#[tokio::test]
async fn getattr_on_missing_path_fails_with_enoent() {
    let fixture = Fixture::new().await;
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let err = client.getattr("/nope.txt").await.expect_err("must not exist");
    match err {
        mntfs::error::FacadeError::Domain(mntfs::error::Errno(code)) => {
            assert_eq!(code, libc::ENOENT);
        }
        other => panic!("expected ENOENT, got {other:?}"),
    }
}
