//! P5 (readdir terminator), mkdir/rmdir, and rename.

mod common;

use common::Fixture;
use mntfs::client::Client;

#[tokio::test]
async fn readdir_lists_entries_without_the_terminator() {
    let fixture = Fixture::new().await;
    fixture.write_file("one.txt", b"1");
    fixture.write_file("two.txt", b"2");
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let entries = client.readdir("/").await.expect("readdir");
    let names: Vec<_> = entries.iter().map(|e| e.name.clone()).collect();
    assert!(names.contains(&"one.txt".to_string()));
    assert!(names.contains(&"two.txt".to_string()));
    assert!(entries.iter().all(|e| e.err == 0), "payload entries never carry the terminator's err");
}

#[tokio::test]
async fn readdir_on_missing_directory_fails() {
    let fixture = Fixture::new().await;
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    let err = client.readdir("/nope").await.expect_err("directory does not exist");
    match err {
        mntfs::error::FacadeError::Domain(mntfs::error::Errno(code)) => {
            assert_eq!(code, libc::ENOENT);
        }
        other => panic!("expected ENOENT, got {other:?}"),
    }
}

#[tokio::test]
async fn mkdir_then_rmdir_round_trips() {
    let fixture = Fixture::new().await;
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    client.mkdir("/sub", 0o755).await.expect("mkdir");
    let attr = client.getattr("/sub").await.expect("getattr on new dir");
    assert!(attr.mode & libc::S_IFDIR != 0);

    client.rmdir("/sub").await.expect("rmdir");
    let err = client.getattr("/sub").await.expect_err("directory removed");
    match err {
        mntfs::error::FacadeError::Domain(mntfs::error::Errno(code)) => assert_eq!(code, libc::ENOENT),
        other => panic!("expected ENOENT, got {other:?}"),
    }
}

#[tokio::test]
async fn cross_directory_rename_moves_the_file_and_stale_path_is_enoent() {
    let fixture = Fixture::new().await;
    fixture.create_dir("from_dir");
    fixture.create_dir("to_dir");
    fixture.write_file("from_dir/item.txt", b"payload");
    let client = Client::connect(fixture.addr.to_string()).expect("connect");

    client.rename("/from_dir/item.txt", "/to_dir/item.txt").await.expect("rename");

    let attr = client.getattr("/to_dir/item.txt").await.expect("moved file exists");
    assert_eq!(attr.size, 7);

    let err = client.getattr("/from_dir/item.txt").await.expect_err("stale path gone");
    match err {
        mntfs::error::FacadeError::Domain(mntfs::error::Errno(code)) => assert_eq!(code, libc::ENOENT),
        other => panic!("expected ENOENT, got {other:?}"),
    }
}
