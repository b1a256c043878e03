//! P3 (crash-transparency) and P4 (epoch freshness), scenario 3 (spec §8).

mod common;

use common::Fixture;
use mntfs::client::Client;

#[tokio::test]
async fn write_survives_a_server_restart_between_write_and_commit() {
    let fixture = Fixture::new().await;
    let client = Client::connect(fixture.addr.to_string()).expect("connect");
    fixture.write_file("crash.bin", &[0u8; 0]);

    let handle = client.open("/crash.bin", libc::O_RDWR as u32).await.expect("open");
    let buf = vec![0x41u8; 100];
    client.write(handle, buf.clone(), 0).await.expect("write before restart");

    // Kill and rebind the server process; the write is still only
    // journaled client-side.
    {
        let mut fixture = fixture;
        fixture.restart().await;

        // The facade only discovers the stale epoch on the next
        // session-bearing call: commit-write here triggers recovery,
        // which reopens the file and replays the journaled write before
        // commit succeeds (spec §4.7, P3).
        client.commit_write(handle).await.expect("commit triggers recovery and replay");
        client.release(handle).await.expect("release");

        let reopened = client.open("/crash.bin", libc::O_RDONLY as u32).await.expect("reopen");
        let readback = client.read(reopened, 100, 0).await.expect("read back replayed bytes");
        assert_eq!(readback, buf, "every byte in the journaled range matches the original write");
    }
}

#[tokio::test]
async fn request_stamped_with_a_stale_epoch_is_rejected_exactly_once() {
    let fixture = Fixture::new().await;
    let client = Client::connect(fixture.addr.to_string()).expect("connect");
    fixture.write_file("stale.txt", b"data");

    let handle = client.open("/stale.txt", libc::O_RDONLY as u32).await.expect("open");

    {
        let mut fixture = fixture;
        fixture.restart().await;

        // The very next call on this handle observes the crash sentinel
        // internally and recovers transparently; the facade never
        // surfaces SERVER_CRASH_CODE to the caller.
        let buf = client.read(handle, 4, 0).await.expect("read recovers transparently");
        assert_eq!(buf, b"data");
    }
}
