//! Shared test fixture: a real `mntfs-server` instance served over a
//! loopback socket, the way the teacher's `tests/shadow_fs/common.rs`
//! wraps a `TempDir` plus an in-process filesystem -- except here the
//! thing under test is the wire protocol itself, so the fixture spins up
//! the actual gRPC service rather than calling a VFS trait directly.

use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;

use mntfs::proto::mntfs_server::MntfsServer;
use mntfs::server::dispatch::MntfsService;
use mntfs::server::state::ServerState;

pub struct Fixture {
    pub tempdir: TempDir,
    pub addr: SocketAddr,
    server_task: Option<JoinHandle<()>>,
}

impl Fixture {
    pub async fn new() -> Self {
        let tempdir = TempDir::new().expect("create temp dir");
        let (addr, task) = spawn_on(new_ephemeral_listener(), tempdir.path().to_path_buf());
        wait_until_accepting(addr).await;
        Fixture { tempdir, addr, server_task: Some(task) }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.tempdir.path().join(name)
    }

    pub fn write_file(&self, name: &str, data: &[u8]) {
        std::fs::write(self.path(name), data).expect("write fixture file");
    }

    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir(self.path(name)).expect("create fixture dir");
    }

    /// Kills the current server task and rebinds a fresh one on the same
    /// port with a fresh `ServerState` (and therefore a fresh epoch),
    /// simulating a server process restart in place (spec P3/P4).
    pub async fn restart(&mut self) {
        if let Some(task) = self.server_task.take() {
            task.abort();
        }
        // let the kernel reclaim the port before rebinding it
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        let listener = StdTcpListener::bind(self.addr).expect("rebind same port after restart");
        let (_addr, task) = spawn_on((listener, self.addr), self.tempdir.path().to_path_buf());
        wait_until_accepting(self.addr).await;
        self.server_task = Some(task);
    }
}

fn new_ephemeral_listener() -> (StdTcpListener, SocketAddr) {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    (listener, addr)
}

fn spawn_on(listener_and_addr: (StdTcpListener, SocketAddr), root: PathBuf) -> (SocketAddr, JoinHandle<()>) {
    let (std_listener, addr) = listener_and_addr;
    std_listener.set_nonblocking(true).expect("nonblocking listener");
    let task = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::from_std(std_listener).expect("tokio listener");
        let incoming = TcpListenerStream::new(listener);
        let state = Arc::new(ServerState::new(root));
        let service = MntfsService::new(state);
        let _ = tonic::transport::Server::builder()
            .add_service(MntfsServer::new(service))
            .serve_with_incoming(incoming)
            .await;
    });
    (addr, task)
}

async fn wait_until_accepting(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
}
