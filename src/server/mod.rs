//! Server half: path translation, session authority, request dispatch.

pub mod dispatch;
pub mod ignore_list;
pub mod ops;
pub mod pathmap;
pub mod session;
pub mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::proto::mntfs_server::MntfsServer;
use dispatch::MntfsService;
use state::ServerState;

/// Binds `addr`, exports `root`, and serves until the process is killed
/// (spec §6: "serves until killed").
pub async fn run(addr: SocketAddr, root: PathBuf) -> anyhow::Result<()> {
    let state = Arc::new(ServerState::new(root));
    tracing::info!(%addr, root = %state.root.display(), epoch = state.session.current().0, "server listening");

    let service = MntfsService::new(state);
    tonic::transport::Server::builder()
        .add_service(MntfsServer::new(service))
        .serve(addr)
        .await?;
    Ok(())
}
