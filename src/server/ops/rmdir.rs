//! rmdir (spec §4.1, §4.3): no session required; reported verbatim.

use crate::server::pathmap;
use crate::server::state::ServerState;

pub fn handle(state: &ServerState, client_path: &str) -> i32 {
    let server_path = pathmap::translate(&state.root, client_path);
    match std::fs::remove_dir(&server_path) {
        Ok(()) => 0,
        Err(err) => err.raw_os_error().unwrap_or(libc::EIO),
    }
}
