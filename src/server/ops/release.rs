//! release (spec §4.3): closes the server handle.

use crate::server::state::ServerState;
use crate::SERVER_CRASH_CODE;

/// Returns `(err, newsessionid)`.
pub fn handle(state: &ServerState, handle: u64, epoch: u64) -> (i32, u64) {
    if let Err(current) = state.session.check(epoch.into()) {
        return (SERVER_CRASH_CODE, current.into());
    }

    match state.remove_open(handle) {
        Some(_open_file) => (0, 0),
        None => (libc::EBADF, 0),
    }
}
