//! commit-write (spec §4.3, §4.6, §9): a synchronous flush of the server
//! handle. A handle with an empty journal is not exercised in the
//! original source; the spec makes this a no-op that returns success,
//! which falls out naturally here since there is nothing client-journal
//! specific on the server side to act on.

use crate::server::state::ServerState;
use crate::SERVER_CRASH_CODE;

/// Returns `(err, newsessionid)`.
pub fn handle(state: &ServerState, handle: u64, epoch: u64) -> (i32, u64) {
    if let Err(current) = state.session.check(epoch.into()) {
        return (SERVER_CRASH_CODE, current.into());
    }

    let result = state.with_open(handle, |open_file| open_file.file.sync_all());
    match result {
        Some(Ok(())) => (0, 0),
        Some(Err(err)) => (err.raw_os_error().unwrap_or(libc::EIO), 0),
        None => (libc::EBADF, 0),
    }
}
