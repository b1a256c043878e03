//! write (spec §4.3): positional I/O against the server handle, followed
//! by a synchronous flush before reply.

use std::os::unix::fs::FileExt;

use crate::server::state::ServerState;
use crate::SERVER_CRASH_CODE;

/// Returns `(bytes_written, err, newsessionid)`.
pub fn handle(state: &ServerState, handle: u64, epoch: u64, buffer: &[u8], offset: u64) -> (u32, i32, u64) {
    if let Err(current) = state.session.check(epoch.into()) {
        return (0, SERVER_CRASH_CODE, current.into());
    }

    let result = state.with_open(handle, |open_file| match open_file.file.write_at(buffer, offset) {
        Ok(n) => match open_file.file.sync_all() {
            Ok(()) => (n as u32, 0),
            Err(err) => (n as u32, err.raw_os_error().unwrap_or(libc::EIO)),
        },
        Err(err) => (0, err.raw_os_error().unwrap_or(libc::EIO)),
    });

    match result {
        Some((n, err)) => (n, err, 0),
        None => (0, libc::EBADF, 0),
    }
}
