//! read (spec §4.3): positional I/O against the server handle in the
//! request; never reopens by path.
//!
//! Open question in spec §9: the original handler sizes its buffer by
//! the caller's `count` and does not resize to `bytes_read`. Here the
//! reply buffer is truncated to `bytes_read` before being put on the
//! wire -- see DESIGN.md for the resolution.

use std::os::unix::fs::FileExt;

use crate::server::state::ServerState;
use crate::SERVER_CRASH_CODE;

/// Returns `(buffer, bytes_read, err, newsessionid)`.
pub fn handle(state: &ServerState, handle: u64, epoch: u64, count: u32, offset: u64) -> (Vec<u8>, u32, i32, u64) {
    if let Err(current) = state.session.check(epoch.into()) {
        return (Vec::new(), 0, SERVER_CRASH_CODE, current.into());
    }

    let result = state.with_open(handle, |open_file| {
        let mut buf = vec![0u8; count as usize];
        match open_file.file.read_at(&mut buf, offset) {
            Ok(n) => {
                buf.truncate(n);
                (buf, n as u32, 0)
            }
            Err(err) => (Vec::new(), 0, err.raw_os_error().unwrap_or(libc::EIO)),
        }
    });

    match result {
        Some((buf, n, err)) => (buf, n, err, 0),
        None => (Vec::new(), 0, libc::EBADF, 0),
    }
}
