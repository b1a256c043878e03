//! open (spec §4.3, §4.4): opens by path, keeps the fd open across the
//! call, and stamps the reply with the current epoch.

use std::os::fd::FromRawFd;

use nix::fcntl::{self, OFlag};
use nix::sys::stat::Mode;

use crate::server::pathmap;
use crate::server::state::ServerState;

/// Returns `(handle, epoch, err)`.
pub fn handle(state: &ServerState, client_path: &str, flags: u32) -> (u64, u64, i32) {
    let server_path = pathmap::translate(&state.root, client_path);
    let oflags = OFlag::from_bits_truncate(flags as i32);

    match fcntl::open(&server_path, oflags, Mode::empty()) {
        Ok(fd) => {
            let file = unsafe { std::fs::File::from_raw_fd(fd) };
            let server_handle = state.insert_open(file);
            (server_handle, state.session.current().into(), 0)
        }
        Err(errno) => (0, 0, errno as i32),
    }
}
