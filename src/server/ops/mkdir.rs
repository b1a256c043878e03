//! mkdir (spec §4.1, §4.3): no session required; reported verbatim.

use nix::sys::stat::Mode;

use crate::server::pathmap;
use crate::server::state::ServerState;

pub fn handle(state: &ServerState, client_path: &str, mode: u32) -> i32 {
    let server_path = pathmap::translate(&state.root, client_path);
    let fmode = Mode::from_bits_truncate(mode);
    match nix::unistd::mkdir(&server_path, fmode) {
        Ok(()) => 0,
        Err(errno) => errno as i32,
    }
}
