//! rename (spec §4.1, §4.3, §9): cross-directory moves and target-exists
//! behavior are inherited from the underlying primitive and not further
//! constrained.

use crate::server::pathmap;
use crate::server::state::ServerState;

pub fn handle(state: &ServerState, from: &str, to: &str) -> i32 {
    let from_path = pathmap::translate(&state.root, from);
    let to_path = pathmap::translate(&state.root, to);
    match std::fs::rename(&from_path, &to_path) {
        Ok(()) => 0,
        Err(err) => err.raw_os_error().unwrap_or(libc::EIO),
    }
}
