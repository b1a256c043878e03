//! utimens (spec §4.1, §4.3): no session required; reported verbatim.

use nix::sys::stat::{utimensat, UtimensatFlags};
use nix::sys::time::{TimeSpec, TimeValLike};

use crate::server::pathmap;
use crate::server::state::ServerState;

pub fn handle(
    state: &ServerState,
    client_path: &str,
    atime_sec: i64,
    atime_nsec: i64,
    mtime_sec: i64,
    mtime_nsec: i64,
) -> i32 {
    let server_path = pathmap::translate(&state.root, client_path);
    let atime = TimeSpec::seconds(atime_sec) + TimeSpec::nanoseconds(atime_nsec);
    let mtime = TimeSpec::seconds(mtime_sec) + TimeSpec::nanoseconds(mtime_nsec);

    match utimensat(None, &server_path, &atime, &mtime, UtimensatFlags::NoFollowSymlink) {
        Ok(()) => 0,
        Err(errno) => errno as i32,
    }
}
