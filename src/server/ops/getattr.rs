//! getattr (spec §4.3, P7): path-keyed, no session required. Recognizes
//! the ignore list and short-circuits with a zeroed bundle for it.

use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::server::ignore_list;
use crate::server::pathmap;
use crate::server::state::ServerState;
use crate::wire::Attr;

pub fn handle(state: &ServerState, client_path: &str) -> (Attr, i32) {
    if ignore_list::is_ignored(client_path) {
        return (Attr::zeroed(), 0);
    }

    let server_path = pathmap::translate(&state.root, client_path);
    match stat(&server_path) {
        Ok(attr) => (attr, 0),
        Err(errno) => (Attr::zeroed(), errno),
    }
}

fn stat(path: &Path) -> Result<Attr, i32> {
    let c_path = std::ffi::CString::new(path.as_os_str().as_bytes()).map_err(|_| libc::EINVAL)?;
    let mut st = MaybeUninit::<libc::stat>::uninit();
    let res = unsafe { libc::stat(c_path.as_ptr(), st.as_mut_ptr()) };
    if res == -1 {
        Err(std::io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO))
    } else {
        let st = unsafe { st.assume_init() };
        Ok(Attr::from_stat(&st))
    }
}
