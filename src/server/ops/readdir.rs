//! readdir (spec §4.3, I5, P5): builds the full listing in one shot and
//! appends a terminating item carrying the effective result code. Not
//! streamed -- this keeps the terminator invariant simple.

use std::os::unix::fs::DirEntryExt;

use crate::server::pathmap;
use crate::server::state::ServerState;
use crate::wire::DirentItem;

/// `DT_*` file-type nibble as used by `getdents`/`d_type`.
const DT_DIR: u8 = 4;
const DT_REG: u8 = 8;

pub fn handle(state: &ServerState, client_path: &str) -> Vec<DirentItem> {
    let server_path = pathmap::translate(&state.root, client_path);

    let read_dir = match std::fs::read_dir(&server_path) {
        Ok(rd) => rd,
        Err(err) => {
            let errno = err.raw_os_error().unwrap_or(libc::EIO);
            return vec![DirentItem::terminator(errno)];
        }
    };

    let mut items = Vec::new();
    for (offset, entry) in read_dir.enumerate() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let errno = err.raw_os_error().unwrap_or(libc::EIO);
                items.push(DirentItem::terminator(errno));
                return items;
            }
        };
        let file_type = match entry.file_type() {
            Ok(ft) if ft.is_dir() => DT_DIR,
            _ => DT_REG,
        };
        items.push(DirentItem {
            ino: entry.ino(),
            offset: offset as i64,
            reclen: 0,
            file_type,
            name: entry.file_name().to_string_lossy().into_owned(),
            err: 0,
        });
    }
    items.push(DirentItem::terminator(0));
    items
}
