//! Server-side open file table and shared state.
//!
//! Mirrors the teacher's `Export` (src/export/mod.rs): a registry plus a
//! monotonic id counter, guarded by a single lock because the server is a
//! single process with no requirement to scale beyond it (spec Non-goals).

use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::server::session::{Epoch, SessionAuthority};

/// A server-side open file (spec §3): kernel fd plus the epoch captured
/// at open time.
pub struct OpenFile {
    pub file: File,
    pub epoch: Epoch,
}

pub struct ServerState {
    pub root: PathBuf,
    pub session: SessionAuthority,
    open_files: Mutex<HashMap<u64, OpenFile>>,
    next_handle: AtomicU64,
}

impl ServerState {
    pub fn new(root: PathBuf) -> Self {
        ServerState {
            root,
            session: SessionAuthority::new(),
            open_files: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn insert_open(&self, file: File) -> u64 {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let epoch = self.session.current();
        self.open_files
            .lock()
            .unwrap()
            .insert(handle, OpenFile { file, epoch });
        handle
    }

    pub fn with_open<T>(&self, handle: u64, f: impl FnOnce(&OpenFile) -> T) -> Option<T> {
        self.open_files.lock().unwrap().get(&handle).map(f)
    }

    pub fn remove_open(&self, handle: u64) -> Option<OpenFile> {
        self.open_files.lock().unwrap().remove(&handle)
    }
}
