//! FUSE bridge adapter (spec §4.9): translates `fuser`'s inode-based
//! callbacks into the path-based facade calls the other client modules
//! expose, holding the inode↔path map this translation requires (Design
//! Notes §9, "bridge as a value type wrapping the owning object").

use std::collections::HashMap;
use std::ffi::OsStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyCreate, ReplyData, ReplyDirectory, ReplyEmpty,
    ReplyEntry, ReplyOpen, ReplyWrite, Request, TimeOrNow,
};

use crate::client::state::Client;
use crate::error::FacadeError;
use crate::wire::Attr;

/// Kernel attribute/entry cache lifetime. The server is the only writer
/// of truth, so this only bounds how stale a concurrent second mount
/// could observe another mount's changes -- not relevant to the single-
/// client scenarios this system targets.
const TTL: Duration = Duration::from_secs(1);

/// Inode fixed by FUSE convention to the mountpoint root (spec.md §4.9 maps
/// this to the server's export root).
const ROOT_INODE: u64 = 1;

fn secs_to_system_time(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs((-secs) as u64)
    }
}

fn file_type_of(mode: u32) -> FileType {
    match mode & libc::S_IFMT {
        libc::S_IFDIR => FileType::Directory,
        libc::S_IFLNK => FileType::Symlink,
        _ => FileType::RegularFile,
    }
}

fn attr_to_fuse(ino: u64, attr: &Attr) -> FileAttr {
    FileAttr {
        ino,
        size: attr.size,
        blocks: attr.blocks,
        atime: secs_to_system_time(attr.atime),
        mtime: secs_to_system_time(attr.mtime),
        ctime: secs_to_system_time(attr.ctime),
        crtime: UNIX_EPOCH,
        kind: file_type_of(attr.mode),
        perm: (attr.mode & 0o7777) as u16,
        nlink: attr.nlink,
        uid: attr.uid,
        gid: attr.gid,
        rdev: attr.rdev as u32,
        blksize: attr.blksize as u32,
        flags: 0,
    }
}

/// fuser dispatches from a thread pool and expects synchronous handlers
/// (spec §5, "synchronous, per-request blocking" model); each callback
/// blocks the calling thread on the owning `Client`'s async methods via
/// this handle rather than spawning its own runtime per call.
pub struct MountFs {
    client: std::sync::Arc<Client>,
    runtime: tokio::runtime::Handle,
    inode_to_path: Mutex<HashMap<u64, String>>,
    path_to_inode: Mutex<HashMap<String, u64>>,
    next_inode: AtomicU64,
}

impl MountFs {
    pub fn new(client: std::sync::Arc<Client>, runtime: tokio::runtime::Handle) -> Self {
        let mut inode_to_path = HashMap::new();
        let mut path_to_inode = HashMap::new();
        inode_to_path.insert(ROOT_INODE, "/".to_string());
        path_to_inode.insert("/".to_string(), ROOT_INODE);
        MountFs {
            client,
            runtime,
            inode_to_path: Mutex::new(inode_to_path),
            path_to_inode: Mutex::new(path_to_inode),
            next_inode: AtomicU64::new(ROOT_INODE + 1),
        }
    }

    fn path_of(&self, ino: u64) -> Option<String> {
        self.inode_to_path.lock().unwrap().get(&ino).cloned()
    }

    /// Interns `path`, allocating a fresh inode on first sight and reusing
    /// the existing one otherwise (the map only ever grows: inodes are
    /// never recycled mid-mount, which is what fuser's kernel-side cache
    /// assumes).
    fn intern(&self, path: &str) -> u64 {
        let mut path_to_inode = self.path_to_inode.lock().unwrap();
        if let Some(ino) = path_to_inode.get(path) {
            return *ino;
        }
        let ino = self.next_inode.fetch_add(1, Ordering::SeqCst);
        path_to_inode.insert(path.to_string(), ino);
        self.inode_to_path.lock().unwrap().insert(ino, path.to_string());
        ino
    }

    fn child_path(&self, parent: u64, name: &OsStr) -> Option<String> {
        let parent_path = self.path_of(parent)?;
        let name = name.to_str()?;
        if parent_path == "/" {
            Some(format!("/{name}"))
        } else {
            Some(format!("{parent_path}/{name}"))
        }
    }
}

impl Filesystem for MountFs {
    fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(path) = self.child_path(parent, name) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.getattr(&path)) {
            Ok(attr) => {
                let ino = self.intern(&path);
                reply.entry(&TTL, &attr_to_fuse(ino, &attr), 0);
            }
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn getattr(&mut self, _req: &Request, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        let Some(path) = self.path_of(ino) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.getattr(&path)) {
            Ok(attr) => reply.attr(&TTL, &attr_to_fuse(ino, &attr)),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn setattr(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _mode: Option<u32>,
        _uid: Option<u32>,
        _gid: Option<u32>,
        _size: Option<u64>,
        atime: Option<TimeOrNow>,
        mtime: Option<TimeOrNow>,
        _ctime: Option<SystemTime>,
        _fh: Option<u64>,
        _crtime: Option<SystemTime>,
        _chgtime: Option<SystemTime>,
        _bkuptime: Option<SystemTime>,
        _flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        let Some(path) = self.path_of(ino) else {
            reply.error(libc::ENOENT);
            return;
        };

        if atime.is_some() || mtime.is_some() {
            let (a_sec, a_nsec) = time_or_now_to_spec(atime);
            let (m_sec, m_nsec) = time_or_now_to_spec(mtime);
            if let Err(e) = self
                .runtime
                .block_on(self.client.utimens(&path, a_sec, a_nsec, m_sec, m_nsec))
            {
                reply.error(posix_errno(&e));
                return;
            }
        }

        match self.runtime.block_on(self.client.getattr(&path)) {
            Ok(attr) => reply.attr(&TTL, &attr_to_fuse(ino, &attr)),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn readdir(&mut self, _req: &Request, ino: u64, _fh: u64, offset: i64, mut reply: ReplyDirectory) {
        let Some(path) = self.path_of(ino) else {
            reply.error(libc::ENOENT);
            return;
        };
        let entries = match self.runtime.block_on(self.client.readdir(&path)) {
            Ok(entries) => entries,
            Err(e) => {
                reply.error(posix_errno(&e));
                return;
            }
        };

        for item in entries.into_iter().skip(offset as usize) {
            let full_path = if path == "/" {
                format!("/{}", item.name)
            } else {
                format!("{path}/{}", item.name)
            };
            let ino = self.intern(&full_path);
            let kind = if item.file_type == 4 /* DT_DIR */ { FileType::Directory } else { FileType::RegularFile };
            if reply.add(ino, item.offset, kind, item.name) {
                break;
            }
        }
        reply.ok();
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        let Some(path) = self.path_of(ino) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.open(&path, flags as u32)) {
            Ok(user_handle) => reply.opened(user_handle, 0),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn create(
        &mut self,
        _req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        mode: u32,
        _umask: u32,
        flags: i32,
        reply: ReplyCreate,
    ) {
        let Some(path) = self.child_path(parent, name) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.create(&path, mode, flags as u32)) {
            Ok(user_handle) => {
                let ino = self.intern(&path);
                match self.runtime.block_on(self.client.getattr(&path)) {
                    Ok(attr) => reply.created(&TTL, &attr_to_fuse(ino, &attr), 0, user_handle, 0),
                    Err(e) => reply.error(posix_errno(&e)),
                }
            }
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn read(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        match self.runtime.block_on(self.client.read(fh, size, offset as u64)) {
            Ok(buffer) => reply.data(&buffer),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn write(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        offset: i64,
        data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        match self.runtime.block_on(self.client.write(fh, data.to_vec(), offset as u64)) {
            Ok(written) => reply.written(written),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn flush(&mut self, _req: &Request<'_>, _ino: u64, fh: u64, _lock_owner: u64, reply: ReplyEmpty) {
        match self.runtime.block_on(self.client.commit_write(fh)) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn fsync(&mut self, _req: &Request<'_>, _ino: u64, fh: u64, _datasync: bool, reply: ReplyEmpty) {
        match self.runtime.block_on(self.client.commit_write(fh)) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn release(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        match self.runtime.block_on(self.client.release(fh)) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn mkdir(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, mode: u32, _umask: u32, reply: ReplyEntry) {
        let Some(path) = self.child_path(parent, name) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.mkdir(&path, mode)) {
            Ok(()) => match self.runtime.block_on(self.client.getattr(&path)) {
                Ok(attr) => {
                    let ino = self.intern(&path);
                    reply.entry(&TTL, &attr_to_fuse(ino, &attr), 0);
                }
                Err(e) => reply.error(posix_errno(&e)),
            },
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn unlink(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        let Some(path) = self.child_path(parent, name) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.unlink(&path)) {
            Ok(()) => {
                self.path_to_inode.lock().unwrap().remove(&path);
                reply.ok();
            }
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    fn rmdir(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        let Some(path) = self.child_path(parent, name) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.rmdir(&path)) {
            Ok(()) => {
                self.path_to_inode.lock().unwrap().remove(&path);
                reply.ok();
            }
            Err(e) => reply.error(posix_errno(&e)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn rename(
        &mut self,
        _req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        newparent: u64,
        newname: &OsStr,
        _flags: u32,
        reply: ReplyEmpty,
    ) {
        let (Some(from), Some(to)) = (self.child_path(parent, name), self.child_path(newparent, newname)) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.runtime.block_on(self.client.rename(&from, &to)) {
            Ok(()) => {
                let mut path_to_inode = self.path_to_inode.lock().unwrap();
                if let Some(ino) = path_to_inode.remove(&from) {
                    path_to_inode.insert(to.clone(), ino);
                    self.inode_to_path.lock().unwrap().insert(ino, to);
                }
                reply.ok();
            }
            Err(e) => reply.error(posix_errno(&e)),
        }
    }
}

/// fuser's `Reply*::error` expects a positive errno, the opposite sign of
/// the `-errno` convention `FacadeError::to_negated_errno` follows (that
/// convention matches the server's own C-style handler return values).
fn posix_errno(e: &FacadeError) -> i32 {
    -e.to_negated_errno()
}

fn time_or_now_to_spec(t: Option<TimeOrNow>) -> (i64, i64) {
    let now = || {
        let dur = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        (dur.as_secs() as i64, dur.subsec_nanos() as i64)
    };
    match t {
        None => now(),
        Some(TimeOrNow::Now) => now(),
        Some(TimeOrNow::SpecificTime(st)) => match st.duration_since(UNIX_EPOCH) {
            Ok(dur) => (dur.as_secs() as i64, dur.subsec_nanos() as i64),
            Err(e) => {
                let dur = e.duration();
                (-(dur.as_secs() as i64), -(dur.subsec_nanos() as i64))
            }
        },
    }
}
