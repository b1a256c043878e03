//! Conversions between the generated wire messages ([`crate::proto`]) and
//! the domain types used internally, so neither the dispatcher nor the
//! facade has to name a generated field directly.

use crate::proto;

/// The file-attribute bundle (spec §4.1): device, inode, link count, mode,
/// owner, group, rdev, size, block size, block count, and access/modify/
/// change time in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Attr {
    pub dev: u64,
    pub ino: u64,
    pub nlink: u32,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u64,
    pub size: u64,
    pub blksize: u64,
    pub blocks: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

impl Attr {
    /// A zeroed bundle, used for the getattr ignore list (P7).
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn from_stat(st: &libc::stat) -> Self {
        Attr {
            dev: st.st_dev as u64,
            ino: st.st_ino,
            nlink: st.st_nlink as u32,
            mode: st.st_mode,
            uid: st.st_uid,
            gid: st.st_gid,
            rdev: st.st_rdev as u64,
            size: st.st_size as u64,
            blksize: st.st_blksize as u64,
            blocks: st.st_blocks as u64,
            atime: st.st_atime,
            mtime: st.st_mtime,
            ctime: st.st_ctime,
        }
    }
}

impl From<Attr> for proto::FileAttr {
    fn from(a: Attr) -> Self {
        proto::FileAttr {
            dev: a.dev,
            ino: a.ino,
            nlink: a.nlink,
            mode: a.mode,
            uid: a.uid,
            gid: a.gid,
            rdev: a.rdev,
            size: a.size,
            blksize: a.blksize,
            blocks: a.blocks,
            atime: a.atime,
            mtime: a.mtime,
            ctime: a.ctime,
        }
    }
}

impl From<proto::FileAttr> for Attr {
    fn from(a: proto::FileAttr) -> Self {
        Attr {
            dev: a.dev,
            ino: a.ino,
            nlink: a.nlink,
            mode: a.mode,
            uid: a.uid,
            gid: a.gid,
            rdev: a.rdev,
            size: a.size,
            blksize: a.blksize,
            blocks: a.blocks,
            atime: a.atime,
            mtime: a.mtime,
            ctime: a.ctime,
        }
    }
}

/// One readdir entry (spec §3's "directory listing item"). The terminal
/// item of a reply carries `err` and no meaningful name/ino/offset (I5).
#[derive(Debug, Clone)]
pub struct DirentItem {
    pub ino: u64,
    pub offset: i64,
    pub reclen: u32,
    pub file_type: u8,
    pub name: String,
    pub err: i32,
}

impl DirentItem {
    pub fn terminator(err: i32) -> Self {
        DirentItem {
            ino: 0,
            offset: 0,
            reclen: 0,
            file_type: 0,
            name: String::new(),
            err,
        }
    }
}

impl From<DirentItem> for proto::DirentItem {
    fn from(d: DirentItem) -> Self {
        proto::DirentItem {
            ino: d.ino,
            offset: d.offset,
            reclen: d.reclen,
            file_type: d.file_type as u32,
            name: d.name,
            err: d.err,
        }
    }
}

impl From<proto::DirentItem> for DirentItem {
    fn from(d: proto::DirentItem) -> Self {
        DirentItem {
            ino: d.ino,
            offset: d.offset,
            reclen: d.reclen,
            file_type: d.file_type as u8,
            name: d.name,
            err: d.err,
        }
    }
}
