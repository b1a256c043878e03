//! mntfs - a remote-mount filesystem.
//!
//! A client process exposes a FUSE mountpoint whose POSIX file operations
//! are forwarded as RPCs to a server process, which serves them against a
//! directory subtree of its own local filesystem. The hard part is the
//! client-side session and crash-recovery layer: the client must detect
//! that the server restarted mid-session, transparently reopen every
//! affected file, replay outstanding writes, and retry the failed call.

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod wire;

/// Generated request/reply types and the `Mntfs` service/client stubs.
pub mod proto {
    tonic::include_proto!("mntfs");
}

/// The reserved `err` value meaning "your epoch is stale; reopen".
///
/// No other reply ever uses this value for an ordinary POSIX error.
pub const SERVER_CRASH_CODE: i32 = 1_000_000;

/// Default listen port for the server, and default port assumed by the
/// client when `-p` is not given.
pub const DEFAULT_PORT: u16 = 8080;

/// Default directory the server exports when none is given on the CLI.
pub const DEFAULT_EXPORT_ROOT: &str = "/tmp/nfs";
