//! Shared error taxonomy: POSIX errno on the wire, transport/domain/
//! session/client-local errors in the facade (spec §7).

use thiserror::Error;

/// A POSIX error number, as carried in the wire's `err` field.
///
/// Never equal to [`crate::SERVER_CRASH_CODE`] for a genuine errno -- the
/// crash sentinel is handled as its own reply branch, not folded into this
/// type, to keep the taxonomy sound (Design Notes, "SERVER_CRASH_CODE
/// magic number").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Errno(pub i32);

impl Errno {
    pub fn from_io(err: &std::io::Error) -> Self {
        Errno(err.raw_os_error().unwrap_or(libc::EIO))
    }
}

impl std::fmt::Display for Errno {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "errno {}", self.0)
    }
}

/// Errors a facade method can surface to the bridge adapter, per the
/// taxonomy in spec §7: transport, domain, and client-local errors. A
/// session error (the crash sentinel) never reaches here -- it is handled
/// internally by recovery and only surfaces if the retry itself fails.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::Status),

    #[error("server returned {0}")]
    Domain(Errno),

    #[error("no free handle ids available")]
    OutOfHandles,
}

impl FacadeError {
    /// The negated code this error maps to at the bridge boundary, the
    /// way libfuse operation handlers return `-errno`.
    pub fn to_negated_errno(&self) -> i32 {
        match self {
            FacadeError::Transport(status) => -transport_errno(status),
            FacadeError::Domain(Errno(code)) => -code,
            FacadeError::OutOfHandles => -libc::EMFILE,
        }
    }
}

/// Best-effort mapping from a transport failure to an errno the bridge
/// adapter can hand back to the kernel.
fn transport_errno(status: &tonic::Status) -> i32 {
    use tonic::Code;
    match status.code() {
        Code::Unavailable | Code::DeadlineExceeded => libc::EIO,
        Code::NotFound => libc::ENOENT,
        Code::PermissionDenied => libc::EACCES,
        _ => libc::EIO,
    }
}

/// Errors a server-side handler can produce before it has a wire reply to
/// fill in (e.g. while translating a path or opening a file).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn errno(&self) -> i32 {
        match self {
            ServerError::Io(err) => err.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}
