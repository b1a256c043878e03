//! Session authority (spec §4.4): owns the epoch for this server process
//! lifetime and validates every handle-bearing request against it (I1).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A 64-bit tag identifying one server process lifetime (GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(pub u64);

impl Epoch {
    /// Seeded from wall-clock seconds at startup, so a restart is
    /// overwhelmingly likely to produce a fresh value (I1).
    pub fn from_now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Epoch(secs)
    }
}

impl From<u64> for Epoch {
    fn from(v: u64) -> Self {
        Epoch(v)
    }
}

impl From<Epoch> for u64 {
    fn from(e: Epoch) -> Self {
        e.0
    }
}

/// Publishes the current epoch and checks incoming requests against it.
pub struct SessionAuthority {
    epoch: AtomicU64,
}

impl SessionAuthority {
    pub fn new() -> Self {
        SessionAuthority {
            epoch: AtomicU64::new(Epoch::from_now().0),
        }
    }

    pub fn current(&self) -> Epoch {
        Epoch(self.epoch.load(Ordering::SeqCst))
    }

    /// Returns `Ok(())` if `requested` matches the current epoch, or
    /// `Err(current)` otherwise -- the caller turns the latter into a
    /// `SERVER_CRASH_CODE` reply stamped with `current` (spec §4.4).
    pub fn check(&self, requested: Epoch) -> Result<(), Epoch> {
        let current = self.current();
        if requested == current {
            Ok(())
        } else {
            Err(current)
        }
    }
}

impl Default for SessionAuthority {
    fn default() -> Self {
        Self::new()
    }
}
