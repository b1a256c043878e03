//! Write journal (spec §4.6, I3): per-user-handle ordered log of
//! mutation requests sent but not yet committed.

use std::collections::HashMap;

use crate::client::handles::UserHandle;
use crate::server::session::Epoch;

/// One journaled write (spec §3): bound to the server handle/epoch that
/// were current when it was sent, rebound during replay.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub server_handle: u64,
    pub epoch: Epoch,
    pub buffer: Vec<u8>,
    pub offset: u64,
}

#[derive(Default)]
pub struct Journal {
    per_handle: HashMap<UserHandle, Vec<JournalEntry>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bound to the handle's *current* server handle/epoch (I3:
    /// ordered by the sequence of originating writes).
    pub fn append(&mut self, user_handle: UserHandle, entry: JournalEntry) {
        self.per_handle.entry(user_handle).or_default().push(entry);
    }

    pub fn entries(&self, user_handle: UserHandle) -> &[JournalEntry] {
        self.per_handle.get(&user_handle).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clears on successful commit-write or release (spec §4.6).
    pub fn clear(&mut self, user_handle: UserHandle) {
        self.per_handle.remove(&user_handle);
    }

    /// Rebinds every entry for `user_handle` to a fresh server handle and
    /// epoch, in place, preserving order (used right before replay).
    pub fn rebind(&mut self, user_handle: UserHandle, server_handle: u64, epoch: Epoch) {
        if let Some(entries) = self.per_handle.get_mut(&user_handle) {
            for entry in entries.iter_mut() {
                entry.server_handle = server_handle;
                entry.epoch = epoch;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_append_order() {
        let mut journal = Journal::new();
        journal.append(
            100,
            JournalEntry {
                server_handle: 1,
                epoch: Epoch(1),
                buffer: b"a".to_vec(),
                offset: 0,
            },
        );
        journal.append(
            100,
            JournalEntry {
                server_handle: 1,
                epoch: Epoch(1),
                buffer: b"b".to_vec(),
                offset: 1,
            },
        );
        let entries = journal.entries(100);
        assert_eq!(entries[0].buffer, b"a");
        assert_eq!(entries[1].buffer, b"b");
    }

    #[test]
    fn clear_empties_the_handles_journal() {
        let mut journal = Journal::new();
        journal.append(
            100,
            JournalEntry {
                server_handle: 1,
                epoch: Epoch(1),
                buffer: b"a".to_vec(),
                offset: 0,
            },
        );
        journal.clear(100);
        assert!(journal.entries(100).is_empty());
    }
}
