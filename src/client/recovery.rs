//! Recovery coordinator (spec §4.7, I4): invoked by the facade whenever
//! any reply returns `err = SERVER_CRASH_CODE`.
//!
//! Implemented as plain methods on [`Client`] rather than a separate
//! service that re-enters the facade's public path (Design Notes §9,
//! "cyclic reference between facade and recovery"): the journal and
//! handle table live on `Client` and recovery reads/mutates them
//! directly.

use crate::client::handles::UserHandle;
use crate::client::journal::JournalEntry;
use crate::client::state::Client;
use crate::error::FacadeError;
use crate::proto;
use crate::server::session::Epoch;

impl Client {
    /// Reopens `user_handle` if it is still stamped with a stale epoch,
    /// then replays its journal in order. A no-op if another caller
    /// already reopened (spec §4.7: "if the user handle's stored epoch
    /// already equals the advertised newsessionid, do nothing").
    pub async fn recover(&self, user_handle: UserHandle, newsessionid: u64) -> Result<(), FacadeError> {
        let mut inner = self.inner.lock().await;

        let entry = match inner.handles.get(user_handle) {
            Some(e) => e.clone(),
            None => return Ok(()),
        };
        if entry.epoch == Epoch(newsessionid) {
            // Someone else already reopened this handle.
            return Ok(());
        }

        let mut stub = self.stub.clone();
        let reply = stub
            .open(proto::OpenRequest {
                path: entry.path.clone(),
                flags: entry.flags,
            })
            .await?
            .into_inner();

        if reply.err != 0 {
            return Err(FacadeError::Domain(crate::error::Errno(reply.err)));
        }

        let new_epoch = Epoch(reply.epoch);
        if let Some(e) = inner.handles.get_mut(user_handle) {
            e.server_handle = reply.handle;
            e.epoch = new_epoch;
        }
        inner.journal.rebind(user_handle, reply.handle, new_epoch);

        let entries: Vec<JournalEntry> = inner.journal.entries(user_handle).to_vec();
        for entry in entries {
            let count = entry.buffer.len() as u32;
            let reply = stub
                .write(proto::WriteRequest {
                    handle: entry.server_handle,
                    epoch: entry.epoch.into(),
                    buffer: entry.buffer,
                    count,
                    offset: entry.offset,
                })
                .await?
                .into_inner();
            if reply.err != 0 {
                return Err(FacadeError::Domain(crate::error::Errno(reply.err)));
            }
        }

        Ok(())
    }
}
