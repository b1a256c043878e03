//! Client RPC facade (spec §4.8): one method per operation, building a
//! request, invoking the stub, and interpreting replies uniformly.

use std::time::Duration;

use tonic::{Code, Status};

use crate::client::handles::UserHandle;
use crate::client::journal::JournalEntry;
use crate::client::state::Client;
use crate::error::{Errno, FacadeError};
use crate::proto;
use crate::server::session::Epoch;
use crate::wire::{Attr, DirentItem};
use crate::SERVER_CRASH_CODE;

/// Retries a stub call while the channel is still reconnecting
/// (`Unavailable`), modeling the "wait for ready" disposition of spec
/// §4.8 step 1: a transient connection loss during a server restart
/// blocks this one logical call rather than failing it outright. Any
/// other transport status is returned immediately -- this is not a
/// retry of a call that already reached the server (spec §4.11).
async fn wait_for_ready<T, F, Fut>(mut call: F) -> Result<T, Status>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, Status>>,
{
    loop {
        match call().await {
            Err(status) if status.code() == Code::Unavailable => {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            other => return other,
        }
    }
}

impl Client {
    pub async fn getattr(&self, path: &str) -> Result<Attr, FacadeError> {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::GetattrRequest { path: path.to_string() };
            async move { stub.getattr(req).await }
        })
        .await?
        .into_inner();

        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }
        Ok(reply.attr.map(Attr::from).unwrap_or_default())
    }

    pub async fn readdir(&self, path: &str) -> Result<Vec<DirentItem>, FacadeError> {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::ReaddirRequest { path: path.to_string() };
            async move { stub.readdir(req).await }
        })
        .await?
        .into_inner();

        let mut items: Vec<DirentItem> = reply.entries.into_iter().map(Into::into).collect();
        let last = items.last().cloned();
        match last {
            Some(item) if item.err != 0 => Err(FacadeError::Domain(Errno(item.err))),
            Some(_) => {
                // The terminator carries no payload; drop it before
                // handing the listing to the bridge adapter (P5).
                items.pop();
                Ok(items)
            }
            None => Ok(items),
        }
    }

    /// open and create establish the epoch rather than rely on one, so
    /// they never trigger recovery (spec §4.8).
    pub async fn open(&self, path: &str, flags: u32) -> Result<UserHandle, FacadeError> {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::OpenRequest {
                path: path.to_string(),
                flags,
            };
            async move { stub.open(req).await }
        })
        .await?
        .into_inner();

        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }

        let mut inner = self.inner.lock().await;
        inner
            .handles
            .insert(reply.handle, Epoch(reply.epoch), path.to_string(), flags)
            .ok_or(FacadeError::OutOfHandles)
    }

    pub async fn create(&self, path: &str, mode: u32, flags: u32) -> Result<UserHandle, FacadeError> {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::CreateRequest {
                path: path.to_string(),
                mode,
                flags,
            };
            async move { stub.create(req).await }
        })
        .await?
        .into_inner();

        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }

        let mut inner = self.inner.lock().await;
        inner
            .handles
            .insert(reply.handle, Epoch(reply.epoch), path.to_string(), flags)
            .ok_or(FacadeError::OutOfHandles)
    }

    pub async fn read(&self, user_handle: UserHandle, count: u32, offset: u64) -> Result<Vec<u8>, FacadeError> {
        let (mut server_handle, mut epoch, _path) = self.snapshot(user_handle).await?;

        let stub = self.stub.clone();
        let mut reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::ReadRequest {
                handle: server_handle,
                epoch: epoch.into(),
                count,
                offset,
            };
            async move { stub.read(req).await }
        })
        .await?
        .into_inner();

        if reply.err == SERVER_CRASH_CODE {
            self.recover(user_handle, reply.newsessionid).await?;
            let snap = self.snapshot(user_handle).await?;
            server_handle = snap.0;
            epoch = snap.1;
            let stub = self.stub.clone();
            reply = wait_for_ready(|| {
                let mut stub = stub.clone();
                let req = proto::ReadRequest {
                    handle: server_handle,
                    epoch: epoch.into(),
                    count,
                    offset,
                };
                async move { stub.read(req).await }
            })
            .await?
            .into_inner();
        }

        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }
        Ok(reply.buffer)
    }

    pub async fn write(&self, user_handle: UserHandle, buffer: Vec<u8>, offset: u64) -> Result<u32, FacadeError> {
        let (mut server_handle, mut epoch, _path) = self.snapshot(user_handle).await?;
        let count = buffer.len() as u32;

        let stub = self.stub.clone();
        let mut reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::WriteRequest {
                handle: server_handle,
                epoch: epoch.into(),
                buffer: buffer.clone(),
                count,
                offset,
            };
            async move { stub.write(req).await }
        })
        .await?
        .into_inner();

        if reply.err == SERVER_CRASH_CODE {
            self.recover(user_handle, reply.newsessionid).await?;
            let snap = self.snapshot(user_handle).await?;
            server_handle = snap.0;
            epoch = snap.1;
            let stub = self.stub.clone();
            reply = wait_for_ready(|| {
                let mut stub = stub.clone();
                let req = proto::WriteRequest {
                    handle: server_handle,
                    epoch: epoch.into(),
                    buffer: buffer.clone(),
                    count,
                    offset,
                };
                async move { stub.write(req).await }
            })
            .await?
            .into_inner();
        }

        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }

        let mut inner = self.inner.lock().await;
        inner.journal.append(
            user_handle,
            JournalEntry {
                server_handle,
                epoch,
                buffer,
                offset,
            },
        );
        Ok(reply.bytes_written)
    }

    pub async fn commit_write(&self, user_handle: UserHandle) -> Result<(), FacadeError> {
        let (mut server_handle, mut epoch, _path) = self.snapshot(user_handle).await?;

        let stub = self.stub.clone();
        let mut reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::CommitWriteRequest {
                handle: server_handle,
                epoch: epoch.into(),
            };
            async move { stub.commit_write(req).await }
        })
        .await?
        .into_inner();

        if reply.err == SERVER_CRASH_CODE {
            self.recover(user_handle, reply.newsessionid).await?;
            let snap = self.snapshot(user_handle).await?;
            server_handle = snap.0;
            epoch = snap.1;
            let stub = self.stub.clone();
            reply = wait_for_ready(|| {
                let mut stub = stub.clone();
                let req = proto::CommitWriteRequest {
                    handle: server_handle,
                    epoch: epoch.into(),
                };
                async move { stub.commit_write(req).await }
            })
            .await?
            .into_inner();
        }

        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }

        let mut inner = self.inner.lock().await;
        inner.journal.clear(user_handle);
        Ok(())
    }

    pub async fn release(&self, user_handle: UserHandle) -> Result<(), FacadeError> {
        let (mut server_handle, mut epoch, _path) = self.snapshot(user_handle).await?;

        let stub = self.stub.clone();
        let mut reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::ReleaseRequest {
                handle: server_handle,
                epoch: epoch.into(),
            };
            async move { stub.release(req).await }
        })
        .await?
        .into_inner();

        if reply.err == SERVER_CRASH_CODE {
            self.recover(user_handle, reply.newsessionid).await?;
            let snap = self.snapshot(user_handle).await?;
            server_handle = snap.0;
            epoch = snap.1;
            let stub = self.stub.clone();
            reply = wait_for_ready(|| {
                let mut stub = stub.clone();
                let req = proto::ReleaseRequest {
                    handle: server_handle,
                    epoch: epoch.into(),
                };
                async move { stub.release(req).await }
            })
            .await?
            .into_inner();
        }

        // Entry and journal are removed on success, or on a best-effort
        // basis even if the server-side release itself failed, since
        // there is no further use for client-side bookkeeping either way
        // once the caller has given up (spec §4.5, §5).
        let mut inner = self.inner.lock().await;
        inner.handles.remove(user_handle);
        inner.journal.clear(user_handle);
        drop(inner);

        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }
        Ok(())
    }

    pub async fn unlink(&self, path: &str) -> Result<(), FacadeError> {
        self.path_call(path, |mut stub, req| async move { stub.unlink(req).await }).await
    }

    pub async fn rmdir(&self, path: &str) -> Result<(), FacadeError> {
        self.path_call(path, |mut stub, req| async move { stub.rmdir(req).await }).await
    }

    pub async fn mkdir(&self, path: &str, mode: u32) -> Result<(), FacadeError> {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::MkdirRequest {
                path: path.to_string(),
                mode,
            };
            async move { stub.mkdir(req).await }
        })
        .await?
        .into_inner();
        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }
        Ok(())
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<(), FacadeError> {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::RenameRequest {
                from: from.to_string(),
                to: to.to_string(),
            };
            async move { stub.rename(req).await }
        })
        .await?
        .into_inner();
        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn utimens(
        &self,
        path: &str,
        atime_sec: i64,
        atime_nsec: i64,
        mtime_sec: i64,
        mtime_nsec: i64,
    ) -> Result<(), FacadeError> {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let mut stub = stub.clone();
            let req = proto::UtimensRequest {
                path: path.to_string(),
                atime_sec,
                atime_nsec,
                mtime_sec,
                mtime_nsec,
            };
            async move { stub.utimens(req).await }
        })
        .await?
        .into_inner();
        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }
        Ok(())
    }

    async fn path_call<F, Fut>(&self, path: &str, mut call: F) -> Result<(), FacadeError>
    where
        F: FnMut(proto::mntfs_client::MntfsClient<tonic::transport::Channel>, proto::PathRequest) -> Fut,
        Fut: std::future::Future<Output = Result<tonic::Response<proto::ErrReply>, Status>>,
    {
        let stub = self.stub.clone();
        let reply = wait_for_ready(|| {
            let stub = stub.clone();
            let req = proto::PathRequest { path: path.to_string() };
            call(stub, req)
        })
        .await?
        .into_inner();
        if reply.err != 0 {
            return Err(FacadeError::Domain(Errno(reply.err)));
        }
        Ok(())
    }

    /// Reloads a handle entry's current server-handle/epoch/path, the
    /// way spec §4.8 step 4 requires after a recovery retry.
    async fn snapshot(&self, user_handle: UserHandle) -> Result<(u64, Epoch, String), FacadeError> {
        let inner = self.inner.lock().await;
        let entry = inner
            .handles
            .get(user_handle)
            .ok_or(FacadeError::Domain(Errno(libc::EBADF)))?;
        Ok((entry.server_handle, entry.epoch, entry.path.clone()))
    }
}
