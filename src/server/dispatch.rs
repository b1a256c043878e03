//! The gRPC service implementation: one method per operation, each
//! running its handler on a blocking thread since the handlers do
//! synchronous POSIX I/O (spec §4.3).

use std::sync::Arc;
use tonic::{Request, Response, Status};

use crate::proto::mntfs_server::Mntfs;
use crate::proto::*;
use crate::server::ops;
use crate::server::state::ServerState;

pub struct MntfsService {
    state: Arc<ServerState>,
}

impl MntfsService {
    pub fn new(state: Arc<ServerState>) -> Self {
        MntfsService { state }
    }
}

macro_rules! blocking {
    ($state:expr, $body:expr) => {{
        let state = $state.clone();
        tokio::task::spawn_blocking(move || $body(state))
            .await
            .map_err(|e| Status::internal(e.to_string()))?
    }};
}

#[tonic::async_trait]
impl Mntfs for MntfsService {
    async fn getattr(&self, request: Request<GetattrRequest>) -> Result<Response<GetattrReply>, Status> {
        let path = request.into_inner().path;
        let (attr, err) = blocking!(self.state, move |state: Arc<ServerState>| ops::getattr::handle(&state, &path));
        Ok(Response::new(GetattrReply { attr: Some(attr.into()), err }))
    }

    async fn readdir(&self, request: Request<ReaddirRequest>) -> Result<Response<ReaddirReply>, Status> {
        let path = request.into_inner().path;
        let items = blocking!(self.state, move |state: Arc<ServerState>| ops::readdir::handle(&state, &path));
        Ok(Response::new(ReaddirReply {
            entries: items.into_iter().map(Into::into).collect(),
        }))
    }

    async fn open(&self, request: Request<OpenRequest>) -> Result<Response<OpenReply>, Status> {
        let req = request.into_inner();
        let (handle, epoch, err) = blocking!(self.state, move |state: Arc<ServerState>| ops::open::handle(
            &state, &req.path, req.flags
        ));
        Ok(Response::new(OpenReply { handle, epoch, err }))
    }

    async fn create(&self, request: Request<CreateRequest>) -> Result<Response<CreateReply>, Status> {
        let req = request.into_inner();
        let (handle, epoch, err) = blocking!(self.state, move |state: Arc<ServerState>| ops::create::handle(
            &state, &req.path, req.mode, req.flags
        ));
        Ok(Response::new(CreateReply { handle, epoch, err }))
    }

    async fn read(&self, request: Request<ReadRequest>) -> Result<Response<ReadReply>, Status> {
        let req = request.into_inner();
        let (buffer, bytes_read, err, newsessionid) = blocking!(self.state, move |state: Arc<ServerState>| {
            ops::read::handle(&state, req.handle, req.epoch, req.count, req.offset)
        });
        Ok(Response::new(ReadReply {
            buffer,
            bytes_read,
            err,
            newsessionid,
        }))
    }

    async fn write(&self, request: Request<WriteRequest>) -> Result<Response<WriteReply>, Status> {
        let req = request.into_inner();
        let (bytes_written, err, newsessionid) = blocking!(self.state, move |state: Arc<ServerState>| {
            ops::write::handle(&state, req.handle, req.epoch, &req.buffer, req.offset)
        });
        Ok(Response::new(WriteReply {
            bytes_written,
            err,
            newsessionid,
        }))
    }

    async fn commit_write(
        &self,
        request: Request<CommitWriteRequest>,
    ) -> Result<Response<CommitWriteReply>, Status> {
        let req = request.into_inner();
        let (err, newsessionid) = blocking!(self.state, move |state: Arc<ServerState>| {
            ops::commit::handle(&state, req.handle, req.epoch)
        });
        Ok(Response::new(CommitWriteReply { err, newsessionid }))
    }

    async fn release(&self, request: Request<ReleaseRequest>) -> Result<Response<ReleaseReply>, Status> {
        let req = request.into_inner();
        let (err, newsessionid) = blocking!(self.state, move |state: Arc<ServerState>| {
            ops::release::handle(&state, req.handle, req.epoch)
        });
        Ok(Response::new(ReleaseReply { err, newsessionid }))
    }

    async fn unlink(&self, request: Request<PathRequest>) -> Result<Response<ErrReply>, Status> {
        let path = request.into_inner().path;
        let err = blocking!(self.state, move |state: Arc<ServerState>| ops::unlink::handle(&state, &path));
        Ok(Response::new(ErrReply { err }))
    }

    async fn rmdir(&self, request: Request<PathRequest>) -> Result<Response<ErrReply>, Status> {
        let path = request.into_inner().path;
        let err = blocking!(self.state, move |state: Arc<ServerState>| ops::rmdir::handle(&state, &path));
        Ok(Response::new(ErrReply { err }))
    }

    async fn mkdir(&self, request: Request<MkdirRequest>) -> Result<Response<ErrReply>, Status> {
        let req = request.into_inner();
        let err = blocking!(self.state, move |state: Arc<ServerState>| ops::mkdir::handle(
            &state, &req.path, req.mode
        ));
        Ok(Response::new(ErrReply { err }))
    }

    async fn rename(&self, request: Request<RenameRequest>) -> Result<Response<ErrReply>, Status> {
        let req = request.into_inner();
        let err = blocking!(self.state, move |state: Arc<ServerState>| ops::rename::handle(
            &state, &req.from, &req.to
        ));
        Ok(Response::new(ErrReply { err }))
    }

    async fn utimens(&self, request: Request<UtimensRequest>) -> Result<Response<ErrReply>, Status> {
        let req = request.into_inner();
        let err = blocking!(self.state, move |state: Arc<ServerState>| ops::utimens::handle(
            &state,
            &req.path,
            req.atime_sec,
            req.atime_nsec,
            req.mtime_sec,
            req.mtime_nsec,
        ));
        Ok(Response::new(ErrReply { err }))
    }
}
