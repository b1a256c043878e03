//! The owned client object: handle table, journal, and a connected stub,
//! all reachable without a process-wide singleton (Design Notes §9,
//! "process-wide client singleton" re-architecture).

use tonic::transport::Channel;

use crate::client::handles::HandleTable;
use crate::client::journal::Journal;
use crate::proto::mntfs_client::MntfsClient;

/// Handle table and journal live together behind one lock, which is also
/// the recovery coordinator's mutex (spec §5): holding it for the whole
/// reopen-plus-replay sequence is what makes recovery atomic (I4) and
/// serializes concurrent recoveries on this client.
pub struct ClientInner {
    pub handles: HandleTable,
    pub journal: Journal,
}

pub struct Client {
    pub(crate) inner: tokio::sync::Mutex<ClientInner>,
    pub(crate) stub: MntfsClient<Channel>,
}

impl Client {
    /// Builds the stub lazily: the underlying channel only dials on the
    /// first call, so a server restart manifests as the facade's own
    /// wait-for-ready retry loop blocking, not as a failed `connect`.
    pub fn connect(remote_addr: String) -> anyhow::Result<Self> {
        let endpoint = tonic::transport::Endpoint::from_shared(format!("http://{remote_addr}"))?
            .connect_timeout(std::time::Duration::from_secs(5));
        let channel = endpoint.connect_lazy();
        Ok(Client {
            inner: tokio::sync::Mutex::new(ClientInner {
                handles: HandleTable::new(),
                journal: Journal::new(),
            }),
            stub: MntfsClient::new(channel),
        })
    }
}
