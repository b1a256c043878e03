//! Mount-side components (spec §4.5-§4.9): handle table, write journal,
//! the owned client object, recovery, the RPC facade, and the FUSE bridge.

pub mod bridge;
pub mod facade;
pub mod handles;
pub mod journal;
pub mod recovery;
pub mod state;

pub use bridge::MountFs;
pub use state::Client;
