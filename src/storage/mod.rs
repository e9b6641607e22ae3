//! Session Persistence Boundary
//!
//! The engine itself never performs I/O. Durability is a collaborator
//! concern behind [`SessionStore`]: accept an opaque serializable snapshot,
//! return it unchanged on later lookup by flow id. The async trait exists
//! for real backends; [`MemorySessionStore`] ships for in-process use and
//! tests.

pub mod memory;
pub mod snapshot;

pub use memory::MemorySessionStore;
pub use snapshot::SessionSnapshot;

use async_trait::async_trait;

use crate::types::Result;

/// Durable store for session snapshots, keyed by flow id
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a snapshot, replacing any earlier capture of the same flow
    async fn save(&self, snapshot: SessionSnapshot) -> Result<()>;

    /// Fetch the latest snapshot for a flow, if one was saved
    async fn load(&self, flow_id: &str) -> Result<Option<SessionSnapshot>>;
}
