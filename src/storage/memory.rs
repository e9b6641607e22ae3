//! In-Memory Session Store
//!
//! DashMap-backed [`SessionStore`] for in-process durability and tests.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{SessionSnapshot, SessionStore};
use crate::types::Result;

/// Thread-safe in-memory snapshot store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    snapshots: DashMap<String, SessionSnapshot>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, snapshot: SessionSnapshot) -> Result<()> {
        self.snapshots
            .insert(snapshot.flow_id().to_string(), snapshot);
        Ok(())
    }

    async fn load(&self, flow_id: &str) -> Result<Option<SessionSnapshot>> {
        Ok(self
            .snapshots
            .get(flow_id)
            .map(|entry| entry.value().clone()))
    }
}

// =============================================================================
// Tests
// =============================================================================
