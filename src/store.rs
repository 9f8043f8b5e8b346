//! Cache store port.
//!
//! Entries are keyed by `(Kind, identifier)`. Agents supply their
//! [`AgentDataType`] declaration with every write so the store knows which
//! kinds the writer may produce authoritatively. Merging shard results into
//! one view per kind, diffing, and eviction are the store's concern, not the
//! agents'; the in-memory store here applies last-writer-wins per key.

use crate::error::StoreError;
use crate::types::{AgentDataType, Authority, Kind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One cached manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Identifier unique within the kind (namespace/name for namespaced
    /// resources)
    pub key: String,
    /// Logical cache group the entry belongs to
    pub group: String,
    pub manifest: serde_json::Value,
    pub cached_at: DateTime<Utc>,
}

/// Port to the external cache storage engine
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Write entries of one kind on behalf of an authoritative producer
    ///
    /// Rejects the write when the supplied declaration is not
    /// [`Authority::Authoritative`].
    async fn write_authoritative(
        &self,
        data_type: &AgentDataType,
        entries: Vec<CacheEntry>,
    ) -> Result<(), StoreError>;

    /// Look up a cached entry by kind and identifier
    async fn get(&self, kind: &Kind, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Number of entries cached for a kind
    async fn count(&self, kind: &Kind) -> Result<usize, StoreError>;
}

/// In-memory cache store
///
/// Backs tests and embedding hosts that do not need durable storage.
/// Concurrent agents may write disjoint kinds or shards of the same kind;
/// the map lock provides the store-side concurrency control assumed by the
/// agent model.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<(Kind, String), CacheEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn write_authoritative(
        &self,
        data_type: &AgentDataType,
        entries: Vec<CacheEntry>,
    ) -> Result<(), StoreError> {
        if data_type.authority != Authority::Authoritative {
            return Err(StoreError::NotAuthoritative(data_type.kind.clone()));
        }

        let mut map = self.entries.write();
        for entry in entries {
            map.insert((data_type.kind.clone(), entry.key.clone()), entry);
        }
        Ok(())
    }

    async fn get(&self, kind: &Kind, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self
            .entries
            .read()
            .get(&(kind.clone(), key.to_string()))
            .cloned())
    }

    async fn count(&self, kind: &Kind) -> Result<usize, StoreError> {
        Ok(self
            .entries
            .read()
            .keys()
            .filter(|(entry_kind, _)| entry_kind == kind)
            .count())
    }
}
