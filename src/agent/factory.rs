//! Factory producing one caching agent per (kind, account, shard) triple.

use crate::agent::CustomKindAgent;
use crate::cluster::ClusterApiClient;
use crate::config::AccountConfig;
use crate::error::AgentError;
use crate::shard::ShardSpec;
use crate::store::CacheStore;
use crate::types::{Kind, KindMap};
use std::sync::Arc;
use std::time::Duration;

/// Factory for custom-kind caching agents
///
/// Construction validates shard parameters and kind membership and performs
/// no network or cache I/O; a failed call produces no half-initialized
/// agent.
pub struct CustomKindAgentFactory;

impl CustomKindAgentFactory {
    /// Build one agent bound to exactly the given (kind, account, shard)
    ///
    /// Fails with [`AgentError::InvalidShardParameters`] unless
    /// `0 <= shard_index < shard_count` and `shard_count >= 1`, and with
    /// [`AgentError::UnknownKind`] when the kind is not in the account's
    /// configured custom-kind list.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        kind: Kind,
        account: &AccountConfig,
        shard_index: u32,
        shard_count: u32,
        poll_interval: Duration,
        kind_map: KindMap,
        client: Arc<dyn ClusterApiClient>,
        store: Arc<dyn CacheStore>,
    ) -> Result<CustomKindAgent, AgentError> {
        let shard = ShardSpec::new(shard_index, shard_count)?;
        if !account.has_kind(&kind) {
            return Err(AgentError::UnknownKind {
                kind,
                account: account.name.clone(),
            });
        }

        Ok(CustomKindAgent::new(
            kind,
            account.name.clone(),
            shard,
            poll_interval,
            kind_map,
            client,
            store,
        ))
    }
}
