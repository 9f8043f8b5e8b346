//! Fleet construction: the control flow around the factory.
//!
//! For each configured account, for each custom kind allowed by the cache
//! policy, one agent is created per shard index. The loop over
//! `0..shard_count` is what upholds partition completeness: the shard
//! indices for a given (account, kind) are exactly `{0 .. count-1}` with no
//! gaps or duplicates.

use crate::agent::{CustomKindAgent, CustomKindAgentFactory};
use crate::cluster::ClusterApiClient;
use crate::config::{AccountConfig, KindCacheConfig};
use crate::error::AgentError;
use crate::store::CacheStore;
use crate::types::KindMap;
use std::sync::Arc;

/// Build the complete agent fleet for a configuration
///
/// `client_for` supplies the cluster client bound to each account's
/// credentials; the store is shared across the fleet. Kind enablement is
/// enforced here, not in the factory: a kind disabled by the cache policy
/// gets no agents.
pub fn build_fleet(
    config: &KindCacheConfig,
    kind_map: &KindMap,
    client_for: impl Fn(&AccountConfig) -> Arc<dyn ClusterApiClient>,
    store: Arc<dyn CacheStore>,
) -> Result<Vec<CustomKindAgent>, AgentError> {
    let mut fleet = Vec::new();

    for account in &config.accounts {
        let client = client_for(account);
        let shard_count = config.agent_count_for(account);
        let poll_interval = config.poll_interval_for(account);

        for kind in &account.custom_kinds {
            if !config.cache.is_kind_enabled(kind) {
                tracing::info!(
                    account = %account.name,
                    kind = %kind,
                    "kind disabled by cache policy, skipping"
                );
                continue;
            }

            for shard_index in 0..shard_count {
                let agent = CustomKindAgentFactory::create(
                    kind.clone(),
                    account,
                    shard_index,
                    shard_count,
                    poll_interval,
                    kind_map.clone(),
                    client.clone(),
                    store.clone(),
                )?;
                fleet.push(agent);
            }
        }
    }

    tracing::info!(agents = fleet.len(), "agent fleet built");
    Ok(fleet)
}
