//! Polling cache agents.
//!
//! An agent is the runnable unit owning one shard of one kind for one
//! account. Its identity, authority, and partition membership are fixed at
//! construction; each poll cycle is triggered externally and delegates the
//! actual fetch and cache work to the cluster-client and cache-store ports.

pub mod factory;
pub mod fleet;

pub use factory::CustomKindAgentFactory;
pub use fleet::build_fleet;

use crate::cluster::ClusterApiClient;
use crate::error::AgentError;
use crate::shard::ShardSpec;
use crate::store::{CacheEntry, CacheStore};
use crate::types::{AgentDataType, Kind, KindMap};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Family label for agents caching custom resource kinds, distinguishing
/// them from other agent families in identity labels
pub const CUSTOM_KUBERNETES_FAMILY: &str = "CustomKubernetes";

/// Result of one completed poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Resources of the kind discovered in the cluster
    pub discovered: usize,
    /// Resources owned by this shard and written to the cache
    pub cached: usize,
}

/// Scheduler-facing contract for a caching agent
///
/// The scheduler uses [`agent_type`](CachingAgent::agent_type) for
/// deduplication, log correlation, and (where it implements distributed
/// locking) as the lock key, and
/// [`provided_data_types`](CachingAgent::provided_data_types) to register
/// which cache data the agent is authoritative for.
#[async_trait]
pub trait CachingAgent: Send + Sync {
    /// Stable, globally-unique label for this agent instance
    fn agent_type(&self) -> String;

    /// Data types this agent is the authoritative producer for
    fn provided_data_types(&self) -> HashSet<AgentDataType>;

    /// Run one poll-cache cycle to completion
    ///
    /// Collaborator failures propagate unchanged; retry policy belongs to
    /// the scheduler.
    async fn execute_cycle(&self) -> Result<CycleOutcome, AgentError>;
}

/// Caching agent for one shard of one custom resource kind on one account
///
/// There is one instance per (account, configured custom kind, shard index).
/// All identity fields are immutable for the lifetime of the agent.
pub struct CustomKindAgent {
    kind: Kind,
    account: String,
    /// Agent family label baked into the identity; one parameterized agent
    /// type per family instead of a subtype per kind
    family: &'static str,
    shard: ShardSpec,
    poll_interval: Duration,
    kind_map: KindMap,
    client: Arc<dyn ClusterApiClient>,
    store: Arc<dyn CacheStore>,
}

impl std::fmt::Debug for CustomKindAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomKindAgent")
            .field("kind", &self.kind)
            .field("account", &self.account)
            .field("family", &self.family)
            .field("shard", &self.shard)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl CustomKindAgent {
    pub(crate) fn new(
        kind: Kind,
        account: String,
        shard: ShardSpec,
        poll_interval: Duration,
        kind_map: KindMap,
        client: Arc<dyn ClusterApiClient>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            kind,
            account,
            family: CUSTOM_KUBERNETES_FAMILY,
            shard,
            poll_interval,
            kind_map,
            client,
            store,
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn shard(&self) -> ShardSpec {
        self.shard
    }

    /// Interval at which the external scheduler should trigger cycles
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Kinds this agent polls; always exactly the kind it was built for
    pub fn primary_kinds(&self) -> Vec<Kind> {
        vec![self.kind.clone()]
    }
}

#[async_trait]
impl CachingAgent for CustomKindAgent {
    fn agent_type(&self) -> String {
        format!(
            "{}/{}({}){}",
            self.account, self.family, self.kind, self.shard
        )
    }

    fn provided_data_types(&self) -> HashSet<AgentDataType> {
        HashSet::from([AgentDataType::authoritative(self.kind.clone())])
    }

    async fn execute_cycle(&self) -> Result<CycleOutcome, AgentError> {
        let manifests = self.client.list_resources(&self.kind).await?;
        let discovered = manifests.len();

        let group = self.kind_map.group_for(&self.kind).to_string();
        let now = Utc::now();
        let owned: Vec<CacheEntry> = manifests
            .into_iter()
            .filter(|manifest| self.shard.owns(&manifest.shard_key()))
            .map(|manifest| CacheEntry {
                key: manifest.cache_key(),
                group: group.clone(),
                manifest: manifest.manifest,
                cached_at: now,
            })
            .collect();
        let cached = owned.len();

        let data_type = AgentDataType::authoritative(self.kind.clone());
        self.store.write_authoritative(&data_type, owned).await?;

        tracing::debug!(
            agent = %self.agent_type(),
            discovered,
            cached,
            "poll cycle complete"
        );
        Ok(CycleOutcome { discovered, cached })
    }
}
