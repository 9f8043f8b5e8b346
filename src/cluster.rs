//! Cluster API client port.
//!
//! The core never talks to a cluster directly; it consumes this trait through
//! an `Arc<dyn ClusterApiClient>` bound to one account's credentials. Each
//! poll cycle restarts the listing from scratch.

use crate::error::ClusterError;
use crate::types::Kind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One resource manifest discovered in the cluster's API surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub kind: Kind,
    /// Namespace, or `None` for cluster-scoped resources
    pub namespace: Option<String>,
    pub name: String,
    pub manifest: serde_json::Value,
}

impl ResourceManifest {
    /// Stable key used for shard-ownership decisions
    ///
    /// Cluster-scoped resources fall back to the bare name.
    pub fn shard_key(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}/{}", namespace, self.name),
            None => self.name.clone(),
        }
    }

    /// Identifier under which the manifest is cached, unique within a kind
    pub fn cache_key(&self) -> String {
        self.shard_key()
    }
}

/// Port to the external cluster API, bound to one account's credentials
#[async_trait]
pub trait ClusterApiClient: Send + Sync {
    /// List all resources of a kind currently present in the cluster
    ///
    /// Finite per cycle; restarted from scratch on every call.
    async fn list_resources(&self, kind: &Kind) -> Result<Vec<ResourceManifest>, ClusterError>;
}
