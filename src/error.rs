//! Error taxonomy for agent construction and cycle execution.
//!
//! Construction-time failures (`InvalidShardParameters`, `UnknownKind`) are
//! fatal to that one agent's setup. Runtime failures surfaced by the fetch and
//! cache collaborators propagate unchanged to the scheduler, which owns retry
//! policy; the core performs no retries.

use crate::types::Kind;
use thiserror::Error;

/// Errors raised by agent construction and cycle execution
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid shard parameters: index {index} out of range for count {count}")]
    InvalidShardParameters { index: u32, count: u32 },

    #[error("kind {kind} is not configured for account {account}")]
    UnknownKind { kind: Kind, account: String },

    #[error("cluster fetch failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("cache write failed: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by the cluster API client collaborator
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to connect to cluster API at {0}")]
    Connection(String),

    #[error("cluster API rejected request for kind {kind}: {message}")]
    Api { kind: Kind, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors surfaced by the cache store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("agent is not an authoritative producer for kind {0}")]
    NotAuthoritative(Kind),

    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
