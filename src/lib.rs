//! Kindcache: Sharded Polling Cache Agents
//!
//! The instantiation, work-partitioning, and authority-declaration core of a
//! cloud-resource caching subsystem. Agents poll an external cluster for
//! custom resource kinds and refresh a shared cache; each agent owns one
//! deterministic shard of one kind for one account and declares itself the
//! authoritative producer of that kind's cache entries.

pub mod agent;
pub mod cluster;
pub mod config;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod shard;
pub mod store;
pub mod types;
