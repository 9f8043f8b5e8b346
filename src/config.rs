//! Configuration for accounts, cache policy, and polling.
//!
//! Configuration is an explicit struct passed into the factory and fleet
//! builder at construction; nothing here is read from ambient global state.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::types::Kind;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_agent_count() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Top-level configuration for the caching subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindCacheConfig {
    /// Accounts to build agents for
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    /// Global cache-enablement policy
    #[serde(default)]
    pub cache: CachePolicy,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Default seconds between poll cycles, unless overridden per account
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Default number of shards per (account, kind), unless overridden per
    /// account
    #[serde(default = "default_agent_count")]
    pub agent_count: u32,
}

impl Default for KindCacheConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            cache: CachePolicy::default(),
            logging: LoggingConfig::default(),
            poll_interval_secs: default_poll_interval_secs(),
            agent_count: default_agent_count(),
        }
    }
}

impl KindCacheConfig {
    /// Effective poll interval for an account
    pub fn poll_interval_for(&self, account: &AccountConfig) -> Duration {
        Duration::from_secs(account.poll_interval_secs.unwrap_or(self.poll_interval_secs))
    }

    /// Effective shard count for an account
    pub fn agent_count_for(&self, account: &AccountConfig) -> u32 {
        account.agent_count.unwrap_or(self.agent_count)
    }
}

/// One named credentials/target-cluster binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,

    /// Cluster API endpoint the account's client connects to
    pub api_server: String,

    /// Bearer token for the cluster API, if any
    #[serde(default)]
    pub token: Option<String>,

    /// Custom resource kinds configured for this account
    #[serde(default)]
    pub custom_kinds: Vec<Kind>,

    /// Per-account shard count override
    #[serde(default)]
    pub agent_count: Option<u32>,

    /// Per-account poll interval override
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

impl AccountConfig {
    pub fn has_kind(&self, kind: &Kind) -> bool {
        self.custom_kinds.contains(kind)
    }
}

/// Global cache-enablement policy
///
/// Restricts which configured kinds are actually allowed to run. Enforced by
/// the fleet builder before the factory is called; a disabled kind gets no
/// agents at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Master switch for the whole caching subsystem
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Kinds excluded from caching even when configured on an account
    #[serde(default)]
    pub disabled_kinds: Vec<Kind>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            disabled_kinds: Vec::new(),
        }
    }
}

impl CachePolicy {
    pub fn is_kind_enabled(&self, kind: &Kind) -> bool {
        self.enabled && !self.disabled_kinds.contains(kind)
    }
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file plus environment overrides
    ///
    /// Environment variables prefixed `KINDCACHE_` override file values,
    /// e.g. `KINDCACHE_POLL_INTERVAL_SECS=10`; `__` separates nested keys
    /// (`KINDCACHE_CACHE__ENABLED=false`).
    pub fn load(path: &Path) -> Result<KindCacheConfig, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("KINDCACHE").separator("__"))
            .build()?;
        let loaded: KindCacheConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }
}

impl KindCacheConfig {
    /// Reject configurations the fleet builder cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_count == 0 {
            return Err(ConfigError::Invalid(
                "agent_count must be at least 1".to_string(),
            ));
        }
        for account in &self.accounts {
            if account.name.is_empty() {
                return Err(ConfigError::Invalid(
                    "account name must not be empty".to_string(),
                ));
            }
            if account.agent_count == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "account {} sets agent_count 0",
                    account.name
                )));
            }
        }
        Ok(())
    }
}
