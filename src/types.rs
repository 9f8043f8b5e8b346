//! Core types for the kind caching subsystem.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Cache group used for custom kinds that have no explicit mapping.
pub const DEFAULT_CACHE_GROUP: &str = "customResource";

/// Kind: a category of cached resource (e.g., a custom resource type name)
///
/// Immutable value, equality by name. Supplied by configuration and never
/// mutated after agent construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(String);

impl Kind {
    pub fn new(name: impl Into<String>) -> Self {
        Kind(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        Kind(name.to_string())
    }
}

/// Authority an agent holds over cache entries of a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    /// Sole trusted producer of cache entries of the kind
    Authoritative,
    /// Supplementary contributor; never the source of truth
    Informative,
}

/// Declaration that an agent produces cache entries of a kind with a given
/// authority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentDataType {
    pub kind: Kind,
    pub authority: Authority,
}

impl AgentDataType {
    /// Declare authoritative production of the given kind
    pub fn authoritative(kind: Kind) -> Self {
        Self {
            kind,
            authority: Authority::Authoritative,
        }
    }

    /// Declare informative contribution for the given kind
    pub fn informative(kind: Kind) -> Self {
        Self {
            kind,
            authority: Authority::Informative,
        }
    }
}

impl fmt::Display for AgentDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.authority, self.kind)
    }
}

/// Mapping from resource kinds to logical cache groups
///
/// Custom kinds without an explicit mapping fall back to
/// [`DEFAULT_CACHE_GROUP`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KindMap {
    #[serde(default)]
    groups: HashMap<Kind, String>,
}

impl KindMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Kind, String)>) -> Self {
        Self {
            groups: pairs.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, kind: Kind, group: impl Into<String>) {
        self.groups.insert(kind, group.into());
    }

    /// Resolve the cache group for a kind
    pub fn group_for(&self, kind: &Kind) -> &str {
        self.groups
            .get(kind)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CACHE_GROUP)
    }
}
