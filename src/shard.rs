//! Deterministic work partitioning across a fleet of identical agents.
//!
//! A shard is one of `count` equal partitions of the keyspace for a given
//! (account, kind), identified by an index. Ownership of a key is a pure
//! function of `(key, index, count)`, so a fleet of workers reading the same
//! shard-count configuration partitions the keyspace with no coordination.

use crate::error::AgentError;

/// Position of one agent within a fixed-size pool of identical workers
///
/// Assigned at construction and never changed for the lifetime of the agent.
/// For a given (account, kind), the union of indices across all live agents
/// must be exactly `{0 .. count-1}` with no gaps or duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSpec {
    index: u32,
    count: u32,
}

impl ShardSpec {
    /// Validate and build a shard position
    ///
    /// Fails with [`AgentError::InvalidShardParameters`] unless
    /// `count >= 1` and `index < count`.
    pub fn new(index: u32, count: u32) -> Result<Self, AgentError> {
        if count == 0 || index >= count {
            return Err(AgentError::InvalidShardParameters { index, count });
        }
        Ok(Self { index, count })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Decide whether this shard owns the given work-item key
    ///
    /// Deterministic and stable across processes and restarts: the key is
    /// hashed with blake3 and the first eight digest bytes, read as a
    /// little-endian `u64`, are reduced modulo the shard count. For a fixed
    /// count, exactly one index owns any key. Changing the count rehashes
    /// the keyspace; there is no migration guarantee across a resize.
    pub fn owns(&self, key: &str) -> bool {
        shard_index_for(key, self.count) == self.index
    }
}

impl std::fmt::Display for ShardSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.index + 1, self.count)
    }
}

/// Owning shard index for a key in a pool of `count` workers
fn shard_index_for(key: &str, count: u32) -> u32 {
    let digest = blake3::hash(key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    (u64::from_le_bytes(prefix) % u64::from(count)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_shard_parameters() {
        for count in 1..8 {
            for index in 0..count {
                let shard = ShardSpec::new(index, count).unwrap();
                assert_eq!(shard.index(), index);
                assert_eq!(shard.count(), count);
            }
        }
    }

    #[test]
    fn test_index_equal_to_count_rejected() {
        let err = ShardSpec::new(3, 3).unwrap_err();
        assert!(matches!(
            err,
            AgentError::InvalidShardParameters { index: 3, count: 3 }
        ));
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(matches!(
            ShardSpec::new(0, 0).unwrap_err(),
            AgentError::InvalidShardParameters { .. }
        ));
    }

    #[test]
    fn test_single_shard_owns_everything() {
        let shard = ShardSpec::new(0, 1).unwrap();
        for key in ["default/widget-a", "kube-system/widget-b", "solo"] {
            assert!(shard.owns(key));
        }
    }

    #[test]
    fn test_ownership_deterministic() {
        let shard = ShardSpec::new(2, 5).unwrap();
        for key in ["default/widget-a", "prod/gadget-7", "x"] {
            assert_eq!(shard.owns(key), shard.owns(key));
        }
    }

    #[test]
    fn test_ownership_stable_across_instances() {
        // Two separately constructed specs with identical parameters must
        // agree; this is what lets shards live in different processes.
        let a = ShardSpec::new(1, 4).unwrap();
        let b = ShardSpec::new(1, 4).unwrap();
        for i in 0..100 {
            let key = format!("ns-{}/name-{}", i % 7, i);
            assert_eq!(a.owns(&key), b.owns(&key));
        }
    }

    proptest! {
        #[test]
        fn prop_exactly_one_owner_per_key(key in "[a-z0-9./-]{1,40}", count in 1u32..16) {
            let owners = (0..count)
                .filter(|&index| ShardSpec::new(index, count).unwrap().owns(&key))
                .count();
            prop_assert_eq!(owners, 1);
        }

        #[test]
        fn prop_owner_within_range(key in "\\PC{1,64}", count in 1u32..32) {
            prop_assert!(shard_index_for(&key, count) < count);
        }
    }
}
