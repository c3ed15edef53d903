//! Snapshot tree configuration: roots and shapes of the airdrop and faucet trees.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;
use thiserror::Error;

use crate::base::Hash;

/// Configuration schema version understood by this build.
pub const SNAPSHOT_CONFIG_VERSION: u32 = 1;

/// Deepest tree whose positions still fit the `u32` claim index.
pub const MAX_TREE_DEPTH: u8 = 32;

/// Deepest sub-tree whose positions still fit the `u8` claim sub-index.
pub const MAX_SUBTREE_DEPTH: u8 = 8;

/// Parameters of both snapshot trees for one deployment.
///
/// Loaded once at startup. Depths and leaf counts bound the work a verifier
/// does for a single untrusted claim.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotTreeConfig {
    /// Schema version; must equal [`SNAPSHOT_CONFIG_VERSION`].
    pub version: u32,
    /// Two-level tree of legacy-key grants.
    pub airdrop: AirdropTree,
    /// Flat tree of address grants.
    pub faucet: FaucetTree,
}

/// Two-level airdrop tree: each outer leaf is the root of a small sub-tree of keys.
#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct AirdropTree {
    /// Root of the outer tree.
    #[serde_as(as = "Hex")]
    #[schemars(with = "String")]
    pub root: Hash,
    /// Maximum length of the outer sibling path.
    pub depth: u8,
    /// Maximum length of the sub-tree sibling path.
    pub subdepth: u8,
    /// Number of outer leaves.
    pub leaves: u32,
    /// Number of leaves per sub-tree.
    pub subleaves: u16,
    /// Fixed payout for every non-address claim.
    pub reward: u64,
}

/// Flat faucet tree of address grants.
#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct FaucetTree {
    /// Tree root.
    #[serde_as(as = "Hex")]
    #[schemars(with = "String")]
    pub root: Hash,
    /// Maximum length of the sibling path.
    pub depth: u8,
    /// Number of leaves.
    pub leaves: u32,
}

/// Errors found while validating a [`SnapshotTreeConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The document was written for a different schema version.
    #[error("Unsupported snapshot config version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version in the document.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
    /// A depth is larger than the index width allows.
    #[error("{tree} depth {depth} exceeds maximum {max}")]
    DepthTooLarge {
        /// Tree name.
        tree: &'static str,
        /// Configured depth.
        depth: u8,
        /// Largest supported depth.
        max: u8,
    },
    /// A leaf count is zero or does not fit under the configured depth.
    #[error("{tree} leaf count {leaves} does not fit depth {depth}")]
    InvalidLeafCount {
        /// Tree name.
        tree: &'static str,
        /// Configured leaf count.
        leaves: u64,
        /// Configured depth.
        depth: u8,
    },
    /// The combined claim bitfield would overflow the `u32` position space.
    #[error("Combined leaf count overflows u32")]
    BitfieldOverflow,
    /// Both trees share a root, so claims could be replayed across them.
    #[error("Airdrop and faucet roots must differ")]
    SharedRoot,
}

impl SnapshotTreeConfig {
    /// Check internal consistency of the parameters.
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SNAPSHOT_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_CONFIG_VERSION,
            });
        }

        check_tree("airdrop", self.airdrop.depth, MAX_TREE_DEPTH, self.airdrop.leaves.into())?;
        check_tree(
            "airdrop subtree",
            self.airdrop.subdepth,
            MAX_SUBTREE_DEPTH,
            self.airdrop.subleaves.into(),
        )?;
        check_tree("faucet", self.faucet.depth, MAX_TREE_DEPTH, self.faucet.leaves.into())?;

        self.total_leaves().ok_or(ConfigError::BitfieldOverflow)?;

        if self.airdrop.root == self.faucet.root {
            return Err(ConfigError::SharedRoot);
        }

        Ok(())
    }

    /// Size of the shared claim bitfield `[airdrop bits || faucet bits]`.
    #[must_use]
    pub const fn total_leaves(&self) -> Option<u32> {
        self.airdrop.leaves.checked_add(self.faucet.leaves)
    }
}

fn check_tree(tree: &'static str, depth: u8, max: u8, leaves: u64) -> Result<(), ConfigError> {
    if depth > max {
        return Err(ConfigError::DepthTooLarge { tree, depth, max });
    }
    let capacity = 1_u64 << depth;
    if leaves == 0 || leaves > capacity {
        return Err(ConfigError::InvalidLeafCount {
            tree,
            leaves,
            depth,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SnapshotTreeConfig {
        SnapshotTreeConfig {
            version: SNAPSHOT_CONFIG_VERSION,
            airdrop: AirdropTree {
                root: [1_u8; 32],
                depth: 18,
                subdepth: 3,
                leaves: 216_199,
                subleaves: 8,
                reward: 4_246_994_314,
            },
            faucet: FaucetTree {
                root: [2_u8; 32],
                depth: 11,
                leaves: 1_358,
            },
        }
    }

    #[test]
    fn sample_config_is_valid() {
        assert_eq!(sample().validate(), Ok(()));
        assert_eq!(sample().total_leaves(), Some(216_199 + 1_358));
    }

    #[test]
    fn rejects_wrong_version() {
        let mut config = sample();
        config.version = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedVersion { found: 0, .. })
        ));
    }

    #[test]
    fn rejects_leaves_beyond_depth() {
        let mut config = sample();
        config.faucet.leaves = 2_049;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLeafCount { tree: "faucet", .. })
        ));

        let mut config = sample();
        config.airdrop.subdepth = 9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DepthTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_shared_root() {
        let mut config = sample();
        config.faucet.root = config.airdrop.root;
        assert_eq!(config.validate(), Err(ConfigError::SharedRoot));
    }

    #[test]
    fn roots_serialize_as_hex() {
        let json = serde_json::to_value(sample()).expect("serialize config");
        assert_eq!(json["faucet"]["root"], "02".repeat(32));

        let back: SnapshotTreeConfig = serde_json::from_value(json).expect("deserialize config");
        assert_eq!(back, sample());
    }
}
