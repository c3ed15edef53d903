//! Fail-closed claim verification: bounds, snapshot membership, signature.

use airclaim_core::base::{Hash, blake2b256, derive_root};
use airclaim_core::schema::config::SnapshotTreeConfig;
use tracing::debug;

use super::{
    AirdropProof, MAX_ADDRESS_VERSION, MAX_MONEY, RECIPIENT_FEE, SPONSOR_FEE, max_proof_size,
};
use crate::key::{AirdropKey, MAX_ADDRESS_SIZE, MIN_ADDRESS_SIZE};
use crate::{KeyContext, SanityError};

impl AirdropProof {
    /// Check every bound a claim must satisfy before any hashing is done.
    ///
    /// ADDRESS claims skip the total size bound; their paths are bounded by
    /// the faucet depth instead.
    ///
    /// # Errors
    /// Returns the first bound that fails.
    pub fn check_sanity(&self, trees: &SnapshotTreeConfig) -> Result<(), SanityError> {
        if self.key.is_empty() {
            return Err(SanityError::EmptyKey);
        }
        if self.version > MAX_ADDRESS_VERSION {
            return Err(SanityError::Version(self.version));
        }
        if !(MIN_ADDRESS_SIZE..=MAX_ADDRESS_SIZE).contains(&self.address.len()) {
            return Err(SanityError::AddressLength(self.address.len()));
        }

        let value = self.value(trees);
        if value > MAX_MONEY {
            return Err(SanityError::Value(value));
        }
        if self.fee > value {
            return Err(SanityError::Fee {
                fee: self.fee,
                value,
            });
        }

        if self.is_address() {
            if !self.subproof.is_empty() || self.subindex != 0 {
                return Err(SanityError::AddressSubproof);
            }
            if self.proof.len() > usize::from(trees.faucet.depth) {
                return Err(SanityError::ProofLength(self.proof.len()));
            }
            if self.index >= trees.faucet.leaves {
                return Err(SanityError::Index(self.index));
            }
            return Ok(());
        }

        if self.subproof.len() > usize::from(trees.airdrop.subdepth) {
            return Err(SanityError::SubproofLength(self.subproof.len()));
        }
        if u16::from(self.subindex) >= trees.airdrop.subleaves {
            return Err(SanityError::Subindex(self.subindex));
        }
        if self.proof.len() > usize::from(trees.airdrop.depth) {
            return Err(SanityError::ProofLength(self.proof.len()));
        }
        if self.index >= trees.airdrop.leaves {
            return Err(SanityError::Index(self.index));
        }
        let size = self.encoded_size();
        if size > max_proof_size(trees) {
            return Err(SanityError::Size(size));
        }

        Ok(())
    }

    /// Whether [`AirdropProof::check_sanity`] passes.
    #[must_use]
    pub fn is_sane(&self, trees: &SnapshotTreeConfig) -> bool {
        match self.check_sanity(trees) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "Claim failed sanity check");
                false
            }
        }
    }

    /// Check the key is a leaf of its snapshot tree.
    ///
    /// ADDRESS keys are checked against the faucet tree, all others against
    /// the two-level airdrop tree. `expected_root` overrides the configured
    /// root, but may never name the other tree's root.
    #[must_use]
    pub fn verify_merkle(&self, trees: &SnapshotTreeConfig, expected_root: Option<&Hash>) -> bool {
        let leaf = blake2b256(&self.key);
        let index = u64::from(self.index);

        let (root, other, derived) = if self.is_address() {
            let derived = derive_root(&leaf, &self.proof, index, usize::from(trees.faucet.depth));
            (&trees.faucet.root, &trees.airdrop.root, derived)
        } else {
            let derived = derive_root(
                &leaf,
                &self.subproof,
                u64::from(self.subindex),
                usize::from(trees.airdrop.subdepth),
            )
            .and_then(|subroot| {
                derive_root(&subroot, &self.proof, index, usize::from(trees.airdrop.depth))
            });
            (&trees.airdrop.root, &trees.faucet.root, derived)
        };

        let expected = match expected_root {
            Some(expected) if expected == other => {
                debug!("Expected root belongs to the other snapshot tree");
                return false;
            }
            Some(expected) => expected,
            None => root,
        };

        let included = derived.is_some_and(|derived| &derived == expected);
        if !included {
            debug!(index = self.index, "Claim is not in the snapshot");
        }
        included
    }

    /// Check the claim is authorised by its key.
    ///
    /// ADDRESS claims carry no signature: the destination must match the
    /// grant and the fee must be the fixed sponsor or recipient fee. All other
    /// claims must carry a valid signature over
    /// [`AirdropProof::signature_hash`].
    #[must_use]
    pub fn verify_signature(&self, ctx: &KeyContext<'_>) -> bool {
        let key = match self.decode_key() {
            Ok(key) => key,
            Err(err) => {
                debug!(%err, "Claim key does not decode");
                return false;
            }
        };

        if let AirdropKey::Address(grant) = &key {
            let fee = if grant.sponsor {
                SPONSOR_FEE
            } else {
                RECIPIENT_FEE
            };
            let valid = self.version == grant.version
                && self.address == grant.address
                && self.fee == fee
                && self.signature.is_empty();
            if !valid {
                debug!(fee = self.fee, expected_fee = fee, "Address claim does not match its grant");
            }
            return valid;
        }

        match self.signature_hash() {
            Ok(msg) => key.verify(&msg, &self.signature, ctx),
            Err(err) => {
                debug!(%err, "Claim does not encode");
                false
            }
        }
    }

    /// Full verification: sanity, then membership, then signature.
    #[must_use]
    pub fn verify(
        &self,
        trees: &SnapshotTreeConfig,
        ctx: &KeyContext<'_>,
        expected_root: Option<&Hash>,
    ) -> bool {
        self.is_sane(trees) && self.verify_merkle(trees, expected_root) && self.verify_signature(ctx)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects, reason = "Tests")]

    use airclaim_core::base::combine;
    use airclaim_core::schema::config::{AirdropTree, FaucetTree, SNAPSHOT_CONFIG_VERSION};

    use super::*;
    use crate::key::AddressKey;

    fn grant(sponsor: bool) -> AirdropKey {
        AirdropKey::Address(AddressKey {
            version: 0,
            address: vec![0x42; 20],
            value: 1_000_000_000,
            sponsor,
        })
    }

    /// Faucet tree of two grants, airdrop tree with an unrelated root.
    fn trees_for(key: &AirdropKey) -> (SnapshotTreeConfig, Hash) {
        let leaf = key.hash().expect("hash");
        let sibling = blake2b256(b"other grant");
        let trees = SnapshotTreeConfig {
            version: SNAPSHOT_CONFIG_VERSION,
            airdrop: AirdropTree {
                root: [0xa1; 32],
                depth: 4,
                subdepth: 2,
                leaves: 16,
                subleaves: 4,
                reward: 5_000,
            },
            faucet: FaucetTree {
                root: combine(&leaf, &sibling),
                depth: 1,
                leaves: 2,
            },
        };
        (trees, sibling)
    }

    fn claim(key: &AirdropKey, sibling: Hash, fee: u64) -> AirdropProof {
        AirdropProof::new(key, 0, vec![0x42; 20], fee)
            .expect("proof")
            .with_faucet_path(0, vec![sibling])
    }

    #[test]
    fn address_claim_requires_exact_fee() {
        let ctx = KeyContext::default();
        let key = grant(false);
        let (trees, sibling) = trees_for(&key);

        assert!(claim(&key, sibling, RECIPIENT_FEE).verify(&trees, &ctx, None));
        assert!(!claim(&key, sibling, RECIPIENT_FEE + 1).verify(&trees, &ctx, None));
        assert!(!claim(&key, sibling, SPONSOR_FEE).verify(&trees, &ctx, None));

        let sponsor = grant(true);
        let (trees, sibling) = trees_for(&sponsor);
        assert!(claim(&sponsor, sibling, SPONSOR_FEE).verify(&trees, &ctx, None));
    }

    #[test]
    fn address_claim_with_signature_fails() {
        let ctx = KeyContext::default();
        let key = grant(false);
        let (trees, sibling) = trees_for(&key);
        let signed = AirdropProof {
            signature: vec![1],
            ..claim(&key, sibling, RECIPIENT_FEE)
        };
        assert!(signed.is_sane(&trees));
        assert!(!signed.verify(&trees, &ctx, None));
    }

    #[test]
    fn address_claim_must_match_destination() {
        let ctx = KeyContext::default();
        let key = grant(false);
        let (trees, sibling) = trees_for(&key);
        let redirected = AirdropProof {
            address: vec![0x43; 20],
            ..claim(&key, sibling, RECIPIENT_FEE)
        };
        assert!(!redirected.verify_signature(&ctx));
    }

    #[test]
    fn sanity_reports_first_failure() {
        let key = grant(false);
        let (trees, sibling) = trees_for(&key);
        let good = claim(&key, sibling, RECIPIENT_FEE);

        let cases = [
            (
                AirdropProof {
                    key: Vec::new(),
                    ..good.clone()
                },
                SanityError::EmptyKey,
            ),
            (
                AirdropProof {
                    version: 32,
                    ..good.clone()
                },
                SanityError::Version(32),
            ),
            (
                AirdropProof {
                    address: vec![1],
                    ..good.clone()
                },
                SanityError::AddressLength(1),
            ),
            (
                AirdropProof {
                    fee: 1_000_000_001,
                    ..good.clone()
                },
                SanityError::Fee {
                    fee: 1_000_000_001,
                    value: 1_000_000_000,
                },
            ),
            (
                AirdropProof {
                    subindex: 1,
                    ..good.clone()
                },
                SanityError::AddressSubproof,
            ),
            (
                AirdropProof {
                    proof: vec![sibling; 2],
                    ..good.clone()
                },
                SanityError::ProofLength(2),
            ),
            (
                AirdropProof {
                    index: 2,
                    ..good.clone()
                },
                SanityError::Index(2),
            ),
        ];

        assert_eq!(good.check_sanity(&trees), Ok(()));
        for (proof, expected) in cases {
            assert_eq!(proof.check_sanity(&trees), Err(expected));
        }
    }

    #[test]
    fn grant_above_money_supply_is_insane() {
        let key = AirdropKey::Address(AddressKey {
            version: 0,
            address: vec![0x42; 20],
            value: MAX_MONEY + 1,
            sponsor: false,
        });
        let (trees, sibling) = trees_for(&key);
        assert_eq!(
            claim(&key, sibling, 0).check_sanity(&trees),
            Err(SanityError::Value(MAX_MONEY + 1))
        );
    }

    #[test]
    fn airdrop_bounds_use_airdrop_tree() {
        let key = AirdropKey::from_ed25519_point(&[5; 32]).expect("key");
        let (trees, _) = trees_for(&grant(false));
        let base = AirdropProof::new(&key, 0, vec![1; 20], 10).expect("proof");

        let deep_sub = base.clone().with_airdrop_path(0, Vec::new(), 0, vec![[0; 32]; 3]);
        assert_eq!(deep_sub.check_sanity(&trees), Err(SanityError::SubproofLength(3)));

        let far_sub = base.clone().with_airdrop_path(0, Vec::new(), 4, Vec::new());
        assert_eq!(far_sub.check_sanity(&trees), Err(SanityError::Subindex(4)));

        let far = base.clone().with_airdrop_path(16, Vec::new(), 0, Vec::new());
        assert_eq!(far.check_sanity(&trees), Err(SanityError::Index(16)));

        let oversized = AirdropProof {
            signature: vec![0; max_proof_size(&trees)],
            ..base.clone()
        };
        assert!(matches!(oversized.check_sanity(&trees), Err(SanityError::Size(_))));

        assert_eq!(base.check_sanity(&trees), Ok(()));
    }

    #[test]
    fn cross_tree_root_is_rejected() {
        let key = grant(false);
        let (trees, sibling) = trees_for(&key);
        let proof = claim(&key, sibling, RECIPIENT_FEE);

        assert!(proof.verify_merkle(&trees, None));
        assert!(proof.verify_merkle(&trees, Some(&trees.faucet.root)));
        assert!(!proof.verify_merkle(&trees, Some(&trees.airdrop.root)));

        let ed = AirdropKey::from_ed25519_point(&[5; 32]).expect("key");
        let airdrop_claim = AirdropProof::new(&ed, 0, vec![1; 20], 0).expect("proof");
        assert!(!airdrop_claim.verify_merkle(&trees, Some(&trees.faucet.root)));
    }

    #[test]
    fn undecodable_key_fails_signature_check() {
        let proof = AirdropProof {
            key: vec![9, 9, 9],
            address: vec![1; 20],
            ..AirdropProof::default()
        };
        assert!(!proof.verify_signature(&KeyContext::default()));
    }
}
