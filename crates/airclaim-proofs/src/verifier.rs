//! Verifier bound to one deployment's trees and key backends.

use airclaim_core::base::Hash;
use airclaim_core::schema::config::SnapshotTreeConfig;
use tracing::debug;

use crate::{AirdropProof, ClaimRejection, KeyContext};

/// Outcome of an accepted claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedClaim {
    /// Bit in the shared claim bitfield.
    pub position: u32,
    /// Value claimed before the fee.
    pub value: u64,
    /// Fee declared by the claim.
    pub fee: u64,
}

/// Checks claims against a fixed snapshot.
#[derive(Debug, Clone)]
pub struct ClaimVerifier<'a> {
    trees: SnapshotTreeConfig,
    ctx: KeyContext<'a>,
    expected_root: Option<Hash>,
}

impl<'a> ClaimVerifier<'a> {
    /// Verifier over already validated tree parameters.
    #[must_use]
    pub const fn new(trees: SnapshotTreeConfig, ctx: KeyContext<'a>) -> Self {
        Self {
            trees,
            ctx,
            expected_root: None,
        }
    }

    /// Pin the root claims must verify against instead of the configured one.
    #[must_use]
    pub const fn with_expected_root(mut self, root: Hash) -> Self {
        self.expected_root = Some(root);
        self
    }

    /// Tree parameters in use.
    #[must_use]
    pub const fn trees(&self) -> &SnapshotTreeConfig {
        &self.trees
    }

    /// Decode and verify an encoded claim.
    ///
    /// # Errors
    /// Returns the first check the claim fails.
    pub fn verify_bytes(&self, bytes: &[u8]) -> Result<VerifiedClaim, ClaimRejection> {
        let proof = AirdropProof::decode(bytes)?;
        self.verify(&proof)
    }

    /// Verify a decoded claim, reporting which stage rejected it.
    ///
    /// Runs the same checks in the same order as [`AirdropProof::verify`].
    ///
    /// # Errors
    /// Returns the first check the claim fails.
    pub fn verify(&self, proof: &AirdropProof) -> Result<VerifiedClaim, ClaimRejection> {
        proof.check_sanity(&self.trees)?;
        if !proof.verify_merkle(&self.trees, self.expected_root.as_ref()) {
            return Err(ClaimRejection::NotInSnapshot);
        }
        if !proof.verify_signature(&self.ctx) {
            return Err(ClaimRejection::Unauthorised);
        }
        let position = proof
            .position(&self.trees)
            .ok_or(ClaimRejection::NoPosition)?;

        let claim = VerifiedClaim {
            position,
            value: proof.value(&self.trees),
            fee: proof.fee,
        };
        debug!(position, value = claim.value, fee = claim.fee, "Claim verified");
        Ok(claim)
    }
}
