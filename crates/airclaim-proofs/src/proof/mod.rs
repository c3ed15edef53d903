//! Claim proofs: a key bound to its snapshot path, a destination and a fee.

mod check;
mod codec;
mod json;

use airclaim_core::base::{DecodeError, HASH_SIZE, Hash};
use airclaim_core::schema::config::SnapshotTreeConfig;
use hex_literal::hex;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::key::{AirdropKey, KeyType, SecretKey};
use crate::{KeyContext, ProofError, Tweak};

/// Fee an ADDRESS grant with the sponsor flag must declare.
pub const SPONSOR_FEE: u64 = 500_000_000;

/// Fee an ADDRESS grant without the sponsor flag must declare.
pub const RECIPIENT_FEE: u64 = 100_000_000;

/// Total money supply; no claim may exceed it.
pub const MAX_MONEY: u64 = 2_040_000_000_000_000;

/// Highest destination address version.
pub const MAX_ADDRESS_VERSION: u8 = 31;

/// Largest key encoding counted towards the proof size bound.
pub const MAX_KEY_SIZE: usize = 1 + 2 + 512 + 1 + 5 + 32;

/// Largest signature counted towards the proof size bound.
pub const MAX_SIG_SIZE: usize = 1964;

/// `SHA-256("HNS Signature")`, prefixed to the signed encoding.
pub const SIGNATURE_CONTEXT: Hash =
    hex!("5b21ff4a0fcf78123915eaa0003d2a3e1855a9b15e3441da2ef5a4c01eaf4ff3");

/// A claim against one of the snapshot trees.
///
/// Non-ADDRESS claims sit in the two-level airdrop tree: `subproof` and
/// `subindex` locate the key within its sub-tree, `proof` and `index` locate
/// the sub-tree root. ADDRESS claims sit in the flat faucet tree and use only
/// `proof` and `index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(into = "json::ProofJson", try_from = "json::ProofJson")]
pub struct AirdropProof {
    /// Leaf index in the outer tree.
    pub index: u32,
    /// Outer sibling path, leaf to root.
    pub proof: Vec<Hash>,
    /// Leaf index in the sub-tree.
    pub subindex: u8,
    /// Sub-tree sibling path, leaf to root.
    pub subproof: Vec<Hash>,
    /// Encoded [`AirdropKey`]; hashed as the snapshot leaf.
    pub key: Vec<u8>,
    /// Destination address version.
    pub version: u8,
    /// Destination address program.
    pub address: Vec<u8>,
    /// Fee taken out of the claimed value.
    pub fee: u64,
    /// Signature over [`AirdropProof::signature_hash`]; empty for ADDRESS claims.
    pub signature: Vec<u8>,
}

/// Upper bound on a non-ADDRESS proof encoding for the given trees.
#[must_use]
pub fn max_proof_size(trees: &SnapshotTreeConfig) -> usize {
    let depth = usize::from(trees.airdrop.depth).saturating_mul(HASH_SIZE);
    let subdepth = usize::from(trees.airdrop.subdepth).saturating_mul(HASH_SIZE);
    [
        4,
        1,
        depth,
        1,
        1,
        subdepth,
        3,
        MAX_KEY_SIZE,
        1,
        1,
        40,
        9,
        3,
        MAX_SIG_SIZE,
    ]
    .into_iter()
    .fold(0_usize, usize::saturating_add)
}

impl AirdropProof {
    /// Start an unsigned claim of `key` to the given destination.
    ///
    /// # Errors
    /// Returns [`ProofError::Encode`] if the key exceeds its wire bounds.
    pub fn new(key: &AirdropKey, version: u8, address: Vec<u8>, fee: u64) -> Result<Self, ProofError> {
        Ok(Self {
            key: key.encode()?,
            version,
            address,
            fee,
            ..Self::default()
        })
    }

    /// Set the airdrop tree location.
    #[must_use]
    pub fn with_airdrop_path(
        mut self,
        index: u32,
        proof: Vec<Hash>,
        subindex: u8,
        subproof: Vec<Hash>,
    ) -> Self {
        self.index = index;
        self.proof = proof;
        self.subindex = subindex;
        self.subproof = subproof;
        self
    }

    /// Set the faucet tree location.
    #[must_use]
    pub fn with_faucet_path(mut self, index: u32, proof: Vec<Hash>) -> Self {
        self.index = index;
        self.proof = proof;
        self.subindex = 0;
        self.subproof = Vec::new();
        self
    }

    /// Whether the key bytes are tagged as an ADDRESS grant.
    #[must_use]
    pub fn is_address(&self) -> bool {
        self.key.first() == Some(&KeyType::Address.tag())
    }

    /// Decode the key bytes.
    ///
    /// # Errors
    /// Returns [`DecodeError`] if the bytes are not a single well-formed key.
    pub fn decode_key(&self) -> Result<AirdropKey, DecodeError> {
        AirdropKey::decode(&self.key)
    }

    /// Amount the claim is worth before the fee.
    ///
    /// Non-ADDRESS claims are worth the airdrop reward. ADDRESS claims are
    /// worth the granted value, or zero if the key does not decode.
    #[must_use]
    pub fn value(&self, trees: &SnapshotTreeConfig) -> u64 {
        if !self.is_address() {
            return trees.airdrop.reward;
        }
        match self.decode_key() {
            Ok(AirdropKey::Address(key)) => key.value,
            Ok(_) | Err(_) => 0,
        }
    }

    /// Bit of this claim in the shared bitfield `[airdrop bits || faucet bits]`.
    ///
    /// Returns `None` when the index is outside its tree.
    #[must_use]
    pub fn position(&self, trees: &SnapshotTreeConfig) -> Option<u32> {
        let position = if self.is_address() {
            if self.index >= trees.faucet.leaves {
                return None;
            }
            self.index.checked_add(trees.airdrop.leaves)?
        } else {
            if self.index >= trees.airdrop.leaves {
                return None;
            }
            self.index
        };
        (position < trees.total_leaves()?).then_some(position)
    }

    /// Weight of the claim; equal to its encoded size.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.encoded_size()
    }

    /// Virtual size, `ceil(weight / 4)`.
    #[must_use]
    pub fn virtual_size(&self) -> usize {
        self.encoded_size().div_ceil(4)
    }

    /// Sign the claim with `key`, returning the signed copy.
    ///
    /// `key` must encode to exactly the bytes in [`AirdropProof::key`]. For
    /// blinded keys `tweak` is the secret returned when blinding; for ADDRESS
    /// keys the signature is empty.
    ///
    /// # Errors
    /// Returns [`ProofError::KeyMismatch`] if `key` is not the proof's key, and
    /// the key error if signing fails.
    pub fn sign(
        &self,
        key: &AirdropKey,
        secret: &SecretKey,
        tweak: Option<&Tweak>,
        ctx: &KeyContext<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Self, ProofError> {
        if key.encode()? != self.key {
            return Err(ProofError::KeyMismatch);
        }
        let msg = self.signature_hash()?;
        let signature = key.sign(&msg, secret, tweak, ctx, rng)?;
        Ok(Self {
            signature,
            ..self.clone()
        })
    }
}
