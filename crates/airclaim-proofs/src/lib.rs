//! Airdrop keys and the claim proofs that bind them to a snapshot.
//!
//! Decoding untrusted bytes returns [`airclaim_core::base::DecodeError`]. Every
//! predicate reachable from an untrusted proof (`is_sane`, `verify_merkle`,
//! `verify_signature`, `verify`) returns `bool` and never panics.

mod error;
/// The five-variant airdrop key.
pub mod key;
mod policy;
/// Claim proofs and their verification pipeline.
pub mod proof;
mod verifier;

pub use airclaim_crypto::Tweak;
pub use error::{ClaimRejection, KeyError, PolicyViolation, ProofError, SanityError};
pub use key::{AddressKey, AirdropKey, EcKey, GooKey, KeyType, RsaKey, SecretKey};
pub use policy::{KeyContext, SigningPolicy};
pub use proof::AirdropProof;
pub use verifier::{ClaimVerifier, VerifiedClaim};
