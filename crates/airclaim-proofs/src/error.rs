//! Error types for keys and proofs.

use airclaim_core::base::{DecodeError, EncodeError};
use airclaim_crypto::CryptoError;

use crate::key::KeyType;

/// A caller asked for an operation the key or the signing policy does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    /// Signing with a blinded elliptic-curve key is disabled by [`crate::SigningPolicy`].
    #[error("Signing with a tweaked elliptic-curve key is disabled")]
    TweakedEcSigning,
    /// The operation is undefined for this key type.
    #[error("Cannot {operation} a {key_type} key")]
    Unsupported {
        /// Operation name.
        operation: &'static str,
        /// Key type the operation was attempted on.
        key_type: KeyType,
    },
    /// The key is blinded and the operation needs the blinding tweak.
    #[error("{0} key requires the blinding tweak")]
    MissingTweak(KeyType),
    /// A GOO key was used without its originating RSA public key attached.
    #[error("GOO key has no attached RSA modulus")]
    MissingModulus,
    /// The secret key material has the wrong shape for the key type.
    #[error("Secret key does not fit a {0} key")]
    SecretKindMismatch(KeyType),
}

/// Errors from key construction and key operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Disallowed operation.
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    /// A primitive rejected its input.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// Key bytes failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Key fields exceed the wire bounds.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// A field has a length outside its permitted range.
    #[error("Invalid {field} length: {len}")]
    InvalidLength {
        /// Field name.
        field: &'static str,
        /// Observed length.
        len: usize,
    },
    /// A required JSON field is missing for the key type.
    #[error("Missing {field} for {key_type} key")]
    MissingField {
        /// Field name.
        field: &'static str,
        /// Key type being decoded.
        key_type: KeyType,
    },
    /// A key type name is not recognised.
    #[error("Unknown key type: {0}")]
    UnknownKeyType(String),
    /// An address string could not be decoded or is not an accepted address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// The supplied tweak is not the one committed to by the key nonce.
    #[error("Tweak does not match the key nonce")]
    TweakMismatch,
}

/// Errors from proof construction and signing.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    /// Key error while signing or converting.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Proof fields exceed the wire bounds.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The signing key does not encode to the key bytes carried by the proof.
    #[error("Signing key does not match the proof key")]
    KeyMismatch,
}

/// The first bounds check a proof fails in [`crate::AirdropProof::check_sanity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SanityError {
    /// No key bytes.
    #[error("Empty key")]
    EmptyKey,
    /// Address version above the maximum.
    #[error("Address version {0} exceeds 31")]
    Version(u8),
    /// Address length outside `2..=40`.
    #[error("Address length {0} outside 2..=40")]
    AddressLength(usize),
    /// Claim value above the money supply.
    #[error("Value {0} exceeds maximum money")]
    Value(u64),
    /// Fee larger than the claim value.
    #[error("Fee {fee} exceeds value {value}")]
    Fee {
        /// Declared fee.
        fee: u64,
        /// Claim value.
        value: u64,
    },
    /// Address claims carry no sub-tree path.
    #[error("Address claim has a sub-tree path")]
    AddressSubproof,
    /// Sub-tree path longer than the configured sub-depth.
    #[error("Sub-tree path length {0} exceeds depth")]
    SubproofLength(usize),
    /// Sub-index outside the configured sub-tree.
    #[error("Sub-index {0} out of range")]
    Subindex(u8),
    /// Outer path longer than the configured depth.
    #[error("Path length {0} exceeds depth")]
    ProofLength(usize),
    /// Index outside the configured tree.
    #[error("Index {0} out of range")]
    Index(u32),
    /// Encoded proof exceeds the maximum size.
    #[error("Proof size {0} exceeds maximum")]
    Size(usize),
}

/// Why [`crate::ClaimVerifier`] refused a claim.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClaimRejection {
    /// The claim bytes are malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A bound check failed.
    #[error(transparent)]
    Sanity(#[from] SanityError),
    /// The key is not a leaf of the expected snapshot tree.
    #[error("Claim is not in the snapshot")]
    NotInSnapshot,
    /// The signature or address grant does not authorise the claim.
    #[error("Claim is not authorised by its key")]
    Unauthorised,
    /// The claim has no bit in the shared claim bitfield.
    #[error("Claim index has no position in the claim bitfield")]
    NoPosition,
}
