//! A key recorded in the snapshot, or its blinded derivative.
//!
//! [`AirdropKey`] is a closed enum: every operation matches all five
//! variants, so a new variant cannot be added without touching each of them.

mod blind;
mod codec;
mod json;
mod ops;
mod secret;

use std::fmt;
use std::str::FromStr;

use airclaim_core::base::{EncodeError, Hash, blake2b256};
use airclaim_crypto::{GOO_C1_SIZE, ed25519_key, p256_key, rsa_key};
use bech32::{Fe32, Hrp};
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};

pub use secret::{PgpSecretKey, SecretKey, SshPrivateKey};

use crate::KeyError;

/// Size of a key nonce.
pub const NONCE_SIZE: usize = 32;

/// Nonce of a key that has not been blinded.
pub const ZERO_NONCE: [u8; NONCE_SIZE] = [0; NONCE_SIZE];

/// Size of a compressed P-256 point.
pub const P256_POINT_SIZE: usize = p256_key::P256_POINT_SIZE;

/// Size of an Ed25519 point.
pub const ED25519_POINT_SIZE: usize = ed25519_key::ED25519_POINT_SIZE;

/// Shortest address accepted in a grant or a claim.
pub const MIN_ADDRESS_SIZE: usize = 2;

/// Longest address accepted in a grant or a claim.
pub const MAX_ADDRESS_SIZE: usize = 40;

/// Human-readable prefixes accepted by [`AirdropKey::from_address`].
pub const ADDRESS_HRPS: [&str; 3] = ["hs", "ts", "rs"];

/// Wire tag of each key variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    /// Unblinded RSA public key.
    Rsa,
    /// Commitment to a blinded RSA key.
    Goo,
    /// Compressed P-256 point.
    P256,
    /// Ed25519 point.
    Ed25519,
    /// Address grant.
    Address,
}

impl KeyType {
    /// Wire tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Rsa => 0,
            Self::Goo => 1,
            Self::P256 => 2,
            Self::Ed25519 => 3,
            Self::Address => 4,
        }
    }

    /// Variant for a wire tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Rsa),
            1 => Some(Self::Goo),
            2 => Some(Self::P256),
            3 => Some(Self::Ed25519),
            4 => Some(Self::Address),
            _ => None,
        }
    }

    /// Symbolic name used in JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Goo => "GOO",
            Self::P256 => "P256",
            Self::Ed25519 => "ED25519",
            Self::Address => "ADDRESS",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Rsa,
            Self::Goo,
            Self::P256,
            Self::Ed25519,
            Self::Address,
        ]
        .into_iter()
        .find(|kind| kind.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| KeyError::UnknownKeyType(s.to_owned()))
    }
}

/// RSA public key with big-endian `n` and `e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKey {
    /// Modulus, at most `0xFFFF` bytes.
    pub n: Vec<u8>,
    /// Public exponent, at most `0xFF` bytes.
    pub e: Vec<u8>,
    /// Zero, or the commitment to a tweak.
    pub nonce: [u8; NONCE_SIZE],
}

/// Commitment to a blinded RSA key.
///
/// `origin` is the RSA key `c1` was derived from. It is never encoded and
/// exists only so the holder can sign and encrypt; equality ignores it.
#[derive(Debug, Clone)]
pub struct GooKey {
    /// Group-signature commitment.
    pub c1: Box<[u8; GOO_C1_SIZE]>,
    /// RSA public key the commitment was computed over, when known.
    pub origin: Option<RsaKey>,
}

impl GooKey {
    /// Attach the RSA key this commitment was derived from.
    #[must_use]
    pub fn with_origin(mut self, origin: RsaKey) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl PartialEq for GooKey {
    fn eq(&self, other: &Self) -> bool {
        self.c1 == other.c1
    }
}

impl Eq for GooKey {}

/// Elliptic-curve public key with an `N`-byte encoded point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcKey<const N: usize> {
    /// Encoded point.
    pub point: [u8; N],
    /// Zero, or the commitment to the tweak added to `point`.
    pub nonce: [u8; NONCE_SIZE],
}

impl<const N: usize> EcKey<N> {
    /// Whether the point has been blinded.
    #[must_use]
    pub fn is_tweaked(&self) -> bool {
        self.nonce != ZERO_NONCE
    }
}

/// Non-cryptographic grant to a destination address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressKey {
    /// Witness version.
    pub version: u8,
    /// Witness program, `2..=40` bytes.
    pub address: Vec<u8>,
    /// Granted amount.
    pub value: u64,
    /// Selects the sponsor fee instead of the recipient fee.
    pub sponsor: bool,
}

impl AddressKey {
    /// Encode the address with the given human-readable prefix.
    ///
    /// # Errors
    /// Returns [`KeyError::InvalidAddress`] if the prefix or program is not
    /// a valid witness address.
    pub fn to_bech32(&self, hrp: &str) -> Result<String, KeyError> {
        let hrp = Hrp::parse(hrp).map_err(|err| KeyError::InvalidAddress(err.to_string()))?;
        let version =
            Fe32::try_from(self.version).map_err(|err| KeyError::InvalidAddress(err.to_string()))?;
        bech32::segwit::encode(hrp, version, &self.address)
            .map_err(|err| KeyError::InvalidAddress(err.to_string()))
    }
}

/// A key eligible to claim from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(into = "json::KeyJson", try_from = "json::KeyJson")]
pub enum AirdropKey {
    /// Unblinded RSA key.
    Rsa(RsaKey),
    /// Blinded RSA key.
    Goo(GooKey),
    /// P-256 key.
    P256(EcKey<P256_POINT_SIZE>),
    /// Ed25519 key.
    Ed25519(EcKey<ED25519_POINT_SIZE>),
    /// Address grant.
    Address(AddressKey),
}

impl AirdropKey {
    /// Build an RSA key from big-endian components, stripping leading zeroes.
    ///
    /// # Errors
    /// Returns [`KeyError::InvalidLength`] if `n` exceeds `0xFFFF` bytes or `e`
    /// exceeds `0xFF` bytes.
    pub fn from_rsa_components(n: &[u8], e: &[u8]) -> Result<Self, KeyError> {
        let n = trim_leading_zeroes(n);
        let e = trim_leading_zeroes(e);
        if n.len() > usize::from(u16::MAX) {
            return Err(KeyError::InvalidLength {
                field: "n",
                len: n.len(),
            });
        }
        if e.len() > usize::from(u8::MAX) {
            return Err(KeyError::InvalidLength {
                field: "e",
                len: e.len(),
            });
        }
        Ok(Self::Rsa(RsaKey {
            n: n.to_vec(),
            e: e.to_vec(),
            nonce: ZERO_NONCE,
        }))
    }

    /// Build an RSA key from a parsed public key.
    ///
    /// # Errors
    /// See [`AirdropKey::from_rsa_components`].
    pub fn from_rsa_public(key: &RsaPublicKey) -> Result<Self, KeyError> {
        let (n, e) = rsa_key::public_parts(key);
        Self::from_rsa_components(&n, &e)
    }

    /// Build a P-256 key from any SEC1 encoding of the point.
    ///
    /// # Errors
    /// Returns [`KeyError::Crypto`] if the point is not on the curve.
    pub fn from_p256_point(point: &[u8]) -> Result<Self, KeyError> {
        Ok(Self::P256(EcKey {
            point: p256_key::public_key_convert(point)?,
            nonce: ZERO_NONCE,
        }))
    }

    /// Build an Ed25519 key from an encoded point.
    ///
    /// # Errors
    /// Returns [`KeyError::InvalidLength`] for a point that is not 32 bytes.
    pub fn from_ed25519_point(point: &[u8]) -> Result<Self, KeyError> {
        let point: [u8; ED25519_POINT_SIZE] =
            point.try_into().map_err(|_| KeyError::InvalidLength {
                field: "point",
                len: point.len(),
            })?;
        Ok(Self::Ed25519(EcKey {
            point,
            nonce: ZERO_NONCE,
        }))
    }

    /// Build an address grant from a bech32 witness address.
    ///
    /// # Errors
    /// Returns [`KeyError::InvalidAddress`] unless the prefix is one of
    /// [`ADDRESS_HRPS`], the witness version is 0 and the program is 20 or 32
    /// bytes.
    pub fn from_address(address: &str, value: u64, sponsor: bool) -> Result<Self, KeyError> {
        let (hrp, version, program) = bech32::segwit::decode(address)
            .map_err(|err| KeyError::InvalidAddress(err.to_string()))?;

        if !ADDRESS_HRPS.contains(&hrp.to_lowercase().as_str()) {
            return Err(KeyError::InvalidAddress(format!("unknown prefix {hrp}")));
        }
        if version.to_u8() != 0 {
            return Err(KeyError::InvalidAddress(format!(
                "unsupported witness version {}",
                version.to_u8()
            )));
        }
        if program.len() != 20 && program.len() != 32 {
            return Err(KeyError::InvalidLength {
                field: "address",
                len: program.len(),
            });
        }

        Ok(Self::Address(AddressKey {
            version: 0,
            address: program,
            value,
            sponsor,
        }))
    }

    /// Variant tag.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa(_) => KeyType::Rsa,
            Self::Goo(_) => KeyType::Goo,
            Self::P256(_) => KeyType::P256,
            Self::Ed25519(_) => KeyType::Ed25519,
            Self::Address(_) => KeyType::Address,
        }
    }

    /// Whether this is an unblinded RSA key.
    #[must_use]
    pub const fn is_rsa(&self) -> bool {
        matches!(self, Self::Rsa(_))
    }

    /// Whether this is a blinded RSA key.
    #[must_use]
    pub const fn is_goo(&self) -> bool {
        matches!(self, Self::Goo(_))
    }

    /// Whether this is a P-256 key.
    #[must_use]
    pub const fn is_p256(&self) -> bool {
        matches!(self, Self::P256(_))
    }

    /// Whether this is an Ed25519 key.
    #[must_use]
    pub const fn is_ed25519(&self) -> bool {
        matches!(self, Self::Ed25519(_))
    }

    /// Whether this is an address grant.
    #[must_use]
    pub const fn is_address(&self) -> bool {
        matches!(self, Self::Address(_))
    }

    /// The nonce, for the variants that carry one.
    #[must_use]
    pub const fn nonce(&self) -> Option<&[u8; NONCE_SIZE]> {
        match self {
            Self::Rsa(key) => Some(&key.nonce),
            Self::P256(key) => Some(&key.nonce),
            Self::Ed25519(key) => Some(&key.nonce),
            Self::Goo(_) | Self::Address(_) => None,
        }
    }

    /// Check the public material is usable for its algorithm.
    ///
    /// Returns `false` rather than an error so it can run over untrusted keys.
    #[must_use]
    pub fn validate(&self) -> bool {
        match self {
            Self::Rsa(key) => rsa_key::public_key_verify(&key.n, &key.e),
            // The commitment size is fixed by the type.
            Self::Goo(_) | Self::Address(_) => true,
            Self::P256(key) => p256_key::public_key_verify(&key.point),
            Self::Ed25519(key) => ed25519_key::public_key_verify(&key.point),
        }
    }

    /// `BLAKE2b-256` of the binary encoding; the key's leaf in the snapshot tree.
    ///
    /// # Errors
    /// Returns [`EncodeError`] if a field exceeds its wire bounds.
    pub fn hash(&self) -> Result<Hash, EncodeError> {
        Ok(blake2b256(&self.encode()?))
    }

    /// First byte of [`AirdropKey::hash`], for sharded lookups.
    ///
    /// # Errors
    /// Returns [`EncodeError`] if a field exceeds its wire bounds.
    pub fn bucket(&self) -> Result<u8, EncodeError> {
        let [first, ..] = self.hash()?;
        Ok(first)
    }
}

/// Strip leading zero bytes, keeping a single zero for a zero value.
fn trim_leading_zeroes(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|byte| *byte != 0) {
        Some(start) => bytes.get(start..).unwrap_or_default(),
        None => &[0],
    }
}
