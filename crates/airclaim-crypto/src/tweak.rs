//! Blinding secret held by the claimant between blinding and signing.

use std::fmt;

use airclaim_core::base::{Hash, blake2b256};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::CryptoError;

/// Size of a tweak in bytes.
pub const TWEAK_SIZE: usize = 32;

/// A 32-byte blinding secret. Never part of any wire encoding.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Tweak([u8; TWEAK_SIZE]);

impl Tweak {
    /// Wrap raw tweak bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; TWEAK_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a tweak from a slice.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidTweak`] unless `bytes` is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; TWEAK_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidTweak)?;
        Ok(Self(bytes))
    }

    /// Sample 32 uniformly random bytes.
    pub fn random(rng: &mut dyn CryptoRngCore) -> Self {
        let mut bytes = [0_u8; TWEAK_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Borrow the secret bytes.
    #[must_use]
    pub const fn expose(&self) -> &[u8; TWEAK_SIZE] {
        &self.0
    }

    /// Public commitment to this tweak, stored as a key nonce.
    #[must_use]
    pub fn commitment(&self) -> Hash {
        blake2b256(&self.0)
    }
}

impl PartialEq for Tweak {
    fn eq(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for Tweak {}

impl fmt::Debug for Tweak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tweak(..)")
    }
}
