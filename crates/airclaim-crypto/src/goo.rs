//! Interface to the blinded RSA group-signature scheme used by GOO keys.
//!
//! A GOO key publishes only a commitment `C1` derived from a private secret
//! and an RSA public key. Proving possession of the RSA private key is then
//! done against `C1` without revealing the modulus.

use rand_core::CryptoRngCore;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::{CryptoError, Tweak};

/// Fixed size of a GOO commitment.
pub const GOO_C1_SIZE: usize = 256;

/// Operations a blinded RSA group-signature backend provides.
///
/// Implementations must be deterministic in verification and must never
/// accept a signature they cannot check.
pub trait GooScheme: Send + Sync {
    /// Sample a fresh blinding secret.
    fn generate_secret(&self, rng: &mut dyn CryptoRngCore) -> Tweak {
        Tweak::random(rng)
    }

    /// Commit to `secret` and the RSA public key.
    ///
    /// # Errors
    /// Returns an error if the backend cannot compute a commitment for `key`.
    fn challenge(&self, secret: &Tweak, key: &RsaPublicKey)
    -> Result<[u8; GOO_C1_SIZE], CryptoError>;

    /// Prove possession of `key` over `msg`, bound to the commitment of `secret`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot produce a signature.
    fn sign(
        &self,
        msg: &[u8],
        secret: &Tweak,
        key: &RsaPrivateKey,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Check a signature against a commitment. Malformed input yields `false`.
    fn verify(&self, msg: &[u8], sig: &[u8], c1: &[u8; GOO_C1_SIZE]) -> bool;

    /// Encrypt `msg` to the holder of `key`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot encrypt to `key`.
    fn encrypt(
        &self,
        msg: &[u8],
        key: &RsaPublicKey,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt a ciphertext produced by [`GooScheme::encrypt`].
    ///
    /// # Errors
    /// Returns an error if the ciphertext does not open under `key`.
    fn decrypt(&self, ciphertext: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError>;
}

/// Backend used when no group-signature implementation is linked in.
///
/// Every producing operation fails and every signature is rejected, so GOO
/// claims can never verify through it.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableGoo;

const GOO: &str = "GOO";

impl GooScheme for UnavailableGoo {
    fn challenge(
        &self,
        _secret: &Tweak,
        _key: &RsaPublicKey,
    ) -> Result<[u8; GOO_C1_SIZE], CryptoError> {
        Err(CryptoError::Unavailable(GOO))
    }

    fn sign(
        &self,
        _msg: &[u8],
        _secret: &Tweak,
        _key: &RsaPrivateKey,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::Unavailable(GOO))
    }

    fn verify(&self, _msg: &[u8], _sig: &[u8], _c1: &[u8; GOO_C1_SIZE]) -> bool {
        false
    }

    fn encrypt(
        &self,
        _msg: &[u8],
        _key: &RsaPublicKey,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::Unavailable(GOO))
    }

    fn decrypt(&self, _ciphertext: &[u8], _key: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::Unavailable(GOO))
    }
}
