//! RSA key import and RSASSA-PSS over SHA-256 digests.
//!
//! Signatures cover a caller-supplied 32-byte digest directly; the digest is
//! the PSS message hash and is not hashed again.

use rand_core::CryptoRngCore;
use rsa::traits::PublicKeyParts as _;
use rsa::{BigUint, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::CryptoError;

/// Smallest accepted modulus in bits.
pub const MIN_RSA_BITS: usize = 1024;
/// Largest accepted modulus in bits.
pub const MAX_RSA_BITS: usize = 4096;

/// Import a public key from big-endian `n` and `e`.
///
/// # Errors
/// Returns [`CryptoError::InvalidPublicKey`] when the modulus is outside
/// `MIN_RSA_BITS..=MAX_RSA_BITS` or even, and [`CryptoError::Rsa`] when the
/// backend rejects the pair.
pub fn import_public(n: &[u8], e: &[u8]) -> Result<RsaPublicKey, CryptoError> {
    let modulus = BigUint::from_bytes_be(n);
    let bits = modulus.bits();
    if !(MIN_RSA_BITS..=MAX_RSA_BITS).contains(&bits) {
        return Err(CryptoError::InvalidPublicKey("RSA"));
    }
    if n.last().is_none_or(|byte| byte & 1 == 0) {
        return Err(CryptoError::InvalidPublicKey("RSA"));
    }
    Ok(RsaPublicKey::new(modulus, BigUint::from_bytes_be(e))?)
}

/// Whether `(n, e)` imports as an RSA public key of acceptable size.
#[must_use]
pub fn public_key_verify(n: &[u8], e: &[u8]) -> bool {
    import_public(n, e).is_ok()
}

/// Rebuild a private key from its components and check it is consistent.
///
/// # Errors
/// Returns [`CryptoError::Rsa`] when the components do not form a valid key.
pub fn import_private(
    n: &[u8],
    e: &[u8],
    d: &[u8],
    p: &[u8],
    q: &[u8],
) -> Result<RsaPrivateKey, CryptoError> {
    let mut key = RsaPrivateKey::from_components(
        BigUint::from_bytes_be(n),
        BigUint::from_bytes_be(e),
        BigUint::from_bytes_be(d),
        vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)],
    )?;
    key.validate()?;
    key.precompute()?;
    Ok(key)
}

/// Big-endian `(n, e)` of a public key, without leading zeroes.
#[must_use]
pub fn public_parts(key: &RsaPublicKey) -> (Vec<u8>, Vec<u8>) {
    (key.n().to_bytes_be(), key.e().to_bytes_be())
}

/// Sign a SHA-256 `digest` with RSASSA-PSS.
///
/// # Errors
/// Returns [`CryptoError::Signing`] if `digest` is not 32 bytes or the backend
/// fails.
pub fn sign(
    key: &RsaPrivateKey,
    digest: &[u8],
    rng: &mut dyn CryptoRngCore,
) -> Result<Vec<u8>, CryptoError> {
    key.sign_with_rng(&mut &mut *rng, Pss::new::<Sha256>(), digest)
        .map_err(|_| CryptoError::Signing)
}

/// Verify an RSASSA-PSS signature over a SHA-256 `digest`. Any malformed input
/// yields `false`.
#[must_use]
pub fn verify(n: &[u8], e: &[u8], digest: &[u8], sig: &[u8]) -> bool {
    let Ok(key) = import_public(n, e) else {
        return false;
    };
    verify_with(&key, digest, sig)
}

/// Verify an RSASSA-PSS signature over a SHA-256 `digest` against an imported
/// key.
#[must_use]
pub fn verify_with(key: &RsaPublicKey, digest: &[u8], sig: &[u8]) -> bool {
    key.verify(Pss::new::<Sha256>(), digest, sig).is_ok()
}
