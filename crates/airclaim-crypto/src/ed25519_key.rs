//! Ed25519 keys and signing with a blinded expanded secret.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use ed25519_dalek::hazmat::{ExpandedSecretKey, raw_sign};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand_core::CryptoRngCore;
use sha2::Sha512;

use crate::{CryptoError, Tweak, ecies};

/// Size of an encoded point.
pub const ED25519_POINT_SIZE: usize = 32;
/// Size of a secret seed.
pub const ED25519_SEED_SIZE: usize = 32;
/// Size of a signature.
pub const ED25519_SIGNATURE_SIZE: usize = 64;

const ALG: &str = "Ed25519";

fn seed(secret: &[u8]) -> Result<[u8; ED25519_SEED_SIZE], CryptoError> {
    secret
        .try_into()
        .map_err(|_| CryptoError::InvalidSecretKey(ALG))
}

fn decompress(point: &[u8; ED25519_POINT_SIZE]) -> Result<EdwardsPoint, CryptoError> {
    CompressedEdwardsY(*point)
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(ALG))
}

fn tweak_scalar(tweak: &Tweak) -> Result<Scalar, CryptoError> {
    let scalar = Option::<Scalar>::from(Scalar::from_canonical_bytes(*tweak.expose()))
        .ok_or(CryptoError::InvalidTweak)?;
    if scalar == Scalar::ZERO {
        return Err(CryptoError::InvalidTweak);
    }
    Ok(scalar)
}

/// Secret scalar `a` for a seed, where the public point is `a*B`, optionally blinded to `a + t`.
#[allow(clippy::arithmetic_side_effects, reason = "Scalar operations are modular")]
fn expanded(secret: &[u8], tweak: Option<&Tweak>) -> Result<ExpandedSecretKey, CryptoError> {
    let mut expanded = ExpandedSecretKey::from(&seed(secret)?);
    if let Some(tweak) = tweak {
        expanded.scalar += tweak_scalar(tweak)?;
    }
    Ok(expanded)
}

/// Whether `point` decodes to a curve point accepted as a verifying key.
#[must_use]
pub fn public_key_verify(point: &[u8; ED25519_POINT_SIZE]) -> bool {
    VerifyingKey::from_bytes(point).is_ok()
}

/// Public point for a 32-byte seed.
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`] if `secret` is not 32 bytes.
pub fn public_key_create(secret: &[u8]) -> Result<[u8; ED25519_POINT_SIZE], CryptoError> {
    Ok(SigningKey::from_bytes(&seed(secret)?).verifying_key().to_bytes())
}

/// Sample a tweak that is a canonical non-zero scalar.
pub fn random_tweak(rng: &mut dyn CryptoRngCore) -> Tweak {
    loop {
        let mut wide = [0_u8; 64];
        rng.fill_bytes(&mut wide);
        let scalar = Scalar::from_bytes_mod_order_wide(&wide);
        if scalar != Scalar::ZERO {
            return Tweak::from_bytes(scalar.to_bytes());
        }
    }
}

/// Blind a public point: `A + t*B`.
///
/// # Errors
/// Returns [`CryptoError::InvalidPublicKey`] or [`CryptoError::InvalidTweak`].
#[allow(clippy::arithmetic_side_effects, reason = "Group operations are modular")]
pub fn public_key_tweak_add(
    point: &[u8; ED25519_POINT_SIZE],
    tweak: &Tweak,
) -> Result<[u8; ED25519_POINT_SIZE], CryptoError> {
    let a = decompress(point)?;
    let tweaked = a + EdwardsPoint::mul_base(&tweak_scalar(tweak)?);
    Ok(tweaked.compress().to_bytes())
}

/// Sign `msg` with the key derived from a 32-byte seed.
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`] if `secret` is not 32 bytes.
pub fn sign(secret: &[u8], msg: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key = SigningKey::from_bytes(&seed(secret)?);
    Ok(key.sign(msg).to_bytes().to_vec())
}

/// Sign `msg` under the blinded point `A + t*B` using the secret scalar `a + t`.
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`], [`CryptoError::InvalidTweak`] or
/// [`CryptoError::InvalidPublicKey`].
pub fn sign_tweaked(secret: &[u8], tweak: &Tweak, msg: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let expanded = expanded(secret, Some(tweak))?;
    let public = public_key_tweak_add(&public_key_create(secret)?, tweak)?;
    let verifying =
        VerifyingKey::from_bytes(&public).map_err(|_| CryptoError::InvalidPublicKey(ALG))?;
    Ok(raw_sign::<Sha512>(&expanded, msg, &verifying).to_bytes().to_vec())
}

/// Verify a signature. Any malformed input yields `false`.
#[must_use]
pub fn verify(point: &[u8; ED25519_POINT_SIZE], msg: &[u8], sig: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(point) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(sig) else {
        return false;
    };
    key.verify(msg, &signature).is_ok()
}

/// ECIES-encrypt `msg` to `point`. Shared secrets are cofactor-cleared.
///
/// # Errors
/// Returns [`CryptoError::InvalidPublicKey`] or [`CryptoError::Encryption`].
#[allow(clippy::arithmetic_side_effects, reason = "Group operations are modular")]
pub fn encrypt(
    point: &[u8; ED25519_POINT_SIZE],
    msg: &[u8],
    rng: &mut dyn CryptoRngCore,
) -> Result<Vec<u8>, CryptoError> {
    let a = decompress(point)?;
    let mut wide = [0_u8; 64];
    rng.fill_bytes(&mut wide);
    let r = Scalar::from_bytes_mod_order_wide(&wide);

    let ephemeral = EdwardsPoint::mul_base(&r).compress().to_bytes();
    let shared = (a * r).mul_by_cofactor().compress().to_bytes();
    ecies::seal(&shared, &ephemeral, msg, rng)
}

/// ECIES-decrypt with the seed's scalar, blinded by `tweak` when the point was.
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`], [`CryptoError::InvalidTweak`] or
/// [`CryptoError::Decryption`].
#[allow(clippy::arithmetic_side_effects, reason = "Group operations are modular")]
pub fn decrypt(
    secret: &[u8],
    tweak: Option<&Tweak>,
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let expanded = expanded(secret, tweak)?;
    let (ephemeral, envelope) = ecies::split_ephemeral::<ED25519_POINT_SIZE>(ciphertext)?;
    let r = decompress(ephemeral).map_err(|_| CryptoError::Decryption)?;
    let shared = (r * expanded.scalar).mul_by_cofactor().compress().to_bytes();
    ecies::open(&shared, ephemeral, envelope)
}
