//! P-256 keys: SEC1 points, ECDSA over prehashed digests and additive blinding.

use p256::ecdsa::signature::hazmat::{PrehashSigner as _, PrehashVerifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::group::Curve as _;
use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use p256::elliptic_curve::{Field as _, PrimeField as _};
use p256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey, ecdh};
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::{CryptoError, Tweak, ecies};

/// Size of a compressed SEC1 point.
pub const P256_POINT_SIZE: usize = 33;
/// Size of a secret scalar.
pub const P256_SCALAR_SIZE: usize = 32;
/// Size of an `r || s` signature.
pub const P256_SIGNATURE_SIZE: usize = 64;

const ALG: &str = "P-256";

fn compress(key: &PublicKey) -> [u8; P256_POINT_SIZE] {
    let encoded = key.to_encoded_point(true);
    let mut out = [0_u8; P256_POINT_SIZE];
    out.copy_from_slice(encoded.as_bytes());
    out
}

fn secret_key(secret: &[u8]) -> Result<SecretKey, CryptoError> {
    SecretKey::from_slice(secret).map_err(|_| CryptoError::InvalidSecretKey(ALG))
}

fn tweak_scalar(tweak: &Tweak) -> Result<Scalar, CryptoError> {
    let scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*tweak.expose())))
        .ok_or(CryptoError::InvalidTweak)?;
    if bool::from(scalar.is_zero()) {
        return Err(CryptoError::InvalidTweak);
    }
    Ok(scalar)
}

/// Whether `point` is a valid SEC1-encoded point on the curve.
#[must_use]
pub fn public_key_verify(point: &[u8]) -> bool {
    PublicKey::from_sec1_bytes(point).is_ok()
}

/// Normalize any SEC1 encoding to the compressed form.
///
/// # Errors
/// Returns [`CryptoError::InvalidPublicKey`] if the point does not decode.
pub fn public_key_convert(point: &[u8]) -> Result<[u8; P256_POINT_SIZE], CryptoError> {
    let key = PublicKey::from_sec1_bytes(point).map_err(|_| CryptoError::InvalidPublicKey(ALG))?;
    Ok(compress(&key))
}

/// Compressed public point for a secret scalar.
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`] for a zero or out-of-range scalar.
pub fn public_key_create(secret: &[u8]) -> Result<[u8; P256_POINT_SIZE], CryptoError> {
    Ok(compress(&secret_key(secret)?.public_key()))
}

/// Sample a tweak that is a valid non-zero scalar.
pub fn random_tweak(rng: &mut dyn CryptoRngCore) -> Tweak {
    let scalar = NonZeroScalar::random(&mut &mut *rng);
    let mut bytes = [0_u8; 32];
    bytes.copy_from_slice(&scalar.to_repr());
    Tweak::from_bytes(bytes)
}

/// Blind a public point: `P + t*G`.
///
/// # Errors
/// Returns [`CryptoError::InvalidPublicKey`] or [`CryptoError::InvalidTweak`].
#[allow(clippy::arithmetic_side_effects, reason = "Group operations are modular")]
pub fn public_key_tweak_add(
    point: &[u8],
    tweak: &Tweak,
) -> Result<[u8; P256_POINT_SIZE], CryptoError> {
    let key = PublicKey::from_sec1_bytes(point).map_err(|_| CryptoError::InvalidPublicKey(ALG))?;
    let t = tweak_scalar(tweak)?;
    let tweaked = ProjectivePoint::from(*key.as_affine()) + ProjectivePoint::GENERATOR * t;
    let key = PublicKey::from_affine(tweaked.to_affine()).map_err(|_| CryptoError::InvalidTweak)?;
    Ok(compress(&key))
}

/// Blind a secret scalar to match [`public_key_tweak_add`]: `d + t`.
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`] or [`CryptoError::InvalidTweak`].
#[allow(clippy::arithmetic_side_effects, reason = "Scalar operations are modular")]
pub fn private_key_tweak_add(
    secret: &[u8],
    tweak: &Tweak,
) -> Result<Zeroizing<[u8; P256_SCALAR_SIZE]>, CryptoError> {
    let d = secret_key(secret)?.to_nonzero_scalar();
    let t = tweak_scalar(tweak)?;
    let tweaked =
        Option::<NonZeroScalar>::from(NonZeroScalar::new(*d + t)).ok_or(CryptoError::InvalidTweak)?;
    let mut out = Zeroizing::new([0_u8; P256_SCALAR_SIZE]);
    out.copy_from_slice(&tweaked.to_repr());
    Ok(out)
}

/// ECDSA-sign a 32-byte message digest, returning `r || s`.
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`] or [`CryptoError::Signing`].
pub fn sign(secret: &[u8], msg: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key = SigningKey::from_slice(secret).map_err(|_| CryptoError::InvalidSecretKey(ALG))?;
    let signature: Signature = key.sign_prehash(msg).map_err(|_| CryptoError::Signing)?;
    Ok(signature.to_bytes().to_vec())
}

/// Verify an `r || s` ECDSA signature over a message digest.
#[must_use]
pub fn verify(point: &[u8], msg: &[u8], sig: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_sec1_bytes(point) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(sig) else {
        return false;
    };
    key.verify_prehash(msg, &signature).is_ok()
}

/// ECIES-encrypt `msg` to `point`.
///
/// # Errors
/// Returns [`CryptoError::InvalidPublicKey`] or [`CryptoError::Encryption`].
pub fn encrypt(point: &[u8], msg: &[u8], rng: &mut dyn CryptoRngCore) -> Result<Vec<u8>, CryptoError> {
    let key = PublicKey::from_sec1_bytes(point).map_err(|_| CryptoError::InvalidPublicKey(ALG))?;
    let ephemeral = ecdh::EphemeralSecret::random(&mut &mut *rng);
    let ephemeral_point = compress(&ephemeral.public_key());
    let shared = ephemeral.diffie_hellman(&key);
    ecies::seal(shared.raw_secret_bytes(), &ephemeral_point, msg, rng)
}

/// ECIES-decrypt a ciphertext produced by [`encrypt`].
///
/// # Errors
/// Returns [`CryptoError::InvalidSecretKey`] or [`CryptoError::Decryption`].
pub fn decrypt(secret: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key = secret_key(secret)?;
    let (ephemeral_point, envelope) = ecies::split_ephemeral::<P256_POINT_SIZE>(ciphertext)?;
    let ephemeral =
        PublicKey::from_sec1_bytes(ephemeral_point).map_err(|_| CryptoError::Decryption)?;
    let shared = ecdh::diffie_hellman(key.to_nonzero_scalar(), ephemeral.as_affine());
    ecies::open(shared.raw_secret_bytes(), ephemeral_point, envelope)
}
