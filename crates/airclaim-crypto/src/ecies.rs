//! Shared ECIES envelope: HKDF-SHA256 key derivation and AES-256-GCM.
//!
//! Ciphertext layout is `ephemeral public key || 12-byte nonce || sealed body`.

use aes_gcm::aead::{Aead as _, KeyInit as _};
use aes_gcm::{Aes256Gcm, Nonce};
use hkdf::Hkdf;
use rand_core::CryptoRngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::CryptoError;

const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;
const INFO: &[u8] = b"airclaim ecies v1";

fn derive_key(shared: &[u8], ephemeral: &[u8]) -> Result<Zeroizing<[u8; KEY_SIZE]>, CryptoError> {
    let mut key = Zeroizing::new([0_u8; KEY_SIZE]);
    Hkdf::<Sha256>::new(Some(ephemeral), shared)
        .expand(INFO, key.as_mut())
        .map_err(|_| CryptoError::Encryption)?;
    Ok(key)
}

pub(crate) fn seal(
    shared: &[u8],
    ephemeral: &[u8],
    msg: &[u8],
    rng: &mut dyn CryptoRngCore,
) -> Result<Vec<u8>, CryptoError> {
    let key = derive_key(shared, ephemeral)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| CryptoError::Encryption)?;

    let mut nonce = [0_u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);

    let body = cipher
        .encrypt(Nonce::from_slice(&nonce), msg)
        .map_err(|_| CryptoError::Encryption)?;

    let mut out = Vec::with_capacity(
        ephemeral
            .len()
            .saturating_add(NONCE_SIZE)
            .saturating_add(body.len()),
    );
    out.extend_from_slice(ephemeral);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Split a ciphertext into its ephemeral key and the remaining envelope.
pub(crate) fn split_ephemeral<const N: usize>(
    ciphertext: &[u8],
) -> Result<(&[u8; N], &[u8]), CryptoError> {
    ciphertext
        .split_first_chunk::<N>()
        .ok_or(CryptoError::Decryption)
}

pub(crate) fn open(shared: &[u8], ephemeral: &[u8], envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let (nonce, body) = envelope
        .split_first_chunk::<NONCE_SIZE>()
        .ok_or(CryptoError::Decryption)?;
    let key = derive_key(shared, ephemeral).map_err(|_| CryptoError::Decryption)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| CryptoError::Decryption)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), body)
        .map_err(|_| CryptoError::Decryption)
}
