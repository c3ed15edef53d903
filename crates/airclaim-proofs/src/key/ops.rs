//! Signing, verification and encryption, dispatched per variant.

use airclaim_crypto::{CryptoError, Tweak, ed25519_key, p256_key, rsa_key};
use rand_core::CryptoRngCore;
use tracing::debug;
use zeroize::Zeroizing;

use super::{AirdropKey, EcKey, GooKey, KeyType, NONCE_SIZE, RsaKey, SecretKey};
use crate::{KeyContext, KeyError, PolicyViolation};

/// Check that `tweak` is the one `nonce` commits to.
fn committed_tweak<'t>(
    key_type: KeyType,
    nonce: &[u8; NONCE_SIZE],
    tweak: Option<&'t Tweak>,
) -> Result<&'t Tweak, KeyError> {
    let tweak = tweak.ok_or(PolicyViolation::MissingTweak(key_type))?;
    if &tweak.commitment() != nonce {
        return Err(KeyError::TweakMismatch);
    }
    Ok(tweak)
}

fn origin(key: &GooKey) -> Result<&RsaKey, KeyError> {
    key.origin
        .as_ref()
        .ok_or_else(|| PolicyViolation::MissingModulus.into())
}

/// P-256 secret scalar matching `key.point`, blinded when the key is.
fn p256_scalar(
    key: &EcKey<{ p256_key::P256_POINT_SIZE }>,
    secret: &SecretKey,
    tweak: Option<&Tweak>,
) -> Result<Zeroizing<[u8; p256_key::P256_SCALAR_SIZE]>, KeyError> {
    let scalar = secret.ec_secret(KeyType::P256)?;
    let scalar = if key.is_tweaked() {
        let tweak = committed_tweak(KeyType::P256, &key.nonce, tweak)?;
        p256_key::private_key_tweak_add(scalar, tweak)?
    } else {
        let mut out = Zeroizing::new([0_u8; p256_key::P256_SCALAR_SIZE]);
        let exact: &[u8; p256_key::P256_SCALAR_SIZE] = scalar
            .try_into()
            .map_err(|_| CryptoError::InvalidSecretKey("P-256"))?;
        out.copy_from_slice(exact);
        out
    };
    if p256_key::public_key_create(scalar.as_ref())? != key.point {
        return Err(CryptoError::KeyMismatch("P-256").into());
    }
    Ok(scalar)
}

/// Ed25519 seed matching `key.point` once the committed tweak is applied.
fn ed25519_seed<'s>(
    key: &EcKey<{ ed25519_key::ED25519_POINT_SIZE }>,
    secret: &'s SecretKey,
    tweak: Option<&Tweak>,
) -> Result<&'s [u8], KeyError> {
    let seed = secret.ed25519_seed()?;
    let mut public = ed25519_key::public_key_create(seed)?;
    if key.is_tweaked() {
        let tweak = committed_tweak(KeyType::Ed25519, &key.nonce, tweak)?;
        public = ed25519_key::public_key_tweak_add(&public, tweak)?;
    }
    if public != key.point {
        return Err(CryptoError::KeyMismatch("Ed25519").into());
    }
    Ok(seed)
}

impl AirdropKey {
    /// Sign a message digest.
    ///
    /// `tweak` is required for GOO keys and for blinded EC keys. ADDRESS keys
    /// produce an empty signature.
    ///
    /// # Errors
    /// Returns [`PolicyViolation::TweakedEcSigning`] for a blinded EC key
    /// unless the context policy allows it, a policy error for a missing tweak
    /// or mismatched secret shape, and [`KeyError::Crypto`] when the secret
    /// does not belong to this key.
    pub fn sign(
        &self,
        msg: &[u8],
        secret: &SecretKey,
        tweak: Option<&Tweak>,
        ctx: &KeyContext<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, KeyError> {
        let signature = match self {
            Self::Rsa(key) => {
                let private = secret.rsa_private(KeyType::Rsa, &key.n, &key.e)?;
                rsa_key::sign(&private, msg, rng)?
            }
            Self::Goo(key) => {
                let tweak = tweak.ok_or(PolicyViolation::MissingTweak(KeyType::Goo))?;
                let origin = origin(key)?;
                let private = secret.rsa_private(KeyType::Goo, &origin.n, &origin.e)?;
                ctx.goo.sign(msg, tweak, &private, rng)?
            }
            Self::P256(key) => {
                if key.is_tweaked() && !ctx.policy.allow_tweaked_ec {
                    return Err(PolicyViolation::TweakedEcSigning.into());
                }
                let scalar = p256_scalar(key, secret, tweak)?;
                p256_key::sign(scalar.as_ref(), msg)?
            }
            Self::Ed25519(key) => {
                if key.is_tweaked() && !ctx.policy.allow_tweaked_ec {
                    return Err(PolicyViolation::TweakedEcSigning.into());
                }
                let seed = ed25519_seed(key, secret, tweak)?;
                match tweak.filter(|_| key.is_tweaked()) {
                    Some(tweak) => ed25519_key::sign_tweaked(seed, tweak, msg)?,
                    None => ed25519_key::sign(seed, msg)?,
                }
            }
            Self::Address(_) => Vec::new(),
        };
        Ok(signature)
    }

    /// Verify a signature over a message digest. ADDRESS keys always verify.
    ///
    /// Malformed keys and signatures yield `false`.
    #[must_use]
    pub fn verify(&self, msg: &[u8], sig: &[u8], ctx: &KeyContext<'_>) -> bool {
        let valid = match self {
            Self::Rsa(key) => rsa_key::verify(&key.n, &key.e, msg, sig),
            Self::Goo(key) => ctx.goo.verify(msg, sig, &key.c1),
            Self::P256(key) => p256_key::verify(&key.point, msg, sig),
            Self::Ed25519(key) => ed25519_key::verify(&key.point, msg, sig),
            Self::Address(_) => true,
        };
        if !valid {
            debug!(key_type = %self.key_type(), "Signature rejected");
        }
        valid
    }

    /// Encrypt a payload to the holder of this key.
    ///
    /// # Errors
    /// Returns [`PolicyViolation::Unsupported`] for ADDRESS keys,
    /// [`PolicyViolation::MissingModulus`] for a GOO key without its origin,
    /// and the primitive error if encryption fails.
    pub fn encrypt(
        &self,
        payload: &[u8],
        ctx: &KeyContext<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Vec<u8>, KeyError> {
        let ciphertext = match self {
            Self::Rsa(key) => {
                let public = rsa_key::import_public(&key.n, &key.e)?;
                ctx.goo.encrypt(payload, &public, rng)?
            }
            Self::Goo(key) => {
                let origin = origin(key)?;
                let public = rsa_key::import_public(&origin.n, &origin.e)?;
                ctx.goo.encrypt(payload, &public, rng)?
            }
            Self::P256(key) => p256_key::encrypt(&key.point, payload, rng)?,
            Self::Ed25519(key) => ed25519_key::encrypt(&key.point, payload, rng)?,
            Self::Address(_) => return Err(self.unsupported("encrypt to")),
        };
        Ok(ciphertext)
    }

    /// Decrypt a ciphertext produced by [`AirdropKey::encrypt`].
    ///
    /// `tweak` is required when the key is a blinded EC key.
    ///
    /// # Errors
    /// Returns [`PolicyViolation::Unsupported`] for ADDRESS keys, a policy
    /// error for missing inputs and the primitive error if decryption fails.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        secret: &SecretKey,
        tweak: Option<&Tweak>,
        ctx: &KeyContext<'_>,
    ) -> Result<Vec<u8>, KeyError> {
        let payload = match self {
            Self::Rsa(key) => {
                let private = secret.rsa_private(KeyType::Rsa, &key.n, &key.e)?;
                ctx.goo.decrypt(ciphertext, &private)?
            }
            Self::Goo(key) => {
                let origin = origin(key)?;
                let private = secret.rsa_private(KeyType::Goo, &origin.n, &origin.e)?;
                ctx.goo.decrypt(ciphertext, &private)?
            }
            Self::P256(key) => {
                let scalar = p256_scalar(key, secret, tweak)?;
                p256_key::decrypt(scalar.as_ref(), ciphertext)?
            }
            Self::Ed25519(key) => {
                let seed = ed25519_seed(key, secret, tweak)?;
                let tweak = tweak.filter(|_| key.is_tweaked());
                ed25519_key::decrypt(seed, tweak, ciphertext)?
            }
            Self::Address(_) => return Err(self.unsupported("decrypt with")),
        };
        Ok(payload)
    }
}
