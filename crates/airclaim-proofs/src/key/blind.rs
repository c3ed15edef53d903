//! Blinding: turning a snapshot key into an unlinkable derivative.
//!
//! RSA keys become GOO commitments. EC keys keep their variant and move to
//! `P + t*G` with `nonce = BLAKE2b-256(t)`.

use airclaim_crypto::{Tweak, ed25519_key, p256_key, rsa_key};
use rand_core::CryptoRngCore;
use tracing::debug;

use super::{AirdropKey, EcKey, GooKey, RsaKey, ZERO_NONCE};
use crate::{KeyContext, KeyError, PolicyViolation};

impl AirdropKey {
    /// Sample a tweak and blind this key with it.
    ///
    /// The tweak must be kept by the caller until signing; it is needed to
    /// sign with (or decrypt to) the blinded key.
    ///
    /// # Errors
    /// Returns [`PolicyViolation::Unsupported`] for GOO and ADDRESS keys and
    /// the backend error if blinding fails.
    pub fn generate(
        &self,
        ctx: &KeyContext<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(Tweak, Self), KeyError> {
        let tweak = match self {
            Self::Rsa(_) => ctx.goo.generate_secret(rng),
            Self::P256(_) => p256_key::random_tweak(rng),
            Self::Ed25519(_) => ed25519_key::random_tweak(rng),
            Self::Goo(_) | Self::Address(_) => return Err(self.unsupported("blind")),
        };
        let blinded = self.apply_tweak(&tweak, ctx)?;
        Ok((tweak, blinded))
    }

    /// Blind this key with a caller-supplied tweak, returning the new key.
    ///
    /// # Errors
    /// Returns [`PolicyViolation::Unsupported`] for GOO and ADDRESS keys,
    /// [`airclaim_crypto::CryptoError::InvalidTweak`] for a tweak that is not a
    /// canonical non-zero scalar, or the Goo backend error for RSA keys.
    pub fn apply_tweak(&self, tweak: &Tweak, ctx: &KeyContext<'_>) -> Result<Self, KeyError> {
        let blinded = match self {
            Self::Rsa(key) => {
                let public = rsa_key::import_public(&key.n, &key.e)?;
                let c1 = ctx.goo.challenge(tweak, &public)?;
                Self::Goo(GooKey {
                    c1: Box::new(c1),
                    origin: Some(RsaKey {
                        n: key.n.clone(),
                        e: key.e.clone(),
                        nonce: ZERO_NONCE,
                    }),
                })
            }
            Self::P256(key) => Self::P256(EcKey {
                point: p256_key::public_key_tweak_add(&key.point, tweak)?,
                nonce: tweak.commitment(),
            }),
            Self::Ed25519(key) => Self::Ed25519(EcKey {
                point: ed25519_key::public_key_tweak_add(&key.point, tweak)?,
                nonce: tweak.commitment(),
            }),
            Self::Goo(_) | Self::Address(_) => return Err(self.unsupported("blind")),
        };
        debug!(from = %self.key_type(), to = %blinded.key_type(), "Blinded key");
        Ok(blinded)
    }

    /// Copy of this key whose nonce commits to `tweak`, public material unchanged.
    ///
    /// # Errors
    /// Returns [`PolicyViolation::Unsupported`] for GOO and ADDRESS keys.
    pub fn apply_nonce(&self, tweak: &Tweak) -> Result<Self, KeyError> {
        let mut key = self.clone();
        match &mut key {
            Self::Rsa(RsaKey { nonce, .. })
            | Self::P256(EcKey { nonce, .. })
            | Self::Ed25519(EcKey { nonce, .. }) => *nonce = tweak.commitment(),
            Self::Goo(_) | Self::Address(_) => return Err(self.unsupported("set the nonce of")),
        }
        Ok(key)
    }

    pub(super) fn unsupported(&self, operation: &'static str) -> KeyError {
        PolicyViolation::Unsupported {
            operation,
            key_type: self.key_type(),
        }
        .into()
    }
}
