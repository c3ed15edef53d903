//! Private key material in the two legacy shapes a claimant may hold.
//!
//! Packet parsing is left to the caller; these types hold the already
//! extracted big-endian integers or raw scalars.

use std::fmt;

use airclaim_crypto::rsa_key;
use rsa::RsaPrivateKey;
use serde::Deserialize;
use serde_with::hex::Hex;
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::KeyType;
use crate::{KeyError, PolicyViolation};

/// Secret material from an OpenPGP secret-key packet.
#[serde_as]
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
pub enum PgpSecretKey {
    /// RSA secret integers.
    Rsa {
        /// Private exponent.
        #[serde_as(as = "Hex")]
        d: Vec<u8>,
        /// First prime.
        #[serde_as(as = "Hex")]
        p: Vec<u8>,
        /// Second prime.
        #[serde_as(as = "Hex")]
        q: Vec<u8>,
        /// `p^-1 mod q`.
        #[serde_as(as = "Hex")]
        qi: Vec<u8>,
    },
    /// ECDSA or `EdDSA` secret scalar.
    Ecc {
        /// Secret scalar or seed.
        #[serde_as(as = "Hex")]
        d: Vec<u8>,
    },
}

/// Secret material from an OpenSSH private key.
#[serde_as]
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
pub enum SshPrivateKey {
    /// RSA secret integers.
    Rsa {
        /// Private exponent.
        #[serde_as(as = "Hex")]
        d: Vec<u8>,
        /// First prime.
        #[serde_as(as = "Hex")]
        p: Vec<u8>,
        /// Second prime.
        #[serde_as(as = "Hex")]
        q: Vec<u8>,
        /// `d mod (p - 1)`.
        #[serde_as(as = "Hex")]
        dp: Vec<u8>,
        /// `d mod (q - 1)`.
        #[serde_as(as = "Hex")]
        dq: Vec<u8>,
        /// `q^-1 mod p`.
        #[serde_as(as = "Hex")]
        qi: Vec<u8>,
    },
    /// ECDSA scalar, or Ed25519 seed optionally followed by the public point.
    Ecc {
        /// Secret key bytes.
        #[serde_as(as = "Hex")]
        key: Vec<u8>,
    },
}

/// Secret material supplied for signing or decryption.
///
/// The variant selects the legacy encoding it was extracted from.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "lowercase")]
pub enum SecretKey {
    /// OpenPGP-shaped secret.
    Pgp(PgpSecretKey),
    /// OpenSSH-shaped secret.
    Ssh(SshPrivateKey),
}

impl SecretKey {
    /// Rebuild the RSA private key for the public `(n, e)`.
    pub(crate) fn rsa_private(
        &self,
        key_type: KeyType,
        n: &[u8],
        e: &[u8],
    ) -> Result<RsaPrivateKey, KeyError> {
        let (d, p, q) = match self {
            Self::Pgp(PgpSecretKey::Rsa { d, p, q, .. })
            | Self::Ssh(SshPrivateKey::Rsa { d, p, q, .. }) => (d, p, q),
            Self::Pgp(PgpSecretKey::Ecc { .. }) | Self::Ssh(SshPrivateKey::Ecc { .. }) => {
                return Err(PolicyViolation::SecretKindMismatch(key_type).into());
            }
        };
        Ok(rsa_key::import_private(n, e, d, p, q)?)
    }

    /// The secret scalar of an elliptic-curve key.
    pub(crate) fn ec_secret(&self, key_type: KeyType) -> Result<&[u8], KeyError> {
        match self {
            Self::Pgp(PgpSecretKey::Ecc { d }) => Ok(d.as_slice()),
            Self::Ssh(SshPrivateKey::Ecc { key }) => Ok(key.as_slice()),
            Self::Pgp(PgpSecretKey::Rsa { .. }) | Self::Ssh(SshPrivateKey::Rsa { .. }) => {
                Err(PolicyViolation::SecretKindMismatch(key_type).into())
            }
        }
    }

    /// The 32-byte Ed25519 seed. OpenSSH stores `seed || point`.
    pub(crate) fn ed25519_seed(&self) -> Result<&[u8], KeyError> {
        let secret = self.ec_secret(KeyType::Ed25519)?;
        match secret.len() {
            32 => Ok(secret),
            64 => secret
                .get(..32)
                .ok_or(KeyError::InvalidLength { field: "seed", len: 64 }),
            len => Err(KeyError::InvalidLength { field: "seed", len }),
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Pgp(PgpSecretKey::Rsa { .. }) => "Pgp(Rsa)",
            Self::Pgp(PgpSecretKey::Ecc { .. }) => "Pgp(Ecc)",
            Self::Ssh(SshPrivateKey::Rsa { .. }) => "Ssh(Rsa)",
            Self::Ssh(SshPrivateKey::Ecc { .. }) => "Ssh(Ecc)",
        };
        write!(f, "SecretKey::{shape}(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_is_a_policy_error() {
        let secret = SecretKey::Pgp(PgpSecretKey::Ecc { d: vec![1; 32] });
        assert!(matches!(
            secret.rsa_private(KeyType::Rsa, &[1], &[3]),
            Err(KeyError::Policy(PolicyViolation::SecretKindMismatch(KeyType::Rsa)))
        ));
    }

    #[test]
    fn openssh_ed25519_secret_keeps_seed() {
        let mut key = vec![7_u8; 32];
        key.extend_from_slice(&[9_u8; 32]);
        let secret = SecretKey::Ssh(SshPrivateKey::Ecc { key });
        assert_eq!(secret.ed25519_seed().expect("seed"), &[7_u8; 32]);

        let short = SecretKey::Ssh(SshPrivateKey::Ecc { key: vec![1; 31] });
        assert!(short.ed25519_seed().is_err());
    }

    #[test]
    fn deserializes_from_tagged_hex_json() {
        let json = r#"{"pgp": {"ecc": {"d": "0102"}}}"#;
        let secret: SecretKey = serde_json::from_str(json).expect("parse secret");
        assert_eq!(secret.ec_secret(KeyType::P256).expect("scalar"), &[1, 2]);

        let unknown = r#"{"ssh": {"ecc": {"key": "00", "extra": "00"}}}"#;
        assert!(serde_json::from_str::<SecretKey>(unknown).is_err());
    }

    #[test]
    fn debug_redacts_material() {
        let secret = SecretKey::Ssh(SshPrivateKey::Ecc { key: vec![0xaa; 32] });
        assert_eq!(format!("{secret:?}"), "SecretKey::Ssh(Ecc)(..)");
    }
}
