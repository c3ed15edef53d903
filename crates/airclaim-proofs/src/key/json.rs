//! JSON form of [`AirdropKey`]: a symbolic `type`, hex byte fields, and only
//! the fields the variant carries.

use airclaim_crypto::GOO_C1_SIZE;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;

use super::{
    AddressKey, AirdropKey, EcKey, GooKey, KeyType, MAX_ADDRESS_SIZE, MIN_ADDRESS_SIZE, NONCE_SIZE,
    RsaKey,
};
use crate::KeyError;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(super) struct KeyJson {
    #[serde(rename = "type")]
    key_type: KeyType,
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<Vec<u8>>,
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    e: Option<Vec<u8>>,
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    c1: Option<Vec<u8>>,
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    point: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u8>,
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sponsor: Option<bool>,
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    nonce: Option<Vec<u8>>,
}

impl KeyJson {
    const fn empty(key_type: KeyType) -> Self {
        Self {
            key_type,
            n: None,
            e: None,
            c1: None,
            point: None,
            version: None,
            address: None,
            value: None,
            sponsor: None,
            nonce: None,
        }
    }
}

fn required<T>(key_type: KeyType, field: &'static str, value: Option<T>) -> Result<T, KeyError> {
    value.ok_or(KeyError::MissingField { field, key_type })
}

fn fixed<const N: usize>(
    key_type: KeyType,
    field: &'static str,
    value: Option<Vec<u8>>,
) -> Result<[u8; N], KeyError> {
    let bytes = required(key_type, field, value)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| KeyError::InvalidLength { field, len })
}

impl From<AirdropKey> for KeyJson {
    fn from(key: AirdropKey) -> Self {
        let mut json = Self::empty(key.key_type());
        match key {
            AirdropKey::Rsa(RsaKey { n, e, nonce }) => {
                json.n = Some(n);
                json.e = Some(e);
                json.nonce = Some(nonce.to_vec());
            }
            AirdropKey::Goo(GooKey { c1, .. }) => {
                json.c1 = Some(c1.to_vec());
            }
            AirdropKey::P256(EcKey { point, nonce }) => {
                json.point = Some(point.to_vec());
                json.nonce = Some(nonce.to_vec());
            }
            AirdropKey::Ed25519(EcKey { point, nonce }) => {
                json.point = Some(point.to_vec());
                json.nonce = Some(nonce.to_vec());
            }
            AirdropKey::Address(AddressKey {
                version,
                address,
                value,
                sponsor,
            }) => {
                json.version = Some(version);
                json.address = Some(address);
                json.value = Some(value);
                json.sponsor = Some(sponsor);
            }
        }
        json
    }
}

impl TryFrom<KeyJson> for AirdropKey {
    type Error = KeyError;

    fn try_from(json: KeyJson) -> Result<Self, Self::Error> {
        let KeyJson {
            key_type: kind,
            n,
            e,
            c1,
            point,
            version,
            address,
            value,
            sponsor,
            nonce,
        } = json;

        let key = match kind {
            KeyType::Rsa => {
                let n = required(kind, "n", n)?;
                let e = required(kind, "e", e)?;
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
                Self::Rsa(RsaKey {
                    n,
                    e,
                    nonce: fixed::<NONCE_SIZE>(kind, "nonce", nonce)?,
                })
            }
            KeyType::Goo => Self::Goo(GooKey {
                c1: Box::new(fixed::<GOO_C1_SIZE>(kind, "c1", c1)?),
                origin: None,
            }),
            KeyType::P256 => Self::P256(EcKey {
                point: fixed(kind, "point", point)?,
                nonce: fixed(kind, "nonce", nonce)?,
            }),
            KeyType::Ed25519 => Self::Ed25519(EcKey {
                point: fixed(kind, "point", point)?,
                nonce: fixed(kind, "nonce", nonce)?,
            }),
            KeyType::Address => {
                let address = required(kind, "address", address)?;
                if !(MIN_ADDRESS_SIZE..=MAX_ADDRESS_SIZE).contains(&address.len()) {
                    return Err(KeyError::InvalidLength {
                        field: "address",
                        len: address.len(),
                    });
                }
                Self::Address(AddressKey {
                    version: required(kind, "version", version)?,
                    address,
                    value: required(kind, "value", value)?,
                    sponsor: required(kind, "sponsor", sponsor)?,
                })
            }
        };
        Ok(key)
    }
}
