//! Binary key encoding.
//!
//! `u8 tag` followed by the variant body:
//!
//! | variant | body |
//! |---|---|
//! | RSA | `u16 len(n) \|\| n \|\| u8 len(e) \|\| e \|\| nonce` |
//! | GOO | `C1` |
//! | P256 | `point[33] \|\| nonce` |
//! | ED25519 | `point[32] \|\| nonce` |
//! | ADDRESS | `u8 version \|\| u8 len(addr) \|\| addr \|\| u64 value \|\| u8 sponsor` |
//!
//! Decoding is structural: it checks lengths and tags but not curve
//! membership or modulus validity, which [`AirdropKey::validate`] covers.

use airclaim_core::base::{ByteReader, ByteWriter, DecodeError, EncodeError};
use airclaim_crypto::GOO_C1_SIZE;

use super::{
    AddressKey, AirdropKey, EcKey, GooKey, KeyType, MAX_ADDRESS_SIZE, MIN_ADDRESS_SIZE, NONCE_SIZE,
    RsaKey,
};

impl AirdropKey {
    /// Number of bytes [`AirdropKey::encode`] produces.
    #[must_use]
    pub fn encoded_size(&self) -> usize {
        let body = match self {
            Self::Rsa(key) => 2_usize
                .saturating_add(key.n.len())
                .saturating_add(1)
                .saturating_add(key.e.len())
                .saturating_add(NONCE_SIZE),
            Self::Goo(_) => GOO_C1_SIZE,
            Self::P256(key) => key.point.len().saturating_add(NONCE_SIZE),
            Self::Ed25519(key) => key.point.len().saturating_add(NONCE_SIZE),
            Self::Address(key) => 1_usize
                .saturating_add(1)
                .saturating_add(key.address.len())
                .saturating_add(8)
                .saturating_add(1),
        };
        body.saturating_add(1)
    }

    /// Append the encoding to `writer`.
    ///
    /// # Errors
    /// Returns [`EncodeError::FieldTooLong`] if a variable field exceeds its
    /// length prefix.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
        writer.write_u8(self.key_type().tag());
        match self {
            Self::Rsa(key) => {
                writer
                    .write_u16(EncodeError::u16_len("n", key.n.len())?)
                    .write_bytes(&key.n)
                    .write_u8(EncodeError::u8_len("e", key.e.len())?)
                    .write_bytes(&key.e)
                    .write_bytes(&key.nonce);
            }
            Self::Goo(key) => {
                writer.write_bytes(key.c1.as_slice());
            }
            Self::P256(key) => {
                writer.write_bytes(&key.point).write_bytes(&key.nonce);
            }
            Self::Ed25519(key) => {
                writer.write_bytes(&key.point).write_bytes(&key.nonce);
            }
            Self::Address(key) => {
                writer
                    .write_u8(key.version)
                    .write_u8(EncodeError::u8_len("address", key.address.len())?)
                    .write_bytes(&key.address)
                    .write_u64(key.value)
                    .write_u8(u8::from(key.sponsor));
            }
        }
        Ok(())
    }

    /// Encode to a fresh buffer.
    ///
    /// # Errors
    /// See [`AirdropKey::write`].
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = ByteWriter::with_capacity(self.encoded_size());
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Read one key from `reader`.
    ///
    /// # Errors
    /// Returns [`DecodeError`] on truncation, an unknown tag, an address
    /// outside `2..=40` bytes or a sponsor flag other than 0 or 1.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let tag = reader.read_u8()?;
        let key_type = KeyType::from_tag(tag).ok_or(DecodeError::UnknownKeyType(tag))?;

        let key = match key_type {
            KeyType::Rsa => {
                let n_len = reader.read_u16()?;
                let n = reader.read_bytes(usize::from(n_len))?.to_vec();
                let e_len = reader.read_u8()?;
                let e = reader.read_bytes(usize::from(e_len))?.to_vec();
                let nonce = reader.read_array()?;
                Self::Rsa(RsaKey { n, e, nonce })
            }
            KeyType::Goo => Self::Goo(GooKey {
                c1: Box::new(reader.read_array()?),
                origin: None,
            }),
            KeyType::P256 => Self::P256(EcKey {
                point: reader.read_array()?,
                nonce: reader.read_array()?,
            }),
            KeyType::Ed25519 => Self::Ed25519(EcKey {
                point: reader.read_array()?,
                nonce: reader.read_array()?,
            }),
            KeyType::Address => {
                let version = reader.read_u8()?;
                let len = usize::from(reader.read_u8()?);
                if !(MIN_ADDRESS_SIZE..=MAX_ADDRESS_SIZE).contains(&len) {
                    return Err(DecodeError::InvalidLength {
                        field: "address",
                        len,
                    });
                }
                let address = reader.read_bytes(len)?.to_vec();
                let value = reader.read_u64()?;
                let sponsor = match reader.read_u8()? {
                    0 => false,
                    1 => true,
                    _ => return Err(DecodeError::InvalidValue { field: "sponsor" }),
                };
                Self::Address(AddressKey {
                    version,
                    address,
                    value,
                    sponsor,
                })
            }
        };

        Ok(key)
    }

    /// Decode a key that must span all of `bytes`.
    ///
    /// # Errors
    /// See [`AirdropKey::read`]; also fails on trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let key = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(key)
    }
}
