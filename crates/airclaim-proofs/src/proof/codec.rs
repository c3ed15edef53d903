//! Binary proof encoding.
//!
//! ```text
//! u32 index || u8 count || proof[count] || u8 subindex || u8 subcount ||
//! subproof[subcount] || varbytes key || u8 version || u8 len || address ||
//! varint fee || varbytes signature
//! ```
//!
//! The signed form drops the signature and is prefixed with
//! [`SIGNATURE_CONTEXT`].

use airclaim_core::base::{
    ByteReader, ByteWriter, DecodeError, EncodeError, HASH_SIZE, Hash, sha256, var_bytes_size,
    varint_size,
};

use super::{AirdropProof, SIGNATURE_CONTEXT};

impl AirdropProof {
    fn body_size(&self) -> usize {
        [
            4,
            1,
            self.proof.len().saturating_mul(HASH_SIZE),
            1,
            1,
            self.subproof.len().saturating_mul(HASH_SIZE),
            var_bytes_size(self.key.len()),
            1,
            1,
            self.address.len(),
            varint_size(self.fee),
        ]
        .into_iter()
        .fold(0_usize, usize::saturating_add)
    }

    /// Number of bytes [`AirdropProof::encode`] produces.
    #[must_use]
    pub fn encoded_size(&self) -> usize {
        self.body_size()
            .saturating_add(var_bytes_size(self.signature.len()))
    }

    fn write_body(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
        writer
            .write_u32(self.index)
            .write_u8(EncodeError::u8_len("proof", self.proof.len())?);
        for hash in &self.proof {
            writer.write_bytes(hash);
        }

        writer
            .write_u8(self.subindex)
            .write_u8(EncodeError::u8_len("subproof", self.subproof.len())?);
        for hash in &self.subproof {
            writer.write_bytes(hash);
        }

        writer
            .write_var_bytes(&self.key)
            .write_u8(self.version)
            .write_u8(EncodeError::u8_len("address", self.address.len())?)
            .write_bytes(&self.address)
            .write_varint(self.fee);
        Ok(())
    }

    /// Append the full encoding to `writer`.
    ///
    /// # Errors
    /// Returns [`EncodeError::FieldTooLong`] if a path or the address exceeds
    /// 255 entries.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
        self.write_body(writer)?;
        writer.write_var_bytes(&self.signature);
        Ok(())
    }

    /// Encode to a fresh buffer.
    ///
    /// # Errors
    /// See [`AirdropProof::write`].
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = ByteWriter::with_capacity(self.encoded_size());
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// The bytes a signature commits to: the context followed by every field
    /// except the signature.
    ///
    /// # Errors
    /// See [`AirdropProof::write`].
    pub fn signature_data(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer =
            ByteWriter::with_capacity(self.body_size().saturating_add(SIGNATURE_CONTEXT.len()));
        writer.write_bytes(&SIGNATURE_CONTEXT);
        self.write_body(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// `SHA-256` of [`AirdropProof::signature_data`].
    ///
    /// # Errors
    /// See [`AirdropProof::write`].
    pub fn signature_hash(&self) -> Result<Hash, EncodeError> {
        Ok(sha256(&self.signature_data()?))
    }

    /// Read one proof from `reader`.
    ///
    /// Only the structure is checked; bounds that depend on the snapshot are
    /// left to [`AirdropProof::check_sanity`].
    ///
    /// # Errors
    /// Returns [`DecodeError`] on truncation or a non-canonical varint.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let index = reader.read_u32()?;
        let proof = read_path(reader)?;
        let subindex = reader.read_u8()?;
        let subproof = read_path(reader)?;
        let key = reader.read_var_bytes()?.to_vec();
        let version = reader.read_u8()?;
        let len = reader.read_u8()?;
        let address = reader.read_bytes(usize::from(len))?.to_vec();
        let fee = reader.read_varint()?;
        let signature = reader.read_var_bytes()?.to_vec();

        Ok(Self {
            index,
            proof,
            subindex,
            subproof,
            key,
            version,
            address,
            fee,
            signature,
        })
    }

    /// Decode a proof that must span all of `bytes`.
    ///
    /// # Errors
    /// See [`AirdropProof::read`]; also fails on trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let proof = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(proof)
    }
}

fn read_path(reader: &mut ByteReader<'_>) -> Result<Vec<Hash>, DecodeError> {
    let count = reader.read_u8()?;
    (0..count).map(|_| reader.read_array()).collect()
}
