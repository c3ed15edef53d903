//! Little-endian byte reader/writer used by the key and proof wire formats.
//!
//! Integers are little-endian. Variable-length integers use the Bitcoin
//! compact-size encoding and must be minimally encoded.

use thiserror::Error;

/// Errors raised while parsing untrusted bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before a field could be read.
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes required by the field.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },
    /// Bytes were left over after a complete structure was read.
    #[error("Trailing data: {0} unread bytes")]
    TrailingBytes(usize),
    /// A compact-size integer was not minimally encoded.
    #[error("Non-canonical varint")]
    NonCanonicalVarint,
    /// A length prefix does not fit the platform's address space.
    #[error("Length {0} exceeds addressable size")]
    LengthOverflow(u64),
    /// The key type tag is not one of the known variants.
    #[error("Unknown key type: {0}")]
    UnknownKeyType(u8),
    /// A field has a length outside its permitted range.
    #[error("Invalid {field} length: {len}")]
    InvalidLength {
        /// Field name.
        field: &'static str,
        /// Observed length.
        len: usize,
    },
    /// A field holds a value outside its permitted domain.
    #[error("Invalid {field} value")]
    InvalidValue {
        /// Field name.
        field: &'static str,
    },
}

/// Errors raised while serializing a structure whose fields exceed the wire bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// A field is longer than its length prefix can express.
    #[error("{field} length {len} exceeds maximum {max}")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Observed length.
        len: usize,
        /// Maximum encodable length.
        max: usize,
    },
}

impl EncodeError {
    /// Convert a length into a `u8` prefix.
    ///
    /// # Errors
    /// Returns [`EncodeError::FieldTooLong`] if `len` exceeds `u8::MAX`.
    pub fn u8_len(field: &'static str, len: usize) -> Result<u8, Self> {
        u8::try_from(len).map_err(|_| Self::FieldTooLong {
            field,
            len,
            max: usize::from(u8::MAX),
        })
    }

    /// Convert a length into a `u16` prefix.
    ///
    /// # Errors
    /// Returns [`EncodeError::FieldTooLong`] if `len` exceeds `u16::MAX`.
    pub fn u16_len(field: &'static str, len: usize) -> Result<u16, Self> {
        u16::try_from(len).map_err(|_| Self::FieldTooLong {
            field,
            len,
            max: usize::from(u16::MAX),
        })
    }
}

/// Cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    /// Create a reader over `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Read exactly `len` bytes.
    ///
    /// # Errors
    /// Returns [`DecodeError::UnexpectedEof`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let (head, tail) =
            self.data
                .split_at_checked(len)
                .ok_or(DecodeError::UnexpectedEof {
                    needed: len,
                    remaining: self.data.len(),
                })?;
        self.data = tail;
        Ok(head)
    }

    /// Read a fixed-size array.
    ///
    /// # Errors
    /// Returns [`DecodeError::UnexpectedEof`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0_u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a `u8`.
    ///
    /// # Errors
    /// Returns an error if the input is exhausted.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(u8::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u16`.
    ///
    /// # Errors
    /// Returns an error if the input is exhausted.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    /// Returns an error if the input is exhausted.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u64`.
    ///
    /// # Errors
    /// Returns an error if the input is exhausted.
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a compact-size integer.
    ///
    /// # Errors
    /// Returns an error if the input is exhausted or the encoding is not minimal.
    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let value = match self.read_u8()? {
            0xff => {
                let value = self.read_u64()?;
                if value <= u64::from(u32::MAX) {
                    return Err(DecodeError::NonCanonicalVarint);
                }
                value
            }
            0xfe => {
                let value = self.read_u32()?;
                if value <= u32::from(u16::MAX) {
                    return Err(DecodeError::NonCanonicalVarint);
                }
                u64::from(value)
            }
            0xfd => {
                let value = self.read_u16()?;
                if value < 0xfd {
                    return Err(DecodeError::NonCanonicalVarint);
                }
                u64::from(value)
            }
            small => u64::from(small),
        };
        Ok(value)
    }

    /// Read a compact-size length prefix followed by that many bytes.
    ///
    /// The length is checked against the remaining input before anything is copied.
    ///
    /// # Errors
    /// Returns an error if the prefix is malformed or exceeds the remaining input.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::LengthOverflow(len))?;
        self.read_bytes(len)
    }

    /// Ensure the whole input has been consumed.
    ///
    /// # Errors
    /// Returns [`DecodeError::TrailingBytes`] if unread bytes remain.
    pub const fn finish(self) -> Result<(), DecodeError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes(self.data.len()))
        }
    }
}

/// Growable output buffer mirroring [`ByteReader`].
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create a writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append a `u8`.
    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Append a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Append a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Append a little-endian `u64`.
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Append a minimally encoded compact-size integer.
    pub fn write_varint(&mut self, value: u64) -> &mut Self {
        if let Ok(small) = u8::try_from(value)
            && small < 0xfd
        {
            return self.write_u8(small);
        }
        if let Ok(value) = u16::try_from(value) {
            return self.write_u8(0xfd).write_u16(value);
        }
        if let Ok(value) = u32::try_from(value) {
            return self.write_u8(0xfe).write_u32(value);
        }
        self.write_u8(0xff).write_u64(value)
    }

    /// Append a compact-size length prefix and the bytes.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_varint(u64::try_from(bytes.len()).unwrap_or(u64::MAX))
            .write_bytes(bytes)
    }

    /// Number of bytes written so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Encoded size of a compact-size integer.
#[must_use]
pub const fn varint_size(value: u64) -> usize {
    if value < 0xfd {
        1
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Encoded size of a compact-size length prefix plus `len` bytes.
#[must_use]
pub const fn var_bytes_size(len: usize) -> usize {
    #[allow(
        clippy::as_conversions,
        reason = "usize always fits in u64 on supported targets"
    )]
    varint_size(len as u64).saturating_add(len)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "Tests")]

    use super::*;

    #[test]
    fn varint_boundaries_use_minimal_width() {
        for (value, width) in [
            (0_u64, 1_usize),
            (0xfc, 1),
            (0xfd, 3),
            (0xffff, 3),
            (0x1_0000, 5),
            (0xffff_ffff, 5),
            (0x1_0000_0000, 9),
        ] {
            let mut writer = ByteWriter::default();
            writer.write_varint(value);
            let bytes = writer.into_inner();
            assert_eq!(bytes.len(), width, "width for {value:#x}");
            assert_eq!(varint_size(value), width);

            let mut reader = ByteReader::new(&bytes);
            assert_eq!(reader.read_varint(), Ok(value));
            assert_eq!(reader.finish(), Ok(()));
        }
    }

    #[test]
    fn non_minimal_varint_is_rejected() {
        let mut reader = ByteReader::new(&[0xfd, 0x10, 0x00]);
        assert_eq!(reader.read_varint(), Err(DecodeError::NonCanonicalVarint));

        let mut reader = ByteReader::new(&[0xfe, 0xff, 0xff, 0x00, 0x00]);
        assert_eq!(reader.read_varint(), Err(DecodeError::NonCanonicalVarint));
    }

    #[test]
    fn integers_are_little_endian() {
        let mut writer = ByteWriter::default();
        writer.write_u16(0x0102).write_u32(0x0304_0506).write_u64(7);
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..6], &[0x02, 0x01, 0x06, 0x05, 0x04, 0x03]);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u16(), Ok(0x0102));
        assert_eq!(reader.read_u32(), Ok(0x0304_0506));
        assert_eq!(reader.read_u64(), Ok(7));
    }

    #[test]
    fn truncated_var_bytes_fail_before_copy() {
        // Claims 0xffff bytes but carries only two.
        let mut reader = ByteReader::new(&[0xfd, 0xff, 0xff, 0xaa, 0xbb]);
        assert_eq!(
            reader.read_var_bytes(),
            Err(DecodeError::UnexpectedEof {
                needed: 0xffff,
                remaining: 2
            })
        );
    }

    #[test]
    fn finish_reports_trailing_bytes() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert_eq!(reader.read_u8(), Ok(1));
        assert_eq!(reader.finish(), Err(DecodeError::TrailingBytes(2)));
    }

    #[test]
    fn length_prefix_helpers_enforce_bounds() {
        assert_eq!(EncodeError::u8_len("address", 40), Ok(40));
        assert!(EncodeError::u8_len("address", 256).is_err());
        assert_eq!(EncodeError::u16_len("n", 512), Ok(512));
        assert!(EncodeError::u16_len("n", 0x1_0000).is_err());
    }
}
