//! Foundational primitive types and byte helpers.

mod codec;
mod hash;
mod merkle;

pub use codec::{ByteReader, ByteWriter, DecodeError, EncodeError, var_bytes_size, varint_size};
pub use hash::{HASH_SIZE, Hash, blake2b256, sha256};
pub use merkle::{combine, derive_root, verify_inclusion};
