//! Hash helpers.

use blake2b_simd::Params;
use sha2::{Digest as _, Sha256};

/// Size of every digest used by the claim formats.
pub const HASH_SIZE: usize = 32;

/// A 32-byte digest.
pub type Hash = [u8; HASH_SIZE];

/// Hash arbitrary bytes to 32 bytes with `BLAKE2b`.
#[must_use]
pub fn blake2b256(data: &[u8]) -> Hash {
    let digest = Params::new().hash_length(HASH_SIZE).hash(data);
    let mut out = [0_u8; HASH_SIZE];
    out.copy_from_slice(digest.as_bytes());
    out
}

/// Hash arbitrary bytes with SHA-256.
#[must_use]
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn blake2b256_empty_vector() {
        assert_eq!(
            blake2b256(b""),
            hex!("0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8")
        );
    }

    #[test]
    fn sha256_abc_vector() {
        assert_eq!(
            sha256(b"abc"),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }
}
