//! Shared test utilities for the workspace.

mod goo;
mod merkle;

use std::sync::LazyLock;

use rand_core::OsRng;
use rsa::RsaPrivateKey;
use rsa::traits::PrivateKeyParts as _;

pub use goo::TransparentGoo;
pub use merkle::MerkleTree;

#[allow(clippy::expect_used, reason = "Fixture generation cannot recover")]
static RSA_FIXTURE: LazyLock<RsaPrivateKey> =
    LazyLock::new(|| RsaPrivateKey::new(&mut OsRng, 1024).expect("generate RSA fixture"));

/// A 1024-bit RSA key shared by every test in the process.
#[must_use]
pub fn rsa_fixture() -> &'static RsaPrivateKey {
    &RSA_FIXTURE
}

/// Big-endian `(d, p, q, p^-1 mod q)` of [`rsa_fixture`], in OpenPGP order.
///
/// # Panics
/// Panics if the fixture was not generated with two primes.
#[must_use]
pub fn rsa_secret_components() -> (Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
    let key = rsa_fixture();
    let [first, second] = key.primes() else {
        panic!("RSA fixture must have two primes");
    };
    // The CRT coefficient is `second^-1 mod first`, so the primes swap.
    let qi = key
        .crt_coefficient()
        .map(|qi| qi.to_bytes_be())
        .unwrap_or_default();
    (
        key.d().to_bytes_be(),
        second.to_bytes_be(),
        first.to_bytes_be(),
        qi,
    )
}
