//! Primitive cryptography behind airclaim keys.
//!
//! Every function is a pure transform over byte buffers. Randomness is always
//! supplied by the caller.

mod ecies;
/// Ed25519 signatures, point tweaks and ECIES.
pub mod ed25519_key;
mod error;
/// Blinded RSA group-signature scheme interface.
pub mod goo;
/// P-256 ECDSA, point tweaks and ECIES.
pub mod p256_key;
/// RSA import validation and RSASSA-PSS.
pub mod rsa_key;
mod tweak;

pub use error::CryptoError;
pub use goo::{GOO_C1_SIZE, GooScheme, UnavailableGoo};
pub use tweak::{TWEAK_SIZE, Tweak};
