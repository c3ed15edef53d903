use thiserror::Error;

/// Errors returned by primitive operations when an input is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key bytes do not describe a valid key for the algorithm.
    #[error("Invalid {0} public key")]
    InvalidPublicKey(&'static str),
    /// Secret key bytes do not describe a valid key for the algorithm.
    #[error("Invalid {0} secret key")]
    InvalidSecretKey(&'static str),
    /// The secret key does not correspond to the public key it was paired with.
    #[error("Secret key does not match {0} public key")]
    KeyMismatch(&'static str),
    /// A tweak is not a canonical non-zero scalar, or produced the identity.
    #[error("Invalid tweak")]
    InvalidTweak,
    /// The RSA backend rejected an operation.
    #[error("RSA error: {0}")]
    Rsa(String),
    /// Signature generation failed.
    #[error("Signing failed")]
    Signing,
    /// Encryption failed.
    #[error("Encryption failed")]
    Encryption,
    /// Ciphertext was malformed or failed authentication.
    #[error("Decryption failed")]
    Decryption,
    /// No backend is available for the requested scheme.
    #[error("{0} backend unavailable")]
    Unavailable(&'static str),
}

impl From<rsa::Error> for CryptoError {
    fn from(err: rsa::Error) -> Self {
        Self::Rsa(err.to_string())
    }
}
