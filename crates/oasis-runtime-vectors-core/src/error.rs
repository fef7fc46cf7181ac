//! Error types for the runtime vector primitives.

use thiserror::Error;

/// Core errors that can occur while building, encoding or signing transactions.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed address: {0}")]
    BadAddress(String),

    #[error("signing failed: {0}")]
    Sign(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("unknown test key: {0}")]
    UnknownTestKey(String),

    #[error("test key registry: {0}")]
    TestKeyRegistry(String),
}

/// Errors reported by the stateless `validate_basic` checks.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("signature verification failed")]
    SignatureFailed,

    #[error("unsupported transaction version: {0}")]
    UnsupportedVersion(u16),

    #[error("transaction has no signers")]
    NoSigners,

    #[error("signature count mismatch: {signers} signers, {signatures} signatures")]
    SignatureCountMismatch { signers: usize, signatures: usize },

    #[error("denomination exceeds {max} bytes: {len}")]
    DenominationTooLong { len: usize, max: usize },

    #[error("structural error: {0}")]
    StructuralError(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ValidationError::SignatureFailed
            }
            CoreError::BadAddress(msg)
            | CoreError::Sign(msg)
            | CoreError::Encoding(msg)
            | CoreError::Decoding(msg)
            | CoreError::MalformedTransaction(msg)
            | CoreError::UnknownTestKey(msg)
            | CoreError::TestKeyRegistry(msg) => ValidationError::StructuralError(msg),
        }
    }
}
