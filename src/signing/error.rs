//! Signature engine error types.

use thiserror::Error;

/// Failure kinds of the signature engine.
///
/// `AlgorithmNotSupported` and `InvalidSignature` are deliberately distinct:
/// the former is raised before any cryptographic work, the latter only when
/// the cryptographic check itself fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("Algorithm not supported: {0}")]
    AlgorithmNotSupported(String),

    #[error("Signature verification failed")]
    InvalidSignature,

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

impl SigningError {
    pub fn is_algorithm_not_supported(&self) -> bool {
        matches!(self, Self::AlgorithmNotSupported(_))
    }

    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, Self::InvalidSignature)
    }
}
