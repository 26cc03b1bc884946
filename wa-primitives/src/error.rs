//! Error types for the primitive layer.

use core::fmt;

/// Failures raised by symmetric/asymmetric primitives and canonical encoding.
#[derive(Debug)]
pub enum PrimitiveError {
    /// An algorithm tag is not part of the closed set this crate implements.
    AlgorithmNotSupported(String),
    /// Authentication or padding check failed during decryption.
    DecryptionError(String),
    /// A signature failed to verify (bad digest, tampered timestamp, wrong key).
    SignatureVerificationError(String),
    /// A cipherdict or key could not be encoded/decoded canonically.
    EncodingError(String),
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlgorithmNotSupported(algo) => {
                write!(f, "algorithm not supported: {}", algo)
            }
            Self::DecryptionError(reason) => write!(f, "decryption failed: {}", reason),
            Self::SignatureVerificationError(reason) => {
                write!(f, "signature verification failed: {}", reason)
            }
            Self::EncodingError(reason) => write!(f, "encoding error: {}", reason),
        }
    }
}

impl std::error::Error for PrimitiveError {}
