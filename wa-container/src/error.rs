//! The container engine's error taxonomy (spec §7).

use core::fmt;
use uuid::Uuid;
use wa_escrow::EscrowError;
use wa_primitives::AsymmetricKeyType;

#[derive(Debug)]
pub enum ContainerError {
    /// `container_format` did not match `WA_0.1a`.
    UnknownFormat { found: String },
    /// A recipe or container referenced an algorithm tag outside the
    /// closed set.
    AlgorithmNotSupported { algo: String },
    /// A recipe referenced an escrow selector the registry has no binding
    /// for.
    EscrowNotAvailable { selector: String },
    /// An escrow had no keypair for the requested `(keychain_uid, key_type)`.
    KeyDoesNotExist {
        keychain_uid: Uuid,
        key_type: AsymmetricKeyType,
    },
    /// Authentication or padding failed while decrypting a stratum.
    Decryption { stratum: usize, reason: String },
    /// A signature failed to verify at the given stratum.
    SignatureVerification { stratum: usize, reason: String },
    /// The recipe or container was malformed (shape or count mismatch).
    InvalidArgument { reason: String },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFormat { found } => {
                write!(f, "unknown container format: {}", found)
            }
            Self::AlgorithmNotSupported { algo } => {
                write!(f, "algorithm not supported: {}", algo)
            }
            Self::EscrowNotAvailable { selector } => {
                write!(f, "escrow not available: {}", selector)
            }
            Self::KeyDoesNotExist { keychain_uid, key_type } => write!(
                f,
                "key does not exist for keychain {} / {}",
                keychain_uid, key_type
            ),
            Self::Decryption { stratum, reason } => {
                write!(f, "decryption failed at stratum {}: {}", stratum, reason)
            }
            Self::SignatureVerification { stratum, reason } => {
                write!(f, "signature verification failed at stratum {}: {}", stratum, reason)
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {}", reason),
        }
    }
}

impl std::error::Error for ContainerError {}

impl ContainerError {
    /// Map a primitive-layer failure encountered while working stratum
    /// `stratum`'s symmetric cipher to the matching container error kind.
    pub(crate) fn from_symmetric_primitive(stratum: usize, e: wa_primitives::PrimitiveError) -> Self {
        match e {
            wa_primitives::PrimitiveError::AlgorithmNotSupported(algo) => {
                Self::AlgorithmNotSupported { algo }
            }
            wa_primitives::PrimitiveError::DecryptionError(reason) => {
                Self::Decryption { stratum, reason }
            }
            wa_primitives::PrimitiveError::SignatureVerificationError(reason) => {
                Self::SignatureVerification { stratum, reason }
            }
            wa_primitives::PrimitiveError::EncodingError(reason) => {
                Self::InvalidArgument { reason }
            }
        }
    }

    /// Map a primitive-layer failure encountered while verifying a
    /// signature at stratum `stratum`.
    pub(crate) fn from_signature_primitive(stratum: usize, e: wa_primitives::PrimitiveError) -> Self {
        match e {
            wa_primitives::PrimitiveError::SignatureVerificationError(reason) => {
                Self::SignatureVerification { stratum, reason }
            }
            other => Self::from_symmetric_primitive(stratum, other),
        }
    }
}

impl From<EscrowError> for ContainerError {
    fn from(e: EscrowError) -> Self {
        match e {
            EscrowError::EscrowNotAvailable(selector) => Self::EscrowNotAvailable { selector },
            EscrowError::KeyDoesNotExist { keychain_uid, key_type } => {
                Self::KeyDoesNotExist { keychain_uid, key_type }
            }
            EscrowError::Primitive(reason) => Self::InvalidArgument { reason },
        }
    }
}
