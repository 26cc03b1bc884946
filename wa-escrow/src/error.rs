//! Error types for the escrow layer.

use core::fmt;
use uuid::Uuid;
use wa_primitives::AsymmetricKeyType;

/// Failures raised by an [`crate::Escrow`] or by [`crate::EscrowRegistry`]
/// resolution.
#[derive(Debug)]
pub enum EscrowError {
    /// The recipe referenced an escrow selector the registry has no
    /// binding for.
    EscrowNotAvailable(String),
    /// `decrypt_with_private_key` was called for a `(keychain_uid, key_type)`
    /// pair that was never issued via `get_public_key`/`get_message_signature`.
    KeyDoesNotExist {
        keychain_uid: Uuid,
        key_type: AsymmetricKeyType,
    },
    /// The underlying primitive layer failed (key generation, PEM encoding,
    /// signing, or key-wrap decryption).
    Primitive(String),
}

impl fmt::Display for EscrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EscrowNotAvailable(selector) => {
                write!(f, "escrow not available: {}", selector)
            }
            Self::KeyDoesNotExist { keychain_uid, key_type } => write!(
                f,
                "key does not exist for keychain {} / {}",
                keychain_uid, key_type
            ),
            Self::Primitive(reason) => write!(f, "escrow primitive error: {}", reason),
        }
    }
}

impl std::error::Error for EscrowError {}

impl From<wa_primitives::PrimitiveError> for EscrowError {
    fn from(e: wa_primitives::PrimitiveError) -> Self {
        Self::Primitive(e.to_string())
    }
}
