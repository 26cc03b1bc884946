//! The escrow capability trait (spec §4.2).

use uuid::Uuid;
use wa_primitives::{AsymmetricEncryptionAlgo, AsymmetricKeyType, CipherDict, Signature, SignatureAlgo};

use crate::error::EscrowError;

/// An authority holding asymmetric key material, addressable by
/// `(keychain_uid, key_type)`.
///
/// Implementations must provision keypairs idempotently: two concurrent
/// calls for the same `(keychain_uid, key_type)` must not race to create
/// two distinct keypairs (spec §5).
pub trait Escrow: Send + Sync {
    /// Fetch the PEM-encoded public key for `(keychain_uid, key_type)`,
    /// generating and storing a fresh keypair on first use.
    fn get_public_key(
        &self,
        keychain_uid: Uuid,
        key_type: AsymmetricKeyType,
    ) -> Result<String, EscrowError>;

    /// Unwrap `cipherdict` with the private key for `(keychain_uid, key_type)`.
    /// Fails with [`EscrowError::KeyDoesNotExist`] if that pair was never
    /// issued.
    fn decrypt_with_private_key(
        &self,
        keychain_uid: Uuid,
        key_type: AsymmetricKeyType,
        encryption_algo: AsymmetricEncryptionAlgo,
        cipherdict: &CipherDict,
    ) -> Result<Vec<u8>, EscrowError>;

    /// Sign `message` with the private key for `(keychain_uid, key_type)`,
    /// generating and storing a fresh keypair on first use.
    fn get_message_signature(
        &self,
        keychain_uid: Uuid,
        message: &[u8],
        key_type: AsymmetricKeyType,
        signature_algo: SignatureAlgo,
    ) -> Result<Signature, EscrowError>;
}
