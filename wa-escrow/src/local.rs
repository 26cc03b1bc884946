//! The in-process local escrow (spec §4.2), selected in a recipe via
//! `LOCAL_ESCROW_PLACEHOLDER`.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;
use wa_primitives::{
    asymmetric_decrypt, sign, AsymmetricEncryptionAlgo, AsymmetricKeyType, AsymmetricKeypair,
    CipherDict, Signature, SignatureAlgo,
};

use crate::error::EscrowError;
use crate::escrow::Escrow;

type KeystoreMap = HashMap<(Uuid, AsymmetricKeyType), AsymmetricKeypair>;

/// An in-memory keystore backing the `LOCAL_ESCROW_PLACEHOLDER` selector.
///
/// Provisioning is lazy and idempotent: the first call for a given
/// `(keychain_uid, key_type)` generates a keypair; every later call reuses
/// it. Concurrent callers racing to provision the same pair are serialized
/// by a double-checked read/write lock so at most one keypair is ever
/// generated per pair (spec §5).
pub struct LocalEscrow {
    keystore: RwLock<KeystoreMap>,
}

impl LocalEscrow {
    pub fn new() -> Self {
        Self {
            keystore: RwLock::new(HashMap::new()),
        }
    }

    fn ensure_keypair(&self, keychain_uid: Uuid, key_type: AsymmetricKeyType) -> Result<(), EscrowError> {
        {
            let keystore = self.keystore.read().expect("keystore lock poisoned");
            if keystore.contains_key(&(keychain_uid, key_type)) {
                return Ok(());
            }
        }

        let mut keystore = self.keystore.write().expect("keystore lock poisoned");
        // Re-check under the write lock: another thread may have won the race.
        if keystore.contains_key(&(keychain_uid, key_type)) {
            return Ok(());
        }

        tracing::debug!(%keychain_uid, %key_type, "provisioning escrow keypair");
        let keypair = AsymmetricKeypair::generate(key_type)?;
        keystore.insert((keychain_uid, key_type), keypair);
        Ok(())
    }
}

impl Default for LocalEscrow {
    fn default() -> Self {
        Self::new()
    }
}

impl Escrow for LocalEscrow {
    fn get_public_key(
        &self,
        keychain_uid: Uuid,
        key_type: AsymmetricKeyType,
    ) -> Result<String, EscrowError> {
        self.ensure_keypair(keychain_uid, key_type)?;
        let keystore = self.keystore.read().expect("keystore lock poisoned");
        let keypair = keystore
            .get(&(keychain_uid, key_type))
            .expect("keypair provisioned above");
        Ok(keypair.public_key().to_pem()?)
    }

    fn decrypt_with_private_key(
        &self,
        keychain_uid: Uuid,
        key_type: AsymmetricKeyType,
        encryption_algo: AsymmetricEncryptionAlgo,
        cipherdict: &CipherDict,
    ) -> Result<Vec<u8>, EscrowError> {
        let keystore = self.keystore.read().expect("keystore lock poisoned");
        let keypair = keystore
            .get(&(keychain_uid, key_type))
            .ok_or(EscrowError::KeyDoesNotExist { keychain_uid, key_type })?;
        Ok(asymmetric_decrypt(cipherdict, encryption_algo, keypair)?)
    }

    fn get_message_signature(
        &self,
        keychain_uid: Uuid,
        message: &[u8],
        key_type: AsymmetricKeyType,
        signature_algo: SignatureAlgo,
    ) -> Result<Signature, EscrowError> {
        self.ensure_keypair(keychain_uid, key_type)?;
        let keystore = self.keystore.read().expect("keystore lock poisoned");
        let keypair = keystore
            .get(&(keychain_uid, key_type))
            .expect("keypair provisioned above");
        Ok(sign(keypair, message, signature_algo)?)
    }
}
