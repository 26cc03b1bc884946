//! Container writer (spec §4.3): a pure function from plaintext + recipe to
//! container, never mutating its input.

use uuid::Uuid;
use wa_escrow::EscrowRegistry;
use wa_primitives::{
    asymmetric_encrypt, canonical_serialize, encrypt_bytestring, generate_symmetric_key, sign,
    AsymmetricPublicKey,
};

use crate::container::{Container, ContainerDataEncryptionStratum, SignedDataSignature, CONTAINER_FORMAT};
use crate::error::ContainerError;
use crate::recipe::Recipe;

/// Encrypt `data` per `recipe`, producing a self-describing container.
///
/// `recipe` is read-only: the writer never mutates it, and builds the
/// output stratum structures from scratch (Design Notes: "prefer a pure
/// transformation"). If `keychain_uid` is `None`, a fresh one is generated.
///
/// On any error, no partial container is returned — the writer either
/// produces a complete, invariant-satisfying container or nothing.
pub fn encrypt(
    data: &[u8],
    recipe: &Recipe,
    registry: &EscrowRegistry,
    keychain_uid: Option<Uuid>,
) -> Result<Container, ContainerError> {
    let container_uid = Uuid::new_v4();
    let keychain_uid = keychain_uid.unwrap_or_else(Uuid::new_v4);

    let mut current_data = data.to_vec();
    let mut strata = Vec::with_capacity(recipe.data_encryption_strata.len());

    for (index, stratum_config) in recipe.data_encryption_strata.iter().enumerate() {
        let algo = stratum_config.data_encryption_algo;
        tracing::trace!(stratum = index, %algo, "encrypting data stratum");

        let dek = generate_symmetric_key(algo)
            .map_err(|e| ContainerError::from_symmetric_primitive(index, e))?;
        let cipherdict = encrypt_bytestring(&current_data, algo, &dek)
            .map_err(|e| ContainerError::from_symmetric_primitive(index, e))?;
        current_data = canonical_serialize(&cipherdict)
            .map_err(|e| ContainerError::from_symmetric_primitive(index, e))?;

        // Every key-wrap layer operates on the previous layer's bytes;
        // this must fully complete before the next data stratum begins,
        // since that stratum will encrypt `current_data`'s final bytes.
        let mut wrapped: Vec<u8> = dek.to_vec();
        for key_stratum in &stratum_config.key_encryption_strata {
            let escrow = registry.resolve(&key_stratum.key_escrow)?;
            let public_pem = escrow.get_public_key(keychain_uid, key_stratum.escrow_key_type)?;
            let public_key =
                AsymmetricPublicKey::from_pem(&public_pem, key_stratum.escrow_key_type)
                    .map_err(|e| ContainerError::from_symmetric_primitive(index, e))?;
            let key_cipherdict = asymmetric_encrypt(&wrapped, key_stratum.key_encryption_algo, &public_key)
                .map_err(|e| ContainerError::from_symmetric_primitive(index, e))?;
            wrapped = canonical_serialize(&key_cipherdict)
                .map_err(|e| ContainerError::from_symmetric_primitive(index, e))?;
        }

        let mut data_signatures = Vec::with_capacity(stratum_config.data_signatures.len());
        for signature_config in &stratum_config.data_signatures {
            let escrow = registry.resolve(&signature_config.signature_escrow)?;
            let signature_value = escrow.get_message_signature(
                keychain_uid,
                &current_data,
                signature_config.signature_key_type,
                signature_config.signature_algo,
            )?;
            data_signatures.push(SignedDataSignature {
                signature_escrow: signature_config.signature_escrow.clone(),
                signature_key_type: signature_config.signature_key_type,
                signature_algo: signature_config.signature_algo,
                signature_value,
            });
        }

        strata.push(ContainerDataEncryptionStratum {
            data_encryption_algo: algo,
            key_ciphertext: wrapped,
            key_encryption_strata: stratum_config.key_encryption_strata.clone(),
            data_signatures,
        });

        tracing::debug!(stratum = index, %algo, "data stratum sealed");

        // Drop the plaintext DEK as soon as it's been wrapped.
        drop(dek);
    }

    Ok(Container {
        container_format: CONTAINER_FORMAT.to_string(),
        container_uid,
        keychain_uid,
        data_ciphertext: current_data,
        data_encryption_strata: strata,
    })
}
