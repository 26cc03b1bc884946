//! Container reader (spec §4.4): verify, then unwrap, then decrypt — per
//! stratum, strata in reverse order.

use wa_escrow::EscrowRegistry;
use wa_primitives::{
    canonical_deserialize, decrypt_bytestring, verify, AsymmetricPublicKey, CipherDict,
};

use crate::container::Container;
use crate::error::ContainerError;

/// Recover the original plaintext from `container`.
///
/// Verification happens before any key material is requested from an
/// escrow: a tampered ciphertext is rejected up front, limiting
/// side-channel exposure to escrow operations (spec §4.4 rationale).
pub fn decrypt(container: &Container, registry: &EscrowRegistry) -> Result<Vec<u8>, ContainerError> {
    if container.container_format != crate::container::CONTAINER_FORMAT {
        return Err(ContainerError::UnknownFormat {
            found: container.container_format.clone(),
        });
    }

    let keychain_uid = container.keychain_uid;
    let mut current_data = container.data_ciphertext.clone();

    for (reverse_index, stratum) in container.data_encryption_strata.iter().enumerate().rev() {
        tracing::trace!(stratum = reverse_index, algo = %stratum.data_encryption_algo, "verifying stratum signatures");

        for signature in &stratum.data_signatures {
            let escrow = registry.resolve(&signature.signature_escrow)?;
            let public_pem = escrow.get_public_key(keychain_uid, signature.signature_key_type)?;
            let public_key = AsymmetricPublicKey::from_pem(&public_pem, signature.signature_key_type)
                .map_err(|e| ContainerError::from_signature_primitive(reverse_index, e))?;
            verify(&public_key, &current_data, &signature.signature_value, signature.signature_algo)
                .map_err(|e| ContainerError::from_signature_primitive(reverse_index, e))?;
        }

        let mut wrapped = stratum.key_ciphertext.clone();
        for key_stratum in &stratum.key_encryption_strata {
            let escrow = registry.resolve(&key_stratum.key_escrow)?;
            let cipherdict: CipherDict = canonical_deserialize(&wrapped)
                .map_err(|e| ContainerError::from_symmetric_primitive(reverse_index, e))?;
            wrapped = escrow.decrypt_with_private_key(
                keychain_uid,
                key_stratum.escrow_key_type,
                key_stratum.key_encryption_algo,
                &cipherdict,
            )?;
        }

        tracing::debug!(stratum = reverse_index, algo = %stratum.data_encryption_algo, "unwrapped stratum key");

        let data_cipherdict: CipherDict = canonical_deserialize(&current_data)
            .map_err(|e| ContainerError::from_symmetric_primitive(reverse_index, e))?;
        current_data = decrypt_bytestring(&data_cipherdict, stratum.data_encryption_algo, &wrapped)
            .map_err(|e| ContainerError::from_symmetric_primitive(reverse_index, e))?;
    }

    Ok(current_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{DataEncryptionStratumConfig, KeyEncryptionStratumConfig, Recipe, SignatureConfig};
    use crate::writer::encrypt;
    use std::sync::Arc;
    use wa_escrow::{EscrowSelector, LocalEscrow};
    use wa_primitives::{AsymmetricEncryptionAlgo, AsymmetricKeyType, SignatureAlgo, SymmetricAlgo};

    fn local_registry() -> EscrowRegistry {
        EscrowRegistry::with_local(Arc::new(LocalEscrow::new()))
    }

    #[test]
    fn wrong_format_tag_is_rejected() {
        let registry = local_registry();
        let mut container = encrypt(b"Hello", &Recipe::default(), &registry, None).unwrap();
        container.container_format = "WA_0.2".to_string();
        assert!(matches!(decrypt(&container, &registry), Err(ContainerError::UnknownFormat { .. })));
    }

    #[test]
    fn s1_single_stratum_rsa_wrap_round_trips() {
        let registry = local_registry();
        let recipe = Recipe {
            data_encryption_strata: vec![DataEncryptionStratumConfig {
                data_encryption_algo: SymmetricAlgo::AesCbc,
                key_encryption_strata: vec![KeyEncryptionStratumConfig {
                    key_escrow: EscrowSelector::LocalEscrowPlaceholder,
                    escrow_key_type: AsymmetricKeyType::Rsa,
                    key_encryption_algo: AsymmetricEncryptionAlgo::RsaOaep,
                }],
                data_signatures: vec![],
            }],
        };
        let container = encrypt(b"Hello", &recipe, &registry, None).unwrap();
        assert_eq!(decrypt(&container, &registry).unwrap(), b"Hello");
    }

    #[test]
    fn s2_unwrapped_dek_with_signature_detects_tampering() {
        let registry = local_registry();
        let recipe = Recipe {
            data_encryption_strata: vec![DataEncryptionStratumConfig {
                data_encryption_algo: SymmetricAlgo::Chacha20Poly1305,
                key_encryption_strata: vec![],
                data_signatures: vec![SignatureConfig {
                    signature_escrow: EscrowSelector::LocalEscrowPlaceholder,
                    signature_key_type: AsymmetricKeyType::Rsa,
                    signature_algo: SignatureAlgo::Pss,
                }],
            }],
        };
        let mut container = encrypt(b"Hello", &recipe, &registry, None).unwrap();
        assert_eq!(decrypt(&container, &registry).unwrap(), b"Hello");

        container.data_ciphertext[0] ^= 0xFF;
        assert!(matches!(
            decrypt(&container, &registry),
            Err(ContainerError::SignatureVerification { .. })
        ));
    }

    #[test]
    fn s3_empty_data_and_empty_strata_round_trips() {
        let registry = local_registry();
        let container = encrypt(b"", &Recipe::default(), &registry, None).unwrap();
        assert_eq!(container.data_ciphertext, Vec::<u8>::new());
        assert_eq!(decrypt(&container, &registry).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn s4_two_strata_each_with_two_key_wraps_and_a_signature() {
        let registry = local_registry();
        let stratum = |algo: SymmetricAlgo| DataEncryptionStratumConfig {
            data_encryption_algo: algo,
            key_encryption_strata: vec![
                KeyEncryptionStratumConfig {
                    key_escrow: EscrowSelector::LocalEscrowPlaceholder,
                    escrow_key_type: AsymmetricKeyType::Rsa,
                    key_encryption_algo: AsymmetricEncryptionAlgo::RsaOaep,
                },
                KeyEncryptionStratumConfig {
                    key_escrow: EscrowSelector::LocalEscrowPlaceholder,
                    escrow_key_type: AsymmetricKeyType::Rsa,
                    key_encryption_algo: AsymmetricEncryptionAlgo::RsaOaep,
                },
            ],
            data_signatures: vec![SignatureConfig {
                signature_escrow: EscrowSelector::LocalEscrowPlaceholder,
                signature_key_type: AsymmetricKeyType::Ecc,
                signature_algo: SignatureAlgo::Dss,
            }],
        };
        let recipe = Recipe {
            data_encryption_strata: vec![stratum(SymmetricAlgo::AesEax), stratum(SymmetricAlgo::AesCbc)],
        };
        let data = vec![0x42u8; 1024 * 1024];
        let container = encrypt(&data, &recipe, &registry, None).unwrap();
        assert_eq!(decrypt(&container, &registry).unwrap(), data);
    }

    #[test]
    fn s6_tampered_format_tag_is_rejected() {
        let registry = local_registry();
        let mut container = encrypt(b"Hello", &Recipe::default(), &registry, None).unwrap();
        container.container_format = "WA_0.2".to_string();
        assert!(matches!(decrypt(&container, &registry), Err(ContainerError::UnknownFormat { .. })));
    }

    #[test]
    fn tampering_a_signature_digest_is_detected() {
        let registry = local_registry();
        let recipe = Recipe {
            data_encryption_strata: vec![DataEncryptionStratumConfig {
                data_encryption_algo: SymmetricAlgo::AesCbc,
                key_encryption_strata: vec![],
                data_signatures: vec![SignatureConfig {
                    signature_escrow: EscrowSelector::LocalEscrowPlaceholder,
                    signature_key_type: AsymmetricKeyType::Dsa,
                    signature_algo: SignatureAlgo::Dss,
                }],
            }],
        };
        let mut container = encrypt(b"Hello", &recipe, &registry, None).unwrap();
        container.data_encryption_strata[0].data_signatures[0].signature_value.digest[0] ^= 1;
        assert!(matches!(
            decrypt(&container, &registry),
            Err(ContainerError::SignatureVerification { .. })
        ));
    }

    #[test]
    fn tampering_a_signature_timestamp_is_detected() {
        let registry = local_registry();
        let recipe = Recipe {
            data_encryption_strata: vec![DataEncryptionStratumConfig {
                data_encryption_algo: SymmetricAlgo::AesCbc,
                key_encryption_strata: vec![],
                data_signatures: vec![SignatureConfig {
                    signature_escrow: EscrowSelector::LocalEscrowPlaceholder,
                    signature_key_type: AsymmetricKeyType::Rsa,
                    signature_algo: SignatureAlgo::Pss,
                }],
            }],
        };
        let mut container = encrypt(b"Hello", &recipe, &registry, None).unwrap();
        container.data_encryption_strata[0].data_signatures[0]
            .signature_value
            .timestamp_utc += 1;
        assert!(matches!(
            decrypt(&container, &registry),
            Err(ContainerError::SignatureVerification { .. })
        ));
    }

    #[test]
    fn uniqueness_across_invocations() {
        let registry = local_registry();
        let recipe = Recipe::default();
        let a = encrypt(b"same", &recipe, &registry, None).unwrap();
        let b = encrypt(b"same", &recipe, &registry, None).unwrap();
        assert_ne!(a.container_uid, b.container_uid);
    }
}
