//! Recipe: the input configuration driving a container's strata (spec §3).

use serde::{Deserialize, Serialize};
use wa_escrow::EscrowSelector;
use wa_primitives::{AsymmetricEncryptionAlgo, AsymmetricKeyType, SignatureAlgo, SymmetricAlgo};

/// Ordered sequence of data-encryption strata to apply, innermost first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Recipe {
    pub data_encryption_strata: Vec<DataEncryptionStratumConfig>,
}

/// One symmetric-encryption layer: its algorithm, the key-wrap chain
/// protecting its DEK, and the signatures covering its ciphertext.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataEncryptionStratumConfig {
    pub data_encryption_algo: SymmetricAlgo,
    pub key_encryption_strata: Vec<KeyEncryptionStratumConfig>,
    pub data_signatures: Vec<SignatureConfig>,
}

/// One asymmetric key-wrap layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyEncryptionStratumConfig {
    pub key_escrow: EscrowSelector,
    pub escrow_key_type: AsymmetricKeyType,
    pub key_encryption_algo: AsymmetricEncryptionAlgo,
}

/// One signature policy entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignatureConfig {
    pub signature_escrow: EscrowSelector,
    pub signature_key_type: AsymmetricKeyType,
    pub signature_algo: SignatureAlgo,
}
