//! Container: the output tree produced by the writer and consumed by the
//! reader (spec §3).

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wa_escrow::EscrowSelector;
use wa_primitives::{AsymmetricKeyType, Signature, SignatureAlgo, SymmetricAlgo};

use crate::recipe::KeyEncryptionStratumConfig;

/// The only value this crate ever writes into `container_format`.
pub const CONTAINER_FORMAT: &str = "WA_0.1a";

/// A self-describing encrypted envelope: metadata for every stratum applied,
/// plus the innermost ciphertext.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Container {
    pub container_format: String,
    pub container_uid: Uuid,
    pub keychain_uid: Uuid,
    pub data_ciphertext: Vec<u8>,
    pub data_encryption_strata: Vec<ContainerDataEncryptionStratum>,
}

/// One stratum's recorded output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContainerDataEncryptionStratum {
    pub data_encryption_algo: SymmetricAlgo,
    /// The DEK after all of this stratum's key-wrap layers.
    pub key_ciphertext: Vec<u8>,
    /// Verbatim recipe copies (spec §9: "this spec fixes" this reading).
    pub key_encryption_strata: Vec<KeyEncryptionStratumConfig>,
    pub data_signatures: Vec<SignedDataSignature>,
}

/// A signature config augmented with the signature it produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedDataSignature {
    pub signature_escrow: EscrowSelector,
    pub signature_key_type: AsymmetricKeyType,
    pub signature_algo: SignatureAlgo,
    pub signature_value: Signature,
}
