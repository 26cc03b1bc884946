//! The closed algorithm tag universe (spec §6).

use core::fmt;
use serde::{Deserialize, Serialize};

/// Symmetric data-encryption algorithm tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetricAlgo {
    AesCbc,
    AesEax,
    Chacha20Poly1305,
}

impl SymmetricAlgo {
    /// Key length in bytes required by this algorithm.
    pub fn key_len(&self) -> usize {
        match self {
            Self::AesCbc => 32,
            Self::AesEax => 32,
            Self::Chacha20Poly1305 => 32,
        }
    }
}

impl fmt::Display for SymmetricAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AesCbc => write!(f, "AES_CBC"),
            Self::AesEax => write!(f, "AES_EAX"),
            Self::Chacha20Poly1305 => write!(f, "CHACHA20_POLY1305"),
        }
    }
}

/// Kind of asymmetric keypair an escrow may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsymmetricKeyType {
    Rsa,
    Dsa,
    Ecc,
}

impl fmt::Display for AsymmetricKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa => write!(f, "RSA"),
            Self::Dsa => write!(f, "DSA"),
            Self::Ecc => write!(f, "ECC"),
        }
    }
}

/// Asymmetric encryption (key-wrap) algorithm tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsymmetricEncryptionAlgo {
    RsaOaep,
}

impl fmt::Display for AsymmetricEncryptionAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RsaOaep => write!(f, "RSA_OAEP"),
        }
    }
}

/// Asymmetric signature algorithm tags.
///
/// `Dss` covers both DSA and ECC keys: "DSS" is reused across the two
/// key types rather than split into per-curve variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgo {
    Pss,
    Dss,
}

impl fmt::Display for SignatureAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pss => write!(f, "PSS"),
            Self::Dss => write!(f, "DSS"),
        }
    }
}
