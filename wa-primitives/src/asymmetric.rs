//! Asymmetric keypairs: generation, PEM round-trip, and RSA-OAEP key-wrap
//! encryption (spec §4.1).

use chacha20poly1305::{
    aead::{Aead, KeyInit as ChaChaKeyInit, Payload},
    ChaCha20Poly1305, Nonce as ChaChaNonce,
};
use getrandom::getrandom;
use p256::ecdsa::{SigningKey as EccSigningKey, VerifyingKey as EccVerifyingKey};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand_core::OsRng;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::algo::{AsymmetricEncryptionAlgo, AsymmetricKeyType};
use crate::cipherdict::CipherDict;
use crate::error::PrimitiveError;

const RSA_KEY_BITS: usize = 2048;
const DSA_PARAMS: dsa::KeySize = dsa::KeySize::DSA_2048_256;
/// Ephemeral DEM key length for the hybrid RSA-OAEP key-wrap (ChaCha20-Poly1305 key size).
const EPHEMERAL_KEY_LEN: usize = 32;
const EPHEMERAL_NONCE_LEN: usize = 12;

/// An asymmetric keypair, dispatched by [`AsymmetricKeyType`].
pub enum AsymmetricKeypair {
    Rsa(Box<RsaPrivateKey>),
    Dsa(Box<dsa::SigningKey>),
    Ecc(Box<EccSigningKey>),
}

/// The public half of an [`AsymmetricKeypair`].
#[derive(Clone)]
pub enum AsymmetricPublicKey {
    Rsa(RsaPublicKey),
    Dsa(dsa::VerifyingKey),
    Ecc(EccVerifyingKey),
}

impl AsymmetricKeypair {
    /// Generate a fresh keypair of the given type.
    pub fn generate(key_type: AsymmetricKeyType) -> Result<Self, PrimitiveError> {
        match key_type {
            AsymmetricKeyType::Rsa => {
                let key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
                    .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;
                Ok(Self::Rsa(Box::new(key)))
            }
            AsymmetricKeyType::Dsa => {
                let components = dsa::Components::generate(&mut OsRng, DSA_PARAMS);
                let key = dsa::SigningKey::generate(&mut OsRng, components);
                Ok(Self::Dsa(Box::new(key)))
            }
            AsymmetricKeyType::Ecc => {
                let key = EccSigningKey::random(&mut OsRng);
                Ok(Self::Ecc(Box::new(key)))
            }
        }
    }

    pub fn key_type(&self) -> AsymmetricKeyType {
        match self {
            Self::Rsa(_) => AsymmetricKeyType::Rsa,
            Self::Dsa(_) => AsymmetricKeyType::Dsa,
            Self::Ecc(_) => AsymmetricKeyType::Ecc,
        }
    }

    pub fn public_key(&self) -> AsymmetricPublicKey {
        match self {
            Self::Rsa(sk) => AsymmetricPublicKey::Rsa(sk.to_public_key()),
            Self::Dsa(sk) => AsymmetricPublicKey::Dsa(sk.verifying_key().clone()),
            Self::Ecc(sk) => AsymmetricPublicKey::Ecc(sk.verifying_key().clone()),
        }
    }

    /// PEM-encode the private key material. Zeroized on drop.
    pub fn to_pem(&self) -> Result<Zeroizing<String>, PrimitiveError> {
        let pem = match self {
            Self::Rsa(sk) => sk
                .to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?,
            Self::Dsa(sk) => sk
                .to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?,
            Self::Ecc(sk) => sk
                .to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?,
        };
        Ok(pem)
    }

    pub fn from_pem(pem: &str, key_type: AsymmetricKeyType) -> Result<Self, PrimitiveError> {
        match key_type {
            AsymmetricKeyType::Rsa => {
                let key = RsaPrivateKey::from_pkcs8_pem(pem)
                    .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;
                Ok(Self::Rsa(Box::new(key)))
            }
            AsymmetricKeyType::Dsa => {
                let key = dsa::SigningKey::from_pkcs8_pem(pem)
                    .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;
                Ok(Self::Dsa(Box::new(key)))
            }
            AsymmetricKeyType::Ecc => {
                let key = EccSigningKey::from_pkcs8_pem(pem)
                    .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;
                Ok(Self::Ecc(Box::new(key)))
            }
        }
    }
}

impl AsymmetricPublicKey {
    pub fn key_type(&self) -> AsymmetricKeyType {
        match self {
            Self::Rsa(_) => AsymmetricKeyType::Rsa,
            Self::Dsa(_) => AsymmetricKeyType::Dsa,
            Self::Ecc(_) => AsymmetricKeyType::Ecc,
        }
    }

    pub fn to_pem(&self) -> Result<String, PrimitiveError> {
        match self {
            Self::Rsa(pk) => pk
                .to_public_key_pem(LineEnding::LF)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string())),
            Self::Dsa(pk) => pk
                .to_public_key_pem(LineEnding::LF)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string())),
            Self::Ecc(pk) => pk
                .to_public_key_pem(LineEnding::LF)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string())),
        }
    }

    pub fn from_pem(pem: &str, key_type: AsymmetricKeyType) -> Result<Self, PrimitiveError> {
        match key_type {
            AsymmetricKeyType::Rsa => RsaPublicKey::from_public_key_pem(pem)
                .map(Self::Rsa)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string())),
            AsymmetricKeyType::Dsa => dsa::VerifyingKey::from_public_key_pem(pem)
                .map(Self::Dsa)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string())),
            AsymmetricKeyType::Ecc => EccVerifyingKey::from_public_key_pem(pem)
                .map(Self::Ecc)
                .map_err(|e| PrimitiveError::EncodingError(e.to_string())),
        }
    }
}

/// Wrap `plaintext` (typically a DEK, or a previously-wrapped DEK) under
/// `public_key` using `algo`. Only `RSA_OAEP` is a defined algorithm in the
/// closed tag universe, and it only applies to RSA keys.
///
/// Implemented as hybrid encryption, not textbook single-block RSA: a fresh
/// ephemeral ChaCha20-Poly1305 key seals `plaintext` of any length, and only
/// that 32-byte ephemeral key is RSA-OAEP-wrapped. This keeps each key-wrap
/// layer's RSA input at a fixed 32 bytes, so chains of several
/// `key_encryption_strata` (each one's plaintext being the previous layer's
/// whole serialized cipherdict) never exceed RSA-OAEP's plaintext-size
/// limit.
pub fn asymmetric_encrypt(
    plaintext: &[u8],
    algo: AsymmetricEncryptionAlgo,
    public_key: &AsymmetricPublicKey,
) -> Result<CipherDict, PrimitiveError> {
    match (algo, public_key) {
        (AsymmetricEncryptionAlgo::RsaOaep, AsymmetricPublicKey::Rsa(pk)) => {
            let mut ephemeral_key = Zeroizing::new(vec![0u8; EPHEMERAL_KEY_LEN]);
            getrandom(&mut ephemeral_key).map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;
            let mut nonce = vec![0u8; EPHEMERAL_NONCE_LEN];
            getrandom(&mut nonce).map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;

            let cipher = ChaCha20Poly1305::new(ephemeral_key.as_slice().into());
            let ciphertext = cipher
                .encrypt(ChaChaNonce::from_slice(&nonce), Payload { msg: plaintext, aad: &[] })
                .map_err(|_| PrimitiveError::EncodingError("hybrid RSA-OAEP seal failed".into()))?;

            let wrapped_key = pk
                .encrypt(&mut OsRng, Oaep::new::<sha2::Sha256>(), ephemeral_key.as_slice())
                .map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;

            Ok(CipherDict::RsaOaep { wrapped_key, nonce, ciphertext })
        }
        _ => Err(PrimitiveError::AlgorithmNotSupported(format!(
            "{} with a {} key",
            algo,
            public_key.key_type()
        ))),
    }
}

/// Unwrap a cipherdict produced by [`asymmetric_encrypt`].
pub fn asymmetric_decrypt(
    cipherdict: &CipherDict,
    algo: AsymmetricEncryptionAlgo,
    keypair: &AsymmetricKeypair,
) -> Result<Vec<u8>, PrimitiveError> {
    match (algo, keypair, cipherdict) {
        (
            AsymmetricEncryptionAlgo::RsaOaep,
            AsymmetricKeypair::Rsa(sk),
            CipherDict::RsaOaep { wrapped_key, nonce, ciphertext },
        ) => {
            let ephemeral_key = Zeroizing::new(
                sk.decrypt(Oaep::new::<sha2::Sha256>(), wrapped_key)
                    .map_err(|_| PrimitiveError::DecryptionError("RSA-OAEP key unwrap failed".into()))?,
            );
            let cipher = ChaCha20Poly1305::new(ephemeral_key.as_slice().into());
            cipher
                .decrypt(ChaChaNonce::from_slice(nonce), Payload { msg: ciphertext.as_slice(), aad: &[] })
                .map_err(|_| PrimitiveError::DecryptionError("hybrid RSA-OAEP unwrap failed".into()))
        }
        _ => Err(PrimitiveError::AlgorithmNotSupported(format!(
            "{} with a {} key",
            algo,
            keypair.key_type()
        ))),
    }
}
