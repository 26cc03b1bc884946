//! Symmetric encrypt/decrypt and fresh-key generation (spec §4.1).

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chacha20poly1305::{
    aead::{Aead, KeyInit as ChaChaKeyInit, Payload},
    ChaCha20Poly1305, Nonce as ChaChaNonce,
};
use eax::{
    aead::{Aead as EaxAead, KeyInit as EaxKeyInit},
    Eax,
};
use getrandom::getrandom;
use zeroize::Zeroizing;

use crate::algo::SymmetricAlgo;
use crate::cipherdict::CipherDict;
use crate::error::PrimitiveError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256Eax = Eax<Aes256>;

const AES_CBC_IV_LEN: usize = 16;
const AES_EAX_NONCE_LEN: usize = 16;
const CHACHA_NONCE_LEN: usize = 12;

/// Generate a fresh random symmetric key sized for `algo`.
///
/// Returned in a [`Zeroizing`] buffer: the caller (the container writer)
/// must not let the key outlive the stratum it protects.
pub fn generate_symmetric_key(algo: SymmetricAlgo) -> Result<Zeroizing<Vec<u8>>, PrimitiveError> {
    let mut key = vec![0u8; algo.key_len()];
    getrandom(&mut key).map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;
    Ok(Zeroizing::new(key))
}

fn random_bytes(len: usize) -> Result<Vec<u8>, PrimitiveError> {
    let mut buf = vec![0u8; len];
    getrandom(&mut buf).map_err(|e| PrimitiveError::EncodingError(e.to_string()))?;
    Ok(buf)
}

/// Encrypt `plaintext` under `key` using `algo`, generating fresh IV/nonce
/// material internally. The returned cipherdict contains everything needed
/// to decrypt except the key itself.
pub fn encrypt_bytestring(
    plaintext: &[u8],
    algo: SymmetricAlgo,
    key: &[u8],
) -> Result<CipherDict, PrimitiveError> {
    if key.len() != algo.key_len() {
        return Err(PrimitiveError::EncodingError(format!(
            "expected a {}-byte key for {}, got {}",
            algo.key_len(),
            algo,
            key.len()
        )));
    }

    match algo {
        SymmetricAlgo::AesCbc => {
            let iv = random_bytes(AES_CBC_IV_LEN)?;
            let ciphertext = Aes256CbcEnc::new(key.into(), iv.as_slice().into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
            Ok(CipherDict::AesCbc { ciphertext, iv })
        }
        SymmetricAlgo::AesEax => {
            let nonce = random_bytes(AES_EAX_NONCE_LEN)?;
            let cipher = Aes256Eax::new(key.into());
            let ciphertext = cipher
                .encrypt(nonce.as_slice().into(), plaintext)
                .map_err(|_| PrimitiveError::EncodingError("AES-EAX seal failed".into()))?;
            Ok(CipherDict::AesEax { ciphertext, nonce })
        }
        SymmetricAlgo::Chacha20Poly1305 => {
            let nonce = random_bytes(CHACHA_NONCE_LEN)?;
            let cipher = ChaCha20Poly1305::new(key.into());
            let ciphertext = cipher
                .encrypt(
                    ChaChaNonce::from_slice(&nonce),
                    Payload { msg: plaintext, aad: &[] },
                )
                .map_err(|_| PrimitiveError::EncodingError("ChaCha20-Poly1305 seal failed".into()))?;
            Ok(CipherDict::Chacha20Poly1305 { ciphertext, nonce })
        }
    }
}

/// Decrypt a cipherdict produced by [`encrypt_bytestring`]. Fails with
/// [`PrimitiveError::DecryptionError`] on any authentication or padding
/// failure.
pub fn decrypt_bytestring(
    cipherdict: &CipherDict,
    algo: SymmetricAlgo,
    key: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    if key.len() != algo.key_len() {
        return Err(PrimitiveError::DecryptionError(format!(
            "expected a {}-byte key for {}, got {}",
            algo.key_len(),
            algo,
            key.len()
        )));
    }

    match (cipherdict, algo) {
        (CipherDict::AesCbc { ciphertext, iv }, SymmetricAlgo::AesCbc) => {
            Aes256CbcDec::new(key.into(), iv.as_slice().into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| PrimitiveError::DecryptionError("AES-CBC padding check failed".into()))
        }
        (CipherDict::AesEax { ciphertext, nonce }, SymmetricAlgo::AesEax) => {
            let cipher = Aes256Eax::new(key.into());
            cipher
                .decrypt(nonce.as_slice().into(), ciphertext.as_slice())
                .map_err(|_| PrimitiveError::DecryptionError("AES-EAX authentication failed".into()))
        }
        (CipherDict::Chacha20Poly1305 { ciphertext, nonce }, SymmetricAlgo::Chacha20Poly1305) => {
            let cipher = ChaCha20Poly1305::new(key.into());
            cipher
                .decrypt(
                    ChaChaNonce::from_slice(nonce),
                    Payload { msg: ciphertext, aad: &[] },
                )
                .map_err(|_| {
                    PrimitiveError::DecryptionError("ChaCha20-Poly1305 authentication failed".into())
                })
        }
        (_, other) => Err(PrimitiveError::AlgorithmNotSupported(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_symmetric_algo() {
        for algo in [
            SymmetricAlgo::AesCbc,
            SymmetricAlgo::AesEax,
            SymmetricAlgo::Chacha20Poly1305,
        ] {
            let key = generate_symmetric_key(algo).unwrap();
            let cipherdict = encrypt_bytestring(b"the quick brown fox", algo, &key).unwrap();
            let plaintext = decrypt_bytestring(&cipherdict, algo, &key).unwrap();
            assert_eq!(plaintext, b"the quick brown fox");
        }
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let algo = SymmetricAlgo::Chacha20Poly1305;
        let key = generate_symmetric_key(algo).unwrap();
        let other_key = generate_symmetric_key(algo).unwrap();
        let cipherdict = encrypt_bytestring(b"secret", algo, &key).unwrap();
        assert!(decrypt_bytestring(&cipherdict, algo, &other_key).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails_authenticated_modes() {
        for algo in [SymmetricAlgo::AesEax, SymmetricAlgo::Chacha20Poly1305] {
            let key = generate_symmetric_key(algo).unwrap();
            let mut cipherdict = encrypt_bytestring(b"secret", algo, &key).unwrap();
            match &mut cipherdict {
                CipherDict::AesEax { ciphertext, .. }
                | CipherDict::Chacha20Poly1305 { ciphertext, .. } => {
                    ciphertext[0] ^= 0xFF;
                }
                CipherDict::AesCbc { .. } => unreachable!(),
            }
            assert!(decrypt_bytestring(&cipherdict, algo, &key).is_err());
        }
    }

    #[test]
    fn distinct_encryptions_use_distinct_iv_or_nonce() {
        let algo = SymmetricAlgo::AesCbc;
        let key = generate_symmetric_key(algo).unwrap();
        let CipherDict::AesCbc { iv: iv1, .. } = encrypt_bytestring(b"x", algo, &key).unwrap() else {
            unreachable!()
        };
        let CipherDict::AesCbc { iv: iv2, .. } = encrypt_bytestring(b"x", algo, &key).unwrap() else {
            unreachable!()
        };
        assert_ne!(iv1, iv2);
    }
}
