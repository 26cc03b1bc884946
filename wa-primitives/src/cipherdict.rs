//! The typed "cipherdict" — an algorithm-specific record of ciphertext plus
//! whatever IV/nonce/tag material is needed to decrypt it.

use serde::{Deserialize, Serialize};

/// Output of [`crate::symmetric::encrypt_bytestring`], and the required
/// input (besides the key) to [`crate::symmetric::decrypt_bytestring`].
///
/// A closed Rust enum standing in for the untyped "cipherdict" mapping used
/// elsewhere: the variant itself carries the algorithm tag, so a
/// `CipherDict` can never describe an algorithm/field mismatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherDict {
    AesCbc { ciphertext: Vec<u8>, iv: Vec<u8> },
    AesEax { ciphertext: Vec<u8>, nonce: Vec<u8> },
    Chacha20Poly1305 { ciphertext: Vec<u8>, nonce: Vec<u8> },
    /// Hybrid RSA-OAEP key-wrap: an ephemeral ChaCha20-Poly1305 key seals
    /// `ciphertext` (the real plaintext, of any length), and only that
    /// ephemeral key — a fixed 32 bytes — is itself RSA-OAEP-wrapped into
    /// `wrapped_key`. Textbook RSA-OAEP can only encrypt a single block
    /// smaller than the modulus (190 bytes for a 2048-bit key with
    /// SHA-256 OAEP), which a chain of key-wrap layers would exceed after
    /// the first hop; the hybrid construction keeps every hop's RSA input
    /// at exactly 32 bytes regardless of chain depth.
    RsaOaep {
        wrapped_key: Vec<u8>,
        nonce: Vec<u8>,
        ciphertext: Vec<u8>,
    },
}
