//! # wa-primitives
//!
//! Uniform interface to the cryptographic primitives the container engine
//! composes: symmetric encrypt/decrypt, asymmetric key generation and
//! encrypt/decrypt, sign/verify, PEM encode/decode, and the canonical
//! binary encoding used to embed cipherdicts inside outer ciphertext
//! streams.
//!
//! This crate does not know about containers, recipes, or escrows — it is
//! the "provided by a cryptography library" collaborator the engine builds
//! on (spec §1).

mod algo;
mod asymmetric;
mod canonical;
mod cipherdict;
mod error;
mod signature;
mod symmetric;

pub use algo::{AsymmetricEncryptionAlgo, AsymmetricKeyType, SignatureAlgo, SymmetricAlgo};
pub use asymmetric::{asymmetric_decrypt, asymmetric_encrypt, AsymmetricKeypair, AsymmetricPublicKey};
pub use canonical::{canonical_deserialize, canonical_serialize};
pub use cipherdict::CipherDict;
pub use error::PrimitiveError;
pub use signature::{default_signature_algo, sign, verify, Signature};
pub use symmetric::{decrypt_bytestring, encrypt_bytestring, generate_symmetric_key};
