//! # wa-container
//!
//! The container writer and reader: the layered symmetric-encrypt +
//! asymmetric-key-wrap + signature engine. Both directions are pure
//! functions parameterised by an [`wa_escrow::EscrowRegistry`] — there is
//! no polymorphism here beyond the escrow capability set and the closed
//! algorithm dispatch in `wa-primitives`.
//!
//! No whole-container MAC is computed: integrity relies entirely on
//! per-stratum signatures plus whichever AEAD mode the recipe chose for
//! each stratum. A recipe that mixes `AES_CBC` (unauthenticated) with zero
//! signatures will decrypt tampered ciphertext without detection — this is
//! inherent to the container format this engine implements, not a bug.

mod container;
mod error;
mod reader;
mod recipe;
mod writer;

pub use container::{Container, ContainerDataEncryptionStratum, SignedDataSignature, CONTAINER_FORMAT};
pub use error::ContainerError;
pub use reader::decrypt;
pub use recipe::{DataEncryptionStratumConfig, KeyEncryptionStratumConfig, Recipe, SignatureConfig};
pub use writer::encrypt;
