//! Canonical self-describing binary encoding (spec §6).
//!
//! MessagePack via `rmp-serde`, structured mode, so that field order and
//! integer/string encodings are fixed: a byte-identical value always
//! produces byte-identical bytes, which is load-bearing for the container
//! engine (embedded cipherdicts are re-encrypted by outer strata, and
//! signatures cover the exact bytes this function produces).

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PrimitiveError;

/// Encode `value` into its canonical binary form.
pub fn canonical_serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, PrimitiveError> {
    rmp_serde::to_vec_named(value).map_err(|e| PrimitiveError::EncodingError(e.to_string()))
}

/// Decode a value previously produced by [`canonical_serialize`].
pub fn canonical_deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PrimitiveError> {
    rmp_serde::from_slice(bytes).map_err(|e| PrimitiveError::EncodingError(e.to_string()))
}
