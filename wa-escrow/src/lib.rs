//! # wa-escrow
//!
//! The escrow abstraction: a small capability trait ([`Escrow`]) owning
//! asymmetric keypairs keyed by `(keychain_uid, key_type)`, a built-in
//! in-process implementation ([`LocalEscrow`]), and a registry
//! ([`EscrowRegistry`]) mapping a recipe's escrow selectors to concrete
//! implementations.

mod error;
mod escrow;
mod local;
mod registry;

pub use error::EscrowError;
pub use escrow::Escrow;
pub use local::LocalEscrow;
pub use registry::{EscrowRegistry, EscrowSelector};
