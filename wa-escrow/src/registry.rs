//! Escrow selector + registry (spec §4.2, Design Notes).
//!
//! Recipes name escrows by an [`EscrowSelector`] rather than holding a
//! trait object directly, so a `Recipe` stays plain data. The registry
//! resolves selectors to concrete escrows, and — per the Design Notes —
//! does so eagerly at recipe-validation time rather than mid-encryption.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EscrowError;
use crate::escrow::Escrow;

/// Which escrow a stratum's key-wrap or signature step should use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowSelector {
    /// The sentinel selecting the built-in in-process [`crate::LocalEscrow`].
    LocalEscrowPlaceholder,
    /// A named external escrow, resolved through the registry. No remote
    /// transport is implemented in this workspace (spec §1): a recipe using
    /// this variant will fail to resolve unless the caller registered a
    /// same-named escrow explicitly (e.g. for testing).
    Named(String),
}

/// Maps [`EscrowSelector`]s to concrete [`Escrow`] implementations.
pub struct EscrowRegistry {
    local: Arc<dyn Escrow>,
    named: HashMap<String, Arc<dyn Escrow>>,
}

impl EscrowRegistry {
    /// A registry with only the local escrow bound.
    pub fn with_local(local: Arc<dyn Escrow>) -> Self {
        Self {
            local,
            named: HashMap::new(),
        }
    }

    /// Bind a named external escrow selector to a concrete implementation.
    pub fn register(&mut self, name: impl Into<String>, escrow: Arc<dyn Escrow>) {
        self.named.insert(name.into(), escrow);
    }

    /// Resolve a selector to its escrow, or fail with
    /// [`EscrowError::EscrowNotAvailable`].
    pub fn resolve(&self, selector: &EscrowSelector) -> Result<Arc<dyn Escrow>, EscrowError> {
        match selector {
            EscrowSelector::LocalEscrowPlaceholder => Ok(Arc::clone(&self.local)),
            EscrowSelector::Named(name) => self
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| EscrowError::EscrowNotAvailable(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalEscrow;

    #[test]
    fn local_placeholder_resolves() {
        let registry = EscrowRegistry::with_local(Arc::new(LocalEscrow::new()));
        assert!(registry.resolve(&EscrowSelector::LocalEscrowPlaceholder).is_ok());
    }

    #[test]
    fn unknown_named_selector_fails() {
        let registry = EscrowRegistry::with_local(Arc::new(LocalEscrow::new()));
        let result = registry.resolve(&EscrowSelector::Named("remote-escrow".into()));
        assert!(matches!(result, Err(EscrowError::EscrowNotAvailable(_))));
    }

    #[test]
    fn registered_named_selector_resolves() {
        let mut registry = EscrowRegistry::with_local(Arc::new(LocalEscrow::new()));
        registry.register("backup-escrow", Arc::new(LocalEscrow::new()));
        assert!(registry.resolve(&EscrowSelector::Named("backup-escrow".into())).is_ok());
    }
}
