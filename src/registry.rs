//! Algorithm registry
//!
//! Maps canonical algorithm ids to identity constructors. Adding a new
//! signature family means registering one more constructor; dispatch
//! logic never changes.

use std::collections::BTreeMap;

use crate::identity::{openpgp, EcdsaIdentity, Identity, PkcsIdentity};

/// Constructor for an empty identity of one algorithm family
pub type Constructor = fn() -> Box<dyn Identity>;

/// Registry of identity constructors, keyed by canonical algorithm id.
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, Constructor>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `id` with a constructor.
    ///
    /// Returns `false` without overwriting when `id` is already
    /// registered.
    pub fn register(&mut self, id: &str, constructor: Constructor) -> bool {
        if self.factories.contains_key(id) {
            return false;
        }
        self.factories.insert(id.to_owned(), constructor);
        true
    }

    /// Construct a fresh, empty identity for `id`.
    pub fn create(&self, id: &str) -> Option<Box<dyn Identity>> {
        self.factories.get(id).map(|constructor| constructor())
    }
}

/// Build a registry populated with every supported algorithm family.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();

    registry.register("ecdsa", || Box::new(EcdsaIdentity::new()));
    registry.register("pkcs", || Box::new(PkcsIdentity::new()));

    // "openpgp" without a qualifier defaults to the RSA scheme
    registry.register("openpgp", || Box::new(openpgp::RsaIdentity::new()));
    registry.register("openpgp:rsa", || Box::new(openpgp::RsaIdentity::new()));
    registry.register("openpgp:dsa", || Box::new(openpgp::DsaIdentity::new()));
    registry.register("openpgp:ecdsa", || Box::new(openpgp::EcdsaIdentity::new()));
    registry.register("openpgp:eddsa", || Box::new(openpgp::EddsaIdentity::new()));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo;

    #[test]
    fn test_default_registry_covers_supported_set() {
        let registry = default_registry();
        for id in algo::SUPPORTED {
            assert!(registry.create(id).is_some(), "missing constructor: {id}");
        }
    }

    #[test]
    fn test_create_unknown_id() {
        assert!(default_registry().create("rot13").is_none());
    }

    #[test]
    fn test_register_refuses_duplicates() {
        let mut registry = Registry::new();
        assert!(registry.register("ecdsa", || Box::new(EcdsaIdentity::new())));
        assert!(!registry.register("ecdsa", || Box::new(PkcsIdentity::new())));

        // the original constructor stays in place
        let identity = registry.create("ecdsa").unwrap();
        assert_eq!(identity.scheme(), "SHA-256");
    }

    #[test]
    fn test_created_identities_are_empty() {
        let registry = default_registry();
        let identity = registry.create("openpgp:eddsa").unwrap();
        assert!(matches!(
            identity
                .sign(b"msg", std::path::Path::new("/nonexistent.sig"))
                .unwrap_err(),
            crate::error::Error::NoPrivateKey
        ));
    }
}
