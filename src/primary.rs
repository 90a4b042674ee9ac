// src/primary.rs
//! Primary tier: a key bound to the secure key store
//!
//! The provider never sees key bytes: it holds an alias and asks the store to
//! seal or open on its behalf.

use std::sync::Arc;

use tracing::{info, warn};

use crate::aliases::PlainText;
use crate::consts::DEFAULT_PRIMARY_KEY_ALIAS;
use crate::error::{CoreError, Result};
use crate::keystore::SecureKeyStore;

/// Opaque handle to the primary key; valid until the key is reset
pub struct PrimaryKey {
    store: Arc<dyn SecureKeyStore>,
    alias: String,
}

impl PrimaryKey {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.store.seal(&self.alias, plaintext)
    }

    pub fn open(&self, sealed: &[u8]) -> Result<PlainText> {
        self.store.open(&self.alias, sealed)
    }
}

impl std::fmt::Debug for PrimaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryKey")
            .field("alias", &self.alias)
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

pub struct PrimaryKeyProvider {
    store: Arc<dyn SecureKeyStore>,
    alias: String,
}

impl PrimaryKeyProvider {
    pub fn new(store: Arc<dyn SecureKeyStore>) -> Self {
        Self::with_alias(store, DEFAULT_PRIMARY_KEY_ALIAS)
    }

    pub fn with_alias(store: Arc<dyn SecureKeyStore>, alias: impl Into<String>) -> Self {
        Self {
            store,
            alias: alias.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    fn handle(&self) -> PrimaryKey {
        PrimaryKey {
            store: Arc::clone(&self.store),
            alias: self.alias.clone(),
        }
    }

    /// Look up the aliased key, generating it on first use
    pub fn get_or_create_key(&self) -> Result<PrimaryKey> {
        if self.store.create_if_absent(&self.alias)? {
            info!(alias = %self.alias, backend = self.store.backend_name(), "generated primary key");
        }
        Ok(self.handle())
    }

    /// Handle to the key only if it already exists; never generates one
    pub fn existing_key(&self) -> Result<PrimaryKey> {
        if self.store.contains(&self.alias)? {
            Ok(self.handle())
        } else {
            Err(CoreError::KeyUnavailable(format!(
                "no primary key under alias '{}'",
                self.alias
            )))
        }
    }

    /// Delete the aliased key.
    ///
    /// Every primary-tier token sealed before the reset becomes permanently
    /// unreadable by this tier. Returns `false` if no key existed.
    pub fn reset_key(&self) -> bool {
        match self.store.delete(&self.alias) {
            Ok(true) => {
                warn!(alias = %self.alias, "primary key deleted");
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(alias = %self.alias, error = %e, "primary key reset failed");
                false
            }
        }
    }

    /// Non-failing probe for diagnostics
    pub fn is_available(&self) -> bool {
        match self.store.contains(&self.alias) {
            Ok(present) => present,
            Err(e) => {
                warn!(error = %e, "secure key store probe failed");
                false
            }
        }
    }
}
