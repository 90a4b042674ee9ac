// src/keystore/mod.rs
//! Secure key storage
//!
//! A store owns the raw key bytes and runs the cipher itself, so callers only
//! ever hold an alias. Platform keychains plug in behind [`SecureKeyStore`];
//! the crate ships an in-memory store and a directory-backed store.

mod file;
mod memory;

pub use file::FileKeyStore;
pub use memory::MemoryKeyStore;

use crate::aliases::PlainText;
use crate::error::Result;

pub trait SecureKeyStore: Send + Sync {
    /// Short name for diagnostics ("memory", "file", ...)
    fn backend_name(&self) -> &'static str;

    fn contains(&self, alias: &str) -> Result<bool>;

    /// Generate an AES-256 key (GCM, no padding) under `alias` unless one exists.
    ///
    /// Returns `true` when a new key was created.
    fn create_if_absent(&self, alias: &str) -> Result<bool>;

    /// Returns `false` when no key existed
    fn delete(&self, alias: &str) -> Result<bool>;

    fn seal(&self, alias: &str, plaintext: &[u8]) -> Result<Vec<u8>>;

    fn open(&self, alias: &str, sealed: &[u8]) -> Result<PlainText>;
}
