// src/keystore/memory.rs
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rand::RngCore;
use zeroize::Zeroizing;

use super::SecureKeyStore;
use crate::aliases::{AesKey32, PlainText};
use crate::codec;
use crate::consts::KEY_LEN;
use crate::error::{CoreError, Result};

/// Process-local key store; keys are lost when the store is dropped
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: Mutex<HashMap<String, AesKey32>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, AesKey32>>> {
        self.keys
            .lock()
            .map_err(|_| CoreError::KeyUnavailable("memory key store lock poisoned".into()))
    }
}

pub(crate) fn random_key() -> AesKey32 {
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    rand::rng().fill_bytes(&mut bytes[..]);
    AesKey32::new(*bytes)
}

impl SecureKeyStore for MemoryKeyStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn contains(&self, alias: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(alias))
    }

    fn create_if_absent(&self, alias: &str) -> Result<bool> {
        let mut keys = self.lock()?;
        if keys.contains_key(alias) {
            return Ok(false);
        }
        keys.insert(alias.to_owned(), random_key());
        Ok(true)
    }

    fn delete(&self, alias: &str) -> Result<bool> {
        Ok(self.lock()?.remove(alias).is_some())
    }

    fn seal(&self, alias: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let keys = self.lock()?;
        let key = keys
            .get(alias)
            .ok_or_else(|| CoreError::KeyUnavailable(format!("no key under alias '{alias}'")))?;
        codec::seal(key, plaintext)
    }

    fn open(&self, alias: &str, sealed: &[u8]) -> Result<PlainText> {
        let keys = self.lock()?;
        let key = keys
            .get(alias)
            .ok_or_else(|| CoreError::KeyUnavailable(format!("no key under alias '{alias}'")))?;
        codec::open(key, sealed)
    }
}
