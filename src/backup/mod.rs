// src/backup/mod.rs
//! Backup tier: a key reconstructed from device attributes
//!
//! Nothing is stored: the same device always derives the same key.
//!
//! ```text
//! identifier = "{fingerprint}:{serial}"
//! salt       = SHA-256(identifier)
//! key        = PBKDF2-HMAC-SHA1(label, salt, 10_000, 32 bytes)
//! ```
//!
//! When the attributes cannot be read the deriver falls back to
//! `SHA-256(label ‖ fragments...)`. That key is weaker and is tagged
//! [`KeyStrength::Degraded`]; availability wins over strength unless
//! `allow_degraded` is off.

mod device;

pub use device::{DeviceAttributes, DeviceIdentity, StaticDeviceIdentity, SystemDeviceIdentity};

use std::sync::{Arc, OnceLock};

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::aliases::{AesKey32, PlainText};
use crate::codec;
use crate::consts::{BACKUP_KDF_ITERATIONS, DEFAULT_BACKUP_KEY_LABEL, KEY_LEN};
use crate::enums::KeyStrength;
use crate::error::{CoreError, Result};

/// Derived backup key bytes, zeroized on drop
pub struct BackupKey {
    key: AesKey32,
    strength: KeyStrength,
}

impl BackupKey {
    pub fn strength(&self) -> KeyStrength {
        self.strength
    }

    pub fn expose_secret(&self) -> &[u8; KEY_LEN] {
        self.key.expose_secret()
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        codec::seal(&self.key, plaintext)
    }

    pub fn open(&self, sealed: &[u8]) -> Result<PlainText> {
        codec::open(&self.key, sealed)
    }
}

impl std::fmt::Debug for BackupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupKey")
            .field("strength", &self.strength)
            .finish_non_exhaustive()
    }
}

pub struct BackupKeyDeriver {
    identity: Arc<dyn DeviceIdentity>,
    label: String,
    iterations: u32,
    allow_degraded: bool,
    memoize: bool,
    cache: OnceLock<BackupKey>,
}

impl BackupKeyDeriver {
    pub fn new(identity: Arc<dyn DeviceIdentity>) -> Self {
        Self {
            identity,
            label: DEFAULT_BACKUP_KEY_LABEL.to_owned(),
            iterations: BACKUP_KDF_ITERATIONS,
            allow_degraded: true,
            memoize: true,
            cache: OnceLock::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Refuse the weaker derivation with [`CoreError::DerivationDegraded`]
    pub fn allow_degraded(mut self, allow: bool) -> Self {
        self.allow_degraded = allow;
        self
    }

    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Run the full derivation. PBKDF2 work is done on every call.
    pub fn derive_key(&self) -> Result<BackupKey> {
        match self.identity.stable_attributes() {
            Ok(attributes) => {
                let salt = Sha256::digest(attributes.identifier().as_bytes());
                let mut out = Zeroizing::new([0u8; KEY_LEN]);
                pbkdf2_hmac::<Sha1>(self.label.as_bytes(), &salt, self.iterations, &mut out[..]);
                debug!(iterations = self.iterations, "derived backup key");
                Ok(BackupKey {
                    key: AesKey32::new(*out),
                    strength: KeyStrength::Full,
                })
            }
            Err(e) if self.allow_degraded => {
                warn!(error = %e, "device attributes unreadable, using degraded backup key");
                Ok(self.degraded_key())
            }
            Err(e) => Err(CoreError::DerivationDegraded(e.to_string())),
        }
    }

    fn degraded_key(&self) -> BackupKey {
        let mut hasher = Sha256::new();
        hasher.update(self.label.as_bytes());
        for fragment in self.identity.id_fragments() {
            hasher.update(fragment.as_bytes());
        }
        let mut out = Zeroizing::new([0u8; KEY_LEN]);
        out.copy_from_slice(&hasher.finalize());
        BackupKey {
            key: AesKey32::new(*out),
            strength: KeyStrength::Degraded,
        }
    }

    /// Run `f` with the backup key, deriving it at most once when memoizing
    pub fn with_key<R>(&self, f: impl FnOnce(&BackupKey) -> Result<R>) -> Result<R> {
        if !self.memoize {
            let key = self.derive_key()?;
            return f(&key);
        }
        if let Some(key) = self.cache.get() {
            return f(key);
        }
        let derived = self.derive_key()?;
        f(self.cache.get_or_init(|| derived))
    }
}
