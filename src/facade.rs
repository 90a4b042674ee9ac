// src/facade.rs
//! Tiered encryption facade, the public entry point for field values
//!
//! ```text
//! encrypt:  primary seal ──fail──▶ backup seal ("BACKUP:") ──fail──▶ emergency (Base64, NOT encrypted)
//!
//! decrypt:  "EMERGENCY_FALLBACK:" ─▶ Base64 decode
//!           "BACKUP:" marker      ─▶ backup tier only
//!           unmarked              ─▶ primary → backup   (recovery mode: backup → primary)
//! ```
//!
//! A token that names its tier is only ever opened by that tier. Unmarked
//! tokens are probed in the order recovery mode selects; AES-GCM
//! authentication guarantees a wrong-tier probe fails instead of producing
//! altered plaintext.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::aliases::PlainText;
use crate::backup::{BackupKeyDeriver, SystemDeviceIdentity};
use crate::config::Config;
use crate::enums::{KeystoreBackend, Tier};
use crate::error::{CoreError, Result};
use crate::keystore::{FileKeyStore, MemoryKeyStore, SecureKeyStore};
use crate::primary::PrimaryKeyProvider;
use crate::recovery::RecoveryMode;
use crate::token::{self, TokenBody};

pub struct TieredEncryptor {
    primary: PrimaryKeyProvider,
    backup: BackupKeyDeriver,
    recovery: RecoveryMode,
    emergency_count: AtomicU64,
}

impl TieredEncryptor {
    pub fn new(primary: PrimaryKeyProvider, backup: BackupKeyDeriver, recovery: RecoveryMode) -> Self {
        Self {
            primary,
            backup,
            recovery,
            emergency_count: AtomicU64::new(0),
        }
    }

    /// Wire an encryptor from config: key store backend, backup parameters and
    /// the initial recovery mode. Uses the running OS for device identity.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn SecureKeyStore> = match config.keystore.backend {
            KeystoreBackend::Memory => Arc::new(MemoryKeyStore::new()),
            KeystoreBackend::File => Arc::new(FileKeyStore::new(config.keystore.resolved_path()?)),
        };
        let primary = PrimaryKeyProvider::with_alias(store, config.keystore.alias.clone());
        let backup = BackupKeyDeriver::new(Arc::new(SystemDeviceIdentity))
            .with_label(config.backup.label.clone())
            .with_iterations(config.backup.iterations)
            .allow_degraded(config.backup.allow_degraded)
            .memoize(config.backup.memoize);
        Ok(Self::new(primary, backup, RecoveryMode::new(config.recovery.enabled)))
    }

    // ─── tiers ────────────────────────────────────────────────────────

    fn seal_primary(&self, plaintext: &[u8]) -> Result<String> {
        let key = self.primary.get_or_create_key()?;
        key.seal(plaintext).map(|sealed| token::encode_primary(&sealed))
    }

    fn seal_backup(&self, plaintext: &[u8]) -> Result<String> {
        self.backup
            .with_key(|key| key.seal(plaintext))
            .map(|sealed| token::encode_backup(&sealed))
    }

    fn open_tier(&self, tier: Tier, sealed: &[u8]) -> Result<PlainText> {
        match tier {
            Tier::Primary => self.primary.existing_key()?.open(sealed),
            Tier::Backup => self.backup.with_key(|key| key.open(sealed)),
            Tier::Emergency => Err(CoreError::Format("emergency tokens carry no ciphertext".into())),
        }
    }

    // ─── encryption ───────────────────────────────────────────────────

    /// Encrypt with the strongest tier that works; never fails.
    ///
    /// If both real tiers fail the value is stored with the emergency
    /// encoding, which is NOT encryption. Every such event is logged at
    /// `error` and counted in [`Self::emergency_encodings`]. Use
    /// [`Self::encrypt_protected`] to refuse it.
    pub fn encrypt(&self, plaintext: &str) -> String {
        self.encrypt_protected(plaintext).unwrap_or_else(|e| {
            self.emergency_count.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "all encryption tiers failed, value stored UNENCRYPTED (emergency encoding)");
            token::encode_emergency(plaintext)
        })
    }

    /// Primary, then backup; fails instead of falling back to the emergency encoding
    pub fn encrypt_protected(&self, plaintext: &str) -> Result<String> {
        let bytes = plaintext.as_bytes();
        self.seal_primary(bytes).or_else(|e| {
            warn!(error = %e, "primary tier unavailable, sealing with backup key");
            self.seal_backup(bytes)
        })
    }

    // ─── decryption ───────────────────────────────────────────────────

    pub fn decrypt(&self, token: &str) -> Result<String> {
        let plaintext = match token::parse(token)? {
            TokenBody::Emergency(plain) => plain,
            TokenBody::Backup(sealed) => self.open_tier(Tier::Backup, &sealed)?,
            TokenBody::Unmarked(sealed) => self.probe_unmarked(&sealed)?,
        };
        utf8(plaintext)
    }

    fn probe_unmarked(&self, sealed: &[u8]) -> Result<PlainText> {
        let mut first_err = None;
        let mut auth_failed = false;
        for tier in self.recovery.probe_order() {
            match self.open_tier(tier, sealed) {
                Ok(plain) => return Ok(plain),
                Err(e) => {
                    debug!(%tier, error = %e, "probe failed");
                    auth_failed |= matches!(e, CoreError::AuthenticationFailure);
                    first_err.get_or_insert(e);
                }
            }
        }
        if auth_failed {
            return Err(CoreError::AuthenticationFailure);
        }
        Err(first_err.unwrap_or(CoreError::AuthenticationFailure))
    }

    /// [`Self::decrypt`] with every failure swallowed
    pub fn try_decrypt(&self, token: &str) -> Option<String> {
        self.decrypt(token).ok()
    }

    /// Plaintext if any tier can open the token, otherwise the token unchanged.
    ///
    /// For display paths that must not crash on an unreadable value.
    pub fn decrypt_or_original(&self, token: &str) -> String {
        self.try_decrypt(token).unwrap_or_else(|| token.to_owned())
    }

    /// Structural tier of a token, without attempting decryption
    pub fn token_tier(&self, token: &str) -> Option<Tier> {
        token::parse(token).ok().map(|body| body.tier())
    }

    // ─── administration ───────────────────────────────────────────────

    pub fn set_recovery_mode(&self, enabled: bool) {
        self.recovery.set_recovery_mode(enabled);
    }

    pub fn is_recovery_mode_active(&self) -> bool {
        self.recovery.is_recovery_mode_active()
    }

    /// Shared handle to the recovery flag for administrative callers
    pub fn recovery_handle(&self) -> RecoveryMode {
        self.recovery.clone()
    }

    pub fn is_primary_key_available(&self) -> bool {
        self.primary.is_available()
    }

    /// Destructive: primary tokens sealed before the reset become unreadable
    /// by the primary tier. Gate behind explicit confirmation.
    pub fn reset_encryption_key(&self) -> bool {
        self.primary.reset_key()
    }

    /// Number of values stored with the emergency encoding by this instance
    pub fn emergency_encodings(&self) -> u64 {
        self.emergency_count.load(Ordering::Relaxed)
    }

    pub fn primary(&self) -> &PrimaryKeyProvider {
        &self.primary
    }

    pub fn backup(&self) -> &BackupKeyDeriver {
        &self.backup
    }
}

fn utf8(plaintext: PlainText) -> Result<String> {
    String::from_utf8(plaintext.expose_secret().clone())
        .map_err(|_| CoreError::Format("decrypted value is not valid UTF-8".into()))
}
