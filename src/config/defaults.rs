// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{BackupSection, ExportSection, KeystoreSection, LoggingSection};
use crate::consts::{BACKUP_KDF_ITERATIONS, DEFAULT_BACKUP_KEY_LABEL, DEFAULT_PRIMARY_KEY_ALIAS};
use crate::enums::{ExportMode, KeystoreBackend};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// `<data_local_dir>/credential-vault/keys`, or `./.credential-vault/keys` when
/// the platform reports no data directory
pub fn default_keystore_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("credential-vault"))
        .unwrap_or_else(|| PathBuf::from(".credential-vault"))
        .join("keys")
}

impl Default for KeystoreSection {
    fn default() -> Self {
        Self {
            backend: KeystoreBackend::File,
            path: None,
            alias: DEFAULT_PRIMARY_KEY_ALIAS.into(),
        }
    }
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            label: DEFAULT_BACKUP_KEY_LABEL.into(),
            iterations: BACKUP_KDF_ITERATIONS,
            allow_degraded: true,
            memoize: true,
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            mode: ExportMode::Transport,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

