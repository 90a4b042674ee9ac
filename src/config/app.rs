// src/config/app.rs
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::warn;

use super::defaults::default_keystore_dir;
use crate::consts::DEFAULT_CONFIG_FILE;
use crate::enums::{ExportMode, KeystoreBackend};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keystore: KeystoreSection,
    pub backup: BackupSection,
    pub recovery: RecoverySection,
    pub export: ExportSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeystoreSection {
    pub backend: KeystoreBackend,
    /// Directory of the file backend; platform data dir when unset
    pub path: Option<PathBuf>,
    pub alias: String,
}

impl KeystoreSection {
    pub fn resolved_path(&self) -> Result<PathBuf> {
        let path = self.path.clone().unwrap_or_else(default_keystore_dir);
        if path.as_os_str().is_empty() {
            return Err(CoreError::Config("keystore.path must not be empty".into()));
        }
        Ok(path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupSection {
    pub label: String,
    pub iterations: u32,
    pub allow_degraded: bool,
    pub memoize: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecoverySection {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub mode: ExportMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub filter: String,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut conf: Config =
            toml::from_str(text).map_err(|e| CoreError::Config(format!("invalid TOML: {e}")))?;
        conf.validate()?;
        conf.apply_env_overrides();
        Ok(conf)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.keystore.alias.trim().is_empty() {
            return Err(CoreError::Config("keystore.alias must not be empty".into()));
        }
        if self.backup.label.is_empty() {
            return Err(CoreError::Config("backup.label must not be empty".into()));
        }
        if self.backup.iterations == 0 {
            return Err(CoreError::Config("backup.iterations must be at least 1".into()));
        }
        Ok(())
    }

    /// `CREDVAULT_RECOVERY_MODE=1|true|on` forces recovery mode at startup
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("CREDVAULT_RECOVERY_MODE") {
            self.recovery.enabled = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global config, loaded once; falls back to defaults if missing or invalid
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path =
            std::env::var("CREDVAULT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        if Path::new(&config_path).exists() {
            match Config::from_path(&config_path) {
                Ok(conf) => return conf,
                Err(e) => warn!(path = %config_path, error = %e, "config rejected, using built-in defaults"),
            }
        } else {
            warn!(path = %config_path, "config file not found, using built-in defaults");
        }

        let mut conf = Config::default();
        conf.apply_env_overrides();
        conf
    })
}
