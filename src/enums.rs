// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the small `Copy` enums that describe tiers, key
//! strength and export modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tier produced (or can open) a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Key held by the secure key store
    Primary,
    /// Key derived from device attributes
    Backup,
    /// Base64 only, NOT encrypted
    Emergency,
}

impl Tier {
    pub fn is_protected(self) -> bool {
        !matches!(self, Tier::Emergency)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Primary => "primary",
            Tier::Backup => "backup",
            Tier::Emergency => "emergency",
        };
        f.write_str(name)
    }
}

/// Strength of a derived backup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrength {
    /// PBKDF2 over the full stable device identifier
    #[default]
    Full,
    /// SHA-256 over whatever device fragments were readable
    Degraded,
}

/// How field values travel inside an export payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
    /// At-rest tokens re-wrapped with a one-time transport key
    #[default]
    Transport,
    /// Decrypted values; importer re-encrypts them
    Plaintext,
}

/// Per-record marker inside an export payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEncoding {
    Transport,
    Plaintext,
}

impl From<ExportMode> for FieldEncoding {
    fn from(mode: ExportMode) -> Self {
        match mode {
            ExportMode::Transport => FieldEncoding::Transport,
            ExportMode::Plaintext => FieldEncoding::Plaintext,
        }
    }
}

/// Secure key store backend selected by config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeystoreBackend {
    Memory,
    #[default]
    File,
}
