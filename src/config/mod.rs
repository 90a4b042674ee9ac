// src/config/mod.rs
//! Configuration system for credential-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{
    load, BackupSection, Config, ExportSection, KeystoreSection, LoggingSection, RecoverySection,
};
pub use defaults::{default_keystore_dir, DEFAULT_LOG_FILTER};

mod app;
mod defaults;
