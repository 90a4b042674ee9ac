// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Secure key store is inaccessible, or holds no key for the alias
    #[error("Primary key unavailable: {0}")]
    KeyUnavailable(String),

    /// GCM tag mismatch: tampered ciphertext or wrong key
    #[error("Authentication failed: ciphertext was modified or the key does not match")]
    AuthenticationFailure,

    /// Token does not match any known tier format
    #[error("Unrecognised token format: {0}")]
    Format(String),

    /// Backup key fell back to the weaker device-id hash and the caller refused it
    #[error("Backup key derivation degraded: {0}")]
    DerivationDegraded(String),

    #[error("Device attributes unavailable: {0}")]
    DeviceAttributes(String),

    #[error("Cipher operation failed: {0}")]
    Cipher(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
