// src/lib.rs
//! credential-vault: tiered field-level credential encryption
//!
//! Features:
//! - AES-256-GCM with a key bound to a secure key store (primary tier)
//! - Device-derived PBKDF2 backup key that survives key-store loss (backup tier)
//! - Self-describing tokens; recovery mode reorders probing of unmarked ones
//! - Transport re-wrapping and plaintext-mode JSON exports
//! - secure-gate secrets, zeroized on drop

pub mod aliases;
pub mod backup;
pub mod codec;
pub mod config;
pub mod consts;
pub mod enums;
pub mod error;
pub mod export;
pub mod facade;
pub mod keystore;
#[cfg(feature = "logging")]
pub mod logging;
pub mod primary;
pub mod recovery;
pub mod token;
pub mod transport;
pub mod value;

// Re-export everything users need at the crate root
pub use backup::{BackupKeyDeriver, DeviceIdentity, StaticDeviceIdentity, SystemDeviceIdentity};
pub use config::{load as load_config, Config};
pub use enums::{ExportMode, KeyStrength, Tier};
pub use error::{CoreError, Result};
pub use export::{import_fields, ExportBuilder, ExportPayload};
pub use facade::TieredEncryptor;
pub use keystore::{FileKeyStore, MemoryKeyStore, SecureKeyStore};
pub use primary::PrimaryKeyProvider;
pub use recovery::RecoveryMode;
pub use transport::{export_value, import_value, TransportKey};
pub use value::FieldValue;
