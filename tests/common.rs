// tests/common.rs
//! Shared test utilities: logging setup and encryptor fixtures
#![allow(dead_code)]

use std::sync::Arc;

use credential_vault::aliases::PlainText;
use credential_vault::error::{CoreError, Result};
use credential_vault::{
    BackupKeyDeriver, DeviceIdentity, MemoryKeyStore, PrimaryKeyProvider, RecoveryMode,
    SecureKeyStore, StaticDeviceIdentity, TieredEncryptor,
};

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging
/// Call once at the start of any test that needs logs
pub fn setup() {
    #[cfg(feature = "logging")]
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer()) // works in `cargo test`
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok(); // idempotent

    #[cfg(not(feature = "logging"))]
    { /* no-op */ }
}

/// Secure key store whose every call fails, like a corrupted platform keystore
pub struct FailingKeyStore;

fn broken<T>() -> Result<T> {
    Err(CoreError::KeyUnavailable("simulated key store failure".into()))
}

impl SecureKeyStore for FailingKeyStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }
    fn contains(&self, _alias: &str) -> Result<bool> {
        broken()
    }
    fn create_if_absent(&self, _alias: &str) -> Result<bool> {
        broken()
    }
    fn delete(&self, _alias: &str) -> Result<bool> {
        broken()
    }
    fn seal(&self, _alias: &str, _plaintext: &[u8]) -> Result<Vec<u8>> {
        broken()
    }
    fn open(&self, _alias: &str, _sealed: &[u8]) -> Result<PlainText> {
        broken()
    }
}

pub const DEVICE_FINGERPRINT: &str = "acme/falcon/falcon:14/UP1A.231005.007/user/release-keys";
pub const DEVICE_SERIAL: &str = "R58N31XYZ42";

pub fn simulated_device() -> Arc<dyn DeviceIdentity> {
    Arc::new(StaticDeviceIdentity::new(DEVICE_FINGERPRINT, DEVICE_SERIAL))
}

pub fn encryptor_with_store(store: Arc<dyn SecureKeyStore>) -> TieredEncryptor {
    TieredEncryptor::new(
        PrimaryKeyProvider::new(store),
        BackupKeyDeriver::new(simulated_device()),
        RecoveryMode::default(),
    )
}

/// Healthy primary tier backed by memory
pub fn memory_encryptor() -> TieredEncryptor {
    encryptor_with_store(Arc::new(MemoryKeyStore::new()))
}

/// Primary key store throws on every call
pub fn failing_primary_encryptor() -> TieredEncryptor {
    encryptor_with_store(Arc::new(FailingKeyStore))
}

/// Neither tier works: broken key store and a device that refuses degraded derivation
pub fn no_tier_encryptor() -> TieredEncryptor {
    TieredEncryptor::new(
        PrimaryKeyProvider::new(Arc::new(FailingKeyStore)),
        BackupKeyDeriver::new(Arc::new(StaticDeviceIdentity::unreadable(vec![])))
            .allow_degraded(false),
        RecoveryMode::default(),
    )
}

/// Decode a Base64 token, flip one byte, re-encode
pub fn flip_byte(token: &str, index: usize) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    let mut bytes = STANDARD.decode(token).unwrap();
    bytes[index] ^= 0x01;
    STANDARD.encode(bytes)
}

pub fn decoded_len(token: &str) -> usize {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    STANDARD.decode(token).unwrap().len()
}
