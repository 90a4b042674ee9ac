// src/consts.rs
//! Shared constants: token markers, cipher sizes and KDF parameters

/// AES-GCM IV length in bytes
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes (128-bit tag)
pub const TAG_LEN: usize = 16;

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// Byte marker prepended to backup-tier sealed bytes before Base64 encoding
pub const BACKUP_MARKER: &[u8; 7] = b"BACKUP:";

/// Text prefix of emergency-encoded (NOT encrypted) values
pub const EMERGENCY_PREFIX: &str = "EMERGENCY_FALLBACK:";

/// Alias of the primary key inside the secure key store
pub const DEFAULT_PRIMARY_KEY_ALIAS: &str = "credential_vault_primary";

/// Fixed PBKDF2 password for the backup tier
pub const DEFAULT_BACKUP_KEY_LABEL: &str = "credential-vault-backup-key-v1";

/// PBKDF2-HMAC-SHA1 iteration count for the backup tier
pub const BACKUP_KDF_ITERATIONS: u32 = 10_000;

/// Current export payload format
pub const EXPORT_FORMAT_VERSION: u32 = 2;

/// Stored in `transport_key` when the payload carries plaintext values
pub const PLAINTEXT_SENTINEL: &str = "PLAINTEXT_MODE";

/// Default config file looked up by `config::load`
pub const DEFAULT_CONFIG_FILE: &str = "credvault.toml";
