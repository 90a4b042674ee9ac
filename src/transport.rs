// src/transport.rs
//! Transport re-encryption for exports
//!
//! Re-wraps at-rest tokens with a one-time 256-bit key (XOR keystream, key
//! cycled byte-by-byte) so an export never carries at-rest ciphertext
//! verbatim. This is obfuscation, not confidentiality: it must never be the
//! only protection for plaintext values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::aliases::TransportKey32;
use crate::consts::KEY_LEN;
use crate::error::{CoreError, Result};

/// Ephemeral per-export key; generate one for every export operation
pub struct TransportKey {
    key: TransportKey32,
}

impl TransportKey {
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        rand::rng().fill_bytes(&mut bytes[..]);
        Self {
            key: TransportKey32::new(*bytes),
        }
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            key: TransportKey32::new(bytes),
        }
    }

    /// Encoding embedded in the export payload
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.key.expose_secret())
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded)
                .map_err(|e| CoreError::Format(format!("transport key is not Base64: {e}")))?,
        );
        let arr: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            CoreError::Format(format!(
                "transport key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(arr))
    }

    fn apply(&self, data: &mut [u8]) {
        let key = self.key.expose_secret();
        for (byte, k) in data.iter_mut().zip(key.iter().cycle()) {
            *byte ^= k;
        }
    }
}

impl std::fmt::Debug for TransportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransportKey(<redacted>)")
    }
}

/// Re-wrap an at-rest token for export
pub fn export_value(encrypted_at_rest: &str, key: &TransportKey) -> String {
    let mut bytes = encrypted_at_rest.as_bytes().to_vec();
    key.apply(&mut bytes);
    STANDARD.encode(bytes)
}

/// Exact inverse of [`export_value`]
pub fn import_value(transport_token: &str, key: &TransportKey) -> Result<String> {
    let mut bytes = STANDARD
        .decode(transport_token)
        .map_err(|e| CoreError::Format(format!("transport token is not Base64: {e}")))?;
    key.apply(&mut bytes);
    String::from_utf8(bytes).map_err(|_| {
        CoreError::Format("transport token did not unwrap to text (wrong transport key?)".into())
    })
}
