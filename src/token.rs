// src/token.rs
//! Structural token formats
//!
//! | Tier      | Encoding                                         |
//! |-----------|--------------------------------------------------|
//! | Primary   | `Base64(IV[12] ‖ ciphertext ‖ tag[16])`          |
//! | Backup    | `Base64("BACKUP:" ‖ IV[12] ‖ ciphertext ‖ tag[16])` |
//! | Emergency | `"EMERGENCY_FALLBACK:" ‖ Base64(plaintext_utf8)`  |
//!
//! The tier is read from the token itself, never from external metadata.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::aliases::PlainText;
use crate::consts::{BACKUP_MARKER, EMERGENCY_PREFIX, IV_LEN, TAG_LEN};
use crate::enums::Tier;
use crate::error::{CoreError, Result};

/// A token split into its structural parts
pub enum TokenBody {
    /// Emergency payload, already Base64-decoded
    Emergency(PlainText),
    /// Sealed bytes that followed the `BACKUP:` marker
    Backup(Vec<u8>),
    /// Sealed bytes with no marker: primary, or a legacy token of unknown tier
    Unmarked(Vec<u8>),
}

impl TokenBody {
    /// Tier implied by the structure alone; `Unmarked` is reported as primary
    pub fn tier(&self) -> Tier {
        match self {
            TokenBody::Emergency(_) => Tier::Emergency,
            TokenBody::Backup(_) => Tier::Backup,
            TokenBody::Unmarked(_) => Tier::Primary,
        }
    }
}

pub fn parse(token: &str) -> Result<TokenBody> {
    if let Some(encoded) = token.strip_prefix(EMERGENCY_PREFIX) {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| CoreError::Format(format!("emergency payload is not Base64: {e}")))?;
        return Ok(TokenBody::Emergency(PlainText::new(bytes)));
    }

    let decoded = STANDARD
        .decode(token)
        .map_err(|e| CoreError::Format(format!("token is not Base64: {e}")))?;

    match decoded.strip_prefix(BACKUP_MARKER.as_slice()) {
        Some(sealed) => Ok(TokenBody::Backup(sealed.to_vec())),
        None => Ok(TokenBody::Unmarked(decoded)),
    }
}

/// Structural check without a key: parses, and sealed bodies are long enough
/// to hold an IV and a tag
pub fn validate(token: &str) -> Result<Tier> {
    match parse(token)? {
        TokenBody::Backup(sealed) | TokenBody::Unmarked(sealed) if sealed.len() < IV_LEN + TAG_LEN => {
            Err(CoreError::Format(format!(
                "sealed body of {} bytes is shorter than IV and tag",
                sealed.len()
            )))
        }
        body => Ok(body.tier()),
    }
}

pub fn encode_primary(sealed: &[u8]) -> String {
    STANDARD.encode(sealed)
}

pub fn encode_backup(sealed: &[u8]) -> String {
    let mut marked = Vec::with_capacity(BACKUP_MARKER.len() + sealed.len());
    marked.extend_from_slice(BACKUP_MARKER);
    marked.extend_from_slice(sealed);
    STANDARD.encode(marked)
}

pub fn encode_emergency(plaintext: &str) -> String {
    format!("{EMERGENCY_PREFIX}{}", STANDARD.encode(plaintext.as_bytes()))
}

/// Cheap check used by diagnostics; does not validate the payload
pub fn is_emergency(token: &str) -> bool {
    token.starts_with(EMERGENCY_PREFIX)
}
