// src/export/mod.rs
//! Export / import of credential fields
//!
//! Two modes, always recorded in the payload so the importer never guesses:
//! - **transport**: at-rest tokens re-wrapped with a one-time transport key
//! - **plaintext**: decrypted values, re-encrypted by the importer.
//!   The file is then as sensitive as the credentials themselves.

pub mod json;

pub use json::{read_payload, write_payload, ExportPayload, FieldRecord};

use chrono::Utc;
use tracing::{info, warn};

use crate::consts::{EXPORT_FORMAT_VERSION, PLAINTEXT_SENTINEL};
use crate::config::Config;
use crate::enums::{ExportMode, FieldEncoding, Tier};
use crate::error::{CoreError, Result};
use crate::facade::TieredEncryptor;
use crate::token;
use crate::transport::{self, TransportKey};
use crate::value::FieldValue;

pub struct ExportBuilder {
    mode: ExportMode,
    transport_key: Option<TransportKey>,
    entries: Vec<serde_json::Value>,
    fields: Vec<FieldRecord>,
}

impl ExportBuilder {
    /// A transport-mode builder draws a fresh transport key here
    pub fn new(mode: ExportMode) -> Self {
        let transport_key = match mode {
            ExportMode::Transport => Some(TransportKey::generate()),
            ExportMode::Plaintext => None,
        };
        Self {
            mode,
            transport_key,
            entries: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Builder in the mode named by `[export] mode`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.export.mode)
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    pub fn add_entry(&mut self, entry: serde_json::Value) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Transport exports take `Token` values; plaintext exports take `Plain`
    /// values the caller already decrypted through the facade.
    pub fn add_field(
        &mut self,
        owner_id: impl Into<String>,
        field: impl Into<String>,
        value: FieldValue,
    ) -> Result<&mut Self> {
        let owner_id = owner_id.into();
        let field = field.into();
        let exported = match (&self.transport_key, value) {
            (Some(key), FieldValue::Token(token)) => transport::export_value(&token, key),
            (None, FieldValue::Plain(plain)) => plain,
            (Some(_), FieldValue::Plain(_)) => {
                return Err(CoreError::Export(format!(
                    "field '{field}' of '{owner_id}' is plaintext; encrypt it before a transport export"
                )))
            }
            (None, FieldValue::Token(_)) => {
                return Err(CoreError::Export(format!(
                    "field '{field}' of '{owner_id}' is a token; decrypt it before a plaintext export"
                )))
            }
        };
        self.fields.push(FieldRecord {
            owner_id,
            field,
            value: exported,
            encoding: FieldEncoding::from(self.mode),
        });
        Ok(self)
    }

    pub fn finish(self) -> ExportPayload {
        if self.mode == ExportMode::Plaintext {
            warn!(fields = self.fields.len(), "plaintext export: payload contains decrypted credentials");
        }
        let transport_key = match &self.transport_key {
            Some(key) => key.to_base64(),
            None => PLAINTEXT_SENTINEL.to_owned(),
        };
        info!(entries = self.entries.len(), fields = self.fields.len(), mode = ?self.mode, "export built");
        ExportPayload {
            format_version: EXPORT_FORMAT_VERSION,
            exported_at: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            exporter_version: env!("CARGO_PKG_VERSION").to_owned(),
            entries: self.entries,
            fields: self.fields,
            transport_key,
        }
    }
}

/// A field ready to persist: always in at-rest token form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedField {
    pub owner_id: String,
    pub field: String,
    pub token: String,
    /// Tier the token is structurally marked with
    pub tier: Tier,
}

/// Unwrap the transport layer, or re-encrypt plaintext values through `encryptor`
///
/// Every unwrapped value must be a well-formed at-rest token. Plaintext values
/// are sealed with [`TieredEncryptor::encrypt_protected`], so an import never
/// stores a value with the emergency encoding.
pub fn import_fields(payload: &ExportPayload, encryptor: &TieredEncryptor) -> Result<Vec<ImportedField>> {
    payload.validate()?;
    let key = payload.transport_key()?;
    payload
        .fields
        .iter()
        .map(|record| {
            let token = match &key {
                Some(key) => transport::import_value(&record.value, key)?,
                None => encryptor.encrypt_protected(&record.value)?,
            };
            let tier = token::validate(&token).map_err(|e| {
                CoreError::Format(format!(
                    "field '{}' of '{}' is not an at-rest token: {e}",
                    record.field, record.owner_id
                ))
            })?;
            if !tier.is_protected() {
                warn!(owner_id = %record.owner_id, field = %record.field, "imported value uses the emergency encoding");
            }
            Ok(ImportedField {
                owner_id: record.owner_id.clone(),
                field: record.field.clone(),
                token,
                tier,
            })
        })
        .collect()
}
