// src/export/json.rs
//! JSON export payload and its file I/O

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{EXPORT_FORMAT_VERSION, PLAINTEXT_SENTINEL};
use crate::enums::{ExportMode, FieldEncoding};
use crate::error::{CoreError, Result};
use crate::transport::TransportKey;

/// One credential field inside an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Id of the owning entry, as the collaborator knows it
    pub owner_id: String,
    pub field: String,
    pub value: String,
    pub encoding: FieldEncoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPayload {
    pub format_version: u32,
    pub exported_at: String,
    pub exporter_version: String,
    /// Opaque collaborator entries (ledger rows etc.)
    pub entries: Vec<serde_json::Value>,
    pub fields: Vec<FieldRecord>,
    /// Base64 transport key, or [`PLAINTEXT_SENTINEL`]
    pub transport_key: String,
}

impl ExportPayload {
    pub fn mode(&self) -> ExportMode {
        if self.transport_key == PLAINTEXT_SENTINEL {
            ExportMode::Plaintext
        } else {
            ExportMode::Transport
        }
    }

    /// Version, sentinel and every per-record marker must agree
    pub fn validate(&self) -> Result<()> {
        if self.format_version != EXPORT_FORMAT_VERSION {
            return Err(CoreError::Format(format!(
                "unsupported export format version {} (expected {EXPORT_FORMAT_VERSION})",
                self.format_version
            )));
        }
        let expected = FieldEncoding::from(self.mode());
        if let Some(bad) = self.fields.iter().find(|f| f.encoding != expected) {
            return Err(CoreError::Format(format!(
                "field '{}' of '{}' is marked {:?} in a {:?} export",
                bad.field,
                bad.owner_id,
                bad.encoding,
                self.mode()
            )));
        }
        Ok(())
    }

    /// The embedded transport key; `None` for plaintext-mode payloads
    pub fn transport_key(&self) -> Result<Option<TransportKey>> {
        match self.mode() {
            ExportMode::Plaintext => Ok(None),
            ExportMode::Transport => TransportKey::from_base64(&self.transport_key).map(Some),
        }
    }
}

pub fn write_payload<P: AsRef<Path>>(path: P, payload: &ExportPayload) -> Result<()> {
    fs::write(path.as_ref(), serde_json::to_string_pretty(payload)?)?;
    Ok(())
}

pub fn read_payload<P: AsRef<Path>>(path: P) -> Result<ExportPayload> {
    let text = fs::read_to_string(path.as_ref())?;
    let payload: ExportPayload = serde_json::from_str(&text)?;
    payload.validate()?;
    Ok(payload)
}
