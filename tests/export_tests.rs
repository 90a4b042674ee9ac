//! tests/export_tests.rs
//! Export payload building, file round-trip and import

mod common;
use common::{failing_primary_encryptor, memory_encryptor, no_tier_encryptor};

use credential_vault::consts::{EXPORT_FORMAT_VERSION, PLAINTEXT_SENTINEL};
use credential_vault::enums::FieldEncoding;
use credential_vault::error::CoreError;
use credential_vault::export::{read_payload, write_payload};
use credential_vault::{
    export_value, import_fields, Config, ExportBuilder, ExportMode, FieldValue, Tier,
};
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_transport_export_roundtrips_through_a_file() {
    let enc = memory_encryptor();
    let bank_pin = enc.encrypt("4321");
    let email_pw = failing_primary_encryptor().encrypt("correct horse");

    let mut builder = ExportBuilder::new(ExportMode::Transport);
    builder.add_entry(json!({"id": "acct-1", "name": "Bank"}));
    builder
        .add_field("acct-1", "pin", FieldValue::Token(bank_pin.clone()))
        .unwrap()
        .add_field("acct-2", "password", FieldValue::Token(email_pw.clone()))
        .unwrap();
    let payload = builder.finish();

    assert_eq!(payload.format_version, EXPORT_FORMAT_VERSION);
    assert_eq!(payload.mode(), ExportMode::Transport);
    assert_ne!(payload.transport_key, PLAINTEXT_SENTINEL);
    assert!(payload.fields.iter().all(|f| f.encoding == FieldEncoding::Transport));
    assert!(payload.fields.iter().all(|f| f.value != bank_pin && f.value != email_pw));

    let dir = tempdir().unwrap();
    let path = dir.path().join("export.json");
    write_payload(&path, &payload).unwrap();

    let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["format_version"], EXPORT_FORMAT_VERSION);
    assert_eq!(json["fields"][0]["encoding"], "transport");
    assert_eq!(json["entries"][0]["name"], "Bank");
    assert!(json["exported_at"].as_str().unwrap().ends_with('Z'));

    let imported = import_fields(&read_payload(&path).unwrap(), &enc).unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(imported[0].owner_id, "acct-1");
    assert_eq!(imported[0].token, bank_pin);
    assert_eq!(imported[1].token, email_pw);
    assert_eq!(imported[0].tier, Tier::Primary);
    assert_eq!(imported[1].tier, Tier::Backup);
    assert_eq!(enc.decrypt(&imported[1].token).unwrap(), "correct horse");
}

#[test]
fn test_plaintext_export_is_reencrypted_on_import() {
    let mut builder = ExportBuilder::new(ExportMode::Plaintext);
    builder
        .add_field("acct-1", "pin", FieldValue::Plain("4321".into()))
        .unwrap();
    let payload = builder.finish();

    assert_eq!(payload.transport_key, PLAINTEXT_SENTINEL);
    assert_eq!(payload.mode(), ExportMode::Plaintext);
    assert_eq!(payload.fields[0].value, "4321");
    assert_eq!(payload.fields[0].encoding, FieldEncoding::Plaintext);

    let importer = memory_encryptor();
    let imported = import_fields(&payload, &importer).unwrap();
    assert_eq!(importer.token_tier(&imported[0].token), Some(Tier::Primary));
    assert_eq!(importer.decrypt(&imported[0].token).unwrap(), "4321");
}

#[test]
fn test_builder_rejects_values_in_the_wrong_form() {
    let enc = memory_encryptor();

    let mut transport = ExportBuilder::new(ExportMode::Transport);
    assert!(matches!(
        transport.add_field("a", "pin", FieldValue::Plain("4321".into())),
        Err(CoreError::Export(_))
    ));

    let mut plaintext = ExportBuilder::new(ExportMode::Plaintext);
    assert!(matches!(
        plaintext.add_field("a", "pin", FieldValue::Token(enc.encrypt("4321"))),
        Err(CoreError::Export(_))
    ));
}

#[test]
fn test_importer_rejects_unknown_version() {
    let mut payload = ExportBuilder::new(ExportMode::Transport).finish();
    payload.format_version = 99;
    assert!(matches!(
        import_fields(&payload, &memory_encryptor()),
        Err(CoreError::Format(_))
    ));
}

#[test]
fn test_importer_rejects_markers_that_disagree_with_the_mode() {
    let enc = memory_encryptor();
    let mut builder = ExportBuilder::new(ExportMode::Transport);
    builder
        .add_field("a", "pin", FieldValue::Token(enc.encrypt("4321")))
        .unwrap();
    let mut payload = builder.finish();
    payload.fields[0].encoding = FieldEncoding::Plaintext;
    assert!(matches!(payload.validate(), Err(CoreError::Format(_))));

    // a transport payload whose key was swapped for the sentinel
    let mut builder = ExportBuilder::new(ExportMode::Transport);
    builder
        .add_field("a", "pin", FieldValue::Token(enc.encrypt("4321")))
        .unwrap();
    let mut payload = builder.finish();
    payload.transport_key = PLAINTEXT_SENTINEL.to_owned();
    assert!(matches!(
        import_fields(&payload, &enc),
        Err(CoreError::Format(_))
    ));
}

#[test]
fn test_read_payload_rejects_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(read_payload(&path), Err(CoreError::Json(_))));
}

fn transport_payload_with(value: &str) -> credential_vault::ExportPayload {
    let enc = memory_encryptor();
    let mut builder = ExportBuilder::new(ExportMode::Transport);
    builder
        .add_field("acct-1", "pin", FieldValue::Token(enc.encrypt("4321")))
        .unwrap();
    let mut payload = builder.finish();
    let key = payload.transport_key().unwrap().unwrap();
    payload.fields[0].value = export_value(value, &key);
    payload
}

#[test]
fn test_import_rejects_records_that_do_not_unwrap_to_tokens() {
    let enc = memory_encryptor();
    for bogus in ["garbage, not a token", "dGlueQ=="] {
        let payload = transport_payload_with(bogus);
        match import_fields(&payload, &enc) {
            Err(CoreError::Format(msg)) => assert!(msg.contains("acct-1"), "{msg}"),
            other => panic!("expected format error for {bogus:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_plaintext_import_never_stores_emergency_encoding() {
    let mut builder = ExportBuilder::new(ExportMode::Plaintext);
    builder
        .add_field("acct-1", "pin", FieldValue::Plain("4321".into()))
        .unwrap();
    let payload = builder.finish();

    let broken = no_tier_encryptor();
    assert!(import_fields(&payload, &broken).is_err());
    assert_eq!(broken.emergency_encodings(), 0);

    let imported = import_fields(&payload, &failing_primary_encryptor()).unwrap();
    assert_eq!(imported[0].tier, Tier::Backup);
}

#[test]
fn test_builder_follows_configured_mode() {
    let conf = Config::from_toml_str("[export]\nmode = \"plaintext\"").unwrap();
    let builder = ExportBuilder::from_config(&conf);
    assert_eq!(builder.mode(), ExportMode::Plaintext);
    assert_eq!(builder.finish().transport_key, PLAINTEXT_SENTINEL);

    let builder = ExportBuilder::from_config(&Config::default());
    assert_eq!(builder.mode(), ExportMode::Transport);
}
