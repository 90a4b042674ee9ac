// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret containers used throughout credential-vault.
//! Every alias zeroizes its contents on drop.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(AesKey32, 32); // 256-bit AES-GCM key (primary store entries + derived backup key)
fixed_alias!(TransportKey32, 32); // one-time export re-wrap key

// Dynamic secrets
dynamic_alias!(PlainText, Vec<u8>); // decrypted field bytes
