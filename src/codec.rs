// src/codec.rs
//! Stateless AES-256-GCM seal/open. No I/O, no key storage.
//!
//! Layout of sealed bytes: `IV[12] ‖ ciphertext ‖ tag[16]`.
//! Shared by the primary tier (inside the key store) and the backup tier.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::aliases::{AesKey32, PlainText};
use crate::consts::{IV_LEN, TAG_LEN};
use crate::error::{CoreError, Result};

/// Encrypt `plaintext` under `key` with a freshly drawn random IV
pub fn seal(key: &AesKey32, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.expose_secret())
        .map_err(|e| CoreError::Cipher(e.to_string()))?;

    // A new IV on every call, regardless of plaintext
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|_| CoreError::Cipher("AES-GCM encryption failed".into()))?;

    let mut sealed = Vec::with_capacity(IV_LEN + ciphertext.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypt `IV ‖ ciphertext ‖ tag` produced by [`seal`]
///
/// Any tag mismatch or truncated input is an [`CoreError::AuthenticationFailure`].
pub fn open(key: &AesKey32, sealed: &[u8]) -> Result<PlainText> {
    if sealed.len() < IV_LEN + TAG_LEN {
        return Err(CoreError::AuthenticationFailure);
    }
    let (iv, ciphertext) = sealed.split_at(IV_LEN);

    let cipher = Aes256Gcm::new_from_slice(key.expose_secret())
        .map_err(|e| CoreError::Cipher(e.to_string()))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| CoreError::AuthenticationFailure)?;

    Ok(PlainText::new(plaintext))
}
