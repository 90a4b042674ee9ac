// src/value.rs
//! A credential value tagged with its current form
//!
//! Callers keep `Plain` and `Token` apart at the type level instead of
//! guessing whether a string is already encrypted.

use std::fmt;

use zeroize::Zeroize;

use crate::error::Result;
use crate::facade::TieredEncryptor;

#[derive(Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Decrypted, user-visible value
    Plain(String),
    /// At-rest token produced by [`TieredEncryptor::encrypt`]
    Token(String),
}

impl FieldValue {
    pub fn is_token(&self) -> bool {
        matches!(self, FieldValue::Token(_))
    }

    /// Token form for persisting. Already-encrypted values pass through untouched.
    pub fn into_token(self, encryptor: &TieredEncryptor) -> FieldValue {
        match self {
            FieldValue::Plain(mut plain) => {
                let token = encryptor.encrypt(&plain);
                plain.zeroize();
                FieldValue::Token(token)
            }
            token => token,
        }
    }

    /// Plaintext for display. Plain values are returned as-is.
    pub fn reveal(&self, encryptor: &TieredEncryptor) -> Result<String> {
        match self {
            FieldValue::Plain(plain) => Ok(plain.clone()),
            FieldValue::Token(token) => encryptor.decrypt(token),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Plain(_) => f.write_str("Plain(<redacted>)"),
            FieldValue::Token(token) => f.debug_tuple("Token").field(token).finish(),
        }
    }
}
