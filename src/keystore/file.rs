// src/keystore/file.rs
//! Directory-backed key store
//!
//! One file per alias (`<alias>.key`) holding the hex-encoded key. Files are
//! written atomically and restricted to the owner on unix.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;
use zeroize::Zeroizing;

use super::memory::random_key;
use super::SecureKeyStore;
use crate::aliases::{AesKey32, PlainText};
use crate::codec;
use crate::consts::KEY_LEN;
use crate::error::{CoreError, Result};

pub struct FileKeyStore {
    dir: PathBuf,
    // serializes create/delete against seal/open within this process
    guard: Mutex<()>,
}

impl FileKeyStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, alias: &str) -> Result<PathBuf> {
        let valid = !alias.is_empty()
            && alias
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !alias.starts_with('.');
        if !valid {
            return Err(CoreError::KeyUnavailable(format!(
                "invalid key alias '{alias}'"
            )));
        }
        Ok(self.dir.join(format!("{alias}.key")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| CoreError::KeyUnavailable("file key store lock poisoned".into()))
    }

    fn load(&self, alias: &str) -> Result<AesKey32> {
        let path = self.key_path(alias)?;
        let text = Zeroizing::new(fs::read_to_string(&path).map_err(|e| {
            CoreError::KeyUnavailable(format!("cannot read {}: {e}", path.display()))
        })?);
        let bytes = Zeroizing::new(hex::decode(text.trim()).map_err(|_| {
            CoreError::KeyUnavailable(format!("corrupt key file {}", path.display()))
        })?);
        let arr: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            CoreError::KeyUnavailable(format!("corrupt key file {}", path.display()))
        })?;
        Ok(AesKey32::new(arr))
    }

    /// Atomically create `path`; `Ok(false)` if another writer got there first
    fn write_new(&self, path: &Path, key: &AesKey32) -> Result<bool> {
        fs::create_dir_all(&self.dir)?;
        let encoded = Zeroizing::new(hex::encode(key.expose_secret()));
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(encoded.as_bytes())?;
        tmp.as_file().sync_all()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
        }
        match tmp.persist_noclobber(path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(CoreError::Io(e.error)),
        }
    }
}

impl SecureKeyStore for FileKeyStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn contains(&self, alias: &str) -> Result<bool> {
        let _guard = self.lock()?;
        Ok(self.key_path(alias)?.is_file())
    }

    fn create_if_absent(&self, alias: &str) -> Result<bool> {
        let _guard = self.lock()?;
        let path = self.key_path(alias)?;
        if path.is_file() {
            return Ok(false);
        }
        // the file may still appear from another process before the persist
        let created = self.write_new(&path, &random_key())?;
        if created {
            debug!(path = %path.display(), "wrote new key file");
        } else {
            debug!(path = %path.display(), "key file created concurrently, keeping it");
        }
        Ok(created)
    }

    fn delete(&self, alias: &str) -> Result<bool> {
        let _guard = self.lock()?;
        let path = self.key_path(alias)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    fn seal(&self, alias: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let _guard = self.lock()?;
        let key = self.load(alias)?;
        codec::seal(&key, plaintext)
    }

    fn open(&self, alias: &str, sealed: &[u8]) -> Result<PlainText> {
        let _guard = self.lock()?;
        let key = self.load(alias)?;
        codec::open(&key, sealed)
    }
}
