// src/recovery.rs
//! Recovery mode as an injected atomic flag
//!
//! Clones share the same cell, so an administrative handle can flip the mode
//! on a live encryptor. The flag only reorders decryption probes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::enums::Tier;

#[derive(Debug, Clone, Default)]
pub struct RecoveryMode {
    active: Arc<AtomicBool>,
}

impl RecoveryMode {
    pub fn new(enabled: bool) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn set_recovery_mode(&self, enabled: bool) {
        let previous = self.active.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!(enabled, "recovery mode changed");
        }
    }

    pub fn is_recovery_mode_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Tier order for tokens that carry no marker
    pub fn probe_order(&self) -> [Tier; 2] {
        if self.is_recovery_mode_active() {
            [Tier::Backup, Tier::Primary]
        } else {
            [Tier::Primary, Tier::Backup]
        }
    }
}
