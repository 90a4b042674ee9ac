// src/backup/device.rs
//! Device-identifying attributes feeding the backup key salt

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
use std::fs;
#[cfg(any(target_os = "macos", target_os = "windows"))]
use std::process::Command;

use crate::error::{CoreError, Result};

/// Stable, OS-reported identifiers of this device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttributes {
    pub fingerprint: String,
    pub serial: String,
}

impl DeviceAttributes {
    pub fn new(fingerprint: impl Into<String>, serial: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            serial: serial.into(),
        }
    }

    /// The identifier string that gets hashed into the PBKDF2 salt
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.fingerprint, self.serial)
    }
}

pub trait DeviceIdentity: Send + Sync {
    /// Full stable attributes, or an error when they cannot be read
    fn stable_attributes(&self) -> Result<DeviceAttributes>;

    /// Whatever id fragments are readable; used by the degraded derivation
    fn id_fragments(&self) -> Vec<String>;
}

/// Reads identifiers from the running OS
///
/// Fingerprint is `os/arch`; serial is the platform machine id. Nothing is
/// taken from the environment or from renameable settings like the hostname.
#[derive(Debug, Clone, Default)]
pub struct SystemDeviceIdentity;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

impl SystemDeviceIdentity {
    fn fingerprint() -> String {
        format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn machine_id() -> Option<String> {
        MACHINE_ID_PATHS
            .iter()
            .filter_map(|p| fs::read_to_string(p).ok())
            .map(|id| id.trim().to_owned())
            .find(|id| !id.is_empty())
    }

    /// `IOPlatformUUID` of the platform expert device
    #[cfg(target_os = "macos")]
    fn machine_id() -> Option<String> {
        let out = Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()?;
        let text = String::from_utf8(out.stdout).ok()?;
        text.lines()
            .find(|l| l.contains("IOPlatformUUID"))
            .and_then(|l| l.split('"').nth(3))
            .map(str::to_owned)
            .filter(|id| !id.is_empty())
    }

    /// `MachineGuid` written at OS install time
    #[cfg(target_os = "windows")]
    fn machine_id() -> Option<String> {
        let out = Command::new("reg")
            .args([
                "query",
                r"HKLM\SOFTWARE\Microsoft\Cryptography",
                "/v",
                "MachineGuid",
            ])
            .output()
            .ok()?;
        let text = String::from_utf8(out.stdout).ok()?;
        text.lines()
            .find(|l| l.contains("MachineGuid"))
            .and_then(|l| l.split_whitespace().last())
            .map(str::to_owned)
            .filter(|id| !id.is_empty())
    }
}

impl DeviceIdentity for SystemDeviceIdentity {
    fn stable_attributes(&self) -> Result<DeviceAttributes> {
        let serial = Self::machine_id()
            .ok_or_else(|| CoreError::DeviceAttributes("machine id not readable".into()))?;
        Ok(DeviceAttributes::new(Self::fingerprint(), serial))
    }

    fn id_fragments(&self) -> Vec<String> {
        let mut fragments = vec![
            std::env::consts::OS.to_owned(),
            std::env::consts::ARCH.to_owned(),
        ];
        fragments.extend(Self::machine_id());
        fragments
    }
}

/// Fixed identifiers for simulated devices, or embedders that know their ids
#[derive(Debug, Clone, Default)]
pub struct StaticDeviceIdentity {
    attributes: Option<DeviceAttributes>,
    fragments: Vec<String>,
}

impl StaticDeviceIdentity {
    pub fn new(fingerprint: impl Into<String>, serial: impl Into<String>) -> Self {
        let attributes = DeviceAttributes::new(fingerprint, serial);
        let fragments = vec![attributes.fingerprint.clone(), attributes.serial.clone()];
        Self {
            attributes: Some(attributes),
            fragments,
        }
    }

    /// A device whose stable attributes are unreadable
    pub fn unreadable(fragments: Vec<String>) -> Self {
        Self {
            attributes: None,
            fragments,
        }
    }
}

impl DeviceIdentity for StaticDeviceIdentity {
    fn stable_attributes(&self) -> Result<DeviceAttributes> {
        self.attributes
            .clone()
            .ok_or_else(|| CoreError::DeviceAttributes("device attributes unreadable".into()))
    }

    fn id_fragments(&self) -> Vec<String> {
        self.fragments.clone()
    }
}
