//! Device registry - Maps MAC addresses to provisioned device records
//!
//! The registry is loaded from a TOML index of `[[device]]` tables and kept
//! in memory, keyed by canonical MAC address.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::device::{Device, DeviceError, MacAddress};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read device index: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse device index: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid device entry #{index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: DeviceError,
    },
}

/// The on-disk device index
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceIndex {
    /// Version of the device index format
    #[serde(default = "default_version")]
    pub version: String,
    /// Device entries
    #[serde(default)]
    pub device: Vec<Device>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl DeviceIndex {
    /// Load device index from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load device index from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let index: DeviceIndex = toml::from_str(content)?;
        Ok(index)
    }
}

/// In-memory device lookup by MAC address
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, Device>,
}

impl DeviceRegistry {
    /// Build a registry from an index
    ///
    /// Every entry must carry a valid MAC address. When two entries name the
    /// same device, the later one wins.
    pub fn from_index(index: DeviceIndex) -> Result<Self, RegistryError> {
        let mut devices = HashMap::with_capacity(index.device.len());
        for (i, device) in index.device.into_iter().enumerate() {
            let mac = MacAddress::parse(&device.mac)
                .map_err(|source| RegistryError::InvalidEntry { index: i, source })?;
            if let Some(previous) = devices.insert(mac.key().to_string(), device) {
                warn!(mac = %previous.mac, "Duplicate device entry, keeping the later one");
            }
        }
        Ok(Self { devices })
    }

    /// Load from a file
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        Self::from_index(DeviceIndex::from_file(path)?)
    }

    /// Load from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        Self::from_index(DeviceIndex::from_toml(content)?)
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a device by MAC address
    pub fn get(&self, mac: &MacAddress) -> Option<&Device> {
        self.devices.get(mac.key())
    }

    /// All devices, sorted by canonical MAC
    pub fn devices(&self) -> Vec<&Device> {
        let mut keys: Vec<&String> = self.devices.keys().collect();
        keys.sort();
        keys.into_iter().map(|k| &self.devices[k]).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INDEX: &str = r#"
version = "1.0"

[[device]]
mac = "aa-bb-cc-dd-ee-ff"
model = "DESK"
username = "john"
password = "doe"

[[device]]
mac = "AA:BB:CC:11:22:33"
model = "CONFERENCE"
username = "jane"
password = "roe"
override = '{"timeout": 10}'

[[device]]
mac = "f1-e2-d3-c4-b5-a6"
model = "DESK"
username = "sue"
password = "pw"
override = """
domain=sip.anotherdomain.com
port=5161"""
"#;

    #[test]
    fn test_registry_lookup() {
        let registry = DeviceRegistry::from_toml(INDEX).unwrap();
        assert_eq!(registry.len(), 3);

        // Lookup ignores separator style and case
        let mac = MacAddress::parse("aa:bb:cc:11:22:33").unwrap();
        let device = registry.get(&mac).unwrap();
        assert_eq!(device.username, "jane");
        assert_eq!(device.override_fragment.as_deref(), Some(r#"{"timeout": 10}"#));

        let mac = MacAddress::parse("F1:E2:D3:C4:B5:A6").unwrap();
        assert_eq!(
            registry.get(&mac).unwrap().override_fragment.as_deref(),
            Some("domain=sip.anotherdomain.com\nport=5161")
        );

        let unknown = MacAddress::parse("00-00-00-00-00-00").unwrap();
        assert!(registry.get(&unknown).is_none());
    }

    #[test]
    fn test_devices_sorted() {
        let registry = DeviceRegistry::from_toml(INDEX).unwrap();
        let macs: Vec<&str> = registry.devices().iter().map(|d| d.mac.as_str()).collect();
        assert_eq!(macs, vec!["AA:BB:CC:11:22:33", "aa-bb-cc-dd-ee-ff", "f1-e2-d3-c4-b5-a6"]);
    }

    #[test]
    fn test_duplicate_later_wins() {
        let toml = r#"
[[device]]
mac = "aa-bb-cc-dd-ee-ff"
model = "DESK"
username = "first"
password = "x"

[[device]]
mac = "AA:BB:CC:DD:EE:FF"
model = "DESK"
username = "second"
password = "y"
"#;
        let registry = DeviceRegistry::from_toml(toml).unwrap();
        assert_eq!(registry.len(), 1);
        let mac = MacAddress::parse("aa-bb-cc-dd-ee-ff").unwrap();
        assert_eq!(registry.get(&mac).unwrap().username, "second");
    }

    #[test]
    fn test_invalid_entry() {
        let toml = r#"
[[device]]
mac = "not-a-mac"
model = "DESK"
username = "john"
password = "doe"
"#;
        let err = DeviceRegistry::from_toml(toml).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidEntry { index: 0, .. }));
    }

    #[test]
    fn test_missing_field() {
        let toml = r#"
[[device]]
mac = "aa-bb-cc-dd-ee-ff"
model = "DESK"
"#;
        assert!(matches!(
            DeviceRegistry::from_toml(toml),
            Err(RegistryError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("devices.toml");
        std::fs::write(
            &path,
            r#"
[[device]]
mac = "aa-bb-cc-dd-ee-ff"
model = "DESK"
username = "john"
password = "doe"
override = "timeout=10"
"#,
        )
        .unwrap();

        let registry = DeviceRegistry::from_file(&path).unwrap();
        let mac = MacAddress::parse("aa-bb-cc-dd-ee-ff").unwrap();
        let device = registry.get(&mac).unwrap();
        assert_eq!(device.password, "doe");
        assert_eq!(device.override_fragment.as_deref(), Some("timeout=10"));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = DeviceRegistry::from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, RegistryError::IoError(_)));
        assert!(DeviceRegistry::empty().is_empty());
    }
}
