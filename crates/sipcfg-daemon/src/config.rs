//! Configuration loading and validation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sipcfg_core::ProvisioningDefaults;
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Bind address for web server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TLS configuration (optional - enables HTTPS when present)
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            tls: None,
        }
    }
}

/// TLS/HTTPS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM format)
    pub cert: String,
    /// Path to private key file (PEM format)
    pub key: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Settings shared by every generated payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// SIP registrar domain
    #[serde(default = "default_domain")]
    pub domain: String,
    /// SIP port
    #[serde(default = "default_port")]
    pub port: String,
    /// Comma-separated codec list, in preference order
    #[serde(default = "default_codecs")]
    pub codecs: String,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            port: default_port(),
            codecs: default_codecs(),
        }
    }
}

fn default_domain() -> String {
    "sip.voxloud.com".to_string()
}

fn default_port() -> String {
    "5060".to_string()
}

fn default_codecs() -> String {
    "G711,G729,OPUS".to_string()
}

impl ProvisioningConfig {
    /// Convert to the immutable defaults used for generation
    pub fn to_defaults(&self) -> ProvisioningDefaults {
        ProvisioningDefaults::new(&self.domain, &self.port, &self.codecs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesConfig {
    /// Path to device index file
    #[serde(default = "default_devices_path")]
    pub path: String,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            path: default_devices_path(),
        }
    }
}

fn default_devices_path() -> String {
    "./devices.toml".to_string()
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}
