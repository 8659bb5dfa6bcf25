//! Application state management

use anyhow::Result;
use serde::Serialize;
use sipcfg_core::{
    generate, DeviceError, DeviceModel, DeviceRegistry, GenerateError, MacAddress,
    ProvisioningDefaults, RegistryError,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::Config;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    InvalidMac(#[from] DeviceError),
    #[error("Device not found for MAC address: {0}")]
    NotFound(String),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// A generated payload ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub body: String,
    pub content_type: &'static str,
}

/// Device listing entry; credentials are left out
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSummary {
    pub mac: String,
    pub model: String,
    pub has_override: bool,
}

/// Shared application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Defaults applied to every payload, fixed at startup
    pub defaults: ProvisioningDefaults,
    /// Provisioned devices
    pub registry: Arc<RwLock<DeviceRegistry>>,
}

impl AppState {
    /// Create new application state, loading the device index
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let registry = load_registry(&config.devices.path)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create application state around an already-loaded registry
    pub fn with_registry(config: Config, registry: DeviceRegistry) -> Arc<Self> {
        let defaults = config.provisioning.to_defaults();
        Arc::new(Self {
            config,
            defaults,
            registry: Arc::new(RwLock::new(registry)),
        })
    }

    /// Look up a device and generate its provisioning payload
    pub async fn provision(&self, mac: &str) -> Result<Payload, ProvisionError> {
        let mac = MacAddress::parse(mac)?;

        // Generation runs on a snapshot so the lock is not held across it
        let device = self.registry.read().await.get(&mac).cloned();
        let Some(device) = device else {
            warn!(mac = %mac, "Device not found");
            return Err(ProvisionError::NotFound(mac.to_string()));
        };
        debug!(mac = %mac, model = %device.model, "Device found");

        let body = generate(&device, &self.defaults)?;
        let content_type = device
            .device_model()
            .unwrap_or(DeviceModel::Desk)
            .content_type();

        Ok(Payload { body, content_type })
    }

    /// List provisioned devices
    pub async fn device_summaries(&self) -> Vec<DeviceSummary> {
        self.registry
            .read()
            .await
            .devices()
            .into_iter()
            .map(|d| DeviceSummary {
                mac: d.mac.clone(),
                model: d.model.clone(),
                has_override: d.override_fragment.is_some(),
            })
            .collect()
    }

    /// Re-read the device index; the current registry is kept on failure
    pub async fn reload_devices(&self) -> Result<usize, RegistryError> {
        let registry = DeviceRegistry::from_file(Path::new(&self.config.devices.path))?;
        let count = registry.len();
        *self.registry.write().await = registry;
        info!(path = %self.config.devices.path, count, "Reloaded device index");
        Ok(count)
    }
}

/// Load device registry from file, or start empty when the file is absent
fn load_registry(path: &str) -> Result<DeviceRegistry> {
    let path = Path::new(path);
    if path.exists() {
        let registry = DeviceRegistry::from_file(path)?;
        info!(
            path = %path.display(),
            count = registry.len(),
            "Loaded device index"
        );
        Ok(registry)
    } else {
        warn!(path = %path.display(), "Device index not found, starting with no devices");
        Ok(DeviceRegistry::empty())
    }
}
