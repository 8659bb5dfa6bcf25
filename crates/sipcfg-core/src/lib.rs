//! sipcfg Core - Device records, payload rendering, and override merging
//!
//! This crate provides the provisioning engine used by the daemon:
//! - Device records keyed by MAC address, and the on-disk device registry
//! - Shared provisioning defaults (domain, port, codec list)
//! - Line and JSON payload renderers
//! - Override fragment mergers for both payload formats

pub mod codec;
pub mod defaults;
pub mod device;
pub mod generate;
pub mod merge;
pub mod pretty;
pub mod registry;
pub mod render;

pub use defaults::ProvisioningDefaults;
pub use device::{Device, DeviceError, DeviceModel, MacAddress};
pub use generate::{generate, GenerateError};
pub use registry::{DeviceIndex, DeviceRegistry, RegistryError};
