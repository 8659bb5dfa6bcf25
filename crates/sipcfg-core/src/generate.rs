//! Provisioning payload generation
//!
//! Picks the renderer/merger pair for the device model, renders the base
//! payload from the device record and shared defaults, then applies the
//! device's override fragment if it has one.

use thiserror::Error;
use tracing::{debug, error};

use crate::defaults::ProvisioningDefaults;
use crate::device::{Device, DeviceModel};
use crate::merge::{merge_json, merge_line};
use crate::render::{render_json, render_line};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Unsupported device model: {0}")]
    UnsupportedModel(String),
    #[error("Malformed override fragment: line {line} has no '=': {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("Malformed override fragment: line {line} has an empty key")]
    EmptyKey { line: usize },
    #[error("Invalid JSON in {part}: {source}")]
    InvalidJson {
        part: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed {part}: expected a JSON object, found {found}")]
    NotAnObject {
        part: &'static str,
        found: &'static str,
    },
    #[error("Failed to serialize merged payload: {0}")]
    Serialize(#[source] serde_json::Error),
}

type Renderer = fn(&Device, &ProvisioningDefaults) -> String;
type Merger = fn(&str, &str) -> Result<String, GenerateError>;

fn pipeline(model: DeviceModel) -> (Renderer, Merger) {
    match model {
        DeviceModel::Desk => (render_line as Renderer, merge_line as Merger),
        DeviceModel::Conference => (render_json as Renderer, merge_json as Merger),
    }
}

/// Generate the provisioning payload for a device
///
/// Pure function of its inputs; either the full payload is returned or an
/// error, never a partial payload. Only an absent override skips the merge;
/// an empty fragment is merged like any other and fails as malformed.
pub fn generate(device: &Device, defaults: &ProvisioningDefaults) -> Result<String, GenerateError> {
    let model = device.device_model().ok_or_else(|| {
        error!(mac = %device.mac, model = %device.model, "Unsupported device model");
        GenerateError::UnsupportedModel(device.model.clone())
    })?;

    debug!(mac = %device.mac, model = %model, "Generating provisioning payload");
    let (render, merge) = pipeline(model);
    let payload = render(device, defaults);

    match device.override_fragment.as_deref() {
        Some(fragment) => {
            debug!(mac = %device.mac, "Applying override fragment");
            merge(&payload, fragment).map_err(|e| {
                error!(mac = %device.mac, error = %e, "Failed to apply override fragment");
                e
            })
        }
        None => Ok(payload),
    }
}
