//! Process-wide provisioning defaults shared by every generated payload

use serde::{Deserialize, Serialize};

/// Domain, port and codec list applied to every device
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningDefaults {
    /// SIP registrar domain
    pub domain: String,
    /// SIP port; kept as text, not required to be numeric
    pub port: String,
    /// Codec names in preference order
    pub codecs: Vec<String>,
}

impl ProvisioningDefaults {
    /// Build defaults from a comma-separated codec list (e.g. "G711,G729,OPUS")
    pub fn new(domain: impl Into<String>, port: impl Into<String>, codecs: &str) -> Self {
        Self {
            domain: domain.into(),
            port: port.into(),
            codecs: split_codecs(codecs),
        }
    }
}

/// Split a comma-separated codec setting, keeping order and token text as-is
pub fn split_codecs(list: &str) -> Vec<String> {
    list.split(',').map(str::to_string).collect()
}
