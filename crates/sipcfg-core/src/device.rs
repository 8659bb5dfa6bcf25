//! Device records keyed by MAC address

use regex_lite::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

static MAC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("MAC pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),
}

/// Hardware identifier of a phone
///
/// Holds the text the caller supplied plus a canonical key (lowercase octets
/// joined by `-`), so `AA:BB:CC:DD:EE:FF` and `aa-bb-cc-dd-ee-ff` resolve to
/// the same device.
#[derive(Debug, Clone)]
pub struct MacAddress {
    raw: String,
    key: String,
}

impl MacAddress {
    /// Validate and canonicalize a MAC address string
    pub fn parse(text: &str) -> Result<Self, DeviceError> {
        if !MAC_PATTERN.is_match(text) {
            return Err(DeviceError::InvalidMac(text.to_string()));
        }
        let key = text.to_ascii_lowercase().replace(':', "-");
        Ok(Self {
            raw: text.to_string(),
            key,
        })
    }

    /// Canonical registry key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for MacAddress {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for MacAddress {}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Phone model family, which fixes the payload format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceModel {
    /// Desk phone, provisioned with line-oriented `key=value` text
    Desk,
    /// Conference phone, provisioned with a JSON object
    Conference,
}

impl DeviceModel {
    /// Resolve a stored model tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("desk") {
            Some(Self::Desk)
        } else if tag.eq_ignore_ascii_case("conference") {
            Some(Self::Conference)
        } else {
            None
        }
    }

    /// HTTP content type of the generated payload
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Desk => "text/plain; charset=utf-8",
            Self::Conference => "application/json",
        }
    }
}

impl std::fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desk => write!(f, "DESK"),
            Self::Conference => write!(f, "CONFERENCE"),
        }
    }
}

/// A provisioned phone as stored in the device registry
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    /// MAC address as written in the device file
    pub mac: String,
    /// Model tag (e.g. "DESK", "CONFERENCE"); kept raw so unknown tags
    /// surface at generation time
    pub model: String,
    /// SIP account username
    pub username: String,
    /// SIP account password
    pub password: String,
    /// Raw override fragment in the model's payload syntax
    #[serde(default, rename = "override")]
    pub override_fragment: Option<String>,
}

impl Device {
    /// Create a device record without an override fragment
    pub fn new(
        mac: impl Into<String>,
        model: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            mac: mac.into(),
            model: model.into(),
            username: username.into(),
            password: password.into(),
            override_fragment: None,
        }
    }

    /// Attach an override fragment
    pub fn with_override(mut self, fragment: impl Into<String>) -> Self {
        self.override_fragment = Some(fragment.into());
        self
    }

    /// Resolved model, if the tag is one we know
    pub fn device_model(&self) -> Option<DeviceModel> {
        DeviceModel::from_tag(&self.model)
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("mac", &self.mac)
            .field("model", &self.model)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("override_fragment", &self.override_fragment)
            .finish()
    }
}
