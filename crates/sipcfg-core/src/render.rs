//! Base payload renderers
//!
//! Both renderers emit the same five settings in the same order:
//! username, password, domain, port, codecs.

use serde_json::Value;

use crate::codec::format_codecs;
use crate::defaults::ProvisioningDefaults;
use crate::device::{Device, DeviceModel};

/// Render the line-oriented desk payload
///
/// Five `key=value` lines with no trailing newline. Values are written
/// verbatim; nothing is escaped.
pub fn render_line(device: &Device, defaults: &ProvisioningDefaults) -> String {
    format!(
        "username={}\npassword={}\ndomain={}\nport={}\ncodecs={}",
        device.username,
        device.password,
        defaults.domain,
        defaults.port,
        format_codecs(&defaults.codecs, DeviceModel::Desk),
    )
}

/// Render the JSON conference payload
///
/// String values are JSON-escaped and `port` is always a string. Codec
/// tokens are embedded as-is.
pub fn render_json(device: &Device, defaults: &ProvisioningDefaults) -> String {
    format!(
        "{{\n  \"username\" : {},\n  \"password\" : {},\n  \"domain\" : {},\n  \"port\" : {},\n  \"codecs\" : [{}]\n}}",
        json_string(&device.username),
        json_string(&device.password),
        json_string(&defaults.domain),
        json_string(&defaults.port),
        format_codecs(&defaults.codecs, DeviceModel::Conference),
    )
}

fn json_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
