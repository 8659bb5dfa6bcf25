//! Override fragment mergers
//!
//! A desk fragment is a list of `key=value` lines. Each line replaces the
//! payload line with the same key in place, or is appended when the key is
//! new. Keys are compared as whole tokens (the text before the first `=`),
//! so `port=...` never touches a `reportport=...` line. Fragment lines may
//! end in `\r\n`; the trailing `\r` is dropped before the line is split.
//! Trailing newlines at the end of the fragment are ignored.
//!
//! A conference fragment is a JSON object shallow-merged over the payload
//! object: top-level keys from the fragment overwrite or extend the payload,
//! nested values are replaced wholesale.

use serde_json::{Map, Value};

use crate::generate::GenerateError;
use crate::pretty;

/// Merge a line-format override fragment into a line-format payload
pub fn merge_line(base: &str, fragment: &str) -> Result<String, GenerateError> {
    let mut lines: Vec<String> = base.split('\n').map(str::to_string).collect();

    for (idx, entry) in fragment.trim_end_matches('\n').split('\n').enumerate() {
        let entry = entry.strip_suffix('\r').unwrap_or(entry);
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| GenerateError::MalformedLine {
                line: idx + 1,
                content: entry.to_string(),
            })?;
        if key.is_empty() {
            return Err(GenerateError::EmptyKey { line: idx + 1 });
        }

        let setting = format!("{}={}", key, value);
        let mut replaced = false;
        for line in lines.iter_mut().filter(|line| line_key(line) == Some(key)) {
            line.clone_from(&setting);
            replaced = true;
        }
        if !replaced {
            lines.push(setting);
        }
    }

    Ok(lines.join("\n"))
}

fn line_key(line: &str) -> Option<&str> {
    line.split_once('=').map(|(key, _)| key)
}

/// Shallow-merge a JSON override object into a JSON payload object
///
/// Overwritten keys keep their position in the payload; keys only present
/// in the fragment are appended in fragment order.
pub fn merge_json(base: &str, fragment: &str) -> Result<String, GenerateError> {
    let mut merged = parse_object(base, "base payload")?;
    let overrides = parse_object(fragment, "override fragment")?;

    for (key, value) in overrides {
        merged.insert(key, value);
    }

    pretty::to_string_pretty(&Value::Object(merged)).map_err(GenerateError::Serialize)
}

fn parse_object(text: &str, part: &'static str) -> Result<Map<String, Value>, GenerateError> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| GenerateError::InvalidJson { part, source })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(GenerateError::NotAnObject {
            part,
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
