//! Codec list formatting for each payload format

use crate::device::DeviceModel;

/// Format the codec list for embedding in a payload of the given model
///
/// Desk payloads get the plain comma-joined list. Conference payloads get
/// quoted tokens separated by commas, ready to sit between `[` and `]`.
/// Tokens are not escaped; codec names are expected to be plain identifiers.
pub fn format_codecs(codecs: &[String], model: DeviceModel) -> String {
    match model {
        DeviceModel::Desk => codecs.join(","),
        DeviceModel::Conference => codecs
            .iter()
            .map(|codec| format!("\"{}\"", codec))
            .collect::<Vec<_>>()
            .join(","),
    }
}
