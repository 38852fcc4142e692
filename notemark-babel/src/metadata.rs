//! Embedded metadata channel
//!
//! Authoring state travels with the rendered HTML of a field inside a hidden
//! comment:
//!
//! ```text
//! <!----SBAdata:<base64 of a JSON document>---->
//! ```
//!
//! The marker text is fixed; hosts that already stored fields depend on it.
//!
//! Decoding never fails. A payload that is not base64, not UTF-8 or not JSON
//! comes back as [`Decoded::Corrupted`] so the surrounding conversion can carry
//! on with whatever the HTML itself says.

use crate::error::BabelError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Opening delimiter of the metadata comment.
pub const MARKER_START: &str = "<!----SBAdata:";
/// Closing delimiter of the metadata comment.
pub const MARKER_END: &str = "---->";

/// Outcome of decoding a metadata payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T = Value> {
    /// The payload was empty: no metadata, not an error.
    Empty,
    /// The payload decoded cleanly.
    Data(T),
    /// The payload failed base64, UTF-8 or JSON validation.
    Corrupted,
}

impl<T> Decoded<T> {
    pub fn data(self) -> Option<T> {
        match self {
            Decoded::Data(data) => Some(data),
            Decoded::Empty | Decoded::Corrupted => None,
        }
    }

    pub fn is_corrupted(&self) -> bool {
        matches!(self, Decoded::Corrupted)
    }
}

/// Encode a JSON document as base64 of its compact text form.
///
/// Object keys are emitted in sorted order, so equal documents encode equally.
pub fn encode(payload: &Value) -> String {
    STANDARD.encode(payload.to_string())
}

/// Encode any serializable payload.
pub fn encode_with<T: Serialize>(payload: &T) -> Result<String, BabelError> {
    Ok(STANDARD.encode(serde_json::to_string(payload)?))
}

/// Decode a base64 payload into a JSON document.
pub fn decode(encoded: &str) -> Decoded {
    decode_as(encoded)
}

/// Decode a base64 payload into a typed document.
pub fn decode_as<T: DeserializeOwned>(encoded: &str) -> Decoded<T> {
    if encoded.is_empty() {
        return Decoded::Empty;
    }
    let Ok(bytes) = STANDARD.decode(encoded) else {
        return Decoded::Corrupted;
    };
    let Ok(text) = String::from_utf8(bytes) else {
        return Decoded::Corrupted;
    };
    match serde_json::from_str(&text) {
        Ok(data) => Decoded::Data(data),
        Err(_) => Decoded::Corrupted,
    }
}

/// Return the raw (still encoded) payload between the marker delimiters.
///
/// A missing start or end delimiter means there is no metadata: the result is
/// the empty string in both cases.
pub fn extract_marker(html: &str) -> &str {
    marker_bounds(html)
        .map(|(start, end)| &html[start + MARKER_START.len()..end - MARKER_END.len()])
        .unwrap_or("")
}

/// Remove every complete metadata marker from `html`.
pub fn strip_marker(html: &str) -> String {
    let mut rest = html;
    let mut stripped = String::with_capacity(html.len());
    while let Some((start, end)) = marker_bounds(rest) {
        stripped.push_str(&rest[..start]);
        rest = &rest[end..];
    }
    stripped.push_str(rest);
    stripped
}

/// Append a marker carrying `encoded`, replacing any marker already present.
pub fn embed_marker(html: &str, encoded: &str) -> String {
    let mut embedded = strip_marker(html);
    embedded.push_str(MARKER_START);
    embedded.push_str(encoded);
    embedded.push_str(MARKER_END);
    embedded
}

/// Byte range of the first complete marker, delimiters included.
fn marker_bounds(html: &str) -> Option<(usize, usize)> {
    let start = html.find(MARKER_START)?;
    let payload_at = start + MARKER_START.len();
    let end = payload_at + html[payload_at..].find(MARKER_END)? + MARKER_END.len();
    Some((start, end))
}
