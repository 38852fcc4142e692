//! Note field round trip
//!
//! A field is stored as HTML. When the user switches it to Markdown and back,
//! the Markdown they typed is kept in the metadata marker so that the exact
//! source comes back, not a reconstruction from the HTML. The reconstruction is
//! only used when the HTML was edited elsewhere or the marker is missing or
//! corrupted.

use crate::common::text::is_same_markdown;
use crate::error::BabelError;
use crate::formats::html::{to_clean_html, to_html};
use crate::formats::markdown::to_markdown;
use crate::formats::MarkdownOptions;
use crate::metadata::{decode_as, embed_marker, encode_with, extract_marker, Decoded};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Authoring state of one note field, as carried in the metadata marker.
///
/// The JSON keys are fixed by fields already stored in notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteFieldState {
    pub id: u64,
    /// The field currently shows its Markdown source rather than rendered HTML.
    #[serde(rename = "isconverted")]
    pub is_markdown: bool,
    #[serde(rename = "md")]
    pub markdown: String,
    #[serde(rename = "lastmodified", default, with = "last_modified")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl NoteFieldState {
    pub fn new(id: u64, is_markdown: bool, markdown: impl Into<String>) -> Self {
        Self {
            id,
            is_markdown,
            markdown: markdown.into(),
            last_modified: None,
        }
    }

    pub fn touched(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }
}

/// Where the Markdown of a [`MarkdownView`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The Markdown stored in the marker, verbatim.
    Stored,
    /// Converted from the HTML: no marker, or the HTML changed since it was written.
    Converted,
    /// Converted from the HTML because the marker could not be decoded.
    Recovered,
}

/// A field opened for Markdown editing.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownView {
    pub markdown: String,
    /// The Markdown as the source view shows it.
    pub clean_html: String,
    pub source: Source,
}

/// Write a field: its HTML view plus a marker carrying `state`.
///
/// A field in Markdown mode shows the source view, otherwise the rendered view.
pub fn render_field(state: &NoteFieldState, options: &MarkdownOptions) -> Result<String, BabelError> {
    let body = field_body(state, options);
    Ok(embed_marker(&body, &encode_with(state)?))
}

/// Open a field for Markdown editing.
pub fn restore_field(html: &str, options: &MarkdownOptions) -> MarkdownView {
    let converted = to_markdown(html, options);
    let (markdown, source) = match decode_as::<NoteFieldState>(extract_marker(html)) {
        Decoded::Data(state) => {
            let expected = to_markdown(&field_body(&state, options), options);
            if is_same_markdown(&expected, &converted) {
                (state.markdown, Source::Stored)
            } else {
                debug!("field {} changed since it was written, converting", state.id);
                (converted, Source::Converted)
            }
        }
        Decoded::Empty => (converted, Source::Converted),
        Decoded::Corrupted => {
            warn!("corrupted metadata in note field, falling back to converted markdown");
            (converted, Source::Recovered)
        }
    };
    let clean_html = to_clean_html(&markdown, options);
    MarkdownView {
        markdown,
        clean_html,
        source,
    }
}

fn field_body(state: &NoteFieldState, options: &MarkdownOptions) -> String {
    if state.is_markdown {
        to_clean_html(&state.markdown, options)
    } else {
        to_html(&state.markdown, options)
    }
}

/// `lastmodified` is an RFC 3339 timestamp, or the empty string when unset.
mod last_modified {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}
