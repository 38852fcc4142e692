//! Markdown ↔ HTML conversion for note fields
//!
//!     A note field is stored as HTML. This crate turns that HTML into the Markdown the user edits
//!     and renders the Markdown back, keeping the user's exact source in a hidden metadata marker
//!     so that switching back and forth does not drift.
//!
//!     This is a pure lib: no I/O, no global state, no logger installed. Every entry point takes
//!     `&str` and the options it needs; hosts holding raw bytes go through [`require_text`].
//!
//! Architecture
//!
//!     .
//!     ├── error.rs                # BabelError, require_text
//!     ├── metadata.rs             # base64/JSON payload inside <!----SBAdata:...---->
//!     ├── note.rs                 # field state, render_field / restore_field
//!     ├── formats
//!     │   ├── markdown            # HTML → Markdown (DOM walk + fixups)
//!     │   └── html                # Markdown → HTML (source view, engine render + passes)
//!     └── common
//!         ├── masking.rs          # which spans overlap code
//!         ├── links.rs            # link/image target rewriting, code region scan
//!         └── text.rs             # small string helpers
//!
//! Core Algorithms
//!
//!     The delicate part is rewriting link targets without touching code. Link spans and code
//!     regions are found independently, then masked against each other (./common/masking.rs); only
//!     links with both bounds intact are rewritten. Everything else in the pipeline is a plain
//!     walk over the DOM or over lines.
//!
//! Error handling
//!
//!     Only programmer errors are `Err`: non-UTF-8 input at the byte boundary and payloads that
//!     cannot be serialized. Corrupted metadata decodes to a value (`Decoded::Corrupted`) and the
//!     conversion carries on; definition shapes that do not match are left as they are.
//!
//! Library Choices
//!
//!     `html5ever` + `markup5ever_rcdom` parse the note HTML, `comrak` renders Markdown, `base64`
//!     and `serde_json` carry the metadata payload. We never write a Markdown grammar ourselves.

pub mod common;
pub mod error;
pub mod formats;
pub mod metadata;
pub mod note;

pub use error::{require_text, BabelError};
pub use formats::html::{to_clean_html, to_html};
pub use formats::markdown::to_markdown;
pub use formats::MarkdownOptions;
pub use note::{render_field, restore_field, MarkdownView, NoteFieldState, Source};
