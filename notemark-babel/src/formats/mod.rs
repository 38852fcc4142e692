//! Conversion directions
//!
//! Each direction is a pure transform with no state kept between calls:
//!
//! - [`markdown`]: HTML → Markdown, the view the user edits.
//! - [`html`]: Markdown → HTML, both the escaped source view and the rendered view.
//!
//! Both directions take the same [`MarkdownOptions`].

pub mod html;
pub mod markdown;

/// Knobs shared by both conversion directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Separate blocks that came from different HTML elements with a blank line.
    pub keep_empty_lines: bool,
    /// Put a `<br />` inside the `<div>` of an empty source line.
    ///
    /// The rendered view follows the same setting: a single newline inside a
    /// paragraph becomes a hard break, so it keeps the line structure the
    /// source view shows.
    pub put_breaks: bool,
    /// Follow each `: definition` line with a blank line when the next line has text.
    pub separate_definition_groups: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            keep_empty_lines: false,
            put_breaks: false,
            separate_definition_groups: true,
        }
    }
}
