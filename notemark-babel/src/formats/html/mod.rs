//! Markdown → HTML
//!
//! # Library Choice
//!
//! Block and inline Markdown grammar is left to `comrak` (tables, footnotes,
//! description lists, strikethrough, autolinks, task lists, superscript). What
//! this module adds is around the engine:
//!
//! - abbreviation definitions are taken out of the source before rendering and
//!   applied as `<abbr>` elements afterwards;
//! - a `: definition` line directly under its term gets the blank line the
//!   engine needs, and the colon is put back into each `<dd>` after rendering,
//!   so the HTML keeps the convention the Markdown was written in.
//!
//! The source view ([`to_clean_html`]) does not render anything: it shows the
//! Markdown as typed, one line per `<div>`, with indentation made visible.

pub mod postprocess;
pub mod serializer;

use crate::formats::MarkdownOptions;

/// Show Markdown source as HTML: one escaped `<div>` per line.
///
/// A single trailing newline does not produce a line of its own. Leading
/// spaces alternate between `&nbsp;` and a plain space so a browser keeps them;
/// a tab counts as four columns. A line with only whitespace becomes
/// `<div><br /></div>`; an empty line becomes `<div></div>`, or the same with a
/// `<br />` when `put_breaks` is set.
pub fn to_clean_html(markdown: &str, options: &MarkdownOptions) -> String {
    serializer::serialize_to_clean_html(markdown, options)
}

/// Render Markdown to HTML.
///
/// With `put_breaks` set, single newlines inside a paragraph are kept as
/// `<br />`, matching what the source view shows line by line.
pub fn to_html(markdown: &str, options: &MarkdownOptions) -> String {
    if markdown.is_empty() {
        return String::new();
    }
    let (prepared, abbreviations) = postprocess::prepare_markdown(markdown);
    let html = serializer::render_with_engine(&prepared, options);
    let html = postprocess::wrap_abbreviations(&html, &abbreviations);
    postprocess::put_colons_in_html_def_list(&html)
}
