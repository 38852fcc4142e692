//! HTML → Markdown
//!
//! Converts the HTML stored in a note field into the Markdown the user edits.
//!
//! # Library Choice
//!
//! HTML is parsed with `html5ever` into a `markup5ever_rcdom` tree. Notes come
//! from rich-text editors and are rarely well formed; a browser-grade parser
//! recovers the structure the user actually saw.
//!
//! # Pipeline
//!
//! 1. DOM walk (see [`serializer`]): block elements become Markdown blocks,
//!    inline markup becomes Markdown inline syntax, nothing is escaped.
//! 2. Link and image targets get whitespace and escaped parentheses replaced by
//!    character references, skipping code (see [`crate::common::links`]).
//! 3. Definition lines written by the walker as `    : text` are flattened, and
//!    optionally separated from the next term by a blank line.
//! 4. Indented abbreviation definitions are flattened.
//!
//! # Element Mapping
//!
//! | HTML                       | Markdown                          |
//! |----------------------------|-----------------------------------|
//! | `<div>`                    | one line, no blank line around it |
//! | `<p>`, `<h1>`..`<h6>`      | paragraph, `#` heading            |
//! | `<dl>`/`<dt>`/`<dd>`       | `term` / `: definition`           |
//! | `<pre><code>`              | fenced block with language        |
//! | `<ul>`, `<ol>`, `<li>`     | `- item`, `1. item`               |
//! | `<a>`, `<img>`             | `[text](target)`, `![alt](src)`   |
//! | `<abbr title>`             | text plus `*[TERM]: title` line   |
//! | `<table>`                  | pipe table with alignment row     |
//! | comments                   | dropped                           |

pub mod fixups;
pub mod serializer;

use crate::common::links::protect_link_targets;
use crate::formats::MarkdownOptions;

/// Convert note HTML to Markdown.
///
/// Empty input gives empty output; anything else is newline terminated.
pub fn to_markdown(html: &str, options: &MarkdownOptions) -> String {
    if html.is_empty() {
        return String::new();
    }
    let markdown = serializer::serialize_to_markdown(html, options);
    let markdown = protect_link_targets(&markdown);
    let markdown = fixups::remove_leading_whitespace_from_dd_element(
        &markdown,
        options.separate_definition_groups,
    );
    fixups::remove_whitespace_before_abbreviation_definition(&markdown)
}
