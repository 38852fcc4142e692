//! Markdown text → HTML
//!
//! Two outputs: the clean source view, one escaped `<div>` per line, and the
//! rendered view produced by `comrak`.

use crate::common::text::escape_html_chars;
use crate::formats::MarkdownOptions;
use comrak::{markdown_to_html, ComrakOptions};

/// One `<div>` per source line.
pub fn serialize_to_clean_html(markdown: &str, options: &MarkdownOptions) -> String {
    if markdown.is_empty() {
        return String::new();
    }
    let mut lines: Vec<&str> = markdown.split('\n').collect();
    if lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|line| clean_line(line, options.put_breaks))
        .collect()
}

fn clean_line(line: &str, put_breaks: bool) -> String {
    if line.is_empty() {
        return if put_breaks {
            "<div><br /></div>".to_string()
        } else {
            "<div></div>".to_string()
        };
    }
    if line.trim().is_empty() {
        return "<div><br /></div>".to_string();
    }

    let body = line.trim_start_matches([' ', '\t']);
    let indent = &line[..line.len() - body.len()];
    let width: usize = indent.chars().map(|c| if c == '\t' { 4 } else { 1 }).sum();

    let mut div = String::from("<div>");
    for column in 0..width {
        div.push_str(if column % 2 == 0 { "&nbsp;" } else { " " });
    }
    div.push_str(&escape_html_chars(body));
    div.push_str("</div>");
    div
}

/// Render Markdown with the engine.
///
/// With `put_breaks`, a newline inside a paragraph becomes `<br />`.
pub fn render_with_engine(markdown: &str, options: &MarkdownOptions) -> String {
    markdown_to_html(markdown, &comrak_options(options))
}

fn comrak_options(markdown_options: &MarkdownOptions) -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.footnotes = true;
    options.extension.description_lists = true;
    // Raw HTML typed into a note is passed through
    options.render.unsafe_ = true;
    options.render.hardbreaks = markdown_options.put_breaks;
    options
}
