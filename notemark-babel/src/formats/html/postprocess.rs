//! Passes around the rendering engine
//!
//! The engine knows nothing about abbreviations and drops the leading colon of
//! a definition. [`prepare_markdown`] runs before rendering, the other two
//! passes run on the rendered HTML.

use crate::common::links::{code_regions, in_code};
use crate::common::text::escape_html_chars;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static ABBREVIATION_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\[([^\]\n]+)\]:[ \t]*(.*?)[ \t]*$").expect("invalid abbreviation line regex")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));

static TAG_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)").expect("invalid tag name regex"));

static DD_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<dd(?:\s[^>]*)?>").expect("invalid dd regex"));

static P_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*<p(?:\s[^>]*)?>").expect("invalid p regex"));

/// An abbreviation definition: `*[TERM]: expansion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviation {
    pub term: String,
    pub expansion: String,
}

/// Get Markdown ready for the engine.
///
/// Outside code: abbreviation definition lines are taken out and returned
/// separately, and a `: definition` line right under a line of text gets a blank
/// line in front of it, which the engine requires between term and details.
pub fn prepare_markdown(markdown: &str) -> (String, Vec<Abbreviation>) {
    let protected = code_regions(markdown);

    let mut prepared = String::with_capacity(markdown.len());
    let mut abbreviations = Vec::new();
    let mut previous_blank = true;
    let mut offset = 0;
    for line in markdown.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        if !in_code(&protected, line_start) {
            if let Some(caps) = ABBREVIATION_LINE_RE.captures(content) {
                let term = caps[1].to_string();
                if !abbreviations.iter().any(|known: &Abbreviation| known.term == term) {
                    abbreviations.push(Abbreviation {
                        term,
                        expansion: caps[2].to_string(),
                    });
                }
                continue;
            }
            if content.starts_with(": ") && !previous_blank {
                prepared.push('\n');
            }
        }
        prepared.push_str(line);
        previous_blank = content.trim().is_empty();
    }
    (prepared, abbreviations)
}

/// Wrap every whole-word occurrence of an abbreviation term in
/// `<abbr title="…">`. Text inside `<code>` and `<pre>` is left alone, and so
/// is everything inside tags.
pub fn wrap_abbreviations(html: &str, abbreviations: &[Abbreviation]) -> String {
    if abbreviations.is_empty() {
        return html.to_string();
    }
    let mut sorted: Vec<&Abbreviation> = abbreviations.iter().collect();
    sorted.sort_by(|a, b| b.term.len().cmp(&a.term.len()));
    let pattern = sorted
        .iter()
        .map(|abbreviation| regex::escape(&escape_like_engine(&abbreviation.term)))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(term_re) = Regex::new(&pattern) else {
        return html.to_string();
    };

    let mut wrapped = String::with_capacity(html.len());
    let mut code_depth = 0usize;
    let mut copied = 0;
    for tag in TAG_RE.find_iter(html) {
        let text = &html[copied..tag.start()];
        if code_depth == 0 {
            wrapped.push_str(&wrap_text(text, &term_re, abbreviations));
        } else {
            wrapped.push_str(text);
        }
        wrapped.push_str(tag.as_str());
        code_depth = track_code_depth(code_depth, tag.as_str());
        copied = tag.end();
    }
    let tail = &html[copied..];
    if code_depth == 0 {
        wrapped.push_str(&wrap_text(tail, &term_re, abbreviations));
    } else {
        wrapped.push_str(tail);
    }
    wrapped
}

fn wrap_text(text: &str, term_re: &Regex, abbreviations: &[Abbreviation]) -> String {
    let mut wrapped = String::with_capacity(text.len());
    let mut copied = 0;
    for found in term_re.find_iter(text) {
        let before = text[..found.start()].chars().next_back();
        let after = text[found.end()..].chars().next();
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            continue;
        }
        let Some(abbreviation) = abbreviations
            .iter()
            .find(|abbreviation| escape_like_engine(&abbreviation.term) == found.as_str())
        else {
            continue;
        };
        wrapped.push_str(&text[copied..found.start()]);
        wrapped.push_str(&format!(
            "<abbr title=\"{}\">{}</abbr>",
            escape_html_chars(&abbreviation.expansion),
            found.as_str()
        ));
        copied = found.end();
    }
    wrapped.push_str(&text[copied..]);
    wrapped
}

/// Text as the engine writes it into HTML: `& < > "` escaped, apostrophes not.
fn escape_like_engine(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn track_code_depth(depth: usize, tag: &str) -> usize {
    let Some(caps) = TAG_NAME_RE.captures(tag) else {
        return depth;
    };
    let name = caps[2].to_ascii_lowercase();
    if name != "code" && name != "pre" {
        return depth;
    }
    if &caps[1] == "/" {
        depth.saturating_sub(1)
    } else if tag.ends_with("/>") {
        depth
    } else {
        depth + 1
    }
}

/// Insert `: ` at the start of every `<dd>` that directly follows a `</dt>`.
///
/// When the definition starts with a `<p>`, the colon goes inside it. A `<dd>`
/// with no term in front of it is left as it is.
pub fn put_colons_in_html_def_list(html: &str) -> String {
    let mut fixed = String::with_capacity(html.len() + 16);
    let mut copied = 0;
    for dd in DD_OPEN_RE.find_iter(html) {
        if !html[..dd.start()].trim_end().ends_with("</dt>") {
            debug!("definition without a term at byte {}, left untouched", dd.start());
            continue;
        }
        let insert_at = P_OPEN_RE
            .find(&html[dd.end()..])
            .map_or(dd.end(), |p| dd.end() + p.end());
        fixed.push_str(&html[copied..insert_at]);
        fixed.push_str(": ");
        copied = insert_at;
    }
    fixed.push_str(&html[copied..]);
    fixed
}
