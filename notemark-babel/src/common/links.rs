//! Link and image target rewriting
//!
//! Markdown link and image targets are rewritten in place (whitespace and
//! escaped parentheses become character references) so that a file name such as
//! `image (1).jpg` survives the trip through the HTML layer. Code is never
//! touched: fenced blocks and inline code spans are collected as protected
//! regions and any link overlapping one is skipped (see [`super::masking`]).

use super::masking::{mask_spans, Protected, Span};
use log::debug;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// `[text](target)` or `![alt](target)`. The target may contain escaped
/// characters such as `\(` and `\)` but never an unescaped `)` or a newline.
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!?\[[^\]\n]*\]\(((?:\\.|[^)\\\n])*)\)").expect("invalid link regex")
});

/// Whitespace inside a target.
pub static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// An escaped opening parenthesis inside a target.
pub static ESCAPED_LEFT_PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\(").expect("invalid left paren regex"));

/// An escaped closing parenthesis inside a target.
pub static ESCAPED_RIGHT_PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\)").expect("invalid right paren regex"));

/// Apply `pattern` → `replacement` inside every link and image target of `text`
/// that does not overlap code.
///
/// Brackets, link text and everything outside targets are copied unchanged.
/// `replacement` is inserted literally (no `$group` expansion).
///
/// # Example
///
/// ```
/// use notemark_babel::common::links::{rewrite_link_targets, WHITESPACE_RE};
///
/// let out = rewrite_link_targets(&WHITESPACE_RE, "&#32;", r"![](image \(1\).jpg)");
/// assert_eq!(out, r"![](image&#32;\(1\).jpg)");
/// ```
pub fn rewrite_link_targets(pattern: &Regex, replacement: &str, text: &str) -> String {
    let targets: Vec<_> = LINK_RE
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?)))
        .collect();
    if targets.is_empty() {
        return text.to_string();
    }

    let regions = code_regions(text);
    let mut spans: Vec<Span> = targets
        .iter()
        .map(|(whole, _)| Span::new(whole.start(), whole.end() - 1))
        .collect();
    mask_spans(&mut spans, &regions);

    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    for ((whole, target), span) in targets.iter().zip(&spans) {
        if !span.is_intact() {
            debug!("skipping link inside code: {:?}", whole.as_str());
            continue;
        }
        if encloses_code(whole.start(), whole.end() - 1, &regions) {
            debug!("skipping link around code: {:?}", whole.as_str());
            continue;
        }
        output.push_str(&text[copied..target.start()]);
        output.push_str(&pattern.replace_all(target.as_str(), NoExpand(replacement)));
        copied = target.end();
    }
    output.push_str(&text[copied..]);
    output
}

/// Protect whitespace and escaped parentheses in every link/image target.
///
/// This is the rewrite applied on the HTML → Markdown path.
pub fn protect_link_targets(markdown: &str) -> String {
    let text = rewrite_link_targets(&WHITESPACE_RE, "&#32;", markdown);
    let text = rewrite_link_targets(&ESCAPED_LEFT_PAREN_RE, "&#40;", &text);
    rewrite_link_targets(&ESCAPED_RIGHT_PAREN_RE, "&#41;", &text)
}

/// Collect fenced code blocks and inline code spans as protected regions.
///
/// A fence runs from the first byte of its opening line to the last byte of its
/// closing line; an unterminated fence runs to the end of the text. Inline code spans are
/// matched within a single line: a run of N backticks closed by the next run of
/// exactly N backticks.
pub fn code_regions(text: &str) -> Vec<Protected> {
    let mut regions = Vec::new();
    let mut fence: Option<(usize, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        match fence {
            Some((start, width)) => {
                if is_closing_fence(content, width) {
                    let last = (line_start + content.len()).saturating_sub(1).max(start);
                    regions.push(Protected::closed(start, last));
                    fence = None;
                }
            }
            None => {
                if let Some(width) = opening_fence_width(content) {
                    fence = Some((line_start, width));
                } else {
                    inline_code_spans(content, line_start, &mut regions);
                }
            }
        }
    }

    if let Some((start, _)) = fence {
        regions.push(Protected::closed(start, text.len().saturating_sub(1).max(start)));
    }
    regions
}

/// Whether the byte at `offset` lies in one of `regions`.
pub fn in_code(regions: &[Protected], offset: usize) -> bool {
    regions
        .iter()
        .any(|region| region.start <= offset && region.end.map_or(true, |end| offset <= end))
}

/// A region lying entirely within `[start, end]` survives masking, so it is
/// checked on its own.
fn encloses_code(start: usize, end: usize, regions: &[Protected]) -> bool {
    regions
        .iter()
        .any(|region| start <= region.start && region.end.is_some_and(|region_end| region_end <= end))
}

fn fence_indent(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches(' ');
    (line.len() - trimmed.len() <= 3).then_some(trimmed)
}

fn opening_fence_width(line: &str) -> Option<usize> {
    let trimmed = fence_indent(line)?;
    let width = trimmed.len() - trimmed.trim_start_matches('`').len();
    if width < 3 || trimmed[width..].contains('`') {
        return None;
    }
    Some(width)
}

fn is_closing_fence(line: &str, width: usize) -> bool {
    let Some(trimmed) = fence_indent(line) else {
        return false;
    };
    let run = trimmed.len() - trimmed.trim_start_matches('`').len();
    run >= width && trimmed[run..].trim().is_empty()
}

fn inline_code_spans(line: &str, line_start: usize, regions: &mut Vec<Protected>) {
    let runs = backtick_runs(line);
    let mut i = 0;
    while i < runs.len() {
        let (open_at, width) = runs[i];
        match runs[i + 1..].iter().position(|&(_, w)| w == width) {
            Some(offset) => {
                let (close_at, _) = runs[i + 1 + offset];
                regions.push(Protected::closed(
                    line_start + open_at,
                    line_start + close_at + width - 1,
                ));
                i += offset + 2;
            }
            None => i += 1,
        }
    }
}

/// (byte offset, length) of every maximal run of backticks in `line`.
fn backtick_runs(line: &str) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for (idx, ch) in line.char_indices() {
        if ch == '`' {
            match current.as_mut() {
                Some((_, width)) => *width += 1,
                None => current = Some((idx, 1)),
            }
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);
    runs
}
