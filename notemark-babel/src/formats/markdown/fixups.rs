//! Line-level repairs applied after the DOM walk.
//!
//! The walker writes a `<dd>` as an indented line and keeps whatever
//! indentation an abbreviation definition had inside its block. Neither shape is
//! what a Markdown reader expects, so both are flattened here.

use crate::common::links::{code_regions, in_code};
use once_cell::sync::Lazy;
use regex::Regex;

static ABBREVIATION_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]+(\*\[[^\]\n]+\]:)").expect("invalid abbreviation regex")
});

/// Turn `    : definition` into `: definition`.
///
/// Only a line indented by exactly four spaces and followed by a colon and a
/// space is touched; three spaces, a missing colon or `:text` without the space
/// are some other construct and stay as they are. Lines inside fenced code are
/// never touched.
///
/// With `separate` set, a fixed line is followed by a blank line whenever the
/// next line has text, so the next term starts a new group.
pub fn remove_leading_whitespace_from_dd_element(markdown: &str, separate: bool) -> String {
    let protected = code_regions(markdown);

    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut fixed = Vec::with_capacity(lines.len());
    let mut offset = 0;
    for (idx, line) in lines.iter().enumerate() {
        let line_start = offset;
        offset += line.len() + 1;

        let definition = line
            .strip_prefix("    ")
            .filter(|rest| rest.starts_with(": "));
        match definition {
            Some(rest) if !in_code(&protected, line_start) => {
                fixed.push(rest);
                let next_has_text = lines
                    .get(idx + 1)
                    .is_some_and(|next| !next.trim().is_empty());
                if separate && next_has_text {
                    fixed.push("");
                }
            }
            _ => fixed.push(line),
        }
    }
    fixed.join("\n")
}

/// Strip the indentation in front of `*[TERM]: expansion` lines outside code.
pub fn remove_whitespace_before_abbreviation_definition(markdown: &str) -> String {
    let protected = code_regions(markdown);
    let mut fixed = String::with_capacity(markdown.len());
    let mut copied = 0;
    for caps in ABBREVIATION_DEF_RE.captures_iter(markdown) {
        let (Some(whole), Some(definition)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if in_code(&protected, whole.start()) {
            continue;
        }
        fixed.push_str(&markdown[copied..whole.start()]);
        fixed.push_str(definition.as_str());
        copied = whole.end();
    }
    fixed.push_str(&markdown[copied..]);
    fixed
}
