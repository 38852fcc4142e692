//! Text the user typed comes back as typed: a naive Markdown escaper would
//! backslash all of these.

use notemark_babel::{to_markdown, MarkdownOptions};

fn md(html: &str) -> String {
    to_markdown(html, &MarkdownOptions::default())
}

#[test]
fn test_leading_dash_and_plus() {
    assert_eq!(md("<div>- aaa</div>"), "- aaa\n");
    assert_eq!(md("<div>+ aaa</div>"), "+ aaa\n");
}

#[test]
fn test_numbered_lines() {
    assert_eq!(md("1. one<div>2. two</div>"), "1. one\n2. two\n");
}

#[test]
fn test_numbered_lines_with_empty_lines_kept() {
    let options = MarkdownOptions {
        keep_empty_lines: true,
        ..MarkdownOptions::default()
    };
    assert_eq!(to_markdown("1. one<div>2. two</div>", &options), "1. one\n\n2. two\n");
}

#[test]
fn test_escaped_dash_and_underscore() {
    assert_eq!(md(r"\- one<div>\- two</div>"), "\\- one\n\\- two\n");
    assert_eq!(md(r"\_ one<div>\_ two</div>"), "\\_ one\n\\_ two\n");
}

#[test]
fn test_curly_braces() {
    assert_eq!(md("{ and { and } and }"), "{ and { and } and }\n");
    assert_eq!(md("{ and<div>{ and</div><div>} and }</div>"), "{ and\n{ and\n} and }\n");
}

#[test]
fn test_backticks() {
    assert_eq!(md("` and<div>`</div>"), "` and\n`\n");
    assert_eq!(md(r"<div>`:\`</div>"), "`:\\`\n");
}

#[test]
fn test_hashes() {
    assert_eq!(md("# one<div># two</div>"), "# one\n# two\n");
}

#[test]
fn test_entities_are_decoded() {
    assert_eq!(md("<div>a &amp; b &lt;c&gt;</div>"), "a & b <c>\n");
}
