//! Source view: Markdown shown as typed, one `<div>` per line.

use notemark_babel::{to_clean_html, to_markdown, MarkdownOptions};

fn clean(markdown: &str) -> String {
    to_clean_html(markdown, &MarkdownOptions::default())
}

#[test]
fn test_indented_lines() {
    assert_eq!(
        clean("    :::python\n    def fn(): pass"),
        "<div>&nbsp; &nbsp; :::python</div><div>&nbsp; &nbsp; def fn(): pass</div>"
    );
}

#[test]
fn test_empty_and_blank_lines() {
    assert_eq!(clean(""), "");
    assert_eq!(clean("    "), "<div><br /></div>");
    assert_eq!(clean("\n"), "<div></div>");
    assert_eq!(clean("\na"), "<div></div><div>a</div>");
}

#[test]
fn test_put_breaks() {
    let options = MarkdownOptions {
        put_breaks: true,
        ..MarkdownOptions::default()
    };
    assert_eq!(to_clean_html("a\n\nb", &options), "<div>a</div><div><br /></div><div>b</div>");
}

#[test]
fn test_cyrillic() {
    assert_eq!(clean("    пизза"), "<div>&nbsp; &nbsp; пизза</div>");
}

#[test]
fn test_source_view_converts_back() {
    let options = MarkdownOptions::default();
    let source = "# not a heading here\n\n    indented\n- item\n";
    assert_eq!(to_markdown(&to_clean_html(source, &options), &options), source);
}
