//! Rendered HTML converts back to the Markdown it came from.

use insta::assert_snapshot;
use notemark_babel::{to_html, to_markdown, MarkdownOptions};

fn round_trip(markdown: &str) -> String {
    let options = MarkdownOptions::default();
    to_markdown(&to_html(markdown, &options), &options)
}

#[test]
fn test_document_round_trip() {
    let source = "# Title\n\nSome **bold** and *italic* text.\n\n- one\n- two\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_code_block_round_trip() {
    let source = "```rust\nfn main() {}\n```\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_indented_abbreviation_in_code_block_round_trip() {
    let source = "```\n  *[X]: y\n```\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_definition_list_round_trip() {
    let source = "term\n: definition\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_abbreviation_round_trip() {
    let source = "The HTML standard\n\n*[HTML]: Hyper Text Markup Language\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_table_round_trip() {
    let source = "| a | b |\n| :---: | ---: |\n| 1 | 2 |\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_definition_groups() {
    let html = "<dl><dt>a</dt><dd>: first letter</dd><dt>b</dt><dd>: second letter</dd></dl>";
    let md = to_markdown(html, &MarkdownOptions::default());
    assert_snapshot!(md, @r"
    a
    : first letter

    b
    : second letter
    ");
}

#[test]
fn test_footnotes() {
    let html = "<p>Text<sup class=\"footnote-ref\"><a href=\"#fn-1\" id=\"fnref-1\">1</a></sup></p>\n\
                <section class=\"footnotes\">\n<ol>\n<li id=\"fn-1\">\n\
                <p>Note. <a href=\"#fnref-1\" class=\"footnote-backref\">↩</a></p>\n\
                </li>\n</ol>\n</section>";
    let md = to_markdown(html, &MarkdownOptions::default());
    assert_snapshot!(md, @r"
    Text[^1]

    [^1]: Note.
    ");
}

#[test]
fn test_mixed_note() {
    let html = "<div>Shopping</div><div>- milk</div><div><br></div>\
                <div><img src=\"receipt (1).png\" alt=\"receipt\"></div>";
    let md = to_markdown(html, &MarkdownOptions::default());
    assert_snapshot!(md, @r"
    Shopping
    - milk

    ![receipt](receipt&#32;&#40;1&#41;.png)
    ");
}
