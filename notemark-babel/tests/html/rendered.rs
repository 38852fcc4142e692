//! Rendered view: engine output plus the abbreviation and definition passes.

use insta::assert_snapshot;
use notemark_babel::formats::html::postprocess::put_colons_in_html_def_list;
use notemark_babel::{to_html, MarkdownOptions};

fn html(markdown: &str) -> String {
    to_html(markdown, &MarkdownOptions::default())
}

#[test]
fn test_definition_list() {
    assert_snapshot!(html("Term\n: Definition\n"), @r"
    <dl>
    <dt>Term</dt>
    <dd>
    <p>: Definition</p>
    </dd>
    </dl>
    ");
}

#[test]
fn test_abbreviation_outside_code_only() {
    let rendered = html("Use HTML, not `HTML`.\n\n*[HTML]: Hyper Text Markup Language\n");
    assert_snapshot!(rendered, @r#"<p>Use <abbr title="Hyper Text Markup Language">HTML</abbr>, not <code>HTML</code>.</p>"#);
}

#[test]
fn test_abbreviation_line_in_fence_is_code() {
    let rendered = html("```\n*[HTML]: kept\n```\n");
    assert!(rendered.contains("*[HTML]: kept"), "{rendered}");
    assert!(!rendered.contains("<abbr"), "{rendered}");
}

#[test]
fn test_extensions() {
    let rendered = html("~~gone~~ and x^2^\n\n- [x] done\n");
    assert!(rendered.contains("<del>gone</del>"), "{rendered}");
    assert!(rendered.contains("<sup>2</sup>"), "{rendered}");
    assert!(rendered.contains("checkbox"), "{rendered}");
}

#[test]
fn test_stray_definition_is_left_alone() {
    let input = "<dl>\n<dd>orphan</dd>\n</dl>";
    assert_eq!(put_colons_in_html_def_list(input), input);
}

#[test]
fn test_abbreviation_with_apostrophe() {
    let rendered = html("Ask O'Neil today\n\n*[O'Neil]: the manager\n");
    assert!(
        rendered.contains("<abbr title=\"the manager\">O'Neil</abbr>"),
        "{rendered}"
    );
}
