use notemark_babel::common::links::{protect_link_targets, rewrite_link_targets, WHITESPACE_RE};
use proptest::prelude::*;

fn spaces(text: &str) -> String {
    rewrite_link_targets(&WHITESPACE_RE, "&#32;", text)
}

#[test]
fn fenced_block_with_image_is_unchanged() {
    let text = "before\n\n```\n![](image (1).jpg)\n![](other image.png)\n```\n\nafter\n";
    assert_eq!(spaces(text), text);
}

#[test]
fn several_links_on_one_line() {
    assert_eq!(
        spaces("[a](x y) and [b](`z w`) and `[c](u v)`"),
        "[a](x&#32;y) and [b](`z w`) and `[c](u v)`"
    );
}

#[test]
fn full_protection_on_real_note() {
    let text = "Look at ![the cat](pics/my cat \\(2\\).jpg)\n\n    indented `[not](a link)`\n";
    assert_eq!(
        protect_link_targets(text),
        "Look at ![the cat](pics/my&#32;cat&#32;&#40;2&#41;.jpg)\n\n    indented `[not](a link)`\n"
    );
}

proptest! {
    #[test]
    fn code_spans_are_never_rewritten(
        label in "[a-z ]{0,6}",
        head in "[a-z]{0,6}",
        tail in "[a-z]{0,6}",
    ) {
        let inline = format!("`[{label}]({head} {tail})`");
        prop_assert_eq!(spaces(&inline), inline.clone());

        let fenced = format!("```\n[{label}]({head} {tail})\n```\n");
        prop_assert_eq!(spaces(&fenced), fenced.clone());
    }

    #[test]
    fn code_next_to_a_link_stays_intact(
        code in "[a-z ]{1,6}",
        head in "[a-z]{1,6}",
        tail in "[a-z]{1,6}",
    ) {
        let text = format!("`{code}`[x]({head} {tail})`{code}`");
        let expected = format!("`{code}`[x]({head}&#32;{tail})`{code}`");
        prop_assert_eq!(spaces(&text), expected);
    }
}
