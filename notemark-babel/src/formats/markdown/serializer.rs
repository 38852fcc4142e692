//! HTML DOM → Markdown text
//!
//! The document is parsed with `html5ever` into an `RcDom` and walked from
//! `<body>` down. Every block-level element becomes one [`Block`]; inline
//! elements are written into an [`Inline`] buffer that collapses HTML
//! whitespace the way a browser would.
//!
//! Blocks from `<div>` are "tight" (one newline apart): that is how the source
//! view stores one Markdown line per div. Everything else the rendering engine
//! produces (paragraphs, headings, lists...) is spaced by a blank line so that
//! the result renders back to the same structure.
//!
//! Nothing is escaped. Leading `-`, `+`, `1.`, `#`, backslashes, braces and
//! backticks in text are what the user typed into the note and pass through.

use crate::common::text::Alignment;
use crate::formats::MarkdownOptions;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::mem;

/// Parse `html` and write its body as Markdown blocks, newline terminated.
pub fn serialize_to_markdown(html: &str, options: &MarkdownOptions) -> String {
    let dom = html5ever::parse_document(RcDom::default(), Default::default()).one(html);
    let Some(body) = find_element(&dom.document, "body") else {
        return String::new();
    };

    let mut walker = Walker::default();
    let mut blocks = walker.blocks(&body);
    if let Some(block) = walker.footnote_block() {
        blocks.push(block);
    }
    if let Some(block) = walker.abbreviation_block() {
        blocks.push(block);
    }
    join_blocks(&blocks, options.keep_empty_lines)
}

/// A finished block of Markdown text, without trailing newline.
#[derive(Debug, Clone, PartialEq)]
struct Block {
    text: String,
    spaced: bool,
}

impl Block {
    fn tight(text: String) -> Self {
        Self {
            text,
            spaced: false,
        }
    }

    fn spaced(text: String) -> Self {
        Self { text, spaced: true }
    }
}

fn join_blocks(blocks: &[Block], keep_empty_lines: bool) -> String {
    let mut markdown = String::new();
    for (idx, block) in blocks.iter().enumerate() {
        if idx > 0 {
            let blank = keep_empty_lines || block.spaced || blocks[idx - 1].spaced;
            markdown.push_str(if blank { "\n\n" } else { "\n" });
        }
        markdown.push_str(&block.text);
    }
    if !blocks.is_empty() {
        markdown.push('\n');
    }
    markdown
}

/// Inline text with browser-style whitespace collapsing.
///
/// Runs of ASCII whitespace become one space; a space is never written at the
/// start of a line. A non-breaking space is kept as a literal space and never
/// collapsed, which is how the source view encodes indentation.
#[derive(Debug, Default)]
struct Inline {
    out: String,
    pending_space: bool,
}

impl Inline {
    fn text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_ascii_whitespace() {
                self.pending_space = true;
            } else {
                self.flush_space();
                self.out.push(if ch == '\u{a0}' { ' ' } else { ch });
            }
        }
    }

    /// Markup that opens a construct: a pending space goes before it.
    fn open(&mut self, markup: &str) {
        self.flush_space();
        self.out.push_str(markup);
    }

    /// Markup that closes a construct: a pending space stays after it.
    fn close(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    fn line_break(&mut self) {
        self.pending_space = false;
        self.out.push('\n');
    }

    fn flush_space(&mut self) {
        if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push(' ');
        }
        self.pending_space = false;
    }

    fn take(&mut self) -> String {
        self.pending_space = false;
        let text = mem::take(&mut self.out);
        text.trim_end_matches('\n').to_string()
    }
}

#[derive(Debug, Default)]
struct Walker {
    abbreviations: Vec<(String, String)>,
    footnotes: Vec<(String, String)>,
}

impl Walker {
    /// Write the children of a container element as blocks.
    fn blocks(&mut self, node: &Handle) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut inline = Inline::default();
        for child in node.children.borrow().iter() {
            match element_name(child) {
                Some(tag) if is_block(&tag) => {
                    flush_inline(&mut inline, &mut blocks);
                    self.block(&tag, child, &mut blocks);
                }
                _ => self.inline(child, &mut inline),
            }
        }
        flush_inline(&mut inline, &mut blocks);
        blocks
    }

    fn block(&mut self, tag: &str, node: &Handle, blocks: &mut Vec<Block>) {
        match tag {
            "div" | "section" | "article" | "main" | "header" | "footer" | "center" => {
                if has_class(node, "footnotes") {
                    self.collect_footnotes(node);
                    return;
                }
                let inner = self.blocks(node);
                if inner.is_empty() {
                    blocks.push(Block::tight(String::new()));
                } else {
                    blocks.extend(inner);
                }
            }
            "p" => {
                let text = self.flat(node);
                blocks.push(Block::spaced(text));
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                let text = self.inline_text(node).replace('\n', " ");
                blocks.push(Block::spaced(format!("{} {}", "#".repeat(level), text)));
            }
            "hr" => blocks.push(Block::spaced("---".to_string())),
            "pre" => blocks.push(Block::spaced(code_block(node))),
            "blockquote" => {
                let inner = self.flat(node);
                blocks.push(Block::spaced(prefix_lines(&inner, "> ", ">")));
            }
            "ul" | "ol" => blocks.push(Block::spaced(self.list(tag, node))),
            "dl" => blocks.push(Block::spaced(self.definition_list(node))),
            "dt" | "dd" => {
                let mut group = Vec::new();
                self.definition_item(tag, node, &mut group);
                blocks.push(Block::tight(group.join("\n")));
            }
            "table" => blocks.push(Block::spaced(self.table(node))),
            _ => {
                let text = self.flat(node);
                blocks.push(Block::spaced(text));
            }
        }
    }

    /// Render a container and flatten its blocks into one text.
    fn flat(&mut self, node: &Handle) -> String {
        let blocks = self.blocks(node);
        join_blocks(&blocks, false)
            .trim_end_matches('\n')
            .to_string()
    }

    fn inline_text(&mut self, node: &Handle) -> String {
        let mut inline = Inline::default();
        self.inline_children(node, &mut inline);
        inline.take()
    }

    fn inline_children(&mut self, node: &Handle, inline: &mut Inline) {
        for child in node.children.borrow().iter() {
            self.inline(child, inline);
        }
    }

    fn inline(&mut self, node: &Handle, inline: &mut Inline) {
        match &node.data {
            NodeData::Text { contents } => inline.text(&contents.borrow()),
            NodeData::Element { name, .. } => {
                let tag = &*name.local;
                self.inline_element(tag, node, inline);
            }
            _ => {}
        }
    }

    fn inline_element(&mut self, tag: &str, node: &Handle, inline: &mut Inline) {
        match tag {
            "br" => inline.line_break(),
            "strong" | "b" => self.wrap(node, inline, "**"),
            "em" | "i" => self.wrap(node, inline, "*"),
            "del" | "s" | "strike" => self.wrap(node, inline, "~~"),
            "code" | "kbd" | "tt" => inline.open(&code_span(&text_content(node))),
            "a" if has_class(node, "footnote-backref") => {}
            "a" => {
                let href = attr(node, "href").unwrap_or_default();
                inline.open("[");
                self.inline_children(node, inline);
                inline.close(&format!("]({})", escape_target(&href)));
            }
            "img" => {
                let alt = attr(node, "alt").unwrap_or_default();
                let src = attr(node, "src").unwrap_or_default();
                inline.open(&format!("![{}]({})", alt, escape_target(&src)));
            }
            "sup" if has_class(node, "footnote-ref") => {
                let label = footnote_label(node).unwrap_or_else(|| text_content(node));
                inline.open(&format!("[^{label}]"));
            }
            "sup" => self.wrap(node, inline, "^"),
            "abbr" => {
                let term = text_content(node);
                if let Some(title) = attr(node, "title") {
                    if !self.abbreviations.iter().any(|(known, _)| *known == term) {
                        self.abbreviations.push((term.clone(), title));
                    }
                }
                inline.text(&term);
            }
            "input" => {
                if attr(node, "type").as_deref() == Some("checkbox") {
                    let checked = attr(node, "checked").is_some();
                    inline.open(if checked { "[x]" } else { "[ ]" });
                    inline.pending_space = true;
                }
            }
            "script" | "style" | "head" | "title" => {}
            _ => self.inline_children(node, inline),
        }
    }

    fn wrap(&mut self, node: &Handle, inline: &mut Inline, marker: &str) {
        inline.open(marker);
        self.inline_children(node, inline);
        inline.close(marker);
    }

    fn list(&mut self, tag: &str, node: &Handle) -> String {
        let start = attr(node, "start")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(1);
        let mut items = Vec::new();
        for item in node.children.borrow().iter() {
            if element_name(item).as_deref() != Some("li") {
                continue;
            }
            let marker = if tag == "ol" {
                format!("{}. ", start + items.len())
            } else {
                "- ".to_string()
            };
            let body = self.flat(item);
            let indent = " ".repeat(marker.len());
            let mut lines = body.split('\n');
            let mut rendered = format!("{marker}{}", lines.next().unwrap_or_default());
            for line in lines {
                rendered.push('\n');
                if !line.is_empty() {
                    rendered.push_str(&indent);
                    rendered.push_str(line);
                }
            }
            items.push(rendered);
        }
        items.join("\n")
    }

    fn definition_list(&mut self, node: &Handle) -> String {
        let mut lines = Vec::new();
        for child in node.children.borrow().iter() {
            match element_name(child).as_deref() {
                Some(tag @ ("dt" | "dd")) => self.definition_item(tag, child, &mut lines),
                Some("div") => {
                    for grandchild in child.children.borrow().iter() {
                        if let Some(tag @ ("dt" | "dd")) = element_name(grandchild).as_deref() {
                            self.definition_item(tag, grandchild, &mut lines);
                        }
                    }
                }
                _ => {}
            }
        }
        lines.join("\n")
    }

    /// A term is written as is; a definition is indented by four spaces and
    /// flattened later by the definition fixup.
    fn definition_item(&mut self, tag: &str, node: &Handle, lines: &mut Vec<String>) {
        let text = self.flat(node);
        if tag == "dt" {
            lines.push(text);
        } else {
            lines.push(prefix_lines(&text, "    ", ""));
        }
    }

    fn table(&mut self, node: &Handle) -> String {
        let mut rows: Vec<Vec<(String, Option<Alignment>)>> = Vec::new();
        for row in descendants_named(node, "tr") {
            let mut cells = Vec::new();
            for cell in row.children.borrow().iter() {
                if matches!(element_name(cell).as_deref(), Some("td" | "th")) {
                    let text = self.inline_text(cell).replace('\n', " ").replace('|', "\\|");
                    cells.push((text, cell_alignment(cell)));
                }
            }
            rows.push(cells);
        }
        let Some(header) = rows.first() else {
            return String::new();
        };

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(table_row(header.iter().map(|(text, _)| text.as_str()), columns));
        let separators: Vec<&str> = (0..columns)
            .map(|col| {
                let align = header.get(col).and_then(|(_, align)| *align);
                align.unwrap_or_default().separator()
            })
            .collect();
        lines.push(table_row(separators.into_iter(), columns));
        for row in rows.iter().skip(1) {
            lines.push(table_row(row.iter().map(|(text, _)| text.as_str()), columns));
        }
        lines.join("\n")
    }

    fn collect_footnotes(&mut self, node: &Handle) {
        for item in descendants_named(node, "li") {
            let label = attr(&item, "id")
                .map(|id| id.trim_start_matches("fn-").trim_start_matches("fn").to_string())
                .unwrap_or_default();
            let text = self.flat(&item);
            self.footnotes.push((label, text.trim_end().to_string()));
        }
    }

    fn footnote_block(&self) -> Option<Block> {
        if self.footnotes.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .footnotes
            .iter()
            .map(|(label, text)| format!("[^{label}]: {}", prefix_rest(text, "    ")))
            .collect();
        Some(Block::spaced(lines.join("\n")))
    }

    fn abbreviation_block(&self) -> Option<Block> {
        if self.abbreviations.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .abbreviations
            .iter()
            .map(|(term, title)| format!("*[{term}]: {title}"))
            .collect();
        Some(Block::spaced(lines.join("\n")))
    }
}

fn flush_inline(inline: &mut Inline, blocks: &mut Vec<Block>) {
    let text = inline.take();
    if !text.trim().is_empty() {
        blocks.push(Block::tight(text));
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "div"
            | "p"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "hr"
            | "pre"
            | "blockquote"
            | "ul"
            | "ol"
            | "dl"
            | "dt"
            | "dd"
            | "table"
            | "section"
            | "article"
            | "main"
            | "header"
            | "footer"
            | "center"
            | "figure"
    )
}

/// Fenced code block, language taken from a `language-*` class on `<code>`.
fn code_block(pre: &Handle) -> String {
    let code = pre
        .children
        .borrow()
        .iter()
        .find(|child| element_name(child).as_deref() == Some("code"))
        .cloned();
    let (source, language) = match code {
        Some(code) => {
            let language = attr(&code, "class")
                .and_then(|class| {
                    class
                        .split_whitespace()
                        .find_map(|name| name.strip_prefix("language-").map(str::to_string))
                })
                .unwrap_or_default();
            (text_content(&code), language)
        }
        None => (text_content(pre), String::new()),
    };
    let source = source.trim_end_matches('\n');
    let fence = "`".repeat(longest_backtick_run(source).max(2) + 1);
    format!("{fence}{language}\n{source}\n{fence}")
}

fn code_span(source: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(source) + 1);
    if source.starts_with('`') || source.ends_with('`') {
        format!("{fence} {source} {fence}")
    } else {
        format!("{fence}{source}{fence}")
    }
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c: char| c != '`').map(str::len).max().unwrap_or(0)
}

/// Parentheses in a target are escaped so the link regex sees one target.
fn escape_target(target: &str) -> String {
    target.replace('(', "\\(").replace(')', "\\)")
}

fn table_row<'a>(cells: impl Iterator<Item = &'a str>, columns: usize) -> String {
    let mut cells: Vec<&str> = cells.collect();
    cells.resize(columns, "");
    format!("| {} |", cells.join(" | "))
}

fn cell_alignment(cell: &Handle) -> Option<Alignment> {
    if let Some(align) = attr(cell, "align").and_then(|value| Alignment::from_html(&value)) {
        return Some(align);
    }
    let style = attr(cell, "style")?;
    style.split(';').find_map(|rule| {
        let (property, value) = rule.split_once(':')?;
        (property.trim() == "text-align")
            .then(|| Alignment::from_html(value))
            .flatten()
    })
}

fn footnote_label(sup: &Handle) -> Option<String> {
    let link = descendants_named(sup, "a").into_iter().next()?;
    let href = attr(&link, "href")?;
    let label = href.trim_start_matches('#').trim_start_matches("fn-");
    (!label.is_empty()).then(|| label.to_string())
}

/// Prefix every line; empty lines get `empty` instead.
fn prefix_lines(text: &str, prefix: &str, empty: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                empty.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indent every line but the first.
fn prefix_rest(text: &str, prefix: &str) -> String {
    match text.split_once('\n') {
        Some((first, rest)) => format!("{first}\n{}", prefix_lines(rest, prefix, "")),
        None => text.to_string(),
    }
}

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attribute| &*attribute.name.local == key)
            .map(|attribute| attribute.value.to_string()),
        _ => None,
    }
}

fn has_class(node: &Handle, class: &str) -> bool {
    attr(node, "class").is_some_and(|value| value.split_whitespace().any(|name| name == class))
}

/// Raw text of a subtree, whitespace untouched.
fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, text: &mut String) {
    match &node.data {
        NodeData::Text { contents } => text.push_str(&contents.borrow()),
        NodeData::Element { name, .. } if &*name.local == "br" => text.push('\n'),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, text);
            }
        }
    }
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if element_name(node).as_deref() == Some(tag) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn descendants_named(node: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    for child in node.children.borrow().iter() {
        if element_name(child).as_deref() == Some(tag) {
            found.push(child.clone());
        } else {
            found.extend(descendants_named(child, tag));
        }
    }
    found
}
