//! Small string helpers shared by both conversion directions.

/// Escape the five characters that are significant in HTML text and attributes.
pub fn escape_html_chars(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Drop every whitespace character.
pub fn remove_white_space(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compare two Markdown sources, ignoring whitespace.
pub fn is_same_markdown(a: &str, b: &str) -> bool {
    remove_white_space(a) == remove_white_space(b)
}

/// Split `text` on any character of `delimiters`, dropping empty pieces.
///
/// With no delimiters the whole text is the only piece.
pub fn split_string<'a>(text: &'a str, delimiters: &str) -> Vec<&'a str> {
    if delimiters.is_empty() {
        return vec![text];
    }
    text.split(|c: char| delimiters.contains(c))
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Level of the Markdown heading `line` starts with, ignoring leading
/// whitespace. More than six `#` still count as level six.
pub fn heading_level(line: &str) -> Option<usize> {
    let marks = line
        .trim_start()
        .chars()
        .take_while(|&c| c == '#')
        .count();
    (marks > 0).then(|| marks.min(6))
}

/// Strip leading whitespace, including `&nbsp;` references as the source view
/// writes them.
pub fn strip_leading_whitespace(text: &str) -> &str {
    let mut rest = text.trim_start();
    while let Some(stripped) = rest.strip_prefix("&nbsp;") {
        rest = stripped.trim_start();
    }
    rest
}

/// Column alignment of a Markdown pipe table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Read the alignment from a separator cell such as `:-:`.
    ///
    /// Anything unrecognized is left aligned. Reading tables is the engine's
    /// job; this only checks what [`Alignment::separator`] writes.
    #[cfg(test)]
    fn from_separator(cell: &str) -> Self {
        let cell = cell.trim();
        let body = cell.trim_matches(':');
        if body.is_empty() || !body.chars().all(|c| c == '-') {
            return Alignment::Left;
        }
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (false, true) => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    /// Read the alignment from an HTML `align` attribute or `text-align` style value.
    pub fn from_html(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }

    pub fn separator(&self) -> &'static str {
        match self {
            Alignment::Left => ":---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
        }
    }
}
