//! HTML → Markdown tests

mod escaping;
mod structure;
