//! Markdown → HTML tests

mod clean;
mod rendered;
