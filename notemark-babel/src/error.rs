//! Error types for conversion operations
//!
//! Only programmer errors surface here. Corrupted metadata and malformed
//! user input are reported as values by the modules that handle them.

use thiserror::Error;

/// Errors that can occur during conversion
#[derive(Debug, Error)]
pub enum BabelError {
    /// Input handed over as bytes was not valid UTF-8 text
    #[error("input is not unicode text: {0}")]
    NotUnicode(#[from] std::str::Utf8Error),
    /// A typed payload could not be serialized to JSON
    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Borrow raw host bytes as text, failing loudly on anything that is not UTF-8.
///
/// Every converter entry point takes `&str`; this is the single place where
/// byte input crosses into the crate.
pub fn require_text(bytes: &[u8]) -> Result<&str, BabelError> {
    Ok(std::str::from_utf8(bytes)?)
}
