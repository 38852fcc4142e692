//! Format-agnostic helpers used by both conversion directions.

pub mod links;
pub mod masking;
pub mod text;
