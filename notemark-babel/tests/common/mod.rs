//! Tests for the helpers shared by both directions: masking, link rewriting,
//! the metadata codec.

mod links;
mod masking;
mod metadata;
