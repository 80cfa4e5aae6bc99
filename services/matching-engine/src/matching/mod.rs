//! Matching logic helpers

pub mod crossing;
