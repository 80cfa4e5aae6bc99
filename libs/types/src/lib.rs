//! Core types for the prediction market engine
//!
//! Shared by every service crate: identifiers, fixed-point numerics,
//! orders, trades, markets, and the engine-wide error taxonomy.
//!
//! All monetary values use `rust_decimal`: prices are probabilities in
//! the open interval (0, 1), quantities are outcome-share counts.

pub mod errors;
pub mod ids;
pub mod market;
pub mod numeric;
pub mod order;
pub mod trade;
