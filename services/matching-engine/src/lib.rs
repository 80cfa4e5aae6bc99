//! Matching engine
//!
//! Price-time-priority matching for binary-outcome markets. One
//! [`OutcomeBook`] exists per (market, outcome) pair and is the single
//! logical sequencer for that book: callers serialize access through one
//! exclusive lock; different books run fully in parallel.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced (price first, then sequence)
//! - Execution at the resting order's price (maker price)
//! - The book never rests crossed
//! - Deterministic: identical submission sequences produce identical trades
//!
//! Settlement is external and slow, so submission is split into phases:
//! [`OutcomeBook::submit`] optimistically reserves the match and returns a
//! [`MatchPlan`]; after the ledger confirms (with the book lock released),
//! [`OutcomeBook::commit`] finalizes or [`OutcomeBook::rollback`] restores
//! the pre-match state.

pub mod book;
pub mod engine;
pub mod matching;
pub mod snapshot;
pub mod store;

pub use engine::{MatchPlan, OrderReceipt, OutcomeBook};
pub use snapshot::{BookSnapshot, LevelDepth, MarketSnapshot};
