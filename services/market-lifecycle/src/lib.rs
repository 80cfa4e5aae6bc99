//! Market lifecycle service
//!
//! Owns the market registry and the Open -> Closed -> Resolved state
//! machine. Close is lazy: a market past its close time is treated as
//! Closed on first observation rather than by a background sweeper, and
//! the caller learns when a lazy close fired so it can cancel the
//! market's resting orders.

pub mod manager;

pub use manager::{ClosedMarket, LifecycleManager, NewMarket};
