//! Settlement service
//!
//! Bridges the synchronous matching engine and the asynchronous custody
//! ledger. A matched plan's trades are provisional until both legs of
//! every trade (collateral one way, outcome tokens the other) confirm in
//! a single atomic ledger transaction. The [`pipeline`] module owns the
//! submit, settle, commit-or-rollback sequence and guarantees the book
//! lock is never held across a ledger round trip.

pub mod coordinator;
pub mod pipeline;

pub use coordinator::SettlementCoordinator;
pub use pipeline::{execute_submission, SharedBook};
