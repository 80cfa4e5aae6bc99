//! Ledger Adapter
//!
//! Thin capability interface to the external custody layer. The engine
//! never signs anything: it constructs unsigned instruction payloads for
//! the caller's wallet, and confirms signed transactions through
//! [`adapter::LedgerAdapter::submit_and_confirm`], which is transactional:
//! a confirmed signature or an error, never partial application.

pub mod adapter;
pub mod errors;
pub mod instruction;
pub mod memory;

pub use adapter::LedgerAdapter;
pub use errors::LedgerError;
pub use instruction::{LedgerInstruction, TransactionPayload, TxSignature};
pub use memory::InMemoryLedger;
