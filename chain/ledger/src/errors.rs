//! Ledger adapter errors

use thiserror::Error;

/// Errors surfaced by the custody layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("insufficient balance of {mint}: required {required}, available {available}")]
    InsufficientBalance {
        mint: String,
        required: String,
        available: String,
    },

    #[error("transfer exceeds delegation for {mint}: required {required}, delegated {delegated}")]
    DelegationExceeded {
        mint: String,
        required: String,
        delegated: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: String },

    #[error("confirmation timed out")]
    Timeout,

    #[error("transaction rejected by ledger: {reason}")]
    Rejected { reason: String },

    #[error("payload encoding failed: {0}")]
    Encoding(String),
}

impl LedgerError {
    /// Transient errors are worth retrying; terminal ones are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Timeout)
    }
}
