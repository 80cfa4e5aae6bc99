//! Engine-wide error taxonomy
//!
//! Every rejected operation maps to one of five kinds so callers can tell
//! "fix your request" (Validation), "not allowed" (Authorization/State),
//! "insufficient funds" (Resource), and "try again" (Settlement) apart.

use thiserror::Error;

/// Coarse error classification used for transport mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    Resource,
    Settlement,
    NotFound,
}

/// Engine error taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("price must be strictly between 0 and 1, got {price}")]
    InvalidPrice { price: String },

    #[error("quantity must be strictly positive, got {quantity}")]
    InvalidQuantity { quantity: String },

    #[error("amount must be strictly positive, got {amount}")]
    InvalidAmount { amount: String },

    #[error("close time {close_time} is not in the future")]
    InvalidCloseTime { close_time: i64 },

    #[error("market {market_id} not found")]
    MarketNotFound { market_id: u64 },

    #[error("market {market_id} already exists")]
    MarketAlreadyExists { market_id: u64 },

    #[error("market {market_id} is not open for trading")]
    MarketNotOpen { market_id: u64 },

    #[error("order not found: {order_id}")]
    NotFound { order_id: String },

    #[error("order {order_id} does not belong to the caller")]
    NotOwner { order_id: String },

    #[error("order {order_id} is already fully filled")]
    AlreadyFilled { order_id: String },

    #[error("insufficient delegated collateral: required {required}, delegated {available}")]
    InsufficientCollateral { required: String, available: String },

    #[error("insufficient outcome tokens: required {required}, available {available}")]
    InsufficientTokens { required: String, available: String },

    #[error("invalid lifecycle transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("settlement failed: {reason}")]
    SettlementFailed { reason: String },
}

impl EngineError {
    /// Classify for transport-layer mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidPrice { .. }
            | EngineError::InvalidQuantity { .. }
            | EngineError::InvalidAmount { .. }
            | EngineError::InvalidCloseTime { .. } => ErrorKind::Validation,
            EngineError::NotOwner { .. } => ErrorKind::Authorization,
            EngineError::MarketNotOpen { .. }
            | EngineError::MarketAlreadyExists { .. }
            | EngineError::AlreadyFilled { .. }
            | EngineError::InvalidTransition { .. } => ErrorKind::State,
            EngineError::InsufficientCollateral { .. }
            | EngineError::InsufficientTokens { .. } => ErrorKind::Resource,
            EngineError::SettlementFailed { .. } => ErrorKind::Settlement,
            EngineError::MarketNotFound { .. } | EngineError::NotFound { .. } => {
                ErrorKind::NotFound
            }
        }
    }

    /// Machine-readable code for wire responses
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidPrice { .. } => "INVALID_PRICE",
            EngineError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            EngineError::InvalidAmount { .. } => "INVALID_AMOUNT",
            EngineError::InvalidCloseTime { .. } => "INVALID_CLOSE_TIME",
            EngineError::MarketNotFound { .. } => "MARKET_NOT_FOUND",
            EngineError::MarketAlreadyExists { .. } => "MARKET_ALREADY_EXISTS",
            EngineError::MarketNotOpen { .. } => "MARKET_NOT_OPEN",
            EngineError::NotFound { .. } => "ORDER_NOT_FOUND",
            EngineError::NotOwner { .. } => "NOT_OWNER",
            EngineError::AlreadyFilled { .. } => "ALREADY_FILLED",
            EngineError::InsufficientCollateral { .. } => "INSUFFICIENT_COLLATERAL",
            EngineError::InsufficientTokens { .. } => "INSUFFICIENT_TOKENS",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EngineError::SettlementFailed { .. } => "SETTLEMENT_FAILED",
        }
    }
}
