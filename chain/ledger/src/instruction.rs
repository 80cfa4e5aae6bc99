//! Ledger instructions and unsigned transaction payloads
//!
//! Instructions are the black-box contract with the on-chain custody
//! program: the engine describes token movements, the program executes
//! them atomically. Unsigned payloads travel to the client as base64
//! `tx_message` strings for external signing.

use crate::errors::LedgerError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::ids::{AccountId, MarketId, Mint};
use uuid::Uuid;

/// A single custody-program instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerInstruction {
    /// Authorize the engine to move up to `amount` of `mint` on the
    /// owner's behalf. Replaces any previous delegation for the pair.
    Approve {
        owner: AccountId,
        mint: Mint,
        amount: Decimal,
    },
    /// Move `amount` of `mint` from one account to another, consuming
    /// the sender's delegation.
    Transfer {
        from: AccountId,
        to: AccountId,
        mint: Mint,
        amount: Decimal,
    },
    /// Convert `amount` collateral into `amount` YES + `amount` NO.
    Split {
        owner: AccountId,
        market_id: MarketId,
        collateral_mint: Mint,
        yes_mint: Mint,
        no_mint: Mint,
        amount: Decimal,
    },
    /// Convert `amount` YES + `amount` NO back into `amount` collateral.
    Merge {
        owner: AccountId,
        market_id: MarketId,
        collateral_mint: Mint,
        yes_mint: Mint,
        no_mint: Mint,
        amount: Decimal,
    },
    /// Redeem every holding of the winning mint 1:1 for collateral.
    Resolve {
        market_id: MarketId,
        collateral_mint: Mint,
        winning_mint: Mint,
    },
}

/// An unsigned transaction: an ordered, atomically-applied instruction set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub instructions: Vec<LedgerInstruction>,
}

impl TransactionPayload {
    pub fn new(instructions: Vec<LedgerInstruction>) -> Self {
        Self { instructions }
    }

    /// Encode for the client's wallet (`tx_message` field)
    pub fn to_base64(&self) -> Result<String, LedgerError> {
        let bytes =
            serde_json::to_vec(self).map_err(|e| LedgerError::Encoding(e.to_string()))?;
        Ok(BASE64.encode(bytes))
    }

    pub fn from_base64(encoded: &str) -> Result<Self, LedgerError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| LedgerError::Encoding(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| LedgerError::Encoding(e.to_string()))
    }
}

/// Signature of a confirmed ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(String);

impl TxSignature {
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    /// Fresh unique signature (in-memory ledger)
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
