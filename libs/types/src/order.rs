//! Order lifecycle types
//!
//! An order targets one outcome token (YES or NO) of one market, on one
//! side of that outcome's book. Time priority is carried by a monotonic
//! sequence number assigned by the order store at insertion.

use crate::ids::{AccountId, MarketId, OrderId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Which outcome token the order trades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(alias = "yes", alias = "YES")]
    Yes,
    #[serde(alias = "no", alias = "NO")]
    No,
}

impl Outcome {
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Yes => "Yes",
            Outcome::No => "No",
        }
    }
}

/// Order direction within an outcome book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy outcome shares with collateral
    Bid,
    /// Sell outcome shares for collateral
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// Order status
///
/// `Filled` and `Cancelled` are terminal; a fully filled order is
/// immutable from that point on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// A limit order on one outcome book
///
/// Invariant: `filled <= quantity` at all times. `filled` only moves
/// through [`Order::apply_fill`], except for the compensating
/// [`Order::revert_fill`] used by settlement rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub market_id: MarketId,
    pub outcome: Outcome,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub filled: Quantity,
    pub owner: AccountId,
    pub status: OrderStatus,
    /// Monotonic per-book sequence number; earlier wins at equal price
    pub sequence: u64,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_id: MarketId,
        outcome: Outcome,
        side: Side,
        price: Price,
        quantity: Quantity,
        owner: AccountId,
        sequence: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            market_id,
            outcome,
            side,
            price,
            quantity,
            filled: Quantity::zero(),
            owner,
            status: OrderStatus::Open,
            sequence,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Unfilled remainder
    pub fn remaining(&self) -> Quantity {
        // Invariant filled <= quantity makes this subtraction total
        self.quantity
            .checked_sub(self.filled)
            .unwrap_or_else(Quantity::zero)
    }

    pub fn is_filled(&self) -> bool {
        self.filled == self.quantity
    }

    pub fn has_fills(&self) -> bool {
        !self.filled.is_zero()
    }

    /// Apply a fill and adjust status
    ///
    /// # Panics
    /// Panics if the fill would exceed the order quantity.
    pub fn apply_fill(&mut self, fill: Quantity, timestamp: i64) {
        let new_filled = self.filled + fill;
        assert!(
            new_filled <= self.quantity,
            "fill would exceed order quantity"
        );

        self.filled = new_filled;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        self.updated_at = timestamp;
    }

    /// Compensating action for settlement rollback: undo a fill applied
    /// optimistically for a trade that never settled.
    ///
    /// # Panics
    /// Panics if reverting more than was filled.
    pub fn revert_fill(&mut self, fill: Quantity, timestamp: i64) {
        self.filled = self
            .filled
            .checked_sub(fill)
            .expect("revert exceeds filled quantity");

        // Cancelled stays cancelled; only fill-derived states recompute
        if self.status != OrderStatus::Cancelled {
            self.status = if self.has_fills() {
                OrderStatus::PartiallyFilled
            } else {
                OrderStatus::Open
            };
        }
        self.updated_at = timestamp;
    }

    /// Cancel the order
    ///
    /// # Panics
    /// Panics if the order is already in a terminal state.
    pub fn cancel(&mut self, timestamp: i64) {
        assert!(!self.status.is_terminal(), "cannot cancel terminal order");
        self.status = OrderStatus::Cancelled;
        self.updated_at = timestamp;
    }
}
