//! Read-only order book depth snapshots
//!
//! Aggregated per price level, best price first, with a running
//! cumulative total so clients can draw depth charts without re-summing.
//! Snapshot shapes are wire types: a market snapshot serializes as
//! `{"yes": [bids, asks], "no": [bids, asks]}`.

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};

/// One aggregated price level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDepth {
    pub price: Price,
    /// Quantity resting at exactly this price
    pub quantity: Quantity,
    /// Cumulative quantity from the best level through this one
    pub total: Quantity,
}

/// Depth of one outcome book: bids then asks, both best-first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot(pub Vec<LevelDepth>, pub Vec<LevelDepth>);

impl BookSnapshot {
    pub fn bids(&self) -> &[LevelDepth] {
        &self.0
    }

    pub fn asks(&self) -> &[LevelDepth] {
        &self.1
    }
}

/// Full depth picture of a market: both outcome books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub yes: BookSnapshot,
    pub no: BookSnapshot,
}

/// Fold best-first (price, quantity) pairs into cumulative depth rows
pub fn cumulative_depth(levels: Vec<(Price, Quantity)>) -> Vec<LevelDepth> {
    let mut total = Quantity::zero();
    levels
        .into_iter()
        .map(|(price, quantity)| {
            total = total + quantity;
            LevelDepth {
                price,
                quantity,
                total,
            }
        })
        .collect()
}
