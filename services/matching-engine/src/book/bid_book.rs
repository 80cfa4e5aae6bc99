//! Bid (buy-side) book for one outcome
//!
//! Price levels sorted descending (best bid first). BTreeMap keeps
//! iteration deterministic; each level is a sequence-ordered FIFO queue.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::{LevelEntry, PriceLevel};

#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Rest a fresh order's remainder
    pub fn insert(&mut self, order: &Order) {
        self.levels
            .entry(order.price)
            .or_default()
            .push(entry_for(order));
    }

    /// Re-insert liquidity restored by a settlement rollback
    pub fn reinsert(&mut self, order: &Order) {
        self.levels
            .entry(order.price)
            .or_default()
            .reinsert(entry_for(order));
    }

    /// Remove an order, returning its remaining quantity
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> Option<Quantity> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(removed)
    }

    /// Best (highest) bid price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Mutable access to the best bid level
    pub fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next_back()
            .map(|(price, level)| (*price, level))
    }

    pub fn level(&self, price: &Price) -> Option<&PriceLevel> {
        self.levels.get(price)
    }

    /// Drop the best level if a fill emptied it
    pub fn prune_best(&mut self) {
        if let Some(price) = self.best_price() {
            if self.levels.get(&price).map(PriceLevel::is_empty).unwrap_or(false) {
                self.levels.remove(&price);
            }
        }
    }

    /// Top levels, best-first, as (price, resting quantity)
    pub fn depth(&self, levels: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev()
            .take(levels)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

fn entry_for(order: &Order) -> LevelEntry {
    LevelEntry {
        order_id: order.order_id,
        owner: order.owner,
        sequence: order.sequence,
        remaining: order.remaining(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use types::ids::{AccountId, MarketId};
    use types::order::{Outcome, Side};

    fn bid(price: &str, qty: &str, sequence: u64) -> Order {
        Order::new(
            MarketId::new(1),
            Outcome::Yes,
            Side::Bid,
            Price::from_str(price).unwrap(),
            Quantity::from_str(qty).unwrap(),
            AccountId::new(),
            sequence,
            1708123456789000000,
        )
    }

    #[test]
    fn test_best_bid_is_highest_price() {
        let mut book = BidBook::new();
        book.insert(&bid("0.55", "10", 1));
        book.insert(&bid("0.60", "20", 2));
        book.insert(&bid("0.50", "15", 3));

        assert_eq!(book.best_price(), Some(Price::from_str("0.60").unwrap()));
    }

    #[test]
    fn test_depth_best_first() {
        let mut book = BidBook::new();
        book.insert(&bid("0.55", "10", 1));
        book.insert(&bid("0.60", "20", 2));
        book.insert(&bid("0.50", "15", 3));

        let depth = book.depth(2);
        assert_eq!(depth.len(), 2);
        assert_eq!(depth[0].0, Price::from_str("0.60").unwrap());
        assert_eq!(depth[1].0, Price::from_str("0.55").unwrap());
    }

    #[test]
    fn test_remove_prunes_empty_level() {
        let mut book = BidBook::new();
        let order = bid("0.55", "10", 1);
        book.insert(&order);

        let removed = book.remove(&order.order_id, order.price);
        assert_eq!(removed, Some(Quantity::from_str("10").unwrap()));
        assert!(book.is_empty());
    }

    #[test]
    fn test_same_price_aggregates_one_level() {
        let mut book = BidBook::new();
        book.insert(&bid("0.55", "10", 1));
        book.insert(&bid("0.55", "5", 2));

        assert_eq!(book.level_count(), 1);
        let depth = book.depth(1);
        assert_eq!(depth[0].1, Quantity::from_str("15").unwrap());
    }
}
