//! Ask (sell-side) book for one outcome
//!
//! Price levels sorted ascending (best ask first). Mirror image of
//! [`super::bid_book::BidBook`].

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::{LevelEntry, PriceLevel};

#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
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

    /// Best (lowest) ask price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best ask level
    pub fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next()
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

    fn ask(price: &str, qty: &str, sequence: u64) -> Order {
        Order::new(
            MarketId::new(1),
            Outcome::Yes,
            Side::Ask,
            Price::from_str(price).unwrap(),
            Quantity::from_str(qty).unwrap(),
            AccountId::new(),
            sequence,
            1708123456789000000,
        )
    }

    #[test]
    fn test_best_ask_is_lowest_price() {
        let mut book = AskBook::new();
        book.insert(&ask("0.70", "10", 1));
        book.insert(&ask("0.55", "20", 2));
        book.insert(&ask("0.65", "15", 3));

        assert_eq!(book.best_price(), Some(Price::from_str("0.55").unwrap()));
    }

    #[test]
    fn test_depth_best_first() {
        let mut book = AskBook::new();
        book.insert(&ask("0.70", "10", 1));
        book.insert(&ask("0.55", "20", 2));
        book.insert(&ask("0.65", "15", 3));

        let depth = book.depth(2);
        assert_eq!(depth[0].0, Price::from_str("0.55").unwrap());
        assert_eq!(depth[1].0, Price::from_str("0.65").unwrap());
    }

    #[test]
    fn test_remove_prunes_empty_level() {
        let mut book = AskBook::new();
        let order = ask("0.55", "10", 1);
        book.insert(&order);

        assert!(book.remove(&order.order_id, order.price).is_some());
        assert!(book.is_empty());
    }
}
