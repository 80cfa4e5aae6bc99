//! Price level with a sequence-ordered FIFO queue
//!
//! A price level holds every resting order at one price, ordered by
//! sequence number ascending, earliest first. Normal inserts append
//! (sequence numbers are monotonic); settlement rollback re-inserts at
//! the position the order's original sequence number dictates, so
//! restored liquidity gets its priority back.

use std::collections::VecDeque;
use types::ids::{AccountId, OrderId};
use types::numeric::Quantity;

/// One resting order's footprint in the book
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEntry {
    pub order_id: OrderId,
    pub owner: AccountId,
    pub sequence: u64,
    pub remaining: Quantity,
}

/// All orders resting at a single price
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Ascending by sequence (front = oldest = first to fill)
    orders: VecDeque<LevelEntry>,
    total_quantity: Quantity,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Append a fresh order (sequence numbers arrive monotonic)
    pub fn push(&mut self, entry: LevelEntry) {
        debug_assert!(
            self.orders
                .back()
                .map(|last| last.sequence < entry.sequence)
                .unwrap_or(true),
            "fresh inserts must arrive in sequence order"
        );
        self.total_quantity = self.total_quantity + entry.remaining;
        self.orders.push_back(entry);
    }

    /// Re-insert restored liquidity at its sequence position
    pub fn reinsert(&mut self, entry: LevelEntry) {
        let position = self
            .orders
            .iter()
            .position(|e| e.sequence > entry.sequence)
            .unwrap_or(self.orders.len());
        self.total_quantity = self.total_quantity + entry.remaining;
        self.orders.insert(position, entry);
    }

    /// Remove an order by id, returning its remaining quantity
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Quantity> {
        let position = self.orders.iter().position(|e| &e.order_id == order_id)?;
        let entry = self.orders.remove(position)?;
        self.total_quantity = self
            .total_quantity
            .checked_sub(entry.remaining)
            .unwrap_or_else(Quantity::zero);
        Some(entry.remaining)
    }

    /// Oldest order at this level
    pub fn front(&self) -> Option<&LevelEntry> {
        self.orders.front()
    }

    /// Consume quantity from the front order, dropping it when exhausted
    ///
    /// # Panics
    /// Panics if `fill` exceeds the front order's remaining quantity.
    pub fn fill_front(&mut self, fill: Quantity) {
        let entry = self.orders.front_mut().expect("fill on empty level");
        entry.remaining = entry
            .remaining
            .checked_sub(fill)
            .expect("fill exceeds front remaining");
        self.total_quantity = self
            .total_quantity
            .checked_sub(fill)
            .unwrap_or_else(Quantity::zero);
        if entry.remaining.is_zero() {
            self.orders.pop_front();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn entry(sequence: u64, remaining: &str) -> LevelEntry {
        LevelEntry {
            order_id: OrderId::new(),
            owner: AccountId::new(),
            sequence,
            remaining: Quantity::from_str(remaining).unwrap(),
        }
    }

    #[test]
    fn test_default_level_starts_empty() {
        let mut level = PriceLevel::default();
        assert_eq!(level.order_count(), 0);
        assert!(level.total_quantity().is_zero());

        level.push(entry(1, "10"));
        assert_eq!(level.total_quantity(), Quantity::from_str("10").unwrap());
    }

    #[test]
    fn test_push_keeps_fifo() {
        let mut level = PriceLevel::new();
        let first = entry(1, "10");
        let first_id = first.order_id;
        level.push(first);
        level.push(entry(2, "20"));

        assert_eq!(level.order_count(), 2);
        assert_eq!(level.front().unwrap().order_id, first_id);
        assert_eq!(level.total_quantity(), Quantity::from_str("30").unwrap());
    }

    #[test]
    fn test_reinsert_restores_priority() {
        let mut level = PriceLevel::new();
        level.push(entry(1, "10"));
        level.push(entry(5, "10"));

        let restored = entry(3, "7");
        let restored_id = restored.order_id;
        level.reinsert(restored);

        // Order must sit between sequence 1 and 5
        assert_eq!(level.order_count(), 3);
        let sequences: Vec<u64> = {
            let mut out = Vec::new();
            let mut lvl = level.clone();
            while let Some(front) = lvl.front().cloned() {
                out.push(front.sequence);
                lvl.fill_front(front.remaining);
            }
            out
        };
        assert_eq!(sequences, vec![1, 3, 5]);
        assert!(level.remove(&restored_id).is_some());
    }

    #[test]
    fn test_fill_front_partial_and_exhaust() {
        let mut level = PriceLevel::new();
        level.push(entry(1, "10"));

        level.fill_front(Quantity::from_str("4").unwrap());
        assert_eq!(level.total_quantity(), Quantity::from_str("6").unwrap());
        assert_eq!(level.order_count(), 1);

        level.fill_front(Quantity::from_str("6").unwrap());
        assert!(level.is_empty());
        assert!(level.total_quantity().is_zero());
    }

    #[test]
    fn test_remove_updates_total() {
        let mut level = PriceLevel::new();
        let target = entry(2, "20");
        let target_id = target.order_id;
        level.push(entry(1, "10"));
        level.push(target);

        let removed = level.remove(&target_id);
        assert_eq!(removed, Some(Quantity::from_str("20").unwrap()));
        assert_eq!(level.total_quantity(), Quantity::from_str("10").unwrap());
        assert!(level.remove(&target_id).is_none());
    }
}
