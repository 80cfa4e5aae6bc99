//! Order store
//!
//! Authoritative owner of every order on one outcome book: open, filled,
//! and cancelled alike. Assigns the monotonic sequence numbers that carry
//! time priority. `update_fill` is the only path by which `filled`
//! increases; `revert_fill` exists solely as the compensating action for
//! settlement rollback.

use std::collections::HashMap;
use types::errors::EngineError;
use types::ids::{AccountId, OrderId};
use types::numeric::Quantity;
use types::order::{Order, OrderStatus};

#[derive(Debug, Default)]
pub struct OrderStore {
    orders: HashMap<OrderId, Order>,
    next_sequence: u64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            next_sequence: 1,
        }
    }

    /// Claim the next monotonic sequence number
    pub fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.order_id, order);
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Apply a fill to an order
    pub fn update_fill(
        &mut self,
        order_id: &OrderId,
        fill: Quantity,
        timestamp: i64,
    ) -> Result<(), EngineError> {
        let order = self.orders.get_mut(order_id).ok_or(EngineError::NotFound {
            order_id: order_id.to_string(),
        })?;
        order.apply_fill(fill, timestamp);
        Ok(())
    }

    /// Undo an optimistic fill whose settlement failed
    pub fn revert_fill(
        &mut self,
        order_id: &OrderId,
        fill: Quantity,
        timestamp: i64,
    ) -> Result<(), EngineError> {
        let order = self.orders.get_mut(order_id).ok_or(EngineError::NotFound {
            order_id: order_id.to_string(),
        })?;
        order.revert_fill(fill, timestamp);
        Ok(())
    }

    /// Mark an order cancelled
    pub fn cancel(&mut self, order_id: &OrderId, timestamp: i64) -> Result<(), EngineError> {
        let order = self.orders.get_mut(order_id).ok_or(EngineError::NotFound {
            order_id: order_id.to_string(),
        })?;
        order.cancel(timestamp);
        Ok(())
    }

    /// Drop an order entirely (failed taker submissions only)
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        self.orders.remove(order_id)
    }

    /// Open orders (Open or PartiallyFilled), sequence order
    pub fn open_orders(&self, owner: Option<AccountId>) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .orders
            .values()
            .filter(|o| {
                matches!(o.status, OrderStatus::Open | OrderStatus::PartiallyFilled)
                    && owner.map(|a| o.owner == a).unwrap_or(true)
            })
            .collect();
        orders.sort_by_key(|o| o.sequence);
        orders
    }
}
