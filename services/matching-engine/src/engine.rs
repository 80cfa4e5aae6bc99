//! Outcome book: matching, reservation, commit and rollback
//!
//! One [`OutcomeBook`] holds both sides of one outcome's market. Matching
//! is optimistic: [`OutcomeBook::submit`] fills orders immediately and
//! returns a [`MatchPlan`] describing every reservation it made, but the
//! resulting trades are only provisional until the settlement layer
//! confirms the ledger transaction. The caller then either
//! [`OutcomeBook::commit`]s the plan (trades become durable) or
//! [`OutcomeBook::rollback`]s it (fills are reverted and the displaced
//! liquidity is restored at its original time priority).
//!
//! A rollback can leave the book crossed when fresh liquidity arrived
//! while settlement was in flight, so `rollback` finishes by re-running
//! the match and handing back a follow-up [`MatchPlan`] for the caller to
//! settle. Liquidity restored by a rollback is cancelled outright if its
//! follow-up settlement fails too, so the process terminates.

use types::errors::EngineError;
use types::ids::{AccountId, MarketId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, Outcome, Side};
use types::trade::Trade;

use crate::book::{AskBook, BidBook};
use crate::matching::crossing::{can_match, incoming_can_match};
use crate::snapshot::{cumulative_depth, BookSnapshot};
use crate::store::OrderStore;

/// One maker-side fill reserved by a match, pending settlement
#[derive(Debug, Clone, PartialEq)]
pub struct MakerReservation {
    pub order_id: OrderId,
    pub price: Price,
    pub fill: Quantity,
}

/// Everything a single match reserved, in execution order
///
/// `taker` is `None` for follow-up plans produced by a rollback, where
/// both counterparties were already resting.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPlan {
    pub taker: Option<OrderId>,
    /// Orders reinstated by the rollback that produced this plan; they
    /// are cancelled rather than restored again if this plan fails too
    pub restored: Vec<OrderId>,
    pub trades: Vec<Trade>,
    pub reservations: Vec<MakerReservation>,
}

impl MatchPlan {
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }
}

/// Final outcome of a submission, returned to the caller after commit
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub order: Order,
    pub trades: Vec<Trade>,
}

/// Both sides of one (market, outcome) book plus its order store
#[derive(Debug)]
pub struct OutcomeBook {
    market_id: MarketId,
    outcome: Outcome,
    bids: BidBook,
    asks: AskBook,
    store: OrderStore,
    /// Settled trades, append-only, execution order
    trade_log: Vec<Trade>,
}

impl OutcomeBook {
    pub fn new(market_id: MarketId, outcome: Outcome) -> Self {
        Self {
            market_id,
            outcome,
            bids: BidBook::new(),
            asks: AskBook::new(),
            store: OrderStore::new(),
            trade_log: Vec::new(),
        }
    }

    pub fn market_id(&self) -> MarketId {
        self.market_id
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Submit a limit order: match what crosses, rest the remainder
    ///
    /// Fills are applied optimistically; the returned plan must be either
    /// committed or rolled back once settlement resolves. The book is
    /// never left crossed: any unmatched remainder rests only after the
    /// opposite side no longer crosses it.
    pub fn submit(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        owner: AccountId,
        now: i64,
    ) -> Result<MatchPlan, EngineError> {
        if quantity.is_zero() {
            return Err(EngineError::InvalidQuantity {
                quantity: quantity.to_string(),
            });
        }

        let sequence = self.store.next_sequence();
        let mut order = Order::new(
            self.market_id,
            self.outcome,
            side,
            price,
            quantity,
            owner,
            sequence,
            now,
        );

        let mut trades = Vec::new();
        let mut reservations = Vec::new();

        while !order.is_filled() {
            let maker_price = match side {
                Side::Bid => self.asks.best_price(),
                Side::Ask => self.bids.best_price(),
            };
            let maker_price = match maker_price {
                Some(p) if incoming_can_match(side, price, p) => p,
                _ => break,
            };

            let maker_entry = self
                .best_opposite_front(side)
                .expect("non-empty best level has a front order");
            let fill = order.remaining().min(maker_entry.remaining);

            self.store.update_fill(&maker_entry.order_id, fill, now)?;
            self.fill_opposite_front(side, fill);
            order.apply_fill(fill, now);

            trades.push(Trade::new(
                self.market_id,
                self.outcome,
                maker_entry.order_id,
                order.order_id,
                maker_entry.owner,
                owner,
                side,
                maker_price,
                fill,
                now,
            ));
            reservations.push(MakerReservation {
                order_id: maker_entry.order_id,
                price: maker_price,
                fill,
            });
        }

        if !order.is_filled() {
            match side {
                Side::Bid => self.bids.insert(&order),
                Side::Ask => self.asks.insert(&order),
            }
        }
        let taker_id = order.order_id;
        self.store.insert(order);

        Ok(MatchPlan {
            taker: Some(taker_id),
            restored: Vec::new(),
            trades,
            reservations,
        })
    }

    /// Finalize a settled plan: trades become durable
    ///
    /// `tx_signature` is the confirming ledger signature; `None` is only
    /// valid for plans that produced no trades.
    pub fn commit(
        &mut self,
        mut plan: MatchPlan,
        tx_signature: Option<String>,
        now: i64,
    ) -> Vec<Trade> {
        for trade in &mut plan.trades {
            if let Some(sig) = &tx_signature {
                trade.settle(sig.clone(), now);
            }
            self.trade_log.push(trade.clone());
        }
        plan.trades
    }

    /// Undo a failed plan and restore displaced liquidity at its
    /// original priority
    ///
    /// Returns a follow-up plan when the restore re-crosses the book
    /// against liquidity that arrived while settlement was in flight.
    pub fn rollback(&mut self, plan: MatchPlan, now: i64) -> Option<MatchPlan> {
        let mut restored = Vec::new();

        for reservation in plan.reservations.iter().rev() {
            if self
                .store
                .revert_fill(&reservation.order_id, reservation.fill, now)
                .is_err()
            {
                continue;
            }
            let order = match self.store.get(&reservation.order_id) {
                Some(order) => order.clone(),
                None => continue,
            };
            if order.status == OrderStatus::Cancelled {
                continue;
            }
            // Drop any live remainder entry first, then reinstate the
            // full remainder at its sequence position
            self.remove_from_book(&order);
            if plan.restored.contains(&reservation.order_id) {
                // Second settlement failure for liquidity a rollback
                // already reinstated once. Cancel it to terminate.
                let _ = self.store.cancel(&reservation.order_id, now);
                continue;
            }
            self.reinsert(&order);
            restored.push(order.order_id);
        }

        // A failed taker never rested: erase it entirely
        if let Some(taker_id) = plan.taker {
            if let Some(order) = self.store.get(&taker_id).cloned() {
                self.remove_from_book(&order);
                self.store.remove(&taker_id);
            }
        }

        self.uncross(now, restored)
    }

    /// Cancel an open order owned by `caller`
    pub fn cancel(
        &mut self,
        order_id: &OrderId,
        caller: AccountId,
        now: i64,
    ) -> Result<Order, EngineError> {
        let order = self
            .store
            .get(order_id)
            .cloned()
            .ok_or(EngineError::NotFound {
                order_id: order_id.to_string(),
            })?;
        if order.owner != caller {
            return Err(EngineError::NotOwner {
                order_id: order_id.to_string(),
            });
        }
        match order.status {
            OrderStatus::Filled => {
                return Err(EngineError::AlreadyFilled {
                    order_id: order_id.to_string(),
                })
            }
            // A cancelled order no longer exists as far as callers care
            OrderStatus::Cancelled => {
                return Err(EngineError::NotFound {
                    order_id: order_id.to_string(),
                })
            }
            OrderStatus::Open | OrderStatus::PartiallyFilled => {}
        }

        self.remove_from_book(&order);
        self.store.cancel(order_id, now)?;
        Ok(self
            .store
            .get(order_id)
            .cloned()
            .expect("order survives cancellation"))
    }

    /// Cancel every open order (market close). Returns what was cancelled.
    pub fn cancel_all(&mut self, now: i64) -> Vec<Order> {
        let open: Vec<Order> = self
            .store
            .open_orders(None)
            .into_iter()
            .cloned()
            .collect();
        let mut cancelled = Vec::with_capacity(open.len());
        for order in open {
            self.remove_from_book(&order);
            if self.store.cancel(&order.order_id, now).is_ok() {
                if let Some(order) = self.store.get(&order.order_id) {
                    cancelled.push(order.clone());
                }
            }
        }
        cancelled
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.store.get(order_id)
    }

    pub fn open_orders(&self, owner: Option<AccountId>) -> Vec<Order> {
        self.store
            .open_orders(owner)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Settled trade history, oldest first
    pub fn trade_log(&self) -> &[Trade] {
        &self.trade_log
    }

    /// Aggregated depth, best-first on both sides
    pub fn snapshot(&self, levels: usize) -> BookSnapshot {
        BookSnapshot(
            cumulative_depth(self.bids.depth(levels)),
            cumulative_depth(self.asks.depth(levels)),
        )
    }

    /// Match resting bids against resting asks until the book uncrosses
    ///
    /// The older order of each crossing pair is the maker and sets the
    /// execution price.
    fn uncross(&mut self, now: i64, restored: Vec<OrderId>) -> Option<MatchPlan> {
        let mut trades = Vec::new();
        let mut reservations = Vec::new();

        loop {
            let (bid_price, ask_price) = match (self.bids.best_price(), self.asks.best_price()) {
                (Some(bid), Some(ask)) if can_match(bid, ask) => (bid, ask),
                _ => break,
            };
            let bid_front = self
                .best_front(Side::Bid)
                .expect("non-empty best bid level");
            let ask_front = self
                .best_front(Side::Ask)
                .expect("non-empty best ask level");

            let (maker, maker_price, taker, taker_side) = if bid_front.sequence < ask_front.sequence
            {
                (&bid_front, bid_price, &ask_front, Side::Ask)
            } else {
                (&ask_front, ask_price, &bid_front, Side::Bid)
            };

            let fill = bid_front.remaining.min(ask_front.remaining);
            if self.store.update_fill(&bid_front.order_id, fill, now).is_err()
                || self.store.update_fill(&ask_front.order_id, fill, now).is_err()
            {
                break;
            }

            trades.push(Trade::new(
                self.market_id,
                self.outcome,
                maker.order_id,
                taker.order_id,
                maker.owner,
                taker.owner,
                taker_side,
                maker_price,
                fill,
                now,
            ));
            reservations.push(MakerReservation {
                order_id: bid_front.order_id,
                price: bid_price,
                fill,
            });
            reservations.push(MakerReservation {
                order_id: ask_front.order_id,
                price: ask_price,
                fill,
            });

            self.fill_front(Side::Bid, fill);
            self.fill_front(Side::Ask, fill);
        }

        if trades.is_empty() {
            None
        } else {
            Some(MatchPlan {
                taker: None,
                restored,
                trades,
                reservations,
            })
        }
    }

    fn best_front(&self, side: Side) -> Option<crate::book::LevelEntry> {
        match side {
            Side::Bid => self
                .bids
                .best_price()
                .and_then(|p| self.bids.level(&p))
                .and_then(|level| level.front().cloned()),
            Side::Ask => self
                .asks
                .best_price()
                .and_then(|p| self.asks.level(&p))
                .and_then(|level| level.front().cloned()),
        }
    }

    fn best_opposite_front(&self, incoming_side: Side) -> Option<crate::book::LevelEntry> {
        self.best_front(incoming_side.opposite())
    }

    fn fill_front(&mut self, side: Side, fill: Quantity) {
        match side {
            Side::Bid => {
                if let Some((_, level)) = self.bids.best_level_mut() {
                    level.fill_front(fill);
                }
                self.bids.prune_best();
            }
            Side::Ask => {
                if let Some((_, level)) = self.asks.best_level_mut() {
                    level.fill_front(fill);
                }
                self.asks.prune_best();
            }
        }
    }

    fn fill_opposite_front(&mut self, incoming_side: Side, fill: Quantity) {
        self.fill_front(incoming_side.opposite(), fill);
    }

    fn remove_from_book(&mut self, order: &Order) {
        match order.side {
            Side::Bid => self.bids.remove(&order.order_id, order.price),
            Side::Ask => self.asks.remove(&order.order_id, order.price),
        };
    }

    fn reinsert(&mut self, order: &Order) {
        if order.remaining().is_zero() {
            return;
        }
        match order.side {
            Side::Bid => self.bids.reinsert(order),
            Side::Ask => self.asks.reinsert(order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use types::order::Outcome;
    use types::trade::TradeState;

    fn book() -> OutcomeBook {
        OutcomeBook::new(MarketId::new(1), Outcome::Yes)
    }

    fn price(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    fn qty(s: &str) -> Quantity {
        Quantity::from_str(s).unwrap()
    }

    fn submit(
        book: &mut OutcomeBook,
        side: Side,
        p: &str,
        q: &str,
        owner: AccountId,
        now: i64,
    ) -> MatchPlan {
        book.submit(side, price(p), qty(q), owner, now).unwrap()
    }

    /// Commit with a dummy signature, as the settlement layer would
    fn commit(book: &mut OutcomeBook, plan: MatchPlan, now: i64) -> Vec<Trade> {
        let sig = plan.has_trades().then(|| "sig_test".to_string());
        book.commit(plan, sig, now)
    }

    #[test]
    fn test_resting_order_rests() {
        let mut book = book();
        let alice = AccountId::new();

        let plan = submit(&mut book, Side::Bid, "0.60", "100", alice, 1);
        assert!(plan.trades.is_empty());
        commit(&mut book, plan, 1);

        assert_eq!(book.best_bid(), Some(price("0.60")));
        assert_eq!(book.best_ask(), None);
    }

    #[test]
    fn test_crossing_ask_executes_at_maker_price() {
        let mut book = book();
        let alice = AccountId::new();
        let bob = AccountId::new();

        let plan = submit(&mut book, Side::Bid, "0.60", "100", alice, 1);
        commit(&mut book, plan, 1);

        // Ask at 0.55 crosses the 0.60 bid; execution at the bid's price
        let plan = submit(&mut book, Side::Ask, "0.55", "40", bob, 2);
        assert_eq!(plan.trades.len(), 1);
        let trade = &plan.trades[0];
        assert_eq!(trade.price, price("0.60"));
        assert_eq!(trade.quantity, qty("40"));
        assert_eq!(trade.maker, alice);
        assert_eq!(trade.taker, bob);
        assert_eq!(trade.taker_side, Side::Ask);
        assert_eq!(trade.state, TradeState::PendingSettlement);

        let trades = commit(&mut book, plan, 2);
        assert!(trades[0].is_settled());

        // Bid keeps its unfilled remainder
        assert_eq!(book.best_bid(), Some(price("0.60")));
        assert_eq!(book.snapshot(10).bids()[0].quantity, qty("60"));
    }

    #[test]
    fn test_non_crossing_ask_rests() {
        let mut book = book();
        let alice = AccountId::new();

        let plan = submit(&mut book, Side::Bid, "0.60", "100", alice, 1);
        commit(&mut book, plan, 1);

        let plan = submit(&mut book, Side::Ask, "0.70", "10", AccountId::new(), 2);
        assert!(plan.trades.is_empty());
        commit(&mut book, plan, 2);

        assert_eq!(book.best_ask(), Some(price("0.70")));
        // Book not crossed
        assert!(book.best_bid().unwrap() < book.best_ask().unwrap());
    }

    #[test]
    fn test_price_priority_beats_time() {
        let mut book = book();
        let cheap = AccountId::new();
        let aggressive = AccountId::new();

        commit_all(&mut book, Side::Ask, &[("0.70", "10", cheap), ("0.55", "10", aggressive)]);

        let plan = submit(&mut book, Side::Bid, "0.80", "10", AccountId::new(), 3);
        assert_eq!(plan.trades.len(), 1);
        // Lower ask fills first despite arriving later
        assert_eq!(plan.trades[0].maker, aggressive);
        assert_eq!(plan.trades[0].price, price("0.55"));
    }

    #[test]
    fn test_time_priority_at_equal_price() {
        let mut book = book();
        let first = AccountId::new();
        let second = AccountId::new();

        commit_all(&mut book, Side::Bid, &[("0.60", "30", first), ("0.60", "30", second)]);

        let plan = submit(&mut book, Side::Ask, "0.60", "40", AccountId::new(), 3);
        assert_eq!(plan.trades.len(), 2);
        assert_eq!(plan.trades[0].maker, first);
        assert_eq!(plan.trades[0].quantity, qty("30"));
        assert_eq!(plan.trades[1].maker, second);
        assert_eq!(plan.trades[1].quantity, qty("10"));
    }

    #[test]
    fn test_taker_sweeps_levels_then_rests() {
        let mut book = book();
        commit_all(
            &mut book,
            Side::Ask,
            &[
                ("0.55", "20", AccountId::new()),
                ("0.65", "15", AccountId::new()),
            ],
        );

        let taker = AccountId::new();
        let plan = submit(&mut book, Side::Bid, "0.65", "50", taker, 3);
        assert_eq!(plan.trades.len(), 2);
        assert_eq!(plan.trades[0].price, price("0.55"));
        assert_eq!(plan.trades[1].price, price("0.65"));
        let taker_id = plan.taker.unwrap();
        commit(&mut book, plan, 3);

        // 35 filled, 15 rests on the bid side
        let order = book.order(&taker_id).unwrap();
        assert_eq!(order.remaining(), qty("15"));
        assert_eq!(book.best_bid(), Some(price("0.65")));
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut book = book();
        let result = book.submit(Side::Bid, price("0.50"), Quantity::zero(), AccountId::new(), 1);
        assert!(matches!(result, Err(EngineError::InvalidQuantity { .. })));
    }

    #[test]
    fn test_cancel_removes_liquidity() {
        let mut book = book();
        let alice = AccountId::new();
        let plan = submit(&mut book, Side::Bid, "0.60", "100", alice, 1);
        let id = plan.taker.unwrap();
        commit(&mut book, plan, 1);

        let cancelled = book.cancel(&id, alice, 2).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(book.best_bid().is_none());

        // Second cancel reports not found
        assert!(matches!(
            book.cancel(&id, alice, 3),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_cancel_wrong_owner_rejected() {
        let mut book = book();
        let alice = AccountId::new();
        let plan = submit(&mut book, Side::Bid, "0.60", "100", alice, 1);
        let id = plan.taker.unwrap();
        commit(&mut book, plan, 1);

        assert!(matches!(
            book.cancel(&id, AccountId::new(), 2),
            Err(EngineError::NotOwner { .. })
        ));
        // Liquidity untouched
        assert_eq!(book.best_bid(), Some(price("0.60")));
    }

    #[test]
    fn test_cancel_filled_order_rejected() {
        let mut book = book();
        let alice = AccountId::new();
        let plan = submit(&mut book, Side::Bid, "0.60", "40", alice, 1);
        let id = plan.taker.unwrap();
        commit(&mut book, plan, 1);

        let plan = submit(&mut book, Side::Ask, "0.60", "40", AccountId::new(), 2);
        commit(&mut book, plan, 2);

        assert!(matches!(
            book.cancel(&id, alice, 3),
            Err(EngineError::AlreadyFilled { .. })
        ));
    }

    #[test]
    fn test_cancel_all_empties_book() {
        let mut book = book();
        commit_all(
            &mut book,
            Side::Bid,
            &[("0.60", "10", AccountId::new()), ("0.55", "10", AccountId::new())],
        );
        commit_all(&mut book, Side::Ask, &[("0.70", "10", AccountId::new())]);

        let cancelled = book.cancel_all(5);
        assert_eq!(cancelled.len(), 3);
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
        assert!(book.open_orders(None).is_empty());
    }

    #[test]
    fn test_rollback_restores_maker_and_erases_taker() {
        let mut book = book();
        let maker = AccountId::new();
        let plan = submit(&mut book, Side::Bid, "0.60", "100", maker, 1);
        let maker_id = plan.taker.unwrap();
        commit(&mut book, plan, 1);

        let plan = submit(&mut book, Side::Ask, "0.55", "40", AccountId::new(), 2);
        let taker_id = plan.taker.unwrap();
        assert_eq!(plan.trades.len(), 1);

        // Settlement failed: roll back
        let follow_up = book.rollback(plan, 3);
        assert!(follow_up.is_none());

        // Maker is whole again with its full quantity
        let restored = book.order(&maker_id).unwrap();
        assert_eq!(restored.status, OrderStatus::Open);
        assert_eq!(restored.remaining(), qty("100"));
        assert_eq!(book.snapshot(10).bids()[0].quantity, qty("100"));

        // Taker never existed
        assert!(book.order(&taker_id).is_none());
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn test_rollback_preserves_time_priority() {
        let mut book = book();
        let early = AccountId::new();
        let late = AccountId::new();

        let plan = submit(&mut book, Side::Bid, "0.60", "50", early, 1);
        commit(&mut book, plan, 1);

        // Early bid is consumed, pending settlement
        let plan = submit(&mut book, Side::Ask, "0.60", "50", AccountId::new(), 2);

        // While settlement is in flight another bid rests at the same price
        let late_plan = submit(&mut book, Side::Bid, "0.60", "50", late, 3);
        commit(&mut book, late_plan, 3);

        // Settlement fails; early bid must come back AHEAD of the late one
        book.rollback(plan, 4);

        let plan = submit(&mut book, Side::Ask, "0.60", "50", AccountId::new(), 5);
        assert_eq!(plan.trades.len(), 1);
        assert_eq!(plan.trades[0].maker, early);
        commit(&mut book, plan, 5);
    }

    #[test]
    fn test_rollback_re_crosses_against_fresh_liquidity() {
        let mut book = book();
        let maker = AccountId::new();
        let fresh = AccountId::new();

        let plan = submit(&mut book, Side::Bid, "0.60", "40", maker, 1);
        let maker_id = plan.taker.unwrap();
        commit(&mut book, plan, 1);

        // Bid fully consumed, pending settlement
        let pending = submit(&mut book, Side::Ask, "0.55", "40", AccountId::new(), 2);

        // Fresh ask rests below the (currently absent) bid
        let fresh_plan = submit(&mut book, Side::Ask, "0.58", "40", fresh, 3);
        commit(&mut book, fresh_plan, 3);

        // Rollback restores the 0.60 bid, which crosses the 0.58 ask
        let follow_up = book.rollback(pending, 4).expect("book re-crossed");
        assert!(follow_up.taker.is_none());
        assert_eq!(follow_up.trades.len(), 1);
        // Restored bid is older, so it is the maker and sets the price
        assert_eq!(follow_up.trades[0].price, price("0.60"));
        assert_eq!(follow_up.trades[0].maker, maker);
        assert_eq!(follow_up.trades[0].taker, fresh);
        assert_eq!(follow_up.restored, vec![maker_id]);

        commit(&mut book, follow_up, 4);
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn test_follow_up_failure_cancels_restored_liquidity() {
        let mut book = book();
        let maker = AccountId::new();

        let plan = submit(&mut book, Side::Bid, "0.60", "40", maker, 1);
        let maker_id = plan.taker.unwrap();
        commit(&mut book, plan, 1);

        let pending = submit(&mut book, Side::Ask, "0.55", "40", AccountId::new(), 2);
        let fresh_plan = submit(&mut book, Side::Ask, "0.58", "40", AccountId::new(), 3);
        let fresh_id = fresh_plan.taker.unwrap();
        commit(&mut book, fresh_plan, 3);

        let follow_up = book.rollback(pending, 4).expect("book re-crossed");
        // Follow-up settlement fails too: restored bid is cancelled, the
        // fresh ask goes back to resting, and matching terminates
        let third = book.rollback(follow_up, 5);
        assert!(third.is_none());

        assert_eq!(book.order(&maker_id).unwrap().status, OrderStatus::Cancelled);
        let fresh_order = book.order(&fresh_id).unwrap();
        assert_eq!(fresh_order.status, OrderStatus::Open);
        assert_eq!(book.best_ask(), Some(price("0.58")));
        assert!(book.best_bid().is_none());
    }

    #[test]
    fn test_rollback_of_partial_fill() {
        let mut book = book();
        let maker = AccountId::new();
        let plan = submit(&mut book, Side::Bid, "0.60", "100", maker, 1);
        let maker_id = plan.taker.unwrap();
        commit(&mut book, plan, 1);

        let pending = submit(&mut book, Side::Ask, "0.60", "30", AccountId::new(), 2);
        assert_eq!(book.snapshot(10).bids()[0].quantity, qty("70"));

        book.rollback(pending, 3);
        assert_eq!(book.order(&maker_id).unwrap().remaining(), qty("100"));
        assert_eq!(book.snapshot(10).bids()[0].quantity, qty("100"));
    }

    #[test]
    fn test_trade_log_grows_only_on_commit() {
        let mut book = book();
        let plan = submit(&mut book, Side::Bid, "0.60", "40", AccountId::new(), 1);
        commit(&mut book, plan, 1);

        let pending = submit(&mut book, Side::Ask, "0.60", "20", AccountId::new(), 2);
        assert!(book.trade_log().is_empty());
        book.rollback(pending, 3);
        assert!(book.trade_log().is_empty());

        let plan = submit(&mut book, Side::Ask, "0.60", "20", AccountId::new(), 4);
        commit(&mut book, plan, 4);
        assert_eq!(book.trade_log().len(), 1);
        assert!(book.trade_log()[0].is_settled());
    }

    #[test]
    fn test_snapshot_depth_and_totals() {
        let mut book = book();
        commit_all(
            &mut book,
            Side::Bid,
            &[
                ("0.60", "100", AccountId::new()),
                ("0.55", "50", AccountId::new()),
                ("0.60", "20", AccountId::new()),
            ],
        );

        let snapshot = book.snapshot(10);
        assert_eq!(snapshot.bids().len(), 2);
        assert_eq!(snapshot.bids()[0].price, price("0.60"));
        assert_eq!(snapshot.bids()[0].quantity, qty("120"));
        assert_eq!(snapshot.bids()[1].total, qty("170"));
        assert!(snapshot.asks().is_empty());
    }

    fn commit_all(book: &mut OutcomeBook, side: Side, orders: &[(&str, &str, AccountId)]) {
        for (i, (p, q, owner)) in orders.iter().enumerate() {
            let plan = submit(book, side, p, q, *owner, i as i64 + 1);
            let sig = plan.has_trades().then(|| "sig_test".to_string());
            book.commit(plan, sig, i as i64 + 1);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use rust_decimal::Decimal;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            /// Random streams never rest a crossed book, never overfill,
            /// and conserve quantity across both sides of every trade.
            #[test]
            fn prop_random_streams_keep_invariants(
                orders in proptest::collection::vec(
                    (any::<bool>(), 1i64..99, 1i64..50),
                    1..40,
                )
            ) {
                let mut book = OutcomeBook::new(MarketId::new(1), Outcome::Yes);
                let owner = AccountId::new();
                let mut ids = Vec::new();

                for (i, (is_bid, cents, lots)) in orders.iter().enumerate() {
                    let side = if *is_bid { Side::Bid } else { Side::Ask };
                    let price = Price::try_new(Decimal::new(*cents, 2)).unwrap();
                    let quantity = Quantity::try_new(Decimal::from(*lots)).unwrap();

                    let plan = book
                        .submit(side, price, quantity, owner, i as i64 + 1)
                        .unwrap();
                    if let Some(id) = plan.taker {
                        ids.push(id);
                    }
                    let sig = plan.has_trades().then(|| "sig_prop".to_string());
                    book.commit(plan, sig, i as i64 + 1);

                    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
                        prop_assert!(bid < ask, "book rested crossed: {bid} >= {ask}");
                    }
                }

                let mut total_filled = Quantity::zero();
                for id in &ids {
                    let order = book.order(id).unwrap();
                    prop_assert!(order.filled <= order.quantity);
                    prop_assert_eq!(
                        order.filled + order.remaining(),
                        order.quantity
                    );
                    total_filled = total_filled + order.filled;
                }
                // Every trade fills one bid and one ask for equal quantity
                let traded: Quantity = book
                    .trade_log()
                    .iter()
                    .map(|t| t.quantity)
                    .fold(Quantity::zero(), |acc, q| acc + q);
                prop_assert_eq!(total_filled, traded + traded);
            }
        }
    }
}
