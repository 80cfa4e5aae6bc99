//! Trade records
//!
//! A trade is created atomically with a matching event and is append-only
//! once settled. Trades are born pending settlement; they become durable
//! only when the settlement coordinator confirms the on-chain transaction.

use crate::ids::{AccountId, MarketId, OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::{Outcome, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement state of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeState {
    /// Matched, awaiting ledger confirmation
    PendingSettlement,
    /// Both legs confirmed on-chain (terminal)
    Settled,
}

/// One matched fill between a resting (maker) and incoming (taker) order
///
/// Execution price is always the maker's limit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub market_id: MarketId,
    pub outcome: Outcome,

    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker: AccountId,
    pub taker: AccountId,

    /// Taker's side of the book
    pub taker_side: Side,
    pub price: Price,
    pub quantity: Quantity,

    pub state: TradeState,
    pub executed_at: i64, // Unix nanos
    pub settled_at: Option<i64>,
    /// Confirmed ledger transaction signature, set on settlement
    pub tx_signature: Option<String>,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_id: MarketId,
        outcome: Outcome,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker: AccountId,
        taker: AccountId,
        taker_side: Side,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            market_id,
            outcome,
            maker_order_id,
            taker_order_id,
            maker,
            taker,
            taker_side,
            price,
            quantity,
            state: TradeState::PendingSettlement,
            executed_at,
            settled_at: None,
            tx_signature: None,
        }
    }

    /// Mark settled with the confirming transaction signature
    pub fn settle(&mut self, tx_signature: String, timestamp: i64) {
        self.state = TradeState::Settled;
        self.settled_at = Some(timestamp);
        self.tx_signature = Some(tx_signature);
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, TradeState::Settled)
    }

    /// Collateral moved by this trade (price x quantity)
    pub fn notional(&self) -> Decimal {
        self.quantity.notional(self.price)
    }

    /// Account paying collateral and receiving outcome tokens
    pub fn buyer(&self) -> AccountId {
        match self.taker_side {
            Side::Bid => self.taker,
            Side::Ask => self.maker,
        }
    }

    /// Account delivering outcome tokens and receiving collateral
    pub fn seller(&self) -> AccountId {
        match self.taker_side {
            Side::Bid => self.maker,
            Side::Ask => self.taker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn test_trade(taker_side: Side) -> Trade {
        Trade::new(
            MarketId::new(42),
            Outcome::Yes,
            OrderId::new(),
            OrderId::new(),
            AccountId::new(),
            AccountId::new(),
            taker_side,
            Price::from_str("0.60").unwrap(),
            Quantity::from_str("40").unwrap(),
            1708123456789000000,
        )
    }

    #[test]
    fn test_trade_starts_pending() {
        let trade = test_trade(Side::Bid);
        assert_eq!(trade.state, TradeState::PendingSettlement);
        assert!(!trade.is_settled());
        assert!(trade.tx_signature.is_none());
    }

    #[test]
    fn test_trade_settlement() {
        let mut trade = test_trade(Side::Bid);
        trade.settle("sig_abc".to_string(), 1708123456790000000);
        assert!(trade.is_settled());
        assert_eq!(trade.tx_signature.as_deref(), Some("sig_abc"));
        assert!(trade.settled_at.is_some());
    }

    #[test]
    fn test_notional() {
        let trade = test_trade(Side::Bid);
        assert_eq!(trade.notional(), Decimal::from(24));
    }

    #[test]
    fn test_buyer_seller_by_taker_side() {
        let trade = test_trade(Side::Bid);
        assert_eq!(trade.buyer(), trade.taker);
        assert_eq!(trade.seller(), trade.maker);

        let trade = test_trade(Side::Ask);
        assert_eq!(trade.buyer(), trade.maker);
        assert_eq!(trade.seller(), trade.taker);
    }
}
