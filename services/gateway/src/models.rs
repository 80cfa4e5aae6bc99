//! Wire DTOs
//!
//! Prices, quantities, and amounts arrive as raw decimals and are
//! validated into the engine's newtypes inside the handlers, so range
//! violations surface as engine error codes rather than serde failures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{MarketId, Mint, OrderId, TradeId};
use types::market::MarketStatus;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, Outcome, Side};
use types::trade::Trade;

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub market_id: MarketId,
    pub collateral_mint: Mint,
    pub side: Side,
    /// Which outcome token the order trades
    pub share: Outcome,
    pub price: Decimal,
    pub qty: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeView {
    pub trade_id: TradeId,
    pub price: Price,
    pub quantity: Quantity,
    pub tx_signature: Option<String>,
}

impl From<&Trade> for TradeView {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.trade_id,
            price: trade.price,
            quantity: trade.quantity,
            tx_signature: trade.tx_signature.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderReceiptResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub filled: Quantity,
    pub remaining: Quantity,
    pub trades: Vec<TradeView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderRequest {
    pub market_id: MarketId,
    pub share: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenOrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelegateRequest {
    pub market_id: MarketId,
    pub side: Side,
    pub share: Outcome,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitMergeRequest {
    pub market_id: MarketId,
    pub collateral_mint: Mint,
    pub amount: Decimal,
}

/// Unsigned transaction for the client's wallet to sign and submit
#[derive(Debug, Clone, Serialize)]
pub struct TxMessageResponse {
    pub tx_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketListQuery {
    pub status: Option<MarketStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMarketRequest {
    pub market_id: MarketId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub collateral_mint: Mint,
    /// Trading deadline, unix seconds
    pub expiration_timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetWinnerRequest {
    pub market_id: MarketId,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetWinnerResponse {
    pub market_id: MarketId,
    pub outcome: Outcome,
    pub tx_message: String,
}
