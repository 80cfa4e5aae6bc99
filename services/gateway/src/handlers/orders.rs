//! Order placement, cancellation, open-order queries, split and merge

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{
    CancelOrderRequest, CancelOrderResponse, OpenOrdersResponse, OrderReceiptResponse,
    PlaceOrderRequest, SplitMergeRequest, TradeView, TxMessageResponse,
};
use crate::rate_limit::ApiClass;
use crate::state::{now_nanos, now_secs, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use ledger::instruction::TransactionPayload;
use rust_decimal::Decimal;
use settlement::execute_submission;
use types::errors::EngineError;
use types::ids::{MarketId, OrderId};
use types::market::Market;
use types::numeric::{Price, Quantity};
use types::order::{Order, Outcome, Side};
use uuid::Uuid;

pub async fn place_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<Json<OrderReceiptResponse>, AppError> {
    state
        .rate_limiter
        .check(user.account_id, ApiClass::PlaceOrder)?;

    let market = ensure_market_open(&state, payload.market_id).await?;
    if payload.collateral_mint != market.collateral_mint {
        return Err(AppError::BadRequest(
            "collateral_mint does not match the market".into(),
        ));
    }

    let price = Price::try_new(payload.price).map_err(|_| EngineError::InvalidPrice {
        price: payload.price.to_string(),
    })?;
    let quantity = Quantity::try_new(payload.qty)
        .ok()
        .filter(|q| !q.is_zero())
        .ok_or(EngineError::InvalidQuantity {
            quantity: payload.qty.to_string(),
        })?;

    // Funds gating before the book lock: no order exists until the
    // delegation covers it
    match payload.side {
        Side::Bid => {
            let required = quantity.notional(price);
            let delegated = state
                .ledger
                .get_delegated_amount(user.account_id, &market.collateral_mint)
                .await?;
            if delegated < required {
                return Err(EngineError::InsufficientCollateral {
                    required: required.to_string(),
                    available: delegated.to_string(),
                }
                .into());
            }
        }
        Side::Ask => {
            let required = quantity.as_decimal();
            let delegated = state
                .ledger
                .get_delegated_amount(user.account_id, market.mint_for(payload.share))
                .await?;
            if delegated < required {
                return Err(EngineError::InsufficientTokens {
                    required: required.to_string(),
                    available: delegated.to_string(),
                }
                .into());
            }
        }
    }

    let book = state.book(payload.market_id, payload.share);
    let receipt = execute_submission(
        &book,
        &state.coordinator,
        &market,
        payload.side,
        price,
        quantity,
        user.account_id,
        now_nanos(),
    )
    .await?;

    Ok(Json(OrderReceiptResponse {
        order_id: receipt.order.order_id,
        status: receipt.order.status,
        filled: receipt.order.filled,
        remaining: receipt.order.remaining(),
        trades: receipt.trades.iter().map(TradeView::from).collect(),
    }))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<CancelOrderRequest>,
) -> Result<Json<CancelOrderResponse>, AppError> {
    state
        .rate_limiter
        .check(user.account_id, ApiClass::CancelOrder)?;

    let book = state.book(payload.market_id, payload.share);
    let order = book.lock().await.cancel(
        &OrderId::from_uuid(order_id),
        user.account_id,
        now_nanos(),
    )?;

    Ok(Json(CancelOrderResponse {
        order_id: order.order_id,
        status: order.status,
    }))
}

/// Caller's open orders across both outcome books of a market
pub async fn open_orders(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(market_id): Path<u64>,
) -> Result<Json<OpenOrdersResponse>, AppError> {
    let market_id = MarketId::new(market_id);
    state.lifecycle.get(market_id)?;

    let mut orders: Vec<Order> = Vec::new();
    for outcome in [Outcome::Yes, Outcome::No] {
        let book = state.book(market_id, outcome);
        orders.extend(book.lock().await.open_orders(Some(user.account_id)));
    }
    orders.sort_by_key(|o| o.created_at);
    Ok(Json(OpenOrdersResponse { orders }))
}

/// Unsigned split: collateral -> equal YES + NO
pub async fn split(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SplitMergeRequest>,
) -> Result<Json<TxMessageResponse>, AppError> {
    let (market, amount) = validate_split_merge(&state, &payload)?;

    let balance = state
        .ledger
        .get_balance(user.account_id, &market.collateral_mint)
        .await?;
    if balance < amount {
        return Err(EngineError::InsufficientCollateral {
            required: amount.to_string(),
            available: balance.to_string(),
        }
        .into());
    }

    let instruction = state
        .ledger
        .build_split_instruction(user.account_id, &market, amount);
    let tx_message = TransactionPayload::new(vec![instruction]).to_base64()?;
    Ok(Json(TxMessageResponse { tx_message }))
}

/// Unsigned merge: equal YES + NO -> collateral
pub async fn merge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SplitMergeRequest>,
) -> Result<Json<TxMessageResponse>, AppError> {
    let (market, amount) = validate_split_merge(&state, &payload)?;

    for mint in [&market.yes_mint, &market.no_mint] {
        let balance = state.ledger.get_balance(user.account_id, mint).await?;
        if balance < amount {
            return Err(EngineError::InsufficientTokens {
                required: amount.to_string(),
                available: balance.to_string(),
            }
            .into());
        }
    }

    let instruction = state
        .ledger
        .build_merge_instruction(user.account_id, &market, amount);
    let tx_message = TransactionPayload::new(vec![instruction]).to_base64()?;
    Ok(Json(TxMessageResponse { tx_message }))
}

fn validate_split_merge(
    state: &AppState,
    payload: &SplitMergeRequest,
) -> Result<(Market, Decimal), AppError> {
    if payload.amount <= Decimal::ZERO {
        return Err(EngineError::InvalidAmount {
            amount: payload.amount.to_string(),
        }
        .into());
    }
    let market = state.lifecycle.get(payload.market_id)?;
    if payload.collateral_mint != market.collateral_mint {
        return Err(AppError::BadRequest(
            "collateral_mint does not match the market".into(),
        ));
    }
    Ok((market, payload.amount))
}

/// Gate on lifecycle state, sweeping a just-expired market closed and
/// cancelling its resting orders
async fn ensure_market_open(state: &AppState, market_id: MarketId) -> Result<Market, AppError> {
    match state.lifecycle.ensure_open(market_id, now_secs()) {
        Ok(market) => Ok(market),
        Err(refusal) => {
            if refusal.just_closed.is_some() {
                state.cancel_market_orders(market_id, now_nanos()).await;
            }
            Err(refusal.error.into())
        }
    }
}
