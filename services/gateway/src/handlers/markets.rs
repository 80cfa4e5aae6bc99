//! Public market queries and the delegation endpoint

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{DelegateRequest, MarketListQuery, TxMessageResponse};
use crate::state::{now_secs, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use ledger::instruction::TransactionPayload;
use matching_engine::MarketSnapshot;
use rust_decimal::Decimal;
use types::errors::EngineError;
use types::ids::MarketId;
use types::market::Market;
use types::order::{Outcome, Side};

pub async fn list_markets(
    State(state): State<AppState>,
    Query(query): Query<MarketListQuery>,
) -> Json<Vec<Market>> {
    Json(state.lifecycle.list(query.status, now_secs()))
}

pub async fn get_market(
    State(state): State<AppState>,
    Path(market_id): Path<u64>,
) -> Result<Json<Market>, AppError> {
    Ok(Json(state.lifecycle.get(MarketId::new(market_id))?))
}

/// Aggregated depth of both outcome books, best-first
pub async fn orderbook_snapshot(
    State(state): State<AppState>,
    Path(market_id): Path<u64>,
) -> Result<Json<MarketSnapshot>, AppError> {
    let market_id = MarketId::new(market_id);
    state.lifecycle.get(market_id)?;

    const DEPTH: usize = 50;
    let yes = state.book(market_id, Outcome::Yes).lock().await.snapshot(DEPTH);
    let no = state.book(market_id, Outcome::No).lock().await.snapshot(DEPTH);
    Ok(Json(MarketSnapshot { yes, no }))
}

/// Build the unsigned delegation approval for the client's wallet
///
/// A Bid needs collateral delegated; an Ask needs the outcome token.
pub async fn delegate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<DelegateRequest>,
) -> Result<Json<TxMessageResponse>, AppError> {
    if payload.amount <= Decimal::ZERO {
        return Err(EngineError::InvalidAmount {
            amount: payload.amount.to_string(),
        }
        .into());
    }
    let market = state.lifecycle.get(payload.market_id)?;
    let mint = match payload.side {
        Side::Bid => &market.collateral_mint,
        Side::Ask => market.mint_for(payload.share),
    };

    let instruction =
        state
            .ledger
            .build_approve_instruction(user.account_id, mint, payload.amount);
    let tx_message = TransactionPayload::new(vec![instruction]).to_base64()?;
    Ok(Json(TxMessageResponse { tx_message }))
}
