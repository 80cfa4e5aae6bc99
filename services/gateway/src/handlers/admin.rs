//! Admin surface: market creation, listing, winner declaration

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::models::{CreateMarketRequest, SetWinnerRequest, SetWinnerResponse};
use crate::state::{now_nanos, now_secs, AppState};
use axum::{extract::State, Json};
use ledger::instruction::TransactionPayload;
use market_lifecycle::NewMarket;
use types::market::Market;

pub async fn create_market(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateMarketRequest>,
) -> Result<Json<Market>, AppError> {
    let market = state.lifecycle.create(
        NewMarket {
            market_id: payload.market_id,
            title: payload.title,
            description: payload.description,
            category: payload.category,
            image_url: payload.image_url,
            collateral_mint: payload.collateral_mint,
            close_time: payload.expiration_timestamp,
        },
        now_secs(),
    )?;
    Ok(Json(market))
}

pub async fn list_markets(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<Vec<Market>> {
    Json(state.lifecycle.list(None, now_secs()))
}

/// Declare the winning outcome and hand back the unsigned payout
/// transaction (winning tokens redeem 1:1 for collateral)
pub async fn set_winner(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<SetWinnerRequest>,
) -> Result<Json<SetWinnerResponse>, AppError> {
    let market = state
        .lifecycle
        .set_winner(payload.market_id, payload.outcome, now_secs())?;

    // Closing (lazy or prior) must not leave resting orders behind
    state
        .cancel_market_orders(payload.market_id, now_nanos())
        .await;

    let instruction = state
        .ledger
        .build_resolve_instruction(&market, payload.outcome);
    let tx_message = TransactionPayload::new(vec![instruction]).to_base64()?;

    Ok(Json(SetWinnerResponse {
        market_id: market.market_id,
        outcome: payload.outcome,
        tx_message,
    }))
}
