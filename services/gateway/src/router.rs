use crate::handlers::{admin, markets, orders};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/markets", get(markets::list_markets))
        .route("/markets/delegate", post(markets::delegate))
        .route("/markets/:id", get(markets::get_market))
        .route("/orderbook/snapshot/:id", get(markets::orderbook_snapshot))
        .route("/orders/place", post(orders::place_order))
        .route("/orders/cancel/:id", post(orders::cancel_order))
        .route("/orders/open/:market_id", get(orders::open_orders))
        .route("/orders/split", post(orders::split))
        .route("/orders/merge", post(orders::merge))
        .route("/admin/market/create", post(admin::create_market))
        .route("/admin/markets", get(admin::list_markets))
        .route("/admin/market/set-winner", post(admin::set_winner))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
