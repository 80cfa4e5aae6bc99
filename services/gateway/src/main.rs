mod auth;
mod error;
mod handlers;
mod models;
mod rate_limit;
mod router;
mod state;

use ledger::memory::InMemoryLedger;
use router::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    tracing::info!("starting prediction market gateway");

    // In-memory ledger for local development; a chain-backed adapter
    // slots in here without touching the rest of the service.
    let ledger = Arc::new(InMemoryLedger::new());
    let state = AppState::new(ledger);

    let app = create_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3030);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
