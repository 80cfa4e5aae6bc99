use crate::rate_limit::RateLimiter;
use dashmap::DashMap;
use ledger::adapter::LedgerAdapter;
use market_lifecycle::LifecycleManager;
use matching_engine::OutcomeBook;
use settlement::{SettlementCoordinator, SharedBook};
use std::sync::Arc;
use tokio::sync::Mutex;
use types::ids::MarketId;
use types::order::Outcome;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<LifecycleManager>,
    pub ledger: Arc<dyn LedgerAdapter>,
    pub coordinator: Arc<SettlementCoordinator>,
    /// One lazily-created book per (market, outcome)
    books: Arc<DashMap<(MarketId, Outcome), SharedBook>>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn LedgerAdapter>) -> Self {
        Self {
            lifecycle: Arc::new(LifecycleManager::new()),
            coordinator: Arc::new(SettlementCoordinator::new(ledger.clone())),
            ledger,
            books: Arc::new(DashMap::new()),
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }

    /// Book for one (market, outcome), created on first use
    pub fn book(&self, market_id: MarketId, outcome: Outcome) -> SharedBook {
        self.books
            .entry((market_id, outcome))
            .or_insert_with(|| Arc::new(Mutex::new(OutcomeBook::new(market_id, outcome))))
            .clone()
    }

    /// Cancel all resting orders on both outcome books of a market
    ///
    /// Runs when the market transitions Open -> Closed; orders on a
    /// closed market would pin delegated balances forever.
    pub async fn cancel_market_orders(&self, market_id: MarketId, now: i64) -> usize {
        let mut cancelled = 0;
        for outcome in [Outcome::Yes, Outcome::No] {
            if let Some(book) = self.books.get(&(market_id, outcome)).map(|b| b.clone()) {
                cancelled += book.lock().await.cancel_all(now).len();
            }
        }
        if cancelled > 0 {
            tracing::info!(market_id = %market_id, cancelled, "cancelled resting orders on close");
        }
        cancelled
    }
}

/// Unix seconds, for lifecycle decisions
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Unix nanos, for order and trade timestamps
pub fn now_nanos() -> i64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| chrono::Utc::now().timestamp_micros().saturating_mul(1_000))
}
