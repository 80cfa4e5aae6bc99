//! Market registry and lifecycle manager
//!
//! Concurrent registry keyed by on-chain market id. Lifecycle methods
//! return the updated market record so callers can build the follow-on
//! ledger instructions (resolution payout) or side effects (order
//! cancellation on close) from a consistent snapshot.

use dashmap::DashMap;
use tracing::info;
use types::errors::EngineError;
use types::ids::{MarketId, Mint};
use types::market::{Market, MarketStatus};
use types::order::Outcome;

/// Parameters for market creation
#[derive(Debug, Clone)]
pub struct NewMarket {
    pub market_id: MarketId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub collateral_mint: Mint,
    /// Trading stops at this time (unix seconds)
    pub close_time: i64,
}

#[derive(Debug, Default)]
pub struct LifecycleManager {
    markets: DashMap<MarketId, Market>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            markets: DashMap::new(),
        }
    }

    /// Register a new market
    ///
    /// The outcome mints and vault are derived from the market id; they
    /// mirror the accounts the custody program allocates at listing.
    pub fn create(&self, params: NewMarket, now: i64) -> Result<Market, EngineError> {
        if params.close_time <= now {
            return Err(EngineError::InvalidCloseTime {
                close_time: params.close_time,
            });
        }
        let id = params.market_id;
        let market = Market::new(
            id,
            params.title,
            params.description,
            params.category,
            params.image_url,
            params.collateral_mint,
            Mint::new(format!("YES-{id}")),
            Mint::new(format!("NO-{id}")),
            Mint::new(format!("VAULT-{id}")),
            params.close_time,
            now,
        );
        // entry() keeps creation atomic under concurrent admin calls
        match self.markets.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(EngineError::MarketAlreadyExists {
                market_id: id.as_u64(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                info!(market_id = %id, close_time = market.close_time, "market created");
                slot.insert(market.clone());
                Ok(market)
            }
        }
    }

    pub fn get(&self, market_id: MarketId) -> Result<Market, EngineError> {
        self.markets
            .get(&market_id)
            .map(|entry| entry.clone())
            .ok_or(EngineError::MarketNotFound {
                market_id: market_id.as_u64(),
            })
    }

    /// All markets, optionally filtered by status, newest first
    ///
    /// Expired-but-unswept markets report as Closed so listings never
    /// show a past-deadline market as tradable.
    pub fn list(&self, status: Option<MarketStatus>, now: i64) -> Vec<Market> {
        let mut markets: Vec<Market> = self
            .markets
            .iter()
            .map(|entry| {
                let mut market = entry.clone();
                if market.is_expired(now) {
                    market.status = MarketStatus::Closed;
                }
                market
            })
            .filter(|m| status.map(|s| m.status == s).unwrap_or(true))
            .collect();
        markets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        markets
    }

    /// Verify the market accepts orders, sweeping an expired one to
    /// Closed first
    ///
    /// Returns the open market, or `(MarketNotOpen, Some(market))` when
    /// this call performed the close so the caller can cancel its
    /// resting orders.
    pub fn ensure_open(&self, market_id: MarketId, now: i64) -> Result<Market, ClosedMarket> {
        let mut entry = self
            .markets
            .get_mut(&market_id)
            .ok_or(ClosedMarket {
                error: EngineError::MarketNotFound {
                    market_id: market_id.as_u64(),
                },
                just_closed: None,
            })?;

        if entry.is_open(now) {
            return Ok(entry.clone());
        }

        let just_closed = if entry.is_expired(now) {
            // Lazy close on first observation past the deadline
            entry.close(now).ok();
            info!(market_id = %market_id, "market lazily closed");
            Some(entry.clone())
        } else {
            None
        };
        Err(ClosedMarket {
            error: EngineError::MarketNotOpen {
                market_id: market_id.as_u64(),
            },
            just_closed,
        })
    }

    /// Explicit Open -> Closed transition (admin)
    pub fn close(&self, market_id: MarketId, now: i64) -> Result<Market, EngineError> {
        let mut entry = self
            .markets
            .get_mut(&market_id)
            .ok_or(EngineError::MarketNotFound {
                market_id: market_id.as_u64(),
            })?;
        entry.close(now)?;
        info!(market_id = %market_id, "market closed");
        Ok(entry.clone())
    }

    /// Declare the winning outcome
    ///
    /// An expired-but-unswept market is closed first, so resolution
    /// straight after the deadline needs no separate close call. Open
    /// markets before their deadline cannot be resolved.
    pub fn set_winner(
        &self,
        market_id: MarketId,
        winner: Outcome,
        now: i64,
    ) -> Result<Market, EngineError> {
        let mut entry = self
            .markets
            .get_mut(&market_id)
            .ok_or(EngineError::MarketNotFound {
                market_id: market_id.as_u64(),
            })?;
        if entry.is_expired(now) {
            entry.close(now)?;
        }
        entry.resolve(winner, now)?;
        info!(market_id = %market_id, winner = winner.as_str(), "market resolved");
        Ok(entry.clone())
    }
}

/// Outcome of a failed [`LifecycleManager::ensure_open`]
///
/// `just_closed` carries the market when this very call swept it to
/// Closed; the caller owes the book a cancel-all.
#[derive(Debug)]
pub struct ClosedMarket {
    pub error: EngineError,
    pub just_closed: Option<Market>,
}
