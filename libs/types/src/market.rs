//! Market records and lifecycle state
//!
//! A market is a binary question backed by one collateral mint and two
//! outcome mints. Lifecycle: Open -> Closed -> Resolved, strictly in that
//! direction; Resolved is terminal and immutable.

use crate::errors::EngineError;
use crate::ids::{MarketId, Mint};
use crate::order::Outcome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Market lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketStatus {
    #[serde(alias = "open")]
    Open,
    #[serde(alias = "closed")]
    Closed,
    #[serde(alias = "resolved")]
    Resolved,
}

impl MarketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::Open => "Open",
            MarketStatus::Closed => "Closed",
            MarketStatus::Resolved => "Resolved",
        }
    }
}

/// A binary-outcome market
///
/// Metadata (title, description, category, image) is immutable after
/// creation; only lifecycle fields change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Internal record id
    pub id: Uuid,
    /// On-chain id shared with the custody program
    pub market_id: MarketId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub collateral_mint: Mint,
    pub yes_mint: Mint,
    pub no_mint: Mint,
    /// Collateral escrow account held by the custody program
    pub vault: Mint,
    pub status: MarketStatus,
    /// Trading stops at this time (unix seconds)
    pub close_time: i64,
    /// Set when a winner is declared (unix seconds)
    pub resolve_time: Option<i64>,
    /// Winning outcome, None until resolved
    pub outcome: Option<Outcome>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Market {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_id: MarketId,
        title: String,
        description: Option<String>,
        category: String,
        image_url: Option<String>,
        collateral_mint: Mint,
        yes_mint: Mint,
        no_mint: Mint,
        vault: Mint,
        close_time: i64,
        now: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            market_id,
            title,
            description,
            category,
            image_url,
            collateral_mint,
            yes_mint,
            no_mint,
            vault,
            status: MarketStatus::Open,
            close_time,
            resolve_time: None,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mint of the given outcome token
    pub fn mint_for(&self, outcome: Outcome) -> &Mint {
        match outcome {
            Outcome::Yes => &self.yes_mint,
            Outcome::No => &self.no_mint,
        }
    }

    /// Whether the market accepts orders at `now` (unix seconds)
    pub fn is_open(&self, now: i64) -> bool {
        self.status == MarketStatus::Open && now < self.close_time
    }

    /// Whether the close time has passed while the record still says Open
    pub fn is_expired(&self, now: i64) -> bool {
        self.status == MarketStatus::Open && now >= self.close_time
    }

    /// Transition Open -> Closed
    pub fn close(&mut self, now: i64) -> Result<(), EngineError> {
        if self.status != MarketStatus::Open {
            return Err(EngineError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: MarketStatus::Closed.as_str().to_string(),
            });
        }
        self.status = MarketStatus::Closed;
        self.updated_at = now;
        Ok(())
    }

    /// Transition Closed -> Resolved with a winning outcome
    ///
    /// Terminal: a second declaration, or resolving a market that is not
    /// Closed, fails with `InvalidTransition`.
    pub fn resolve(&mut self, winner: Outcome, now: i64) -> Result<(), EngineError> {
        if self.status != MarketStatus::Closed {
            return Err(EngineError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: MarketStatus::Resolved.as_str().to_string(),
            });
        }
        self.status = MarketStatus::Resolved;
        self.outcome = Some(winner);
        self.resolve_time = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_market(close_time: i64) -> Market {
        Market::new(
            MarketId::new(7),
            "Will it rain tomorrow?".to_string(),
            None,
            "weather".to_string(),
            None,
            Mint::new("USDC"),
            Mint::new("YES7"),
            Mint::new("NO7"),
            Mint::new("VAULT7"),
            close_time,
            1_700_000_000,
        )
    }

    #[test]
    fn test_market_open_until_close_time() {
        let market = test_market(2_000_000_000);
        assert!(market.is_open(1_900_000_000));
        assert!(!market.is_open(2_000_000_000));
        assert!(market.is_expired(2_000_000_000));
    }

    #[test]
    fn test_close_then_resolve() {
        let mut market = test_market(2_000_000_000);
        market.close(2_000_000_001).unwrap();
        assert_eq!(market.status, MarketStatus::Closed);

        market.resolve(Outcome::Yes, 2_000_000_002).unwrap();
        assert_eq!(market.status, MarketStatus::Resolved);
        assert_eq!(market.outcome, Some(Outcome::Yes));
        assert!(market.resolve_time.is_some());
    }

    #[test]
    fn test_resolve_requires_closed() {
        let mut market = test_market(2_000_000_000);
        let err = market.resolve(Outcome::Yes, 1_900_000_000).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
    }

    #[test]
    fn test_double_resolve_fails() {
        let mut market = test_market(2_000_000_000);
        market.close(2_000_000_001).unwrap();
        market.resolve(Outcome::No, 2_000_000_002).unwrap();

        let err = market.resolve(Outcome::Yes, 2_000_000_003).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
        // First declaration stands
        assert_eq!(market.outcome, Some(Outcome::No));
    }

    #[test]
    fn test_double_close_fails() {
        let mut market = test_market(2_000_000_000);
        market.close(2_000_000_001).unwrap();
        assert!(market.close(2_000_000_002).is_err());
    }

    #[test]
    fn test_mint_for_outcome() {
        let market = test_market(2_000_000_000);
        assert_eq!(market.mint_for(Outcome::Yes).as_str(), "YES7");
        assert_eq!(market.mint_for(Outcome::No).as_str(), "NO7");
    }
}
