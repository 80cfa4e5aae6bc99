//! Settlement coordinator
//!
//! Translates a batch of matched trades into one atomic ledger
//! instruction set and drives it to confirmation. Each trade contributes
//! two legs: collateral from buyer to seller at notional value, and
//! outcome tokens from seller to buyer. Both legs of every trade in the
//! batch confirm together or not at all.

use std::sync::Arc;

use ledger::adapter::LedgerAdapter;
use ledger::instruction::{LedgerInstruction, TxSignature};
use tracing::{debug, warn};
use types::errors::EngineError;
use types::market::Market;
use types::trade::Trade;

pub struct SettlementCoordinator {
    ledger: Arc<dyn LedgerAdapter>,
    /// Submission attempts per batch; only transient failures retry
    max_attempts: u32,
}

impl SettlementCoordinator {
    pub fn new(ledger: Arc<dyn LedgerAdapter>) -> Self {
        Self {
            ledger,
            max_attempts: 3,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Settle a batch of trades from one market atomically
    pub async fn settle(
        &self,
        trades: &[Trade],
        market: &Market,
    ) -> Result<TxSignature, EngineError> {
        let instructions = self.build_instructions(trades, market);
        debug!(
            market_id = %market.market_id,
            trades = trades.len(),
            instructions = instructions.len(),
            "submitting settlement batch"
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.ledger.submit_and_confirm(&instructions).await {
                Ok(signature) => {
                    debug!(%signature, "settlement confirmed");
                    return Ok(signature);
                }
                Err(error) if error.is_transient() && attempt < self.max_attempts => {
                    warn!(%error, attempt, "transient settlement failure, retrying");
                }
                Err(error) => {
                    warn!(%error, attempt, "settlement failed");
                    return Err(EngineError::SettlementFailed {
                        reason: error.to_string(),
                    });
                }
            }
        }
    }

    /// Two transfer legs per trade, batch order preserved
    fn build_instructions(&self, trades: &[Trade], market: &Market) -> Vec<LedgerInstruction> {
        let mut instructions = Vec::with_capacity(trades.len() * 2);
        for trade in trades {
            let outcome_mint = market.mint_for(trade.outcome);
            instructions.push(self.ledger.build_transfer_instruction(
                trade.buyer(),
                trade.seller(),
                &market.collateral_mint,
                trade.notional(),
            ));
            instructions.push(self.ledger.build_transfer_instruction(
                trade.seller(),
                trade.buyer(),
                outcome_mint,
                trade.quantity.as_decimal(),
            ));
        }
        instructions
    }
}

impl std::fmt::Debug for SettlementCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementCoordinator")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
