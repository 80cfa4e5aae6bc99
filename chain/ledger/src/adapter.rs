//! The ledger adapter capability trait
//!
//! Consumed by the matching engine (funds gating), the settlement
//! coordinator (trade settlement), and the lifecycle manager (payout).
//! Instruction builders are pure and defaulted on the trait; only
//! queries and submission touch the chain.

use crate::errors::LedgerError;
use crate::instruction::{LedgerInstruction, TxSignature};
use async_trait::async_trait;
use rust_decimal::Decimal;
use types::ids::{AccountId, Mint};
use types::market::Market;
use types::order::Outcome;

/// Capability set over the external custody layer
///
/// `submit_and_confirm` is transactional: it returns a confirmed
/// signature or an error. Partial application is never assumed; an
/// adapter for a chain with weaker semantics must surface that itself.
#[async_trait]
pub trait LedgerAdapter: Send + Sync {
    /// Current balance of `mint` held by `owner`
    async fn get_balance(&self, owner: AccountId, mint: &Mint) -> Result<Decimal, LedgerError>;

    /// Amount of `mint` the owner has delegated to the engine
    async fn get_delegated_amount(
        &self,
        owner: AccountId,
        mint: &Mint,
    ) -> Result<Decimal, LedgerError>;

    /// Submit a signed instruction set and wait for confirmation
    async fn submit_and_confirm(
        &self,
        instructions: &[LedgerInstruction],
    ) -> Result<TxSignature, LedgerError>;

    fn build_approve_instruction(
        &self,
        owner: AccountId,
        mint: &Mint,
        amount: Decimal,
    ) -> LedgerInstruction {
        LedgerInstruction::Approve {
            owner,
            mint: mint.clone(),
            amount,
        }
    }

    fn build_transfer_instruction(
        &self,
        from: AccountId,
        to: AccountId,
        mint: &Mint,
        amount: Decimal,
    ) -> LedgerInstruction {
        LedgerInstruction::Transfer {
            from,
            to,
            mint: mint.clone(),
            amount,
        }
    }

    fn build_split_instruction(
        &self,
        owner: AccountId,
        market: &Market,
        amount: Decimal,
    ) -> LedgerInstruction {
        LedgerInstruction::Split {
            owner,
            market_id: market.market_id,
            collateral_mint: market.collateral_mint.clone(),
            yes_mint: market.yes_mint.clone(),
            no_mint: market.no_mint.clone(),
            amount,
        }
    }

    fn build_merge_instruction(
        &self,
        owner: AccountId,
        market: &Market,
        amount: Decimal,
    ) -> LedgerInstruction {
        LedgerInstruction::Merge {
            owner,
            market_id: market.market_id,
            collateral_mint: market.collateral_mint.clone(),
            yes_mint: market.yes_mint.clone(),
            no_mint: market.no_mint.clone(),
            amount,
        }
    }

    fn build_resolve_instruction(&self, market: &Market, winner: Outcome) -> LedgerInstruction {
        LedgerInstruction::Resolve {
            market_id: market.market_id,
            collateral_mint: market.collateral_mint.clone(),
            winning_mint: market.mint_for(winner).clone(),
        }
    }
}
