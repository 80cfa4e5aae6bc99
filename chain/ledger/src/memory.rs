//! In-memory ledger
//!
//! Reference implementation of [`LedgerAdapter`] used by tests and local
//! development. Keeps (account, mint) balance and delegation tables and
//! applies each instruction set all-or-nothing: instructions run against
//! a scratch copy of the state that is only committed if every one of
//! them succeeds.

use crate::adapter::LedgerAdapter;
use crate::errors::LedgerError;
use crate::instruction::{LedgerInstruction, TxSignature};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use types::ids::{AccountId, Mint};

#[derive(Debug, Default, Clone)]
struct LedgerState {
    /// (account, mint) -> balance
    balances: HashMap<(AccountId, Mint), Decimal>,
    /// (account, mint) -> amount delegated to the engine
    delegations: HashMap<(AccountId, Mint), Decimal>,
}

impl LedgerState {
    fn balance(&self, owner: AccountId, mint: &Mint) -> Decimal {
        self.balances
            .get(&(owner, mint.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn delegation(&self, owner: AccountId, mint: &Mint) -> Decimal {
        self.delegations
            .get(&(owner, mint.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn credit(&mut self, owner: AccountId, mint: &Mint, amount: Decimal) {
        *self
            .balances
            .entry((owner, mint.clone()))
            .or_insert(Decimal::ZERO) += amount;
    }

    fn debit(&mut self, owner: AccountId, mint: &Mint, amount: Decimal) -> Result<(), LedgerError> {
        let available = self.balance(owner, mint);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                mint: mint.to_string(),
                required: amount.to_string(),
                available: available.to_string(),
            });
        }
        self.balances.insert((owner, mint.clone()), available - amount);
        Ok(())
    }

    fn consume_delegation(
        &mut self,
        owner: AccountId,
        mint: &Mint,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let delegated = self.delegation(owner, mint);
        if delegated < amount {
            return Err(LedgerError::DelegationExceeded {
                mint: mint.to_string(),
                required: amount.to_string(),
                delegated: delegated.to_string(),
            });
        }
        self.delegations
            .insert((owner, mint.clone()), delegated - amount);
        Ok(())
    }

    fn apply(&mut self, instruction: &LedgerInstruction) -> Result<(), LedgerError> {
        match instruction {
            LedgerInstruction::Approve {
                owner,
                mint,
                amount,
            } => {
                if *amount < Decimal::ZERO {
                    return Err(LedgerError::InvalidAmount {
                        amount: amount.to_string(),
                    });
                }
                self.delegations.insert((*owner, mint.clone()), *amount);
                Ok(())
            }
            LedgerInstruction::Transfer {
                from,
                to,
                mint,
                amount,
            } => {
                if *amount <= Decimal::ZERO {
                    return Err(LedgerError::InvalidAmount {
                        amount: amount.to_string(),
                    });
                }
                self.consume_delegation(*from, mint, *amount)?;
                self.debit(*from, mint, *amount)?;
                self.credit(*to, mint, *amount);
                Ok(())
            }
            LedgerInstruction::Split {
                owner,
                collateral_mint,
                yes_mint,
                no_mint,
                amount,
                ..
            } => {
                if *amount <= Decimal::ZERO {
                    return Err(LedgerError::InvalidAmount {
                        amount: amount.to_string(),
                    });
                }
                self.debit(*owner, collateral_mint, *amount)?;
                self.credit(*owner, yes_mint, *amount);
                self.credit(*owner, no_mint, *amount);
                Ok(())
            }
            LedgerInstruction::Merge {
                owner,
                collateral_mint,
                yes_mint,
                no_mint,
                amount,
                ..
            } => {
                if *amount <= Decimal::ZERO {
                    return Err(LedgerError::InvalidAmount {
                        amount: amount.to_string(),
                    });
                }
                self.debit(*owner, yes_mint, *amount)?;
                self.debit(*owner, no_mint, *amount)?;
                self.credit(*owner, collateral_mint, *amount);
                Ok(())
            }
            LedgerInstruction::Resolve {
                collateral_mint,
                winning_mint,
                ..
            } => {
                // Redeem every winning-token holding 1:1. Losing tokens
                // stay where they are, worth nothing.
                let holders: Vec<(AccountId, Decimal)> = self
                    .balances
                    .iter()
                    .filter(|((_, mint), amount)| mint == winning_mint && **amount > Decimal::ZERO)
                    .map(|((owner, _), amount)| (*owner, *amount))
                    .collect();
                for (owner, amount) in holders {
                    self.balances.insert((owner, winning_mint.clone()), Decimal::ZERO);
                    self.credit(owner, collateral_mint, amount);
                }
                Ok(())
            }
        }
    }
}

/// In-memory [`LedgerAdapter`] with injectable failures for tests
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    /// Failures consumed (FIFO) by the next `submit_and_confirm` calls
    fail_queue: Mutex<VecDeque<LedgerError>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            fail_queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Test/dev faucet: credit an account directly
    pub fn credit(&self, owner: AccountId, mint: &Mint, amount: Decimal) {
        self.state.lock().unwrap().credit(owner, mint, amount);
    }

    /// Queue a failure for an upcoming `submit_and_confirm`
    pub fn inject_failure(&self, error: LedgerError) {
        self.fail_queue.lock().unwrap().push_back(error);
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerAdapter for InMemoryLedger {
    async fn get_balance(&self, owner: AccountId, mint: &Mint) -> Result<Decimal, LedgerError> {
        Ok(self.state.lock().unwrap().balance(owner, mint))
    }

    async fn get_delegated_amount(
        &self,
        owner: AccountId,
        mint: &Mint,
    ) -> Result<Decimal, LedgerError> {
        Ok(self.state.lock().unwrap().delegation(owner, mint))
    }

    async fn submit_and_confirm(
        &self,
        instructions: &[LedgerInstruction],
    ) -> Result<TxSignature, LedgerError> {
        if let Some(error) = self.fail_queue.lock().unwrap().pop_front() {
            return Err(error);
        }

        let mut state = self.state.lock().unwrap();
        // All-or-nothing: apply to a scratch copy, commit only on success
        let mut scratch = state.clone();
        for instruction in instructions {
            scratch.apply(instruction)?;
        }
        *state = scratch;
        Ok(TxSignature::generate())
    }
}
