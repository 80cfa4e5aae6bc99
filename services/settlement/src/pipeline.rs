//! Submission pipeline: reserve, settle, commit or roll back
//!
//! The book lock is held only for the in-memory phases. Settlement runs
//! with the lock released, so other submissions against the same book
//! proceed while the ledger confirms. If settlement fails the plan is
//! rolled back; a rollback can re-cross the book against liquidity that
//! arrived in the meantime, and each re-cross plan is settled in turn
//! until one commits or a rollback leaves the book uncrossed. Every
//! failed round cancels the liquidity the previous round restored, so
//! the chain shrinks and the pipeline always terminates.

use std::sync::Arc;

use matching_engine::{MatchPlan, OrderReceipt, OutcomeBook};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use types::errors::EngineError;
use types::ids::{AccountId, OrderId};
use types::market::Market;
use types::numeric::{Price, Quantity};
use types::order::Side;

use crate::coordinator::SettlementCoordinator;

/// One outcome book behind its exclusive lock
pub type SharedBook = Arc<Mutex<OutcomeBook>>;

/// Run one order submission end to end
///
/// On success the receipt carries the order's final state and its settled
/// trades. On settlement failure the book is restored and the original
/// error is returned; the caller's order is gone as if never accepted.
pub async fn execute_submission(
    book: &SharedBook,
    coordinator: &SettlementCoordinator,
    market: &Market,
    side: Side,
    price: Price,
    quantity: Quantity,
    owner: AccountId,
    now: i64,
) -> Result<OrderReceipt, EngineError> {
    let plan = {
        let mut guard = book.lock().await;
        guard.submit(side, price, quantity, owner, now)?
    };
    let Some(taker_id) = plan.taker else {
        // submit always assigns a taker; a plan without one is corrupt
        return Err(EngineError::SettlementFailed {
            reason: "submission produced no taker order".to_string(),
        });
    };

    if !plan.has_trades() {
        let mut guard = book.lock().await;
        guard.commit(plan, None, now);
        return receipt(&guard, &taker_id, Vec::new());
    }

    match coordinator.settle(&plan.trades, market).await {
        Ok(signature) => {
            let mut guard = book.lock().await;
            let trades = guard.commit(plan, Some(signature.to_string()), now);
            receipt(&guard, &taker_id, trades)
        }
        Err(error) => {
            warn!(%error, order_id = %taker_id, "settlement failed, rolling back");
            let follow_up = {
                let mut guard = book.lock().await;
                guard.rollback(plan, now)
            };
            if let Some(follow_up) = follow_up {
                settle_follow_up(book, coordinator, market, follow_up, now).await;
            }
            Err(error)
        }
    }
}

/// Settle the plans produced by rollback re-crosses
///
/// Each failed round's rollback cancels the liquidity the previous
/// round restored, and its own restores can re-cross against orders
/// that rested while settlement was in flight. Every such plan is
/// driven to a commit or a rollback here; none is dropped with fills
/// outstanding. The loop ends when a round commits or a rollback
/// leaves the book uncrossed.
async fn settle_follow_up(
    book: &SharedBook,
    coordinator: &SettlementCoordinator,
    market: &Market,
    mut plan: MatchPlan,
    now: i64,
) {
    loop {
        debug!(trades = plan.trades.len(), "settling rollback re-cross");
        match coordinator.settle(&plan.trades, market).await {
            Ok(signature) => {
                let mut guard = book.lock().await;
                guard.commit(plan, Some(signature.to_string()), now);
                return;
            }
            Err(error) => {
                warn!(%error, "follow-up settlement failed, cancelling restored liquidity");
                let next = {
                    let mut guard = book.lock().await;
                    guard.rollback(plan, now)
                };
                match next {
                    Some(next_plan) => plan = next_plan,
                    None => return,
                }
            }
        }
    }
}

fn receipt(
    book: &OutcomeBook,
    taker_id: &OrderId,
    trades: Vec<types::trade::Trade>,
) -> Result<OrderReceipt, EngineError> {
    let order = book
        .order(taker_id)
        .cloned()
        .ok_or(EngineError::NotFound {
            order_id: taker_id.to_string(),
        })?;
    Ok(OrderReceipt { order, trades })
}
