//! Crossing detection
//!
//! A bid crosses an ask when the bid is willing to pay at least what the
//! ask demands. Execution always happens at the resting (maker) price.

use types::numeric::Price;
use types::order::Side;

/// Whether bid and ask prices cross
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Whether an incoming order crosses a resting order's price
pub fn incoming_can_match(
    incoming_side: Side,
    incoming_price: Price,
    resting_price: Price,
) -> bool {
    match incoming_side {
        Side::Bid => incoming_price >= resting_price,
        Side::Ask => incoming_price <= resting_price,
    }
}
