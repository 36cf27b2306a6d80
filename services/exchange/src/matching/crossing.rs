//! Crossing detection logic
//!
//! Determines when an incoming request may trade with a resting order based
//! on price compatibility.

use types::numeric::Price;
use types::order::{OrderKind, Side};

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be >= the
/// sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming limit price crosses a resting order's price
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::BUY => can_match(incoming_price, resting_price),
        Side::SELL => can_match(resting_price, incoming_price),
    }
}

/// Check if a request of `kind` may still trade at `resting_price`
///
/// Market requests have no price bound.
pub fn within_limit(incoming_side: Side, kind: OrderKind, resting_price: Price) -> bool {
    match kind {
        OrderKind::LIMIT(limit) => incoming_can_match(incoming_side, limit, resting_price),
        OrderKind::MARKET => true,
    }
}
