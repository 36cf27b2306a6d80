//! Event structures for the exchange
//!
//! Every state change the exchange commits is appended to its event log as
//! one of these records. Rejected requests leave no event.

use serde::{Deserialize, Serialize};
use types::asset::Ticker;
use types::ids::{OrderId, TraderId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Balance credited by a deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub trader: TraderId,
    pub asset: Ticker,
    pub amount: Quantity,
}

/// Balance debited by a withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub trader: TraderId,
    pub asset: Ticker,
    pub amount: Quantity,
}

/// Limit remainder entered the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub trader: TraderId,
    pub asset: Ticker,
    pub side: Side,
    pub amount: Quantity,
    pub price: Price,
    pub date: u64,
}

/// Resting order fully filled and removed from the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilled {
    pub order_id: OrderId,
    pub trader: TraderId,
    pub asset: Ticker,
    pub side: Side,
    pub filled_quantity: Quantity,
}

/// Resting order dropped because its owner could no longer cover a fill
///
/// Resting orders do not reserve balances, so the owner may have withdrawn
/// or spent the funds since placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvicted {
    pub order_id: OrderId,
    pub trader: TraderId,
    pub asset: Ticker,
    pub side: Side,
    /// Open quantity at the time of removal
    pub remaining: Quantity,
}

/// Exchange event log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    OrderPlaced(OrderPlaced),
    TradeExecuted(Trade),
    OrderFilled(OrderFilled),
    OrderEvicted(OrderEvicted),
}
