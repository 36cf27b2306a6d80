//! Trade records
//!
//! One `Trade` is produced per fill between an incoming request (taker) and
//! a resting order (maker). The resting order's price always governs.

use crate::asset::Ticker;
use crate::ids::{OrderId, TradeId, TraderId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A settled fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub maker_order_id: OrderId,
    pub asset: Ticker,

    // Counterparties
    pub maker: TraderId,
    pub taker: TraderId,

    /// Side of the incoming request
    pub taker_side: Side,
    pub quantity: Quantity,
    pub price: Price,
    /// quantity × price in reference units
    pub notional: Quantity,

    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Trader receiving the asset
    pub fn buyer(&self) -> TraderId {
        match self.taker_side {
            Side::BUY => self.taker,
            Side::SELL => self.maker,
        }
    }

    /// Trader delivering the asset
    pub fn seller(&self) -> TraderId {
        match self.taker_side {
            Side::BUY => self.maker,
            Side::SELL => self.taker,
        }
    }

    pub fn is_self_trade(&self) -> bool {
        self.maker == self.taker
    }
}
