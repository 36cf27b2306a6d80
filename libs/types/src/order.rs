//! Order lifecycle types
//!
//! A resting order is created only by a limit request whose immediate match
//! left a remainder. Its `filled` counter grows in place and the order leaves
//! the book the moment `filled == amount`. Market requests never become
//! `Order`s.

use crate::asset::Ticker;
use crate::ids::{OrderId, TraderId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// How an incoming request is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "price", rename_all = "UPPERCASE")]
pub enum OrderKind {
    /// Match at the given price or better, rest the remainder
    LIMIT(Price),
    /// Match at any price, discard the remainder
    MARKET,
}

/// An incoming order request before it touches the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub trader: TraderId,
    pub asset: Ticker,
    pub side: Side,
    pub amount: Quantity,
    pub kind: OrderKind,
}

impl OrderRequest {
    pub fn limit(trader: TraderId, asset: Ticker, side: Side, amount: Quantity, price: Price) -> Self {
        Self {
            trader,
            asset,
            side,
            amount,
            kind: OrderKind::LIMIT(price),
        }
    }

    pub fn market(trader: TraderId, asset: Ticker, side: Side, amount: Quantity) -> Self {
        Self {
            trader,
            asset,
            side,
            amount,
            kind: OrderKind::MARKET,
        }
    }
}

/// A resting limit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trader: TraderId,
    pub side: Side,
    pub asset: Ticker,
    pub amount: Quantity,
    pub filled: Quantity,
    pub price: Price,
    /// Logical timestamp; secondary priority key
    pub date: u64,
}

impl Order {
    /// Create a new open order with nothing filled
    pub fn new(
        id: OrderId,
        trader: TraderId,
        side: Side,
        asset: Ticker,
        amount: Quantity,
        price: Price,
        date: u64,
    ) -> Self {
        Self {
            id,
            trader,
            side,
            asset,
            amount,
            filled: Quantity::zero(),
            price,
            date,
        }
    }

    /// Quantity still open
    pub fn remaining(&self) -> Quantity {
        self.amount.saturating_sub(self.filled)
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled == self.amount
    }

    /// Check fill invariant: filled <= amount
    pub fn check_invariant(&self) -> bool {
        self.filled <= self.amount
    }

    /// Record a fill against this order
    ///
    /// # Panics
    /// Panics if the fill would exceed the order amount
    pub fn add_fill(&mut self, quantity: Quantity) {
        assert!(quantity <= self.remaining(), "Fill would exceed order amount");
        self.filled = Quantity::new(self.filled.as_u64() + quantity.as_u64());
    }
}
