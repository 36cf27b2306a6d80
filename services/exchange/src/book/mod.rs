//! Order book infrastructure module
//!
//! Contains price levels, bid book, and ask book implementations, and the
//! per-asset `OrderBook` the exchange owns.
//!
//! Priority is price first (BUY descending, SELL ascending), then `date`
//! ascending. Both sides keep an id → price index so removal and in-place
//! fills never scan the whole side.

pub mod price_level;
pub mod bid_book;
pub mod ask_book;

pub use price_level::PriceLevel;
pub use bid_book::BidBook;
pub use ask_book::AskBook;

use std::collections::HashMap;
use types::asset::Ticker;
use types::ids::OrderId;
use types::order::{Order, Side};

/// One side of a market, iterated in matching priority
pub trait BookSide {
    /// Insert an open order at its priority position
    fn insert(&mut self, order: Order);

    /// Remove an order by id; absent ids are a no-op
    fn remove(&mut self, order_id: OrderId) -> Option<Order>;

    /// Highest-priority resting order
    fn best(&self) -> Option<&Order>;

    fn get_mut(&mut self, order_id: OrderId) -> Option<&mut Order>;

    /// Orders from best to worst
    fn iter(&self) -> Box<dyn Iterator<Item = &Order> + '_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ordered copy of the side
    fn snapshot(&self) -> Vec<Order> {
        self.iter().cloned().collect()
    }
}

/// Bid and ask books for a single asset
#[derive(Debug, Clone)]
pub struct MarketBook {
    pub asset: Ticker,
    pub bids: BidBook,
    pub asks: AskBook,
}

impl MarketBook {
    pub fn new(asset: Ticker) -> Self {
        Self {
            asset,
            bids: BidBook::new(),
            asks: AskBook::new(),
        }
    }

    /// The book holding orders of `side`
    pub fn side(&self, side: Side) -> &dyn BookSide {
        match side {
            Side::BUY => &self.bids,
            Side::SELL => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut dyn BookSide {
        match side {
            Side::BUY => &mut self.bids,
            Side::SELL => &mut self.asks,
        }
    }
}

/// Order books for every tradable asset
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    markets: HashMap<Ticker, MarketBook>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure an (empty) market exists for `asset`
    pub fn open_market(&mut self, asset: &Ticker) {
        self.markets
            .entry(asset.clone())
            .or_insert_with(|| MarketBook::new(asset.clone()));
    }

    pub fn market(&self, asset: &Ticker) -> Option<&MarketBook> {
        self.markets.get(asset)
    }

    pub fn market_mut(&mut self, asset: &Ticker) -> Option<&mut MarketBook> {
        self.markets.get_mut(asset)
    }

    /// Insert an open order on its own side of its asset's market
    pub fn insert(&mut self, order: Order) {
        let side = order.side;
        self.markets
            .entry(order.asset.clone())
            .or_insert_with(|| MarketBook::new(order.asset.clone()))
            .side_mut(side)
            .insert(order);
    }

    /// Highest-priority order on (asset, side)
    pub fn best(&self, asset: &Ticker, side: Side) -> Option<&Order> {
        self.market(asset)?.side(side).best()
    }

    /// Remove exactly one order; unknown asset or id is a silent no-op
    pub fn remove(&mut self, asset: &Ticker, side: Side, order_id: OrderId) -> Option<Order> {
        self.market_mut(asset)?.side_mut(side).remove(order_id)
    }

    /// Read-only ordered copy of (asset, side)
    pub fn snapshot(&self, asset: &Ticker, side: Side) -> Vec<Order> {
        self.market(asset)
            .map(|market| market.side(side).snapshot())
            .unwrap_or_default()
    }

    /// Number of resting orders across all markets
    pub fn open_order_count(&self) -> usize {
        self.markets
            .values()
            .map(|market| market.bids.len() + market.asks.len())
            .sum()
    }
}
