//! Bid (buy-side) order book
//!
//! Maintains buy orders sorted by price descending (best bid first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::{BTreeMap, HashMap};
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Order;

use super::price_level::PriceLevel;
use super::BookSide;

/// Bid (buy) side order book
///
/// Orders are sorted by price descending, so the highest bid is first.
/// At each price level, orders are maintained in date order.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    /// Price levels keyed ascending; best bid is the last key
    levels: BTreeMap<Price, PriceLevel>,
    /// Order id → price of the level holding it
    index: HashMap<OrderId, Price>,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookSide for BidBook {
    fn insert(&mut self, order: Order) {
        self.index.insert(order.id, order.price);
        self.levels.entry(order.price).or_default().insert(order);
    }

    fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let price = self.index.remove(&order_id)?;
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id);
        // Remove empty price levels to keep book clean
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    fn best(&self) -> Option<&Order> {
        self.levels.values().next_back().and_then(PriceLevel::front)
    }

    fn get_mut(&mut self, order_id: OrderId) -> Option<&mut Order> {
        let price = self.index.get(&order_id)?;
        self.levels.get_mut(price)?.get_mut(order_id)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Order> + '_> {
        Box::new(self.levels.values().rev().flat_map(PriceLevel::iter))
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
