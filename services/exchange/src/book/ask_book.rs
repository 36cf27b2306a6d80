//! Ask (sell-side) order book
//!
//! Maintains sell orders sorted by price ascending (best ask first).

use std::collections::{BTreeMap, HashMap};
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Order;

use super::price_level::PriceLevel;
use super::BookSide;

/// Ask (sell) side order book
///
/// Orders are sorted by price ascending, so the lowest ask is first.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
    index: HashMap<OrderId, Price>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookSide for AskBook {
    fn insert(&mut self, order: Order) {
        self.index.insert(order.id, order.price);
        self.levels.entry(order.price).or_default().insert(order);
    }

    fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let price = self.index.remove(&order_id)?;
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    fn best(&self) -> Option<&Order> {
        self.levels.values().next().and_then(PriceLevel::front)
    }

    fn get_mut(&mut self, order_id: OrderId) -> Option<&mut Order> {
        let price = self.index.get(&order_id)?;
        self.levels.get_mut(price)?.get_mut(order_id)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Order> + '_> {
        Box::new(self.levels.values().flat_map(PriceLevel::iter))
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
