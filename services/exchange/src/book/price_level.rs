//! Price level implementation with FIFO queue
//!
//! A price level contains all resting orders at one price. Orders are kept in
//! ascending `date` order so the oldest order is always at the front.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::order::Order;

/// A price level containing orders at a specific price
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Queue of orders at this price level, oldest first
    orders: VecDeque<Order>,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    /// Insert an order behind every order with an earlier or equal date
    ///
    /// Dates handed out by the exchange are increasing, so this is a
    /// `push_back` in practice.
    pub fn insert(&mut self, order: Order) {
        let position = self.orders.partition_point(|resting| resting.date <= order.date);
        self.orders.insert(position, order);
    }

    /// Remove an order by id
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|order| order.id == order_id)?;
        self.orders.remove(position)
    }

    /// Oldest order at this price
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to a specific order at this level
    pub fn get_mut(&mut self, order_id: OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|order| order.id == order_id)
    }

    /// Orders in time priority
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
