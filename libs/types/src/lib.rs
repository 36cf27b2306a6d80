//! Types library for the custodial spot exchange
//!
//! This library provides the core type definitions shared by the ledger,
//! the order book and the matching engine.
//!
//! # Modules
//! - `ids`: Identifiers (TraderId, OrderId, TradeId)
//! - `asset`: Ticker symbols and external token handles
//! - `numeric`: Integer quantity and price types with widened notional math
//! - `order`: Order lifecycle types
//! - `trade`: Fill records
//! - `errors`: Error taxonomy

pub mod ids;
pub mod asset;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod errors;
