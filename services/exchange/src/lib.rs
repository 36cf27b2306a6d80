//! Custodial spot exchange
//!
//! Per-trader token balances and a price-time priority order book matching
//! limit and market orders for every tradable asset, each quoted against one
//! reference asset.
//!
//! **Key Invariants:**
//! - Tokens only move between traders: per-asset totals change only through
//!   deposits and withdrawals
//! - Balances never go negative; `filled <= amount` for every resting order
//! - BUY books descend by price, SELL books ascend, ties oldest first
//! - A rejected request leaves ledger and book exactly as they were
//! - A resting order whose owner can no longer pay is evicted, never traded
//!
//! The [`Exchange`] is a plain owned value whose `&mut self` methods are each
//! atomic. [`actor::spawn`] puts one behind a single-writer task so it can be
//! shared between many callers.

pub mod actor;
pub mod book;
pub mod config;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod matching;
pub mod protocol;
pub mod registry;

pub use actor::{ActorError, ExchangeHandle};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Exchange, ExecutionReport};
pub use events::ExchangeEvent;
