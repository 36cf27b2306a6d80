//! Matching logic module
//!
//! Implements price-time priority matching in two steps: plan the fills
//! against an immutable book while staging them on a ledger transaction,
//! then commit ledger and book together.

pub mod crossing;
pub mod executor;
pub mod plan;

pub use executor::{MatchExecutor, Staged};
pub use plan::{plan, MatchPlan, PlannedFill};
