//! Fill planning
//!
//! Walks the opposite side of a market in priority order without touching
//! it, staging each fill into a ledger transaction as it goes. Makers that
//! can no longer pay are skipped and listed for eviction; the walk carries on
//! to the next resting order. Nothing is mutated until the whole plan has
//! been staged successfully.

use types::asset::Ticker;
use types::errors::ExchangeError;
use types::ids::{OrderId, TraderId};
use types::numeric::{Price, Quantity};
use types::order::OrderRequest;

use super::crossing;
use super::executor::{MatchExecutor, Staged};
use crate::book::BookSide;
use crate::ledger::LedgerTransaction;

/// One fill against one resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedFill {
    pub maker_order_id: OrderId,
    pub maker: TraderId,
    /// Resting order's price; always the execution price
    pub price: Price,
    pub quantity: Quantity,
}

/// Fills for one request and what is left of it afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPlan {
    pub fills: Vec<PlannedFill>,
    /// Resting orders whose owner could not cover their fill
    pub evicted: Vec<OrderId>,
    pub remaining: Quantity,
}

/// Plan and stage the immediate match of `request` against `opposite`
///
/// Fails only on the taker's own shortfall or on overflow, in which case
/// `tx` must be dropped.
pub fn plan(
    request: &OrderRequest,
    opposite: &dyn BookSide,
    tx: &mut LedgerTransaction<'_>,
    reference: &Ticker,
) -> Result<MatchPlan, ExchangeError> {
    let mut plan = MatchPlan {
        remaining: request.amount,
        ..MatchPlan::default()
    };

    for resting in opposite.iter() {
        if plan.remaining.is_zero() {
            break;
        }
        if !crossing::within_limit(request.side, request.kind, resting.price) {
            break;
        }

        let fill = PlannedFill {
            maker_order_id: resting.id,
            maker: resting.trader,
            price: resting.price,
            quantity: plan.remaining.min(resting.remaining()),
        };
        match MatchExecutor::stage_fill(tx, request, &fill, reference)? {
            Staged::Settled => {
                plan.remaining = plan.remaining.saturating_sub(fill.quantity);
                plan.fills.push(fill);
            }
            Staged::MakerUnfunded => plan.evicted.push(resting.id),
        }
    }

    Ok(plan)
}
