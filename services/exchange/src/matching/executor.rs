//! Trade execution logic
//!
//! Settles planned fills against a staged ledger transaction and turns them
//! into trade records with monotonically increasing trade ids.

use chrono::{DateTime, Utc};
use types::asset::Ticker;
use types::errors::{ExchangeError, LedgerError};
use types::ids::{TradeId, TraderId};
use types::numeric::{self, Quantity};
use types::order::{OrderRequest, Side};
use types::trade::Trade;

use super::plan::{MatchPlan, PlannedFill};
use crate::ledger::LedgerTransaction;

/// Outcome of staging one fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staged {
    Settled,
    /// The resting side could not pay; nothing was staged
    MakerUnfunded,
}

/// Match executor for settlement and trade generation
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next trade id (monotonically increasing)
    fn next_trade_id(&mut self) -> TradeId {
        let id = TradeId::new(self.sequence_counter);
        self.sequence_counter += 1;
        id
    }

    /// Stage the balance movements of one fill
    ///
    /// The fill moves `q` of the asset from seller to buyer and `q·p` of the
    /// reference asset from buyer to seller, at the resting price `p`. The
    /// maker's debit is staged first: if the maker cannot cover it nothing is
    /// staged and the fill is reported as [`Staged::MakerUnfunded`]. Any
    /// later failure is the taker's (or an overflow) and aborts the whole
    /// request; the caller drops the transaction.
    pub fn stage_fill(
        tx: &mut LedgerTransaction<'_>,
        request: &OrderRequest,
        fill: &PlannedFill,
        reference: &Ticker,
    ) -> Result<Staged, ExchangeError> {
        let notional = numeric::notional(fill.quantity, fill.price).ok_or(ExchangeError::Overflow)?;
        let (buyer, seller) = counterparties(request, fill.maker);
        let asset = &request.asset;
        let map = |err: LedgerError| err.into_exchange_error(reference);

        match request.side {
            Side::BUY => {
                if tx.debit(seller, asset, fill.quantity).is_err() {
                    return Ok(Staged::MakerUnfunded);
                }
                tx.debit(buyer, reference, notional).map_err(map)?;
            }
            Side::SELL => {
                if tx.debit(buyer, reference, notional).is_err() {
                    return Ok(Staged::MakerUnfunded);
                }
                tx.debit(seller, asset, fill.quantity).map_err(map)?;
            }
        }
        tx.credit(buyer, asset, fill.quantity).map_err(map)?;
        tx.credit(seller, reference, notional).map_err(map)?;
        Ok(Staged::Settled)
    }

    /// Turn settled fills into trade records
    pub fn record_trades(
        &mut self,
        request: &OrderRequest,
        plan: &MatchPlan,
        executed_at: DateTime<Utc>,
    ) -> Vec<Trade> {
        plan.fills
            .iter()
            .map(|fill| Trade {
                trade_id: self.next_trade_id(),
                maker_order_id: fill.maker_order_id,
                asset: request.asset.clone(),
                maker: fill.maker,
                taker: request.trader,
                taker_side: request.side,
                quantity: fill.quantity,
                price: fill.price,
                // Settlement already proved the product fits
                notional: numeric::notional(fill.quantity, fill.price).unwrap_or(Quantity::zero()),
                executed_at,
            })
            .collect()
    }
}

/// (buyer, seller) of a fill between the incoming request and a maker
fn counterparties(request: &OrderRequest, maker: TraderId) -> (TraderId, TraderId) {
    match request.side {
        Side::BUY => (request.trader, maker),
        Side::SELL => (maker, request.trader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::BalanceLedger;
    use types::ids::OrderId;
    use types::numeric::Price;

    fn dai() -> Ticker {
        Ticker::new("DAI")
    }

    fn bat() -> Ticker {
        Ticker::new("BAT")
    }

    fn fill(maker: TraderId, qty: u64, price: u64) -> PlannedFill {
        PlannedFill {
            maker_order_id: OrderId::new(1),
            maker,
            price: Price::new(price),
            quantity: Quantity::new(qty),
        }
    }

    #[test]
    fn test_stage_taker_sells() {
        let mut ledger = BalanceLedger::new();
        let buyer = TraderId::new();
        let seller = TraderId::new();
        ledger.credit(buyer, &dai(), Quantity::new(1000)).unwrap();
        ledger.credit(seller, &bat(), Quantity::new(1000)).unwrap();

        let request = OrderRequest::market(seller, bat(), Side::SELL, Quantity::new(100));

        let mut tx = ledger.transaction();
        let staged = MatchExecutor::stage_fill(&mut tx, &request, &fill(buyer, 5, 100), &dai()).unwrap();
        assert_eq!(staged, Staged::Settled);
        let changes = tx.into_changes();
        ledger.commit(changes);

        assert_eq!(ledger.balance(&buyer, &dai()), Quantity::new(500));
        assert_eq!(ledger.balance(&buyer, &bat()), Quantity::new(5));
        assert_eq!(ledger.balance(&seller, &dai()), Quantity::new(500));
        assert_eq!(ledger.balance(&seller, &bat()), Quantity::new(995));
    }

    #[test]
    fn test_stage_buyer_short_of_reference() {
        let mut ledger = BalanceLedger::new();
        let buyer = TraderId::new();
        let seller = TraderId::new();
        ledger.credit(buyer, &dai(), Quantity::new(499)).unwrap();
        ledger.credit(seller, &bat(), Quantity::new(5)).unwrap();

        let request = OrderRequest::market(buyer, bat(), Side::BUY, Quantity::new(5));

        let mut tx = ledger.transaction();
        let err = MatchExecutor::stage_fill(&mut tx, &request, &fill(seller, 5, 100), &dai()).unwrap_err();
        assert_eq!(
            err,
            ExchangeError::InsufficientReferenceBalance {
                required: Quantity::new(500),
                available: Quantity::new(499),
            }
        );
    }

    #[test]
    fn test_stage_unfunded_bid_maker_stages_nothing() {
        let mut ledger = BalanceLedger::new();
        let maker = TraderId::new();
        let taker = TraderId::new();
        ledger.credit(maker, &dai(), Quantity::new(37)).unwrap();
        ledger.credit(taker, &bat(), Quantity::new(1000)).unwrap();

        let request = OrderRequest::market(taker, bat(), Side::SELL, Quantity::new(1));

        let mut tx = ledger.transaction();
        let staged = MatchExecutor::stage_fill(&mut tx, &request, &fill(maker, 1, 100), &dai()).unwrap();
        assert_eq!(staged, Staged::MakerUnfunded);
        assert_eq!(tx.balance(&maker, &dai()), Quantity::new(37));
        assert_eq!(tx.balance(&taker, &bat()), Quantity::new(1000));
        assert!(tx.balance(&maker, &bat()).is_zero());
    }

    #[test]
    fn test_stage_unfunded_ask_maker() {
        let mut ledger = BalanceLedger::new();
        let maker = TraderId::new();
        let taker = TraderId::new();
        ledger.credit(maker, &bat(), Quantity::new(2)).unwrap();
        ledger.credit(taker, &dai(), Quantity::new(1000)).unwrap();

        let request = OrderRequest::market(taker, bat(), Side::BUY, Quantity::new(3));

        let mut tx = ledger.transaction();
        let staged = MatchExecutor::stage_fill(&mut tx, &request, &fill(maker, 3, 10), &dai()).unwrap();
        assert_eq!(staged, Staged::MakerUnfunded);
        assert_eq!(tx.balance(&taker, &dai()), Quantity::new(1000));
    }

    #[test]
    fn test_stage_notional_overflow() {
        let ledger = BalanceLedger::new();
        let request = OrderRequest::market(TraderId::new(), bat(), Side::BUY, Quantity::new(u64::MAX));

        let mut tx = ledger.transaction();
        let err = MatchExecutor::stage_fill(&mut tx, &request, &fill(TraderId::new(), u64::MAX, 2), &dai())
            .unwrap_err();
        assert_eq!(err, ExchangeError::Overflow);
    }

    #[test]
    fn test_stage_seller_credit_overflow() {
        let mut ledger = BalanceLedger::new();
        let maker = TraderId::new();
        let taker = TraderId::new();
        ledger.credit(maker, &bat(), Quantity::new(1)).unwrap();
        ledger.credit(maker, &dai(), Quantity::new(u64::MAX)).unwrap();
        ledger.credit(taker, &dai(), Quantity::new(100)).unwrap();

        let request = OrderRequest::market(taker, bat(), Side::BUY, Quantity::new(1));

        let mut tx = ledger.transaction();
        let err = MatchExecutor::stage_fill(&mut tx, &request, &fill(maker, 1, 100), &dai()).unwrap_err();
        assert_eq!(err, ExchangeError::Overflow);
    }

    #[test]
    fn test_self_trade_nets_out() {
        let mut ledger = BalanceLedger::new();
        let trader = TraderId::new();
        ledger.credit(trader, &dai(), Quantity::new(100)).unwrap();
        ledger.credit(trader, &bat(), Quantity::new(1)).unwrap();

        let request = OrderRequest::market(trader, bat(), Side::BUY, Quantity::new(1));

        let mut tx = ledger.transaction();
        MatchExecutor::stage_fill(&mut tx, &request, &fill(trader, 1, 100), &dai()).unwrap();
        let changes = tx.into_changes();
        ledger.commit(changes);

        assert_eq!(ledger.balance(&trader, &dai()), Quantity::new(100));
        assert_eq!(ledger.balance(&trader, &bat()), Quantity::new(1));
    }

    #[test]
    fn test_sequence_monotonic() {
        let mut executor = MatchExecutor::new(1000);
        let maker = TraderId::new();
        let request = OrderRequest::market(TraderId::new(), bat(), Side::BUY, Quantity::new(5));
        let plan = MatchPlan {
            fills: vec![fill(maker, 5, 100)],
            ..MatchPlan::default()
        };
        let now = Utc::now();

        let first = executor.record_trades(&request, &plan, now);
        let second = executor.record_trades(&request, &plan, now);

        assert_eq!(first[0].trade_id, TradeId::new(1000));
        assert_eq!(second[0].trade_id, TradeId::new(1001));
        assert_eq!(first[0].notional, Quantity::new(500));
        assert_eq!(first[0].buyer(), request.trader);
        assert_eq!(first[0].seller(), maker);
    }
}
