//! Exchange core
//!
//! Main coordinator for the asset registry, the balance ledger, the order
//! book and the matching logic. Every `&mut self` method is one indivisible
//! operation: preconditions are checked first, then the match is planned and
//! staged, and only a fully settled request is committed.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};
use types::asset::{Asset, Ticker, TokenHandle};
use types::errors::ExchangeError;
use types::ids::{OrderId, TraderId};
use types::numeric::{self, Price, Quantity};
use types::order::{Order, OrderKind, OrderRequest, Side};
use types::trade::Trade;

use crate::book::OrderBook;
use crate::config::{ConfigError, EngineConfig};
use crate::events::{Deposited, ExchangeEvent, OrderEvicted, OrderFilled, OrderPlaced, Withdrawn};
use crate::ledger::BalanceLedger;
use crate::matching::{self, MatchExecutor, MatchPlan};

/// Events kept when no capacity is configured
pub const DEFAULT_EVENT_CAPACITY: usize = 65_536;
use crate::registry::AssetRegistry;

/// Outcome of an accepted order request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Fills in execution order
    pub trades: Vec<Trade>,
    /// Id of the limit remainder left on the book
    pub resting: Option<OrderId>,
    /// Market remainder nobody could take
    pub discarded: Quantity,
}

impl ExecutionReport {
    /// Quantity matched immediately
    pub fn filled(&self) -> Quantity {
        Quantity::new(self.trades.iter().map(|trade| trade.quantity.as_u64()).sum())
    }
}

/// The exchange state: registry, ledger and books behind one owner
#[derive(Debug, Clone)]
pub struct Exchange {
    registry: AssetRegistry,
    ledger: BalanceLedger,
    book: OrderBook,
    /// Trade id generation and settlement
    executor: MatchExecutor,
    next_order_id: OrderId,
    /// Logical clock for order dates
    clock: u64,
    /// Most recent events, oldest dropped first once full
    events: VecDeque<ExchangeEvent>,
    event_capacity: usize,
}

impl Exchange {
    /// Create an exchange quoting everything in `reference`
    pub fn new(reference: Ticker, handle: TokenHandle) -> Self {
        info!(reference = %reference, "exchange created");
        Self {
            registry: AssetRegistry::new(reference, handle),
            ledger: BalanceLedger::new(),
            book: OrderBook::new(),
            executor: MatchExecutor::new(1),
            next_order_id: OrderId::new(1),
            clock: 0,
            events: VecDeque::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Keep at most `capacity` undrained events (at least one)
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        while self.events.len() > self.event_capacity {
            self.events.pop_front();
        }
        self
    }

    /// Create an exchange and register every configured asset
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let reference = &config.reference_asset;
        let mut exchange = Self::new(reference.ticker()?, reference.handle())
            .with_event_capacity(config.event_capacity);
        for asset in &config.assets {
            exchange.add_asset(asset.ticker()?, asset.handle())?;
        }
        Ok(exchange)
    }

    // ───────────────────────── Registry ─────────────────────────

    /// Register a tradable asset and open its (empty) market
    pub fn add_asset(&mut self, ticker: Ticker, handle: TokenHandle) -> Result<(), ExchangeError> {
        self.registry.add_asset(ticker.clone(), handle.clone())?;
        self.book.open_market(&ticker);
        info!(ticker = %ticker, handle = %handle, "asset registered");
        Ok(())
    }

    /// Every registered asset, reference first, in registration order
    pub fn tokens(&self) -> &[Asset] {
        self.registry.tokens()
    }

    pub fn reference_asset(&self) -> &Ticker {
        self.registry.reference()
    }

    // ───────────────────────── Custody ─────────────────────────

    /// Credit `amount` of `asset` to `trader`
    pub fn deposit(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), ExchangeError> {
        let result = self.try_deposit(trader, asset, amount);
        if let Err(err) = &result {
            warn!(trader = %trader, asset = %asset, amount = %amount, error = %err, "deposit rejected");
        }
        result
    }

    fn try_deposit(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), ExchangeError> {
        self.registry.resolve(asset)?;
        if amount.is_zero() {
            return Err(ExchangeError::ZeroQuantity);
        }

        self.ledger
            .credit(trader, asset, amount)
            .map_err(|_| ExchangeError::Overflow)?;

        debug!(trader = %trader, asset = %asset, amount = %amount, "deposit credited");
        self.record(ExchangeEvent::Deposited(Deposited {
            trader,
            asset: asset.clone(),
            amount,
        }));
        Ok(())
    }

    /// Debit `amount` of `asset` from `trader`
    pub fn withdraw(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), ExchangeError> {
        let result = self.try_withdraw(trader, asset, amount);
        if let Err(err) = &result {
            warn!(trader = %trader, asset = %asset, amount = %amount, error = %err, "withdrawal rejected");
        }
        result
    }

    fn try_withdraw(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), ExchangeError> {
        self.registry.resolve(asset)?;
        if amount.is_zero() {
            return Err(ExchangeError::ZeroQuantity);
        }

        self.ledger
            .debit(trader, asset, amount)
            .map_err(|err| err.into_withdrawal_error())?;

        debug!(trader = %trader, asset = %asset, amount = %amount, "withdrawal debited");
        self.record(ExchangeEvent::Withdrawn(Withdrawn {
            trader,
            asset: asset.clone(),
            amount,
        }));
        Ok(())
    }

    /// Available balance of one (trader, asset) cell
    pub fn balance(&self, trader: &TraderId, asset: &Ticker) -> Quantity {
        self.ledger.balance(trader, asset)
    }

    /// Sum of every trader's balance of `asset`
    pub fn total_balance(&self, asset: &Ticker) -> u128 {
        self.ledger.total(asset)
    }

    // ───────────────────────── Orders ─────────────────────────

    /// Match at `price` or better; the remainder rests on the book
    pub fn create_limit_order(
        &mut self,
        trader: TraderId,
        asset: &Ticker,
        amount: Quantity,
        price: Price,
        side: Side,
    ) -> Result<ExecutionReport, ExchangeError> {
        self.execute(OrderRequest::limit(trader, asset.clone(), side, amount, price))
    }

    /// Match at any price; the remainder is discarded
    pub fn create_market_order(
        &mut self,
        trader: TraderId,
        asset: &Ticker,
        amount: Quantity,
        side: Side,
    ) -> Result<ExecutionReport, ExchangeError> {
        self.execute(OrderRequest::market(trader, asset.clone(), side, amount))
    }

    /// Submit an order request to the matching engine
    ///
    /// This is the main entry point. On error nothing observable changed.
    pub fn execute(&mut self, request: OrderRequest) -> Result<ExecutionReport, ExchangeError> {
        let result = self
            .check_order(&request)
            .and_then(|()| self.match_order(&request));

        match &result {
            Ok(report) => info!(
                trader = %request.trader,
                asset = %request.asset,
                side = ?request.side,
                kind = ?request.kind,
                amount = %request.amount,
                trades = report.trades.len(),
                filled = %report.filled(),
                resting = ?report.resting,
                discarded = %report.discarded,
                "order executed"
            ),
            Err(err) => warn!(
                trader = %request.trader,
                asset = %request.asset,
                side = ?request.side,
                kind = ?request.kind,
                amount = %request.amount,
                error = %err,
                "order rejected"
            ),
        }
        result
    }

    /// Preconditions, evaluated before anything is touched
    fn check_order(&self, request: &OrderRequest) -> Result<(), ExchangeError> {
        self.registry.resolve_tradable(&request.asset)?;
        if request.amount.is_zero() {
            return Err(ExchangeError::ZeroQuantity);
        }

        match (request.side, request.kind) {
            (Side::SELL, _) => {
                let available = self.ledger.balance(&request.trader, &request.asset);
                if available < request.amount {
                    return Err(ExchangeError::InsufficientAssetBalance {
                        asset: request.asset.clone(),
                        required: request.amount,
                        available,
                    });
                }
            }
            (Side::BUY, OrderKind::LIMIT(price)) => {
                let required = numeric::notional(request.amount, price).ok_or(ExchangeError::Overflow)?;
                let available = self.ledger.balance(&request.trader, self.registry.reference());
                if available < required {
                    return Err(ExchangeError::InsufficientReferenceBalance { required, available });
                }
            }
            // Spend bounded by liquidity and, at settlement, by the buyer's balance
            (Side::BUY, OrderKind::MARKET) => {}
        }
        Ok(())
    }

    fn match_order(&mut self, request: &OrderRequest) -> Result<ExecutionReport, ExchangeError> {
        let (plan, changes) = {
            let mut tx = self.ledger.transaction();
            let plan = match self.book.market(&request.asset) {
                Some(market) => matching::plan(
                    request,
                    market.side(request.side.opposite()),
                    &mut tx,
                    self.registry.reference(),
                )?,
                None => MatchPlan {
                    remaining: request.amount,
                    ..MatchPlan::default()
                },
            };
            (plan, tx.into_changes())
        };

        // Commit point: nothing below can fail
        self.ledger.commit(changes);
        self.evict(request, &plan);
        let trades = self.executor.record_trades(request, &plan, Utc::now());
        for trade in &trades {
            debug!(
                trade_id = %trade.trade_id,
                maker_order_id = %trade.maker_order_id,
                asset = %trade.asset,
                price = %trade.price,
                quantity = %trade.quantity,
                "trade executed"
            );
            self.record(ExchangeEvent::TradeExecuted(trade.clone()));
        }
        self.apply_fills(request, &plan);

        let (resting, discarded) = match request.kind {
            OrderKind::LIMIT(price) if !plan.remaining.is_zero() => {
                (Some(self.rest(request, price, plan.remaining)), Quantity::zero())
            }
            OrderKind::LIMIT(_) => (None, Quantity::zero()),
            OrderKind::MARKET => (None, plan.remaining),
        };

        Ok(ExecutionReport {
            trades,
            resting,
            discarded,
        })
    }

    /// Drop resting orders whose owner could not cover their fill
    fn evict(&mut self, request: &OrderRequest, plan: &MatchPlan) {
        let maker_side = request.side.opposite();
        for &order_id in &plan.evicted {
            if let Some(order) = self.book.remove(&request.asset, maker_side, order_id) {
                warn!(
                    order_id = %order.id,
                    trader = %order.trader,
                    remaining = %order.remaining(),
                    "unfunded resting order evicted"
                );
                self.record(ExchangeEvent::OrderEvicted(OrderEvicted {
                    order_id: order.id,
                    trader: order.trader,
                    remaining: order.remaining(),
                    asset: order.asset,
                    side: order.side,
                }));
            }
        }
    }

    /// Grow `filled` on every maker and drop the ones that are done
    fn apply_fills(&mut self, request: &OrderRequest, plan: &MatchPlan) {
        let Some(market) = self.book.market_mut(&request.asset) else {
            return;
        };
        let side = market.side_mut(request.side.opposite());

        let mut completed = Vec::new();
        for fill in &plan.fills {
            if let Some(order) = side.get_mut(fill.maker_order_id) {
                order.add_fill(fill.quantity);
                debug_assert!(order.check_invariant());
                if order.is_filled() {
                    completed.extend(side.remove(fill.maker_order_id));
                }
            }
        }

        for order in completed {
            debug!(order_id = %order.id, "resting order filled");
            self.record(ExchangeEvent::OrderFilled(OrderFilled {
                order_id: order.id,
                trader: order.trader,
                asset: order.asset,
                side: order.side,
                filled_quantity: order.filled,
            }));
        }
    }

    /// Put a limit remainder on the book under a fresh id and date
    fn rest(&mut self, request: &OrderRequest, price: Price, remaining: Quantity) -> OrderId {
        let id = self.next_order_id;
        self.next_order_id = id.next();
        self.clock += 1;

        let order = Order::new(
            id,
            request.trader,
            request.side,
            request.asset.clone(),
            remaining,
            price,
            self.clock,
        );
        debug!(order_id = %id, price = %price, amount = %remaining, date = self.clock, "order resting");
        self.record(ExchangeEvent::OrderPlaced(OrderPlaced {
            order_id: id,
            trader: order.trader,
            asset: order.asset.clone(),
            side: order.side,
            amount: order.amount,
            price,
            date: order.date,
        }));
        self.book.insert(order);
        id
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Ordered copy of (asset, side); unknown assets have empty books
    pub fn get_orders(&self, asset: &Ticker, side: Side) -> Vec<Order> {
        self.book.snapshot(asset, side)
    }

    /// Highest-priority resting order of (asset, side)
    pub fn best_order(&self, asset: &Ticker, side: Side) -> Option<&Order> {
        self.book.best(asset, side)
    }

    /// Undrained events, oldest first
    pub fn events(&self) -> &VecDeque<ExchangeEvent> {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ExchangeEvent> {
        self.events.drain(..).collect()
    }

    fn record(&mut self, event: ExchangeEvent) {
        if self.events.len() == self.event_capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}
