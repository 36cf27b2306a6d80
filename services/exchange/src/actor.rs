//! Single-writer actor around the exchange
//!
//! One task owns the [`Exchange`]. Requests arrive on a bounded queue and are
//! handled strictly one at a time, so every operation is atomic and totally
//! ordered without any locking. Replies go back on a oneshot channel.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use types::asset::{Asset, Ticker, TokenHandle};
use types::errors::ExchangeError;
use types::ids::TraderId;
use types::numeric::Quantity;
use types::order::{Order, OrderRequest, Side};

use crate::engine::{Exchange, ExecutionReport};
use crate::events::ExchangeEvent;

type Reply<T> = oneshot::Sender<T>;

/// Commands the actor accepts
#[derive(Debug)]
pub enum Command {
    AddAsset {
        ticker: Ticker,
        handle: TokenHandle,
        reply: Reply<Result<(), ExchangeError>>,
    },
    Deposit {
        trader: TraderId,
        asset: Ticker,
        amount: Quantity,
        reply: Reply<Result<(), ExchangeError>>,
    },
    Withdraw {
        trader: TraderId,
        asset: Ticker,
        amount: Quantity,
        reply: Reply<Result<(), ExchangeError>>,
    },
    Execute {
        request: OrderRequest,
        reply: Reply<Result<ExecutionReport, ExchangeError>>,
    },
    Orders {
        asset: Ticker,
        side: Side,
        reply: Reply<Vec<Order>>,
    },
    Balance {
        trader: TraderId,
        asset: Ticker,
        reply: Reply<Quantity>,
    },
    Tokens {
        reply: Reply<Vec<Asset>>,
    },
    DrainEvents {
        reply: Reply<Vec<ExchangeEvent>>,
    },
}

/// Failure seen by a handle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    #[error("Exchange actor is no longer running")]
    Closed,

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// Start the actor; the join handle yields the exchange back once every
/// handle has been dropped
pub fn spawn(exchange: Exchange, capacity: usize) -> (ExchangeHandle, JoinHandle<Exchange>) {
    let (sender, receiver) = mpsc::channel(capacity);
    let task = tokio::spawn(run(exchange, receiver));
    info!(queue_capacity = capacity, "exchange actor started");
    (ExchangeHandle { sender }, task)
}

async fn run(mut exchange: Exchange, mut receiver: mpsc::Receiver<Command>) -> Exchange {
    while let Some(command) = receiver.recv().await {
        handle(&mut exchange, command);
    }
    info!("exchange actor stopped");
    exchange
}

/// Apply one command; a dropped reply receiver is not an error
fn handle(exchange: &mut Exchange, command: Command) {
    match command {
        Command::AddAsset { ticker, handle, reply } => {
            let _ = reply.send(exchange.add_asset(ticker, handle));
        }
        Command::Deposit { trader, asset, amount, reply } => {
            let _ = reply.send(exchange.deposit(trader, &asset, amount));
        }
        Command::Withdraw { trader, asset, amount, reply } => {
            let _ = reply.send(exchange.withdraw(trader, &asset, amount));
        }
        Command::Execute { request, reply } => {
            let _ = reply.send(exchange.execute(request));
        }
        Command::Orders { asset, side, reply } => {
            let _ = reply.send(exchange.get_orders(&asset, side));
        }
        Command::Balance { trader, asset, reply } => {
            let _ = reply.send(exchange.balance(&trader, &asset));
        }
        Command::Tokens { reply } => {
            let _ = reply.send(exchange.tokens().to_vec());
        }
        Command::DrainEvents { reply } => {
            let events = exchange.drain_events();
            debug!(count = events.len(), "events drained");
            let _ = reply.send(events);
        }
    }
}

/// Cloneable handle for submitting commands to the actor
#[derive(Debug, Clone)]
pub struct ExchangeHandle {
    sender: mpsc::Sender<Command>,
}

impl ExchangeHandle {
    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T, ActorError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| ActorError::Closed)?;
        response.await.map_err(|_| ActorError::Closed)
    }

    pub async fn add_asset(&self, ticker: Ticker, handle: TokenHandle) -> Result<(), ActorError> {
        Ok(self.call(|reply| Command::AddAsset { ticker, handle, reply }).await??)
    }

    pub async fn deposit(&self, trader: TraderId, asset: Ticker, amount: Quantity) -> Result<(), ActorError> {
        Ok(self.call(|reply| Command::Deposit { trader, asset, amount, reply }).await??)
    }

    pub async fn withdraw(&self, trader: TraderId, asset: Ticker, amount: Quantity) -> Result<(), ActorError> {
        Ok(self.call(|reply| Command::Withdraw { trader, asset, amount, reply }).await??)
    }

    pub async fn execute(&self, request: OrderRequest) -> Result<ExecutionReport, ActorError> {
        Ok(self.call(|reply| Command::Execute { request, reply }).await??)
    }

    pub async fn get_orders(&self, asset: Ticker, side: Side) -> Result<Vec<Order>, ActorError> {
        self.call(|reply| Command::Orders { asset, side, reply }).await
    }

    pub async fn balance(&self, trader: TraderId, asset: Ticker) -> Result<Quantity, ActorError> {
        self.call(|reply| Command::Balance { trader, asset, reply }).await
    }

    pub async fn tokens(&self) -> Result<Vec<Asset>, ActorError> {
        self.call(|reply| Command::Tokens { reply }).await
    }

    pub async fn drain_events(&self) -> Result<Vec<ExchangeEvent>, ActorError> {
        self.call(|reply| Command::DrainEvents { reply }).await
    }
}
