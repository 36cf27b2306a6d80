//! Line-delimited JSON protocol
//!
//! Each input line is one [`Request`], tagged by `op`; each output line is
//! one [`Response`], tagged by `type`. Rejections carry the stable error
//! code of the failure kind.

use serde::{Deserialize, Serialize};
use types::asset::{Asset, Ticker, TokenHandle};
use types::errors::ExchangeError;
use types::ids::TraderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderRequest, Side};

use crate::actor::{ActorError, ExchangeHandle};
use crate::engine::ExecutionReport;
use crate::events::ExchangeEvent;

/// Messages clients send to the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    AddAsset {
        ticker: Ticker,
        handle: TokenHandle,
    },
    Deposit {
        trader: TraderId,
        asset: Ticker,
        amount: Quantity,
    },
    Withdraw {
        trader: TraderId,
        asset: Ticker,
        amount: Quantity,
    },
    LimitOrder {
        trader: TraderId,
        asset: Ticker,
        side: Side,
        amount: Quantity,
        price: Price,
    },
    MarketOrder {
        trader: TraderId,
        asset: Ticker,
        side: Side,
        amount: Quantity,
    },
    Orders {
        asset: Ticker,
        side: Side,
    },
    Balance {
        trader: TraderId,
        asset: Ticker,
    },
    Tokens,
    Events,
}

/// Messages the exchange sends back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Execution { report: ExecutionReport },
    Orders { orders: Vec<Order> },
    Balance { balance: Quantity },
    Tokens { tokens: Vec<Asset> },
    Events { events: Vec<ExchangeEvent> },
    Error { code: String, message: String },
}

impl Response {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<ExchangeError> for Response {
    fn from(err: ExchangeError) -> Self {
        Response::error(err.code(), err.to_string())
    }
}

impl From<ActorError> for Response {
    fn from(err: ActorError) -> Self {
        match err {
            ActorError::Exchange(err) => err.into(),
            ActorError::Closed => Response::error("UNAVAILABLE", ActorError::Closed.to_string()),
        }
    }
}

/// Parse one input line; malformed lines become an error response
pub fn parse_line(line: &str) -> Result<Request, Response> {
    serde_json::from_str(line).map_err(|err| Response::error("BAD_REQUEST", err.to_string()))
}

impl Request {
    /// Forward the request to the actor and shape its answer
    pub async fn dispatch(self, handle: &ExchangeHandle) -> Response {
        let result = match self {
            Request::AddAsset { ticker, handle: token } => {
                handle.add_asset(ticker, token).await.map(|()| Response::Ok)
            }
            Request::Deposit { trader, asset, amount } => {
                handle.deposit(trader, asset, amount).await.map(|()| Response::Ok)
            }
            Request::Withdraw { trader, asset, amount } => {
                handle.withdraw(trader, asset, amount).await.map(|()| Response::Ok)
            }
            Request::LimitOrder { trader, asset, side, amount, price } => handle
                .execute(OrderRequest::limit(trader, asset, side, amount, price))
                .await
                .map(|report| Response::Execution { report }),
            Request::MarketOrder { trader, asset, side, amount } => handle
                .execute(OrderRequest::market(trader, asset, side, amount))
                .await
                .map(|report| Response::Execution { report }),
            Request::Orders { asset, side } => handle
                .get_orders(asset, side)
                .await
                .map(|orders| Response::Orders { orders }),
            Request::Balance { trader, asset } => handle
                .balance(trader, asset)
                .await
                .map(|balance| Response::Balance { balance }),
            Request::Tokens => handle.tokens().await.map(|tokens| Response::Tokens { tokens }),
            Request::Events => handle
                .drain_events()
                .await
                .map(|events| Response::Events { events }),
        };
        result.unwrap_or_else(Response::from)
    }
}
