//! Actor tests
//!
//! The single-writer actor must behave exactly like the owned exchange,
//! serialize concurrent callers and report a closed queue as `Closed`.

use exchange::actor::{self, ActorError};
use exchange::config::EngineConfig;
use exchange::protocol::{self, Request, Response};
use exchange::{Exchange, ExchangeEvent};
use types::asset::{Ticker, TokenHandle};
use types::errors::ExchangeError;
use types::ids::TraderId;
use types::numeric::{Price, Quantity};
use types::order::{OrderRequest, Side};

fn exchange() -> Exchange {
    Exchange::from_config(&EngineConfig::default()).unwrap()
}

fn dai() -> Ticker {
    Ticker::new("DAI")
}

fn zrx() -> Ticker {
    Ticker::new("ZRX")
}

#[tokio::test]
async fn test_actor_round_trip() {
    let (handle, task) = actor::spawn(exchange(), 16);
    let buyer = TraderId::new();
    let seller = TraderId::new();

    handle.deposit(buyer, dai(), Quantity::new(1000)).await.unwrap();
    handle.deposit(seller, zrx(), Quantity::new(10)).await.unwrap();

    let resting = handle
        .execute(OrderRequest::limit(buyer, zrx(), Side::BUY, Quantity::new(5), Price::new(100)))
        .await
        .unwrap();
    assert!(resting.resting.is_some());

    let report = handle
        .execute(OrderRequest::market(seller, zrx(), Side::SELL, Quantity::new(10)))
        .await
        .unwrap();
    assert_eq!(report.filled(), Quantity::new(5));
    assert_eq!(report.discarded, Quantity::new(5));

    assert_eq!(handle.balance(buyer, zrx()).await.unwrap(), Quantity::new(5));
    assert_eq!(handle.balance(seller, dai()).await.unwrap(), Quantity::new(500));
    assert!(handle.get_orders(zrx(), Side::BUY).await.unwrap().is_empty());

    drop(handle);
    let exchange = task.await.unwrap();
    assert_eq!(exchange.total_balance(&dai()), 1000);
    assert_eq!(exchange.total_balance(&zrx()), 10);
}

#[tokio::test]
async fn test_actor_surfaces_exchange_errors() {
    let (handle, _task) = actor::spawn(exchange(), 4);

    let err = handle
        .deposit(TraderId::new(), Ticker::new("SHIB"), Quantity::new(1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ActorError::Exchange(ExchangeError::UnknownAsset {
            ticker: Ticker::new("SHIB")
        })
    );

    let err = handle
        .add_asset(zrx(), TokenHandle::new("again"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ActorError::Exchange(ExchangeError::AssetAlreadyRegistered { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_deposits_are_serialized() {
    let (handle, task) = actor::spawn(exchange(), 8);
    let trader = TraderId::new();

    let mut joins = Vec::new();
    for _ in 0..50 {
        let handle = handle.clone();
        joins.push(tokio::spawn(async move {
            handle.deposit(trader, dai(), Quantity::new(3)).await
        }));
    }
    for join in joins {
        join.await.unwrap().unwrap();
    }

    assert_eq!(handle.balance(trader, dai()).await.unwrap(), Quantity::new(150));
    let events = handle.drain_events().await.unwrap();
    assert_eq!(events.len(), 50);
    assert!(events.iter().all(|e| matches!(e, ExchangeEvent::Deposited(_))));

    drop(handle);
    let exchange = task.await.unwrap();
    assert!(exchange.events().is_empty());
}

#[tokio::test]
async fn test_closed_actor() {
    let (handle, task) = actor::spawn(exchange(), 1);
    task.abort();
    let _ = task.await;

    let err = handle.tokens().await.unwrap_err();
    assert_eq!(err, ActorError::Closed);
}

#[tokio::test]
async fn test_protocol_dispatch() {
    let (handle, _task) = actor::spawn(exchange(), 16);
    let trader = TraderId::new();

    let deposit = protocol::parse_line(&format!(
        r#"{{"op":"deposit","trader":"{trader}","asset":"DAI","amount":1000}}"#
    ))
    .unwrap();
    assert_eq!(deposit.dispatch(&handle).await, Response::Ok);

    let order = Request::LimitOrder {
        trader,
        asset: Ticker::new("BAT"),
        side: Side::BUY,
        amount: Quantity::new(5),
        price: Price::new(100),
    };
    match order.dispatch(&handle).await {
        Response::Execution { report } => assert!(report.resting.is_some()),
        other => panic!("unexpected response {other:?}"),
    }

    match (Request::Orders { asset: Ticker::new("BAT"), side: Side::BUY }).dispatch(&handle).await {
        Response::Orders { orders } => {
            assert_eq!(orders.len(), 1);
            assert_eq!(orders[0].trader, trader);
        }
        other => panic!("unexpected response {other:?}"),
    }

    let rejected = Request::LimitOrder {
        trader,
        asset: Ticker::new("BAT"),
        side: Side::BUY,
        amount: Quantity::new(1),
        price: Price::new(1001),
    };
    match rejected.dispatch(&handle).await {
        Response::Error { code, .. } => assert_eq!(code, "INSUFFICIENT_REFERENCE_BALANCE"),
        other => panic!("unexpected response {other:?}"),
    }

    match Request::Tokens.dispatch(&handle).await {
        Response::Tokens { tokens } => assert_eq!(tokens.len(), 4),
        other => panic!("unexpected response {other:?}"),
    }
}

#[tokio::test]
async fn test_protocol_unregistered_token() {
    let (handle, _task) = actor::spawn(exchange(), 16);
    let trader = TraderId::new();

    for op in ["deposit", "withdraw"] {
        let request = protocol::parse_line(&format!(
            r#"{{"op":"{op}","trader":"{trader}","asset":"TOKEN-DOES-NOT-EXIST","amount":100}}"#
        ))
        .unwrap();
        match request.dispatch(&handle).await {
            Response::Error { code, message } => {
                assert_eq!(code, "UNKNOWN_ASSET");
                assert!(message.contains("TOKEN-DOES-NOT-EXIST"));
            }
            other => panic!("unexpected response {other:?}"),
        }
    }
}
