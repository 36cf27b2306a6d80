//! Matching path benchmarks
//!
//! 1. Limit order insertion without a match
//! 2. Full match against one resting order
//! 3. Market order sweeping a deep book

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use exchange::Exchange;
use types::asset::{Ticker, TokenHandle};
use types::ids::TraderId;
use types::numeric::{Price, Quantity};
use types::order::Side;

const FUNDS: u64 = 1_000_000_000_000;

struct Fixture {
    exchange: Exchange,
    buyer: TraderId,
    seller: TraderId,
    asset: Ticker,
}

fn fixture() -> Fixture {
    let dai = Ticker::new("DAI");
    let asset = Ticker::new("BAT");
    let mut exchange = Exchange::new(dai.clone(), TokenHandle::new("dai"));
    exchange.add_asset(asset.clone(), TokenHandle::new("bat")).unwrap();

    let buyer = TraderId::new();
    let seller = TraderId::new();
    exchange.deposit(buyer, &dai, Quantity::new(FUNDS)).unwrap();
    exchange.deposit(seller, &asset, Quantity::new(FUNDS)).unwrap();
    exchange.drain_events();

    Fixture {
        exchange,
        buyer,
        seller,
        asset,
    }
}

fn with_asks(depth: u64) -> Fixture {
    let mut f = fixture();
    for i in 0..depth {
        f.exchange
            .create_limit_order(f.seller, &f.asset, Quantity::new(10), Price::new(1_000 + i), Side::SELL)
            .unwrap();
    }
    f
}

fn bench_limit_no_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("Exchange - Limit Order (No Match)");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single_limit_rest", |b| {
        b.iter_batched(
            fixture,
            |mut f| {
                f.exchange
                    .create_limit_order(f.buyer, &f.asset, black_box(Quantity::new(10)), black_box(Price::new(100)), Side::BUY)
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("Exchange - Full Match");
    group.throughput(Throughput::Elements(1));

    group.bench_function("limit_buy_meets_ask", |b| {
        b.iter_batched(
            || with_asks(1),
            |mut f| {
                f.exchange
                    .create_limit_order(f.buyer, &f.asset, Quantity::new(10), Price::new(1_000), Side::BUY)
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("Exchange - Market Sweep");

    for depth in [10u64, 100, 1_000] {
        group.throughput(Throughput::Elements(depth));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter_batched(
                || with_asks(depth),
                |mut f| {
                    f.exchange
                        .create_market_order(f.buyer, &f.asset, Quantity::new(depth * 10), Side::BUY)
                        .unwrap();
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_limit_no_match, bench_full_match, bench_market_sweep);
criterion_main!(benches);
