//! Engine throughput benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench engine`.

use bond_matching_engine::types::{Instrument, Order, OrderSide};
use bond_matching_engine::{DefaultComplianceGate, InMemoryAuditSink, InMemoryStore, MatchingEngine};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Deterministic pseudo-random order stream: alternates side, walks price
/// in a small band around par so a meaningful fraction of orders cross.
fn synthetic_orders(n: usize) -> Vec<Order> {
    let instrument = Instrument::new("GOVT10Y");
    (0..n)
        .map(|i| {
            let side = if i % 2 == 0 { OrderSide::Buy } else { OrderSide::Sell };
            let price = Decimal::from(95 + (i % 10) as i64);
            let qty = Decimal::from(1 + (i % 50) as i64);
            Order::new(instrument.clone(), side, price, qty, format!("U{}", i % 20))
        })
        .collect()
}

fn bench_process_order_throughput(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("process_order_1000", |b| {
        b.iter_batched(
            || {
                let store = Arc::new(InMemoryStore::new());
                let compliance = Arc::new(DefaultComplianceGate::new(Arc::new(InMemoryAuditSink::new())));
                let engine = MatchingEngine::new(store, compliance);
                let orders = synthetic_orders(N);
                (engine, orders)
            },
            |(engine, orders)| {
                for order in orders {
                    let _ = engine.process_order(order).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_ledger_query_by_user(c: &mut Criterion) {
    const RESTING: usize = 2000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(1));
    group.bench_function("ledger_query_by_user_after_2000_trades", |b| {
        b.iter_batched(
            || {
                let store = Arc::new(InMemoryStore::new());
                let compliance = Arc::new(DefaultComplianceGate::new(Arc::new(InMemoryAuditSink::new())));
                let engine = MatchingEngine::new(store, compliance);
                for order in synthetic_orders(RESTING) {
                    let _ = engine.process_order(order).unwrap();
                }
                engine
            },
            |engine| {
                let _ = engine
                    .ledger()
                    .query(&bond_matching_engine::LedgerQuery {
                        user_id: Some("U5".to_string()),
                        ..Default::default()
                    })
                    .unwrap();
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_process_order_throughput, bench_ledger_query_by_user);
criterion_main!(benches);
