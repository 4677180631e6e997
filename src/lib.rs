//! # Bond Matching Engine
//!
//! Limit-order matching engine and trade ledger for a bond marketplace:
//! price-time priority matching over a pluggable [`Store`] abstraction,
//! a compliance seam, and a multi-dimensional trade ledger index.
//!
//! ## Entry point
//!
//! Use [`MatchingEngine`] as the single entry point: construct it with a
//! [`Store`] and a [`ComplianceGate`], then call
//! [`MatchingEngine::process_order`] for every incoming order and
//! [`MatchingEngine::ledger`] to query recorded trades.
//!
//! ## Example
//!
//! ```rust
//! use bond_matching_engine::{DefaultComplianceGate, InMemoryAuditSink, InMemoryStore, MatchingEngine};
//! use bond_matching_engine::types::{Instrument, Order, OrderSide};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let compliance = Arc::new(DefaultComplianceGate::new(Arc::new(InMemoryAuditSink::new())));
//! let engine = MatchingEngine::new(store, compliance);
//!
//! let order = Order::new(Instrument::new("GOVT10Y"), OrderSide::Buy, Decimal::from(100), Decimal::from(10), "U1");
//! let trades = engine.process_order(order).unwrap();
//! assert!(trades.is_empty());
//! ```

pub mod api;
pub mod audit;
pub mod clock;
pub mod compliance;
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod matching;
pub mod order_book;
pub mod storage;
pub mod types;

pub use audit::{AuditEvent, AuditSink, InMemoryAuditSink, StdoutAuditSink};
pub use compliance::{ComplianceGate, DefaultComplianceGate, NoopComplianceGate};
pub use engine::MatchingEngine;
pub use error::{EngineError, StoreError};
pub use ledger::{LedgerIndexer, LedgerQuery};
pub use storage::{InMemoryStore, Store};
pub use types::{Instrument, Order, OrderId, OrderSide, OrderStatus, Trade, TradeId};
