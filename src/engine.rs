//! Single-entry matching engine facade (spec §4.4).
//!
//! [`MatchingEngine::process_order`] runs the full submission sequence:
//! compliance check, persist, match, residual book insertion, final
//! persist, and trade reporting. Submissions on the same instrument are
//! serialised through a per-instrument mutex (spec §5); submissions on
//! different instruments proceed concurrently.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::compliance::ComplianceGate;
use crate::error::EngineError;
use crate::keys;
use crate::ledger::LedgerIndexer;
use crate::matching;
use crate::order_book;
use crate::storage::Store;
use crate::types::{Instrument, Order, OrderStatus, Trade};

/// The matching engine and trade ledger over a shared [`Store`].
///
/// One `MatchingEngine` serves all instruments; per-instrument
/// serialisation is internal (see module docs), so callers need not
/// shard by instrument themselves.
pub struct MatchingEngine {
    store: Arc<dyn Store>,
    compliance: Arc<dyn ComplianceGate>,
    ledger: Arc<LedgerIndexer>,
    instrument_locks: Mutex<HashMap<Instrument, Arc<Mutex<()>>>>,
}

impl MatchingEngine {
    pub fn new(store: Arc<dyn Store>, compliance: Arc<dyn ComplianceGate>) -> Self {
        let ledger = Arc::new(LedgerIndexer::new(store.clone()));
        Self {
            store,
            compliance,
            ledger,
            instrument_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The ledger sharing this engine's store, for read-through queries.
    pub fn ledger(&self) -> &LedgerIndexer {
        &self.ledger
    }

    /// The underlying store, for callers that need direct book inspection
    /// (e.g. health checks, book-depth reporting).
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    fn lock_for(&self, instrument: &Instrument) -> Arc<Mutex<()>> {
        let mut locks = self.instrument_locks.lock().expect("instrument lock registry");
        locks
            .entry(instrument.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Submits an order: runs compliance, matching, and ledger recording,
    /// and returns the trades executed as a direct consequence of this
    /// submission, in match order.
    ///
    /// Pre-conditions checked as `InvalidInput`: positive price and
    /// quantity, non-empty user id and instrument. A fresh `Order` built
    /// with [`Order::new`] already satisfies `remaining_quantity ==
    /// initial_quantity` and `status == Open`.
    pub fn process_order(&self, mut aggressor: Order) -> Result<Vec<Trade>, EngineError> {
        if aggressor.price <= Decimal::ZERO {
            return Err(EngineError::InvalidInput("price must be positive".into()));
        }
        if aggressor.initial_quantity <= Decimal::ZERO {
            return Err(EngineError::InvalidInput("quantity must be positive".into()));
        }
        if aggressor.user_id.trim().is_empty() {
            return Err(EngineError::InvalidInput("user id must not be blank".into()));
        }
        if aggressor.instrument.as_str().trim().is_empty() {
            return Err(EngineError::InvalidInput("instrument must not be blank".into()));
        }

        let instrument_lock = self.lock_for(&aggressor.instrument);
        let _guard = instrument_lock.lock().expect("per-instrument lock");

        // 1. Compliance: fail fast, no state change.
        if !self.compliance.is_user_compliant(&aggressor.user_id)
            || !self.compliance.pre_trade_check(&aggressor)
        {
            return Err(EngineError::ComplianceRejected {
                user_id: aggressor.user_id.clone(),
            });
        }

        // 2. Persist aggressor before matching, so ledger user-lookups can
        // resolve it even for trades that occur before the post-match persist.
        self.persist_order(&aggressor)?;

        // 3. Match against the opposite book.
        let trades = matching::run_match(self.store.as_ref(), &self.ledger, &mut aggressor)?;

        // 4/5. Residual book insertion, or closed aggressor.
        if aggressor.remaining_quantity > Decimal::ZERO {
            aggressor.status = if trades.is_empty() {
                OrderStatus::Open
            } else {
                OrderStatus::PartiallyFilled
            };
            order_book::insert(self.store.as_ref(), &aggressor)?;
        } else {
            aggressor.status = OrderStatus::Filled;
        }

        // 6. Re-persist final state.
        self.persist_order(&aggressor)?;

        // 7. Reporting, in match order.
        for trade in &trades {
            self.compliance.report_trade(trade);
        }

        Ok(trades)
    }

    fn persist_order(&self, order: &Order) -> Result<(), EngineError> {
        let value = serde_json::to_value(order)
            .map_err(|e| EngineError::InternalEncodeError(e.to_string()))?;
        self.store.doc_put(&keys::order_doc(order.id), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemoryAuditSink;
    use crate::compliance::DefaultComplianceGate;
    use crate::ledger::LedgerQuery;
    use crate::storage::InMemoryStore;
    use crate::types::OrderSide;

    fn engine() -> MatchingEngine {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let compliance: Arc<dyn ComplianceGate> =
            Arc::new(DefaultComplianceGate::new(Arc::new(InMemoryAuditSink::new())));
        MatchingEngine::new(store, compliance)
    }

    // S1 — empty book, passive insertion.
    #[test]
    fn passive_insertion_when_book_empty() {
        let engine = engine();
        let order = Order::new(
            Instrument::new("GOVT10Y"),
            OrderSide::Buy,
            Decimal::new(9850, 2),
            Decimal::from(1000),
            "U1",
        );
        let trades = engine.process_order(order.clone()).unwrap();
        assert!(trades.is_empty());
        let entries = order_book::opposite_entries(
            engine.store.as_ref(),
            &Instrument::new("GOVT10Y"),
            OrderSide::Sell,
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, Decimal::new(9850, 2));
    }

    // S2 — full cross, single resting order: both orders filled, ledger indexed.
    #[test]
    fn full_cross_fills_both_orders_and_indexes_ledger() {
        let engine = engine();
        let instrument = Instrument::new("GOVT10Y");
        let sell = Order::new(instrument.clone(), OrderSide::Sell, Decimal::new(9850, 2), Decimal::from(1000), "U2");
        engine.process_order(sell.clone()).unwrap();

        let buy = Order::new(instrument.clone(), OrderSide::Buy, Decimal::new(9860, 2), Decimal::from(1000), "U1");
        let trades = engine.process_order(buy.clone()).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, Decimal::new(9850, 2));
        assert_eq!(trades[0].quantity, Decimal::from(1000));
        assert_eq!(trades[0].buyer_order_id, buy.id);
        assert_eq!(trades[0].seller_order_id, sell.id);

        assert!(order_book::opposite_entries(engine.store.as_ref(), &instrument, OrderSide::Buy)
            .unwrap()
            .is_empty());

        let results = engine
            .ledger()
            .query(&LedgerQuery {
                user_id: Some("U1".into()),
                instrument: Some(instrument.clone()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(results.len(), 1);
        let results = engine
            .ledger()
            .query(&LedgerQuery { user_id: Some("U2".into()), ..Default::default() })
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn rejects_non_positive_price_before_any_state_change() {
        let engine = engine();
        let mut order = Order::new(Instrument::new("GOVT10Y"), OrderSide::Buy, Decimal::from(100), Decimal::from(10), "U1");
        order.price = Decimal::ZERO;
        let err = engine.process_order(order).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn rejects_blank_user_id_as_compliance_failure() {
        let engine = engine();
        let order = Order::new(Instrument::new("GOVT10Y"), OrderSide::Buy, Decimal::from(100), Decimal::from(10), "   ");
        // Blank user id fails InvalidInput pre-condition before compliance.
        let err = engine.process_order(order).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn different_instruments_do_not_interfere() {
        let engine = engine();
        let a = Order::new(Instrument::new("GOVT10Y"), OrderSide::Buy, Decimal::from(100), Decimal::from(10), "U1");
        let b = Order::new(Instrument::new("GOVT30Y"), OrderSide::Buy, Decimal::from(200), Decimal::from(5), "U2");
        engine.process_order(a).unwrap();
        engine.process_order(b).unwrap();
        assert_eq!(
            order_book::opposite_entries(engine.store.as_ref(), &Instrument::new("GOVT10Y"), OrderSide::Sell)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            order_book::opposite_entries(engine.store.as_ref(), &Instrument::new("GOVT30Y"), OrderSide::Sell)
                .unwrap()
                .len(),
            1
        );
    }
}
