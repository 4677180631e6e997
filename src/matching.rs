//! Price-time priority matching (spec §4.4).
//!
//! [`run_match`] runs one aggressor order against the opposite side of its
//! instrument's book: for each crossable resting entry in priority order,
//! fills the smaller of the two remaining quantities, persists the trade,
//! records it in the ledger, and updates the resting order's book entry
//! and document. Does not touch the aggressor's own book entry or final
//! status — that is [`crate::engine::MatchingEngine::process_order`]'s job
//! (steps 4-6 of spec §4.4), since it only makes sense once matching is
//! complete.

use log::warn;

use crate::error::EngineError;
use crate::keys;
use crate::ledger::LedgerIndexer;
use crate::order_book;
use crate::storage::Store;
use crate::types::{Order, OrderSide, OrderStatus, Trade, TradeId};

/// Matches `aggressor` against the opposite book, mutating
/// `aggressor.remaining_quantity` in place and returning the trades
/// executed, in match order.
pub fn run_match(
    store: &dyn Store,
    ledger: &LedgerIndexer,
    aggressor: &mut Order,
) -> Result<Vec<Trade>, EngineError> {
    let instrument = aggressor.instrument.clone();
    let side = aggressor.side;
    let mut trades = Vec::new();

    let entries = order_book::opposite_entries(store, &instrument, side)?;
    for (resting_price, entry_value) in entries {
        if aggressor.remaining_quantity.is_zero() {
            break;
        }
        let mut resting = match order_book::decode_entry(&entry_value) {
            Some(o) => o,
            None => continue,
        };
        if !order_book::crosses(side, aggressor.price, resting_price) {
            break;
        }

        let fill_qty = aggressor.remaining_quantity.min(resting.remaining_quantity);
        aggressor.remaining_quantity -= fill_qty;
        resting.remaining_quantity -= fill_qty;

        let (buyer_order_id, seller_order_id) = match side {
            OrderSide::Buy => (aggressor.id, resting.id),
            OrderSide::Sell => (resting.id, aggressor.id),
        };
        let trade = Trade {
            id: TradeId::new(),
            instrument: instrument.clone(),
            price: resting_price,
            quantity: fill_qty,
            aggressor_order_id: aggressor.id,
            resting_order_id: resting.id,
            buyer_order_id,
            seller_order_id,
            timestamp: crate::clock::now_iso8601(),
        };
        let trade_value = serde_json::to_value(&trade)
            .map_err(|e| EngineError::InternalEncodeError(e.to_string()))?;
        store.doc_put(&keys::trade_doc(trade.id), trade_value)?;
        ledger.record_trade(&trade)?;

        order_book::remove_entry(store, &instrument, resting.side, &entry_value)?;
        if resting.remaining_quantity.is_zero() {
            resting.status = OrderStatus::Filled;
        } else {
            resting.status = OrderStatus::PartiallyFilled;
            order_book::insert(store, &resting)?;
        }
        let resting_value = serde_json::to_value(&resting)
            .map_err(|e| EngineError::InternalEncodeError(e.to_string()))?;
        store.doc_put(&keys::order_doc(resting.id), resting_value)?;

        trades.push(trade);
    }

    if trades.is_empty() {
        warn!(
            "order {} for {} found no crossable liquidity",
            aggressor.id, instrument
        );
    }

    Ok(trades)
}
