//! Per-instrument order book operations over the [`crate::storage::Store`]
//! abstraction: insertion, crossability, and priority-ordered enumeration
//! of the opposite side. Pure bookkeeping; [`crate::matching`] runs the
//! algorithm that uses these.

use log::warn;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::EngineError;
use crate::keys;
use crate::storage::Store;
use crate::types::{Instrument, Order, OrderSide};

/// Inserts `order` into its own side's book at its own price, as a fresh
/// JSON snapshot. Used both for the residual aggressor (spec §4.4 step 4)
/// and for re-queuing a partially-filled resting order.
pub fn insert(store: &dyn Store, order: &Order) -> Result<(), EngineError> {
    let key = keys::book(&order.instrument, order.side);
    let value = serde_json::to_value(order)
        .map_err(|e| EngineError::InternalEncodeError(e.to_string()))?;
    store.z_add(&key, order.price, value)?;
    Ok(())
}

/// Removes the exact encoded snapshot `entry` from the book. Idempotent:
/// removing an absent entry is not an error (spec §4.1).
pub fn remove_entry(
    store: &dyn Store,
    instrument: &Instrument,
    side: OrderSide,
    entry: &Value,
) -> Result<(), EngineError> {
    let key = keys::book(instrument, side);
    store.z_rem(&key, entry)?;
    Ok(())
}

/// Whether an order at `aggressor_price` on `aggressor_side` crosses a
/// resting order at `resting_price`: `Buy` crosses iff
/// `aggressor_price >= resting_price`; `Sell` crosses iff
/// `aggressor_price <= resting_price` (spec §4.4, §8 invariant 4).
pub fn crosses(aggressor_side: OrderSide, aggressor_price: Decimal, resting_price: Decimal) -> bool {
    match aggressor_side {
        OrderSide::Buy => aggressor_price >= resting_price,
        OrderSide::Sell => aggressor_price <= resting_price,
    }
}

/// Enumerates the opposite side's book in the priority order the
/// aggressor's side dictates: ascending score (lowest ask first) for a
/// `Buy` aggressor, descending score (highest bid first) for a `Sell`
/// aggressor.
pub fn opposite_entries(
    store: &dyn Store,
    instrument: &Instrument,
    aggressor_side: OrderSide,
) -> Result<Vec<(Decimal, Value)>, EngineError> {
    let opposite_side = aggressor_side.opposite();
    let key = keys::book(instrument, opposite_side);
    let entries = match aggressor_side {
        OrderSide::Buy => store.z_range_asc(&key)?,
        OrderSide::Sell => store.z_range_desc(&key)?,
    };
    Ok(entries)
}

/// Decodes a book entry into an [`Order`]. Returns `None` on a malformed
/// entry, logging a diagnostic — per spec §4.4, a malformed book entry is
/// skipped, not fatal, and does not affect other entries.
pub fn decode_entry(entry: &Value) -> Option<Order> {
    match serde_json::from_value::<Order>(entry.clone()) {
        Ok(order) => Some(order),
        Err(e) => {
            warn!("skipping malformed book entry: {e}");
            None
        }
    }
}
