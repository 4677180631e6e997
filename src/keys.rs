//! Store key layout (spec §6, bit-exact).
//!
//! Every caller of [`crate::storage::Store`] builds keys through these
//! functions so the layout stays centralised and exact.

use crate::types::{Instrument, OrderId, TradeId};

pub fn order_doc(order_id: OrderId) -> String {
    format!("bonds:orders:{}", order_id)
}

pub fn trade_doc(trade_id: TradeId) -> String {
    format!("bonds:trades:{}", trade_id)
}

pub fn trade_doc_prefix() -> &'static str {
    "bonds:trades:"
}

pub fn bids_book(instrument: &Instrument) -> String {
    format!("bonds:bids:{}", instrument)
}

pub fn asks_book(instrument: &Instrument) -> String {
    format!("bonds:asks:{}", instrument)
}

pub fn book(instrument: &Instrument, side: crate::types::OrderSide) -> String {
    match side {
        crate::types::OrderSide::Buy => bids_book(instrument),
        crate::types::OrderSide::Sell => asks_book(instrument),
    }
}

pub fn user_trades(user_id: &str) -> String {
    format!("bonds:user-trades:{}", user_id)
}

pub fn instrument_trades(instrument: &Instrument) -> String {
    format!("bonds:instrument-trades:{}", instrument)
}

pub fn daily_trades(day_key: &str) -> String {
    format!("bonds:daily-trades:{}", day_key)
}
