//! Ledger Indexer (spec §4.3): write path indexes a trade into buyer,
//! seller, instrument, and day tag sets; read path seeds candidates from
//! the most selective available index and post-filters.

use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::error::EngineError;
use crate::keys;
use crate::storage::Store;
use crate::types::{Instrument, Order, OrderId, Trade};

/// Filters for [`LedgerIndexer::query`]. All fields optional; an absent
/// field imposes no constraint.
#[derive(Clone, Debug, Default)]
pub struct LedgerQuery {
    pub user_id: Option<String>,
    pub instrument: Option<Instrument>,
    pub start_day: Option<String>,
    pub end_day: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

pub struct LedgerIndexer {
    store: Arc<dyn Store>,
}

impl LedgerIndexer {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Indexes a persisted trade into `by-user` (buyer and seller),
    /// `by-instrument`, and `by-day`. `by-day` uses the indexing clock's
    /// current day, not the trade's own timestamp (spec §4.3, §9).
    pub fn record_trade(&self, trade: &Trade) -> Result<(), EngineError> {
        let trade_key = keys::trade_doc(trade.id);

        if let Some(buyer_user) = self.lookup_user_id(trade.buyer_order_id) {
            self.store
                .s_add(&keys::user_trades(&buyer_user), &trade_key)?;
        }
        if let Some(seller_user) = self.lookup_user_id(trade.seller_order_id) {
            // Idempotent: if buyer == seller the set already contains this
            // member, so a second insert into the same key is a no-op.
            self.store
                .s_add(&keys::user_trades(&seller_user), &trade_key)?;
        }
        self.store
            .s_add(&keys::instrument_trades(&trade.instrument), &trade_key)?;
        self.store
            .s_add(&keys::daily_trades(&crate::clock::today_key()), &trade_key)?;
        Ok(())
    }

    /// Filtered read-through. Seeds the candidate set using the most
    /// selective available index (`userId` > `instrument` > `startDay` >
    /// full scan), then post-filters by user, instrument, day range, and
    /// amount range. Malformed trade documents are skipped, not fatal.
    pub fn query(&self, q: &LedgerQuery) -> Result<Vec<Trade>, EngineError> {
        let candidate_keys = self.seed(q)?;

        let mut out = Vec::new();
        for key in candidate_keys {
            let doc = match self.store.doc_get(&key)? {
                Some(d) => d,
                None => continue,
            };
            let trade: Trade = match serde_json::from_value(doc) {
                Ok(t) => t,
                Err(e) => {
                    warn!("skipping malformed trade document at {key}: {e}");
                    continue;
                }
            };
            if self.matches(&trade, q) {
                out.push(trade);
            }
        }
        Ok(out)
    }

    fn seed(&self, q: &LedgerQuery) -> Result<Vec<String>, EngineError> {
        if let Some(user_id) = &q.user_id {
            return Ok(self
                .store
                .s_members(&keys::user_trades(user_id))?
                .into_iter()
                .collect());
        }
        if let Some(instrument) = &q.instrument {
            return Ok(self
                .store
                .s_members(&keys::instrument_trades(instrument))?
                .into_iter()
                .collect());
        }
        if let Some(start_day) = &q.start_day {
            return Ok(self
                .store
                .s_members(&keys::daily_trades(start_day))?
                .into_iter()
                .collect());
        }
        Ok(self.store.scan_prefix(keys::trade_doc_prefix())?)
    }

    fn matches(&self, trade: &Trade, q: &LedgerQuery) -> bool {
        if let Some(user_id) = &q.user_id {
            let buyer_user = self.lookup_user_id(trade.buyer_order_id);
            let seller_user = self.lookup_user_id(trade.seller_order_id);
            let matches_user = buyer_user.as_deref() == Some(user_id.as_str())
                || seller_user.as_deref() == Some(user_id.as_str());
            if !matches_user {
                return false;
            }
        }
        if let Some(instrument) = &q.instrument {
            if &trade.instrument != instrument {
                return false;
            }
        }
        let day = trade.day_key();
        if let Some(start_day) = &q.start_day {
            if &day < start_day {
                return false;
            }
        }
        if let Some(end_day) = &q.end_day {
            if &day > end_day {
                return false;
            }
        }
        let amount = trade.amount();
        if let Some(min_amount) = q.min_amount {
            if amount < min_amount {
                return false;
            }
        }
        if let Some(max_amount) = q.max_amount {
            if amount > max_amount {
                return false;
            }
        }
        true
    }

    /// Recovers a user id from the order document referenced by `order_id`.
    /// Returns `None` if the document is missing or malformed — the caller
    /// treats the user as unknown rather than failing the whole query.
    fn lookup_user_id(&self, order_id: OrderId) -> Option<String> {
        let doc = self.store.doc_get(&keys::order_doc(order_id)).ok()??;
        match serde_json::from_value::<Order>(doc) {
            Ok(order) => Some(order.user_id),
            Err(e) => {
                warn!("skipping malformed order document for {order_id}: {e}");
                None
            }
        }
    }
}
