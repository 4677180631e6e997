//! Core data model for the matching engine and ledger (charter data models).
//!
//! [`Order`] and [`Trade`] are the two persisted record types; [`Instrument`]
//! is the opaque string the engine never interprets beyond equality.

use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Opaque instrument identifier. Equality is byte-exact; the engine never
/// parses or interprets its structure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Instrument(pub String);

impl Instrument {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Instrument {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Globally unique order identifier, generated at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique trade identifier, generated at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TradeId(pub Uuid);

impl TradeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

/// Order lifecycle status. `Cancelled` is reserved: the engine never
/// produces it (no cancel/replace support, see Non-goals).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

/// A buy or sell order for a named instrument.
///
/// Invariants: `0 <= remaining_quantity <= initial_quantity`;
/// `status == Filled` iff `remaining_quantity == 0`; `status ==
/// PartiallyFilled` iff `0 < remaining_quantity < initial_quantity`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub instrument: Instrument,
    pub side: OrderSide,
    pub price: Decimal,
    pub initial_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub timestamp: String,
    pub status: OrderStatus,
    pub user_id: String,
}

impl Order {
    /// Constructs a fresh order ready for submission: `remaining_quantity ==
    /// initial_quantity`, `status == Open`, a fresh id and timestamp.
    pub fn new(
        instrument: Instrument,
        side: OrderSide,
        price: Decimal,
        quantity: Decimal,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            instrument,
            side,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
            timestamp: crate::clock::now_iso8601(),
            status: OrderStatus::Open,
            user_id: user_id.into(),
        }
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }
}

/// A single execution between an aggressor and a resting order.
///
/// Invariants: `buyer_order_id != seller_order_id`;
/// `{buyer_order_id, seller_order_id} == {aggressor_order_id, resting_order_id}`;
/// `price > 0`; `quantity > 0`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub instrument: Instrument,
    pub price: Decimal,
    pub quantity: Decimal,
    pub aggressor_order_id: OrderId,
    pub resting_order_id: OrderId,
    pub buyer_order_id: OrderId,
    pub seller_order_id: OrderId,
    pub timestamp: String,
}

impl Trade {
    /// `YYYYMMDD` prefix of this trade's own timestamp (dashes stripped),
    /// used by the ledger's day-range filter.
    pub fn day_key(&self) -> String {
        crate::clock::day_key_from_iso8601(&self.timestamp)
    }

    pub fn amount(&self) -> Decimal {
        self.price * self.quantity
    }
}
