//! Wall-clock helpers: ISO-8601 timestamps and `YYYYMMDD` day keys.
//!
//! Centralised so the "indexing clock vs. trade timestamp" distinction
//! (§9 of the spec) is explicit: orders/trades are timestamped with
//! [`now_iso8601`] at construction; the ledger buckets into `by-day` with
//! [`today_key`], evaluated at indexing time, not parsed from the record.

use chrono::Utc;

/// Current instant as an ISO-8601 / RFC-3339 string.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Current day as `YYYYMMDD`, evaluated at call time.
pub fn today_key() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

/// Derives a `YYYYMMDD` day key from an ISO-8601 timestamp: the first ten
/// characters with `-` stripped. Falls back to stripping dashes from
/// whatever prefix is available if the timestamp is shorter/malformed,
/// matching the source's permissive string-slicing behaviour rather than
/// failing the whole query.
pub fn day_key_from_iso8601(timestamp: &str) -> String {
    let prefix: String = timestamp.chars().take(10).collect();
    prefix.chars().filter(|c| *c != '-').collect()
}
