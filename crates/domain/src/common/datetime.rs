//! Epoch-millisecond conversions.
//!
//! World status timestamps are persisted and broadcast as epoch milliseconds.

use chrono::{DateTime, TimeZone, Utc};

/// Returns `None` for values chrono cannot represent.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
