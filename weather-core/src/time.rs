//! Time bucketing.
//!
//! Grouping and display deliberately use different references: forecast
//! samples are bucketed by their plain UTC date, while the "as of" time of
//! current weather is shifted by the location's offset before formatting.
//! Shifting the buckets would move samples between days.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::NOT_AVAILABLE;

/// Calendar day a forecast instant is grouped under (UTC, no offset).
pub fn day_key(instant: &DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// `YYYY-MM-DD HH:MM` of `ts` shifted by `offset_secs`.
pub fn local_timestamp(ts: i64, offset_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts.saturating_add(offset_secs), 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
