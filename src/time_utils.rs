// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, Utc};

/// Format a UTC timestamp as a calendar date (`YYYY-MM-DD`).
pub fn format_iso_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Check that a string is a valid `YYYY-MM-DD` calendar date.
pub fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Millisecond Unix timestamp used as the base for record ids.
pub fn timestamp_millis(date: DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}
