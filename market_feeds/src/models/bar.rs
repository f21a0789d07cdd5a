//! Canonical in-memory representation of a daily price bar (OHLC).
//!
//! This struct is the standard output for all [`DataProvider`](crate::providers::DataProvider)
//! implementations, regardless of vendor. Bars are keyed by the exchange-local
//! trading date rather than a UTC instant: a daily bar stamped `2024-03-05T05:00:00Z`
//! belongs to the New York session of March 5th.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};

/// A single trading day.
///
/// Prices are expected to satisfy `low <= open, close <= high`, but this is
/// not enforced: vendors occasionally publish inconsistent corrections and
/// the analytics downstream never depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date (exchange-local).
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the session.
    pub high: f64,

    /// Lowest price during the session.
    pub low: f64,

    /// Closing price.
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// True when every price is finite and non-negative.
    pub fn has_valid_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
    }
}

/// The raw set of bars a provider returned for one symbol.
///
/// No ordering or uniqueness is guaranteed here; callers normalize before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "AAPL").
    pub symbol: String,
    /// The collection of bars, in whatever order the vendor produced them.
    pub bars: Vec<Bar>,
}

/// Maps a vendor timestamp onto the US equity trading date it belongs to.
pub fn trading_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&New_York).date_naive()
}
