//! Vendor-agnostic news query and result types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One search against a [`NewsProvider`](crate::news::NewsProvider).
///
/// `from` and `to` are both inclusive calendar dates, so a window with
/// `to == from + 1` covers two full days.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsQuery {
    /// Ticker or company name, depending on how the caller resolves terms.
    pub query_term: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Upper bound on the number of items returned.
    pub max_results: usize,
}

/// A headline reference returned by a news backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}
