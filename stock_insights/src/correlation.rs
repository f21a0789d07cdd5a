//! News correlation policy: which headline searches a snapshot issues.
//!
//! Every detected swing gets its own query over a two-day window (the swing
//! session plus the next calendar day, to catch after-hours and next-morning
//! coverage). Overlapping windows are not merged; each swing's context is
//! reported separately. Failures degrade to [`Headlines::Unavailable`].

use chrono::NaiveDate;
use market_feeds::{
    models::news::{NewsItem, NewsQuery},
    news::NewsProvider,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{companies::CompanyDirectory, config::QueryTermSource, swings::Swing};

/// The string sent to the news backend for `symbol`.
///
/// Falls back to the ticker when a company name is requested but unknown.
pub fn resolve_query_term(
    symbol: &str,
    source: QueryTermSource,
    companies: &CompanyDirectory,
) -> String {
    match source {
        QueryTermSource::Ticker => symbol.to_string(),
        QueryTermSource::CompanyName => match companies.name_for(symbol) {
            Some(name) => name.to_string(),
            None => {
                warn!(symbol, "no company name on file, searching news by ticker");
                symbol.to_string()
            }
        },
    }
}

/// `date ..= date + 1 day`.
pub fn next_day_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    (date, date.succ_opt().unwrap_or(date))
}

pub fn swing_query(query_term: &str, swing: &Swing, max_results: usize) -> NewsQuery {
    let (from, to) = next_day_window(swing.date);
    NewsQuery {
        query_term: query_term.to_string(),
        from,
        to,
        max_results,
    }
}

/// Live headlines: same two-day shape, anchored on today.
pub fn today_query(query_term: &str, today: NaiveDate, max_results: usize) -> NewsQuery {
    let (from, to) = next_day_window(today);
    NewsQuery {
        query_term: query_term.to_string(),
        from,
        to,
        max_results,
    }
}

/// Outcome of one news query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Headlines {
    Fetched { items: Vec<NewsItem> },
    /// The query failed; the reason is shown in place of headlines.
    Unavailable { reason: String },
    /// No news backend is configured.
    Disabled,
}

impl Headlines {
    pub fn items(&self) -> &[NewsItem] {
        match self {
            Headlines::Fetched { items } => items,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedSwing {
    pub swing: Swing,
    pub query: NewsQuery,
    pub headlines: Headlines,
}

/// Runs one query, capping the result and absorbing failures.
pub async fn fetch_headlines(
    provider: &(dyn NewsProvider + Send + Sync),
    query: &NewsQuery,
) -> Headlines {
    match provider.search_news(query).await {
        Ok(mut items) => {
            items.truncate(query.max_results);
            debug!(
                backend = provider.name(),
                from = %query.from,
                count = items.len(),
                "headlines fetched"
            );
            Headlines::Fetched { items }
        }
        Err(err) => {
            warn!(backend = provider.name(), from = %query.from, error = %err, "news query failed");
            Headlines::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}

/// One query per swing, issued sequentially, in swing order.
pub async fn correlate_swings(
    provider: Option<&(dyn NewsProvider + Send + Sync)>,
    query_term: &str,
    swings: &[Swing],
    max_results: usize,
) -> Vec<CorrelatedSwing> {
    let mut out = Vec::with_capacity(swings.len());
    for swing in swings {
        let query = swing_query(query_term, swing, max_results);
        let headlines = match provider {
            Some(p) => fetch_headlines(p, &query).await,
            None => Headlines::Disabled,
        };
        out.push(CorrelatedSwing {
            swing: *swing,
            query,
            headlines,
        });
    }
    out
}
