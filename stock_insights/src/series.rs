//! Series normalization.
//!
//! Providers hand back bars in arbitrary order, occasionally with repeated
//! dates or junk prices. Everything downstream works on a [`Series`]: bars
//! strictly ascending by date, one per date, all prices finite and non-negative.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use market_feeds::models::bar::{Bar, BarSeries};
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::InsightsError;

/// Half-open calendar window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InsightsError> {
        if start >= end {
            return Err(InsightsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `weeks`-long window ending (exclusively) at `end`.
    pub fn lookback_weeks(end: NaiveDate, weeks: u32) -> Result<Self, InsightsError> {
        let start = end
            .checked_sub_days(Days::new(u64::from(weeks) * 7))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Canonical daily series. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Sorts, de-duplicates and sanitizes `bars`.
    ///
    /// When two bars share a date the later one in input order wins; vendors
    /// append corrections after the original print.
    pub fn normalize(bars: impl IntoIterator<Item = Bar>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
        for bar in bars {
            if !bar.has_valid_prices() {
                warn!(date = %bar.date, ?bar, "dropping bar with invalid prices");
                continue;
            }
            if by_date.insert(bar.date, bar).is_some() {
                debug!(date = %bar.date, "replaced duplicate bar");
            }
        }
        Self {
            bars: by_date.into_values().collect(),
        }
    }

    /// [`Series::normalize`], additionally dropping bars outside `range`.
    pub fn normalize_within(bars: impl IntoIterator<Item = Bar>, range: &DateRange) -> Self {
        Self::normalize(bars.into_iter().filter(|b| {
            let inside = range.contains(b.date);
            if !inside {
                debug!(date = %b.date, "dropping bar outside requested range");
            }
            inside
        }))
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// `(previous, current)` for every bar after the first.
    pub fn consecutive_pairs(&self) -> impl Iterator<Item = (&Bar, &Bar)> {
        self.bars.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// The most recent `n` bars, still ascending.
    pub fn tail(&self, n: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

/// Normalizes a provider result, failing when nothing usable is left.
pub fn normalize_provider_series(
    raw: BarSeries,
    range: &DateRange,
) -> Result<Series, InsightsError> {
    let received = raw.bars.len();
    let series = Series::normalize_within(raw.bars, range);
    debug!(symbol = %raw.symbol, received, kept = series.len(), "normalized series");
    if series.is_empty() {
        return Err(InsightsError::NoDataForSymbol { symbol: raw.symbol });
    }
    Ok(series)
}
