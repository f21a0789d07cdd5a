//! Technical indicators over the close series: EMA and RSI.
//!
//! Both are computed independently of swing detection and returned as lines
//! aligned index-for-index with the series dates. A `None` entry means "not
//! enough history yet", never zero.

use std::num::NonZeroUsize;

use chrono::NaiveDate;
use serde::Serialize;

use crate::series::Series;

/// Exponential moving average, recursive ("adjust = false") form.
///
/// Seeded with the first close rather than a simple average, so it is defined
/// at every index: `ema[0] == close[0]`,
/// `ema[i] = close[i] * k + ema[i-1] * (1 - k)` with `k = 2 / (period + 1)`.
pub fn ema(closes: &[f64], period: NonZeroUsize) -> Vec<f64> {
    let k = 2.0 / (period.get() as f64 + 1.0);
    let mut out = Vec::with_capacity(closes.len());
    let mut prev: Option<f64> = None;
    for &close in closes {
        let value = match prev {
            None => close,
            Some(p) => close * k + p * (1.0 - k),
        };
        out.push(value);
        prev = Some(value);
    }
    out
}

/// Relative strength index from simple rolling means of gains and losses.
///
/// The first `period` entries are `None`: index `i` needs the `period`
/// close-to-close deltas ending at `i`, and index 0 has no delta.
pub fn rsi(closes: &[f64], period: NonZeroUsize) -> Vec<Option<f64>> {
    let p = period.get();
    let mut out = vec![None; closes.len()];
    if closes.len() <= p {
        return out;
    }

    // deltas[j] is the move into bar j + 1.
    let gains: Vec<f64> = closes.windows(2).map(|w| (w[1] - w[0]).max(0.0)).collect();
    let losses: Vec<f64> = closes.windows(2).map(|w| (w[0] - w[1]).max(0.0)).collect();

    for (i, slot) in out.iter_mut().enumerate().skip(p) {
        let avg_gain = gains[i - p..i].iter().sum::<f64>() / p as f64;
        let avg_loss = losses[i - p..i].iter().sum::<f64>() / p as f64;
        *slot = Some(rsi_from_averages(avg_gain, avg_loss));
    }
    out
}

/// `100 - 100 / (1 + avg_gain / avg_loss)`, with zero average loss pinned to 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Which indicators to compute, and with what look-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSettings {
    pub ema_period: Option<NonZeroUsize>,
    pub rsi_period: Option<NonZeroUsize>,
}

impl IndicatorSettings {
    pub fn any_enabled(&self) -> bool {
        self.ema_period.is_some() || self.rsi_period.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorLine {
    pub period: usize,
    pub values: Vec<Option<f64>>,
}

impl IndicatorLine {
    /// Most recent defined value.
    pub fn latest(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

/// Indicator lines aligned to `dates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema: Option<IndicatorLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<IndicatorLine>,
}

pub fn compute_indicators(series: &Series, settings: IndicatorSettings) -> IndicatorSeries {
    let closes = series.closes();
    IndicatorSeries {
        dates: series.dates(),
        ema: settings.ema_period.map(|period| IndicatorLine {
            period: period.get(),
            values: ema(&closes, period).into_iter().map(Some).collect(),
        }),
        rsi: settings.rsi_period.map(|period| IndicatorLine {
            period: period.get(),
            values: rsi(&closes, period),
        }),
    }
}
