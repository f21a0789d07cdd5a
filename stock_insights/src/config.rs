//! Runtime configuration, loaded from an optional TOML file.
//!
//! Every field has a default, so a missing file (or an empty one) yields the
//! stock dashboard: 5% swings over six weeks, EMA(20), RSI(14), no news.
//!
//! ```toml
//! swing_threshold_pct = 3.0
//!
//! [indicators]
//! rsi = false
//!
//! [news]
//! backend = "newsapi"
//! query_term = "company_name"
//!
//! [companies]
//! SHOP = "Shopify"
//! ```

use std::{
    collections::BTreeMap,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::ValueEnum;
use market_feeds::providers::{
    ProviderInitError,
    alpaca_rest::params::{Adjustment, AlpacaBarsParams, Feed, Sort},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::IndicatorSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("provider credentials: {0}")]
    Credentials(#[from] ProviderInitError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InsightsConfig {
    /// Minimum absolute close-to-close move, in percent, for a swing.
    pub swing_threshold_pct: f64,
    pub lookback_weeks: u32,
    /// Rows shown in the price table of the text report.
    pub display_rows: usize,
    /// Per-request timeout applied to every provider call.
    pub request_timeout_secs: u64,
    pub market_data: MarketDataConfig,
    pub indicators: IndicatorConfig,
    pub news: NewsConfig,
    /// Extra ticker -> company name entries for name-based news search.
    pub companies: BTreeMap<String, String>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            swing_threshold_pct: 5.0,
            lookback_weeks: 6,
            display_rows: 30,
            request_timeout_secs: 5,
            market_data: MarketDataConfig::default(),
            indicators: IndicatorConfig::default(),
            news: NewsConfig::default(),
            companies: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MarketDataConfig {
    pub feed: Feed,
    pub adjustment: Adjustment,
}

impl MarketDataConfig {
    pub fn alpaca_params(&self) -> AlpacaBarsParams {
        AlpacaBarsParams {
            adjustment: Some(self.adjustment),
            feed: Some(self.feed),
            sort: Some(Sort::Asc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    pub ema: bool,
    pub ema_period: usize,
    pub rsi: bool,
    pub rsi_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema: true,
            ema_period: 20,
            rsi: true,
            rsi_period: 14,
        }
    }
}

/// Which headline backend to query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NewsBackend {
    /// No headlines.
    #[default]
    None,
    /// Generic article search (newsapi.org).
    #[serde(rename = "newsapi")]
    #[value(name = "newsapi")]
    NewsApi,
    /// Ticker-aware financial news (Alpaca).
    Alpaca,
}

/// What string a news search is keyed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryTermSource {
    #[default]
    Ticker,
    CompanyName,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    pub backend: NewsBackend,
    pub max_results: usize,
    pub query_term: QueryTermSource,
    /// Also fetch headlines for the current day.
    pub today_headlines: bool,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            backend: NewsBackend::None,
            max_results: 5,
            query_term: QueryTermSource::Ticker,
            today_headlines: true,
        }
    }
}

impl InsightsConfig {
    /// Defaults when `path` is `None`, otherwise the parsed and validated file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !self.swing_threshold_pct.is_finite() || self.swing_threshold_pct < 0.0 {
            return invalid("swing_threshold_pct must be a finite, non-negative percentage");
        }
        if self.lookback_weeks == 0 {
            return invalid("lookback_weeks must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            return invalid("request_timeout_secs must be at least 1");
        }
        if self.indicators.ema_period == 0 || self.indicators.rsi_period == 0 {
            return invalid("indicator periods must be at least 1");
        }
        if self.news.max_results == 0 {
            return invalid("news.max_results must be at least 1");
        }
        if self.news.backend == NewsBackend::Alpaca
            && self.news.query_term == QueryTermSource::CompanyName
        {
            return invalid(
                "the alpaca news backend filters by symbol; use query_term = \"ticker\"",
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn indicator_settings(&self) -> IndicatorSettings {
        let enabled = |on: bool, period: usize| if on { NonZeroUsize::new(period) } else { None };
        IndicatorSettings {
            ema_period: enabled(self.indicators.ema, self.indicators.ema_period),
            rsi_period: enabled(self.indicators.rsi, self.indicators.rsi_period),
        }
    }
}
