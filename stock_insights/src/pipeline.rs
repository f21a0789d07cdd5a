//! One snapshot run: fetch, normalize, derive, correlate.
//!
//! The normalized [`Series`] is the only shared value; every derived stage
//! borrows it immutably. A failure to obtain bars aborts the run, while news
//! failures are folded into the result.

use chrono::{NaiveDate, Utc};
use chrono_tz::America::New_York;
use market_feeds::{
    models::{news::NewsQuery, request_params::BarsRequest},
    news::NewsProvider,
    providers::DataProvider,
};
use serde::Serialize;
use tracing::info;

use crate::{
    companies::CompanyDirectory,
    config::{ConfigError, InsightsConfig},
    correlation::{
        CorrelatedSwing, Headlines, correlate_swings, fetch_headlines, resolve_query_term,
        today_query,
    },
    errors::InsightsError,
    gaps::{GapRecord, compute_gaps},
    indicators::{IndicatorSeries, compute_indicators},
    providers::{build_market_provider, build_news_provider},
    series::{DateRange, Series, normalize_provider_series},
    swings::{ChangeRecord, compute_changes, detect_swings},
};

/// Today's date on the US equity calendar.
pub fn market_today() -> NaiveDate {
    Utc::now().with_timezone(&New_York).date_naive()
}

/// Trims and upper-cases user input; rejects anything that is not a plausible ticker.
pub fn normalize_symbol(raw: &str) -> Result<String, InsightsError> {
    let symbol = raw.trim().to_uppercase();
    let plausible = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !plausible {
        return Err(ConfigError::Invalid(format!("invalid symbol {raw:?}")).into());
    }
    Ok(symbol)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayHeadlines {
    pub query: NewsQuery,
    pub headlines: Headlines,
}

/// Everything the presentation layer needs for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub symbol: String,
    pub range: DateRange,
    pub swing_threshold_pct: f64,
    pub series: Series,
    pub gaps: Vec<GapRecord>,
    pub changes: Vec<ChangeRecord>,
    pub swings: Vec<CorrelatedSwing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_headlines: Option<TodayHeadlines>,
}

pub struct SnapshotPipeline {
    market: Box<dyn DataProvider + Send + Sync>,
    news: Option<Box<dyn NewsProvider + Send + Sync>>,
    companies: CompanyDirectory,
    config: InsightsConfig,
}

impl SnapshotPipeline {
    /// Wires explicit providers. `config` is validated here.
    pub fn new(
        market: Box<dyn DataProvider + Send + Sync>,
        news: Option<Box<dyn NewsProvider + Send + Sync>>,
        config: InsightsConfig,
    ) -> Result<Self, InsightsError> {
        config.validate()?;
        Ok(Self {
            market,
            news,
            companies: CompanyDirectory::with_overrides(&config.companies),
            config,
        })
    }

    /// Builds providers from `config` and the environment.
    pub fn from_config(config: InsightsConfig) -> Result<Self, InsightsError> {
        config.validate()?;
        let market = build_market_provider(&config)?;
        let news = build_news_provider(&config)?;
        Self::new(market, news, config)
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    pub async fn run(&self, raw_symbol: &str, today: NaiveDate) -> Result<Snapshot, InsightsError> {
        let symbol = normalize_symbol(raw_symbol)?;
        let range = DateRange::lookback_weeks(today, self.config.lookback_weeks)?;
        info!(%symbol, start = %range.start(), end = %range.end(), "building snapshot");

        let request = BarsRequest::new(symbol.clone(), range.start(), range.end());
        let raw = self
            .market
            .fetch_daily_bars(request)
            .await
            .map_err(|err| InsightsError::from_market_data(&symbol, err))?;
        let series = normalize_provider_series(raw, &range)?;

        let gaps = compute_gaps(&series);
        let changes = compute_changes(&series);
        let swings = detect_swings(&changes, self.config.swing_threshold_pct);
        let settings = self.config.indicator_settings();
        let indicators = settings
            .any_enabled()
            .then(|| compute_indicators(&series, settings));
        info!(
            %symbol,
            bars = series.len(),
            swings = swings.len(),
            threshold = self.config.swing_threshold_pct,
            "derived records computed"
        );

        let news = self.news.as_deref();
        let term = resolve_query_term(&symbol, self.config.news.query_term, &self.companies);
        let max_results = self.config.news.max_results;
        let swings = correlate_swings(news, &term, &swings, max_results).await;

        let today_headlines = match news {
            Some(provider) if self.config.news.today_headlines => {
                let query = today_query(&term, today, max_results);
                let headlines = fetch_headlines(provider, &query).await;
                Some(TodayHeadlines { query, headlines })
            }
            _ => None,
        };

        Ok(Snapshot {
            symbol,
            range,
            swing_threshold_pct: self.config.swing_threshold_pct,
            series,
            gaps,
            changes,
            swings,
            indicators,
            today_headlines,
        })
    }
}
