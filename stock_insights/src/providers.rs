//! Provider registry: maps configuration onto concrete backends.
//!
//! Credentials are read and validated here, so a missing key is reported as a
//! configuration problem before any request is made.

use market_feeds::{
    news::{NewsProvider, alpaca_news::AlpacaNewsProvider, newsapi::NewsApiProvider},
    providers::{DataProvider, alpaca_rest::provider::AlpacaProvider},
};
use tracing::debug;

use crate::config::{ConfigError, InsightsConfig, NewsBackend};

/// Build the market data provider.
pub fn build_market_provider(
    cfg: &InsightsConfig,
) -> Result<Box<dyn DataProvider + Send + Sync>, ConfigError> {
    let provider = AlpacaProvider::new(cfg.request_timeout())?
        .with_defaults(cfg.market_data.alpaca_params());
    debug!(feed = ?cfg.market_data.feed, "alpaca market data provider ready");
    Ok(Box::new(provider))
}

/// Build the configured news provider, or `None` when news is switched off.
pub fn build_news_provider(
    cfg: &InsightsConfig,
) -> Result<Option<Box<dyn NewsProvider + Send + Sync>>, ConfigError> {
    let timeout = cfg.request_timeout();
    let provider: Box<dyn NewsProvider + Send + Sync> = match cfg.news.backend {
        NewsBackend::None => return Ok(None),
        NewsBackend::NewsApi => Box::new(NewsApiProvider::new(timeout)?),
        NewsBackend::Alpaca => Box::new(AlpacaNewsProvider::new(timeout)?),
    };
    debug!(backend = provider.name(), "news provider ready");
    Ok(Some(provider))
}
