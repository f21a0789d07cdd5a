use chrono::NaiveDate;
use market_feeds::providers::ProviderError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failures that stop a snapshot from being produced.
///
/// Per-record problems (one malformed bar, one failed news query, a change
/// against a zero close) never surface here; they are isolated where they occur.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// The provider answered, but with no usable bars in the window.
    #[error("No data found for {symbol}. Please check the symbol and try again.")]
    NoDataForSymbol { symbol: String },

    /// The provider does not know the symbol at all.
    #[error("Unknown symbol: {symbol}")]
    SymbolNotFound { symbol: String },

    /// Transport or API failure while fetching bars.
    #[error("Market data provider unavailable: {source}")]
    ProviderUnavailable {
        #[source]
        source: ProviderError,
    },

    /// Invalid settings or credentials, detected before any network call.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl InsightsError {
    /// Classifies a market data failure into the user-facing taxonomy.
    pub fn from_market_data(symbol: &str, err: ProviderError) -> Self {
        if err.is_symbol_not_found() {
            InsightsError::SymbolNotFound {
                symbol: symbol.to_string(),
            }
        } else {
            InsightsError::ProviderUnavailable { source: err }
        }
    }
}
