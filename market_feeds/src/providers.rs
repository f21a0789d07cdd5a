//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching daily bar data from any market data vendor (e.g., Alpaca, Polygon.io).
//!
//! Each concrete provider implementation should implement [`DataProvider`] to handle
//! vendor-specific API logic and validation.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_feeds::models::{bar::BarSeries, request_params::BarsRequest};
//! use market_feeds::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_daily_bars(&self, request: BarsRequest) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries { symbol: request.symbol, bars: vec![] })
//!     }
//! }
//! ```

pub mod alpaca_rest;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use shared_utils::env::EnvVarError;
use snafu::{Backtrace, ResultExt, Snafu};

use crate::models::{bar::BarSeries, request_params::BarsRequest};

/// Trait for fetching daily bars from a market data provider.
#[async_trait]
pub trait DataProvider {
    /// Fetches the daily bars for one symbol over `[request.start, request.end)`.
    ///
    /// An empty `bars` vector is a valid answer (the symbol exists but did not
    /// trade in the window). Unknown symbols are reported as
    /// [`ProviderError::SymbolNotFound`] when the vendor distinguishes them.
    async fn fetch_daily_bars(&self, request: BarsRequest) -> Result<BarSeries, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
///
/// These are all raised before any network traffic happens.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed or blank environment variable.
    #[snafu(display("Missing credential: {source}"))]
    MissingEnvVar {
        source: EnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains characters that cannot be sent in a header.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a provider implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API answered with a non-success status.
    #[snafu(display("API error (HTTP {status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The provider does not know the requested symbol.
    #[snafu(display("Symbol not found: {symbol}"))]
    SymbolNotFound {
        symbol: String,
        backtrace: Backtrace,
    },

    /// The response body did not have the expected shape.
    #[snafu(display("Failed to decode provider response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

impl ProviderError {
    pub fn is_symbol_not_found(&self) -> bool {
        matches!(self, ProviderError::SymbolNotFound { .. })
    }
}

/// Builds the HTTP client every provider shares: default auth headers plus a
/// hard per-request timeout.
pub(crate) fn build_client(
    headers: HeaderMap,
    timeout: Duration,
) -> Result<Client, ProviderInitError> {
    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .context(ClientBuildSnafu)
}

/// Reads a non-success response into an [`ProviderError::Api`].
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| "Unknown API error".to_string());
    ApiSnafu { status, message }.build()
}
