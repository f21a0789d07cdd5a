//! News capability: one interface over interchangeable headline backends.
//!
//! Backends differ only in transport (endpoint, parameter names, auth scheme).
//! Callers hold a `Box<dyn NewsProvider>` and never branch on which one it is.

pub mod alpaca_news;
pub mod newsapi;

use async_trait::async_trait;
use snafu::ensure;

use crate::{
    models::news::{NewsItem, NewsQuery},
    providers::{ProviderError, ValidationSnafu},
};

#[async_trait]
pub trait NewsProvider {
    /// Short backend identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns at most `query.max_results` items, in the backend's own
    /// relevance or recency order.
    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, ProviderError>;
}

pub(crate) fn validate_query(query: &NewsQuery) -> Result<(), ProviderError> {
    ensure!(
        !query.query_term.trim().is_empty(),
        ValidationSnafu {
            message: "news query term must not be empty"
        }
    );
    ensure!(
        query.max_results > 0,
        ValidationSnafu {
            message: "max_results must be at least 1"
        }
    );
    ensure!(
        query.from <= query.to,
        ValidationSnafu {
            message: format!("news window {}..{} is inverted", query.from, query.to)
        }
    );
    Ok(())
}
