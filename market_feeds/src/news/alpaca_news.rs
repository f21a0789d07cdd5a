//! Ticker-aware financial news backend (Alpaca `/v1beta1/news`).
//!
//! The query term is sent as a symbol filter, so this backend only makes sense
//! with ticker query terms.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::news::{NewsItem, NewsQuery},
    news::{NewsProvider, validate_query},
    providers::{
        DecodeSnafu, ProviderError, ProviderInitError, ReqwestSnafu, alpaca_rest::AlpacaCredentials,
        alpaca_rest::params::date_to_rfc3339, api_error, build_client,
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v1beta1/news";

/// Largest `limit` the endpoint accepts.
const MAX_LIMIT: usize = 50;

pub struct AlpacaNewsProvider {
    client: Client,
}

impl AlpacaNewsProvider {
    pub fn new(timeout: Duration) -> Result<Self, ProviderInitError> {
        Self::with_credentials(&AlpacaCredentials::from_env()?, timeout)
    }

    pub fn with_credentials(
        credentials: &AlpacaCredentials,
        timeout: Duration,
    ) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client: build_client(credentials.headers()?, timeout)?,
        })
    }
}

/// `end` is exclusive on the wire, so the inclusive `to` date becomes the
/// following midnight.
pub(crate) fn construct_params(query: &NewsQuery) -> Vec<(&'static str, String)> {
    let end = query.to.succ_opt().unwrap_or(query.to);
    vec![
        ("symbols", query.query_term.trim().to_uppercase()),
        ("start", date_to_rfc3339(query.from)),
        ("end", date_to_rfc3339(end)),
        ("limit", query.max_results.min(MAX_LIMIT).to_string()),
        ("sort", "desc".to_string()),
    ]
}

#[derive(Deserialize, Debug)]
pub(crate) struct NewsResponse {
    #[serde(default)]
    pub news: Vec<AlpacaArticle>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AlpacaArticle {
    pub headline: String,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

pub(crate) fn into_items(response: NewsResponse, max_results: usize) -> Vec<NewsItem> {
    response
        .news
        .into_iter()
        .filter(|a| !a.headline.trim().is_empty())
        .filter_map(|a| {
            let url = a.url.filter(|u| !u.trim().is_empty())?;
            Some(NewsItem {
                title: a.headline,
                url,
                published_at: a.created_at,
            })
        })
        .take(max_results)
        .collect()
}

#[async_trait]
impl NewsProvider for AlpacaNewsProvider {
    fn name(&self) -> &'static str {
        "alpaca"
    }

    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, ProviderError> {
        validate_query(query)?;
        debug!(term = %query.query_term, from = %query.from, to = %query.to, "alpaca news search");

        let response = self
            .client
            .get(BASE_URL)
            .query(&construct_params(query))
            .send()
            .await
            .context(ReqwestSnafu)?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await.context(ReqwestSnafu)?;
        let parsed: NewsResponse = serde_json::from_str(&body).context(DecodeSnafu)?;
        Ok(into_items(parsed, query.max_results))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn window_end_is_exclusive_midnight_after_to() {
        let q = NewsQuery {
            query_term: "tsla".into(),
            from: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            max_results: 5,
        };
        let params = construct_params(&q);
        assert!(params.contains(&("symbols", "TSLA".to_string())));
        assert!(params.contains(&("start", "2024-02-28T00:00:00Z".to_string())));
        assert!(params.contains(&("end", "2024-03-01T00:00:00Z".to_string())));
        assert!(params.contains(&("limit", "5".to_string())));
    }

    #[test]
    fn articles_without_headline_or_link_are_skipped_before_capping() {
        let body = r#"{
            "news": [
                {"id": 1, "headline": "Tesla recalls vehicles", "url": "https://example.com/1", "created_at": "2024-02-28T13:00:00Z", "symbols": ["TSLA"], "source": "benzinga"},
                {"id": 2, "headline": "", "url": "https://example.com/2", "created_at": "2024-02-28T12:00:00Z"},
                {"id": 3, "headline": "Tesla rebounds", "url": "", "created_at": "2024-02-28T11:00:00Z"},
                {"id": 4, "headline": "Another", "created_at": "2024-02-28T10:00:00Z"},
                {"id": 5, "headline": "Tesla closes higher", "url": "https://example.com/5", "created_at": null},
                {"id": 6, "headline": "Over the cap", "url": "https://example.com/6", "created_at": null}
            ],
            "next_page_token": null
        }"#;
        let parsed: NewsResponse = serde_json::from_str(body).unwrap();
        let items = into_items(parsed, 2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Tesla recalls vehicles");
        assert_eq!(items[1].title, "Tesla closes higher");
        assert_eq!(items[1].url, "https://example.com/5");
        assert!(items.iter().all(|i| !i.url.is_empty()));
    }
}
