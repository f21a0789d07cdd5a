//! Generic article search backend (newsapi.org `/v2/everything`).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    Client,
    header::{self, HeaderMap},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::news::{NewsItem, NewsQuery},
    news::{NewsProvider, validate_query},
    providers::{
        ApiSnafu, DecodeSnafu, InvalidApiKeySnafu, MissingEnvVarSnafu, ProviderError,
        ProviderInitError, ReqwestSnafu, api_error, build_client,
    },
};

const BASE_URL: &str = "https://newsapi.org/v2/everything";
pub const API_KEY_VAR: &str = "NEWS_API_KEY";

/// The API refuses page sizes above this.
const MAX_PAGE_SIZE: usize = 100;

/// Title the API substitutes for articles taken down after indexing.
const REMOVED_TITLE: &str = "[Removed]";

pub struct NewsApiProvider {
    client: Client,
}

impl NewsApiProvider {
    /// Reads the key from `NEWS_API_KEY`.
    pub fn new(timeout: Duration) -> Result<Self, ProviderInitError> {
        let api_key = get_env_var(API_KEY_VAR).context(MissingEnvVarSnafu)?;
        Self::with_api_key(api_key, timeout)
    }

    pub fn with_api_key(
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderInitError> {
        let api_key = SecretString::from(api_key.into());

        let mut value = header::HeaderValue::from_str(api_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", value);

        Ok(Self {
            client: build_client(headers, timeout)?,
        })
    }
}

pub(crate) fn construct_params(query: &NewsQuery) -> Vec<(&'static str, String)> {
    vec![
        ("q", query.query_term.clone()),
        ("from", query.from.format("%Y-%m-%d").to_string()),
        ("to", query.to.format("%Y-%m-%d").to_string()),
        ("pageSize", query.max_results.min(MAX_PAGE_SIZE).to_string()),
        ("sortBy", "relevancy".to_string()),
        ("language", "en".to_string()),
    ]
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EverythingResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Article {
    pub title: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

pub(crate) fn into_items(
    response: EverythingResponse,
    max_results: usize,
) -> Result<Vec<NewsItem>, ProviderError> {
    if response.status != "ok" {
        return ApiSnafu {
            status: 200u16,
            message: response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        }
        .fail();
    }

    Ok(response
        .articles
        .into_iter()
        .filter_map(|a| {
            let title = a.title.filter(|t| !t.trim().is_empty() && t != REMOVED_TITLE)?;
            let url = a.url.filter(|u| !u.trim().is_empty())?;
            Some(NewsItem {
                title,
                url,
                published_at: a.published_at,
            })
        })
        .take(max_results)
        .collect())
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, ProviderError> {
        validate_query(query)?;
        debug!(term = %query.query_term, from = %query.from, to = %query.to, "newsapi search");

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
        let parsed: EverythingResponse = serde_json::from_str(&body).context(DecodeSnafu)?;
        into_items(parsed, query.max_results)
    }
}
