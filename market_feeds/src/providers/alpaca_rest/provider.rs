use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::{Client, StatusCode};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{
        bar::{Bar, BarSeries},
        request_params::BarsRequest,
    },
    providers::{
        DataProvider, DecodeSnafu, ProviderError, ProviderInitError, ReqwestSnafu,
        SymbolNotFoundSnafu, api_error,
        alpaca_rest::{
            AlpacaCredentials,
            params::{AlpacaBarsParams, alpaca_params, construct_params, validate_request},
            response::{AlpacaBar, AlpacaResponse},
        },
        build_client,
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";

pub struct AlpacaProvider {
    client: Client,
    defaults: AlpacaBarsParams,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider from `APCA_API_KEY_ID` / `APCA_API_SECRET_KEY`.
    pub fn new(timeout: Duration) -> Result<Self, ProviderInitError> {
        Self::with_credentials(&AlpacaCredentials::from_env()?, timeout)
    }

    pub fn with_credentials(
        credentials: &AlpacaCredentials,
        timeout: Duration,
    ) -> Result<Self, ProviderInitError> {
        let client = build_client(credentials.headers()?, timeout)?;
        Ok(Self {
            client,
            defaults: AlpacaBarsParams::default(),
        })
    }

    /// Parameters used for requests that carry no Alpaca-specific overrides.
    pub fn with_defaults(mut self, defaults: AlpacaBarsParams) -> Self {
        self.defaults = defaults;
        self
    }
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    async fn fetch_daily_bars(&self, request: BarsRequest) -> Result<BarSeries, ProviderError> {
        validate_request(&request)?;
        let extra = alpaca_params(&request, &self.defaults);

        let mut all_bars: IndexMap<String, Vec<AlpacaBar>> = IndexMap::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let mut query_params = construct_params(&request);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            debug!(symbol = %request.symbol, page = ?next_page_token, "requesting alpaca bars");
            let response = self
                .client
                .get(BASE_URL)
                .query(&query_params)
                .query(&extra)
                .send()
                .await
                .context(ReqwestSnafu)?;

            match response.status() {
                s if s.is_success() => {}
                StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                    return SymbolNotFoundSnafu {
                        symbol: request.symbol.clone(),
                    }
                    .fail();
                }
                _ => return Err(api_error(response).await),
            }

            let body = response.text().await.context(ReqwestSnafu)?;
            let page: AlpacaResponse = serde_json::from_str(&body).context(DecodeSnafu)?;

            // Merge the bars from the current page into our collection.
            for (symbol, bars) in page.bars.unwrap_or_default() {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            match page.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        let bars: Vec<Bar> = all_bars
            .swap_remove(&request.symbol)
            .unwrap_or_default()
            .into_iter()
            .map(Bar::from)
            .collect();
        debug!(symbol = %request.symbol, count = bars.len(), "alpaca bars received");

        Ok(BarSeries {
            symbol: request.symbol,
            bars,
        })
    }
}
