#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use market_feeds::{
    models::{
        bar::{Bar, BarSeries},
        news::{NewsItem, NewsQuery},
        request_params::BarsRequest,
    },
    news::NewsProvider,
    providers::{ApiSnafu, DataProvider, ProviderError, SymbolNotFoundSnafu},
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Flat bars (open = high = low = close) on consecutive calendar days.
pub fn bars_from_closes(start: NaiveDate, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| Bar::new(start + Days::new(i as u64), *c, *c, *c, *c))
        .collect()
}

pub enum MarketBehavior {
    Bars(Vec<Bar>),
    NotFound,
    Down,
}

pub struct FakeMarket {
    pub behavior: MarketBehavior,
    pub requests: Arc<Mutex<Vec<BarsRequest>>>,
}

impl FakeMarket {
    pub fn new(behavior: MarketBehavior) -> (Self, Arc<Mutex<Vec<BarsRequest>>>) {
        let requests = Arc::new(Mutex::new(vec![]));
        (
            Self {
                behavior,
                requests: Arc::clone(&requests),
            },
            requests,
        )
    }
}

#[async_trait]
impl DataProvider for FakeMarket {
    async fn fetch_daily_bars(&self, request: BarsRequest) -> Result<BarSeries, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.behavior {
            MarketBehavior::Bars(bars) => Ok(BarSeries {
                symbol: request.symbol,
                bars: bars.clone(),
            }),
            MarketBehavior::NotFound => SymbolNotFoundSnafu {
                symbol: request.symbol,
            }
            .fail(),
            MarketBehavior::Down => ApiSnafu {
                status: 502u16,
                message: "bad gateway",
            }
            .fail(),
        }
    }
}

/// Returns `per_query` numbered headlines, or fails for windows starting on `fail_on`.
pub struct FakeNews {
    pub per_query: usize,
    pub fail_on: Option<NaiveDate>,
    pub queries: Arc<Mutex<Vec<NewsQuery>>>,
}

impl FakeNews {
    pub fn new(per_query: usize, fail_on: Option<NaiveDate>) -> (Self, Arc<Mutex<Vec<NewsQuery>>>) {
        let queries = Arc::new(Mutex::new(vec![]));
        (
            Self {
                per_query,
                fail_on,
                queries: Arc::clone(&queries),
            },
            queries,
        )
    }
}

#[async_trait]
impl NewsProvider for FakeNews {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, ProviderError> {
        self.queries.lock().unwrap().push(query.clone());
        if Some(query.from) == self.fail_on {
            return ApiSnafu {
                status: 429u16,
                message: "rate limited",
            }
            .fail();
        }
        Ok((0..self.per_query)
            .map(|i| NewsItem {
                title: format!("{} headline {i} on {}", query.query_term, query.from),
                url: format!("https://news.example/{}/{i}", query.from),
                published_at: None,
            })
            .collect())
    }
}
