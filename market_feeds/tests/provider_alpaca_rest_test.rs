//! Live-network checks. Run with `cargo test -- --ignored` and credentials in
//! the environment or a `.env` file.

use std::time::Duration;

use chrono::{Days, Utc};
use market_feeds::{
    models::{
        news::NewsQuery,
        request_params::{BarsRequest, ProviderParams},
    },
    news::{NewsProvider, alpaca_news::AlpacaNewsProvider, newsapi::NewsApiProvider},
    providers::{
        DataProvider,
        alpaca_rest::{
            params::{AlpacaBarsParams, Feed, Sort},
            provider::AlpacaProvider,
        },
    },
};
use serial_test::serial;

const TIMEOUT: Duration = Duration::from_secs(10);

fn have_vars(vars: &[&str]) -> bool {
    let _ = dotenvy::dotenv();
    vars.iter().all(|v| std::env::var(v).is_ok())
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_alpaca_provider_fetch_daily_bars() {
    if !have_vars(&["APCA_API_KEY_ID", "APCA_API_SECRET_KEY"]) {
        println!("Skipping test_alpaca_provider_fetch_daily_bars: API keys not set.");
        return;
    }

    let provider = AlpacaProvider::new(TIMEOUT).expect("Failed to create AlpacaProvider");

    let today = Utc::now().date_naive();
    let mut request = BarsRequest::new("AAPL", today - Days::new(14), today - Days::new(1));
    request.provider_specific = ProviderParams::Alpaca(AlpacaBarsParams {
        feed: Some(Feed::Iex),
        sort: Some(Sort::Asc),
        ..Default::default()
    });

    let result = provider.fetch_daily_bars(request).await;
    assert!(
        result.is_ok(),
        "fetch_daily_bars returned an error: {:?}",
        result.err()
    );

    let series = result.unwrap();
    assert_eq!(series.symbol, "AAPL");
    assert!(
        !series.bars.is_empty(),
        "Expected at least one bar for AAPL"
    );
    assert!(series.bars.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_alpaca_provider_unknown_symbol_yields_no_bars_or_not_found() {
    if !have_vars(&["APCA_API_KEY_ID", "APCA_API_SECRET_KEY"]) {
        return;
    }
    let provider = AlpacaProvider::new(TIMEOUT).unwrap();
    let today = Utc::now().date_naive();
    let request = BarsRequest::new("ZZZZQX", today - Days::new(14), today);

    match provider.fetch_daily_bars(request).await {
        Ok(series) => assert!(series.bars.is_empty()),
        Err(err) => assert!(err.is_symbol_not_found(), "unexpected error: {err}"),
    }
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_news_backends_respect_cap() {
    let today = Utc::now().date_naive();
    let query = |term: &str| NewsQuery {
        query_term: term.to_string(),
        from: today - Days::new(3),
        to: today - Days::new(2),
        max_results: 3,
    };

    if have_vars(&["APCA_API_KEY_ID", "APCA_API_SECRET_KEY"]) {
        let alpaca = AlpacaNewsProvider::new(TIMEOUT).unwrap();
        let items = alpaca.search_news(&query("AAPL")).await.unwrap();
        assert!(items.len() <= 3);
    }

    if have_vars(&["NEWS_API_KEY"]) {
        let newsapi = NewsApiProvider::new(TIMEOUT).unwrap();
        let items = newsapi.search_news(&query("Apple")).await.unwrap();
        assert!(items.len() <= 3);
    }
}
