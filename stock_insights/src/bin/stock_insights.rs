use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use stock_insights::{
    config::{InsightsConfig, NewsBackend},
    pipeline::{SnapshotPipeline, market_today},
    report::Report,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Six-week price, gap, swing and news snapshot for one stock")]
struct Cli {
    /// Stock symbol, e.g. AAPL
    symbol: String,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Swing threshold in percent (overrides config)
    #[arg(long)]
    threshold: Option<f64>,

    /// Look-back window in weeks (overrides config)
    #[arg(long)]
    lookback_weeks: Option<u32>,

    /// Skip the EMA line
    #[arg(long)]
    no_ema: bool,

    /// Skip the RSI line
    #[arg(long)]
    no_rsi: bool,

    /// News backend (overrides config)
    #[arg(long, value_enum)]
    news: Option<NewsBackend>,

    /// Treat this date as "today" (YYYY-MM-DD); the window ends the day before
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Print the snapshot as JSON instead of tables
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply_overrides(&self, cfg: &mut InsightsConfig) {
        if let Some(t) = self.threshold {
            cfg.swing_threshold_pct = t;
        }
        if let Some(w) = self.lookback_weeks {
            cfg.lookback_weeks = w;
        }
        if self.no_ema {
            cfg.indicators.ema = false;
        }
        if self.no_rsi {
            cfg.indicators.rsi = false;
        }
        if let Some(backend) = self.news {
            cfg.news.backend = backend;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env is fine; credentials may come from the real environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = InsightsConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut cfg);

    let display_rows = cfg.display_rows;
    let lookback_weeks = cfg.lookback_weeks;
    let pipeline = SnapshotPipeline::from_config(cfg)?;

    let today = cli.end_date.unwrap_or_else(market_today);
    let snapshot = pipeline.run(&cli.symbol, today).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
        println!("{json}");
    } else {
        print!(
            "{}",
            Report {
                snapshot: &snapshot,
                display_rows,
                lookback_weeks,
            }
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stock-insights").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_override_file_values() {
        let mut cfg = InsightsConfig::default();
        cfg.news.backend = NewsBackend::Alpaca;
        cfg.lookback_weeks = 4;

        let cli = parse(&["aapl", "--threshold", "3", "--no-ema", "--news", "newsapi"]);
        cli.apply_overrides(&mut cfg);

        assert_eq!(cli.symbol, "aapl");
        assert_eq!(cfg.swing_threshold_pct, 3.0);
        assert!(!cfg.indicators.ema);
        assert!(cfg.indicators.rsi);
        assert_eq!(cfg.news.backend, NewsBackend::NewsApi);
        // Not given on the command line, so the file value stays.
        assert_eq!(cfg.lookback_weeks, 4);
    }

    #[test]
    fn no_flags_leave_config_untouched() {
        let mut cfg = InsightsConfig::default();
        cfg.swing_threshold_pct = 7.5;
        let before = cfg.clone();

        parse(&["MSFT"]).apply_overrides(&mut cfg);
        assert_eq!(cfg, before);
    }

    #[test]
    fn end_date_and_output_flags_parse() {
        let cli = parse(&["TSLA", "--end-date", "2024-03-11", "--json", "--no-rsi"]);
        assert_eq!(cli.end_date, NaiveDate::from_ymd_opt(2024, 3, 11));
        assert!(cli.json);
        assert!(cli.no_rsi);

        let bad_date = ["stock-insights", "TSLA", "--end-date", "11/03/2024"];
        assert!(Cli::try_parse_from(bad_date).is_err());
        let bad_backend = ["stock-insights", "TSLA", "--news", "bloomberg"];
        assert!(Cli::try_parse_from(bad_backend).is_err());
    }
}
