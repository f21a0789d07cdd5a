//! Plain-text rendering of a [`Snapshot`] for the terminal.

use std::fmt;

use tabled::{Table, Tabled};

use crate::{correlation::Headlines, indicators::IndicatorLine, pipeline::Snapshot};

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    close: String,
}

#[derive(Tabled)]
struct GapRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Gap")]
    gap: String,
    #[tabled(rename = "Direction")]
    direction: String,
}

#[derive(Tabled)]
struct SwingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "% Change")]
    pct_change: String,
    #[tabled(rename = "Direction")]
    direction: String,
}

fn money(v: f64) -> String {
    format!("{v:.2}")
}

/// Text report over a snapshot. Prices are rounded to cents for display only.
pub struct Report<'a> {
    pub snapshot: &'a Snapshot,
    /// Most recent bars shown in the price table.
    pub display_rows: usize,
    pub lookback_weeks: u32,
}

impl Report<'_> {
    fn write_headlines(f: &mut fmt::Formatter<'_>, headlines: &Headlines) -> fmt::Result {
        match headlines {
            Headlines::Fetched { items } if items.is_empty() => {
                writeln!(f, "  (no headlines for this date)")
            }
            Headlines::Fetched { items } => {
                for item in items {
                    match item.published_at {
                        Some(ts) => writeln!(
                            f,
                            "  - [{}] {} <{}>",
                            ts.format("%Y-%m-%d %H:%M"),
                            item.title,
                            item.url
                        )?,
                        None => writeln!(f, "  - {} <{}>", item.title, item.url)?,
                    }
                }
                Ok(())
            }
            Headlines::Unavailable { reason } => {
                writeln!(f, "  (no headlines for this date: {reason})")
            }
            Headlines::Disabled => Ok(()),
        }
    }

    fn write_indicator(
        f: &mut fmt::Formatter<'_>,
        name: &str,
        line: &IndicatorLine,
    ) -> fmt::Result {
        match line.latest() {
            Some(v) => writeln!(f, "{name}({}): {}", line.period, money(v)),
            None => writeln!(f, "{name}({}): not enough history", line.period),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        let weeks = self.lookback_weeks;
        let threshold = s.swing_threshold_pct;

        writeln!(
            f,
            "Stock Insights for {} ({} to {})",
            s.symbol,
            s.range.start(),
            s.range.end()
        )?;
        writeln!(f)?;

        writeln!(f, "Daily Price (Last {weeks} Weeks)")?;
        let prices = s.series.tail(self.display_rows).iter().map(|b| PriceRow {
            date: b.date.to_string(),
            open: money(b.open),
            high: money(b.high),
            low: money(b.low),
            close: money(b.close),
        });
        writeln!(f, "{}", Table::new(prices))?;
        writeln!(f)?;

        if !s.gaps.is_empty() {
            writeln!(f, "Opening Gaps")?;
            let gaps = s.gaps.iter().map(|g| GapRow {
                date: g.date.to_string(),
                gap: money(g.gap),
                direction: g.direction.to_string(),
            });
            writeln!(f, "{}", Table::new(gaps))?;
            writeln!(f)?;
        }

        writeln!(f, "Volatility & Events")?;
        if s.swings.is_empty() {
            writeln!(
                f,
                "No major price swings (>{threshold}%) in the last {weeks} weeks."
            )?;
        } else {
            writeln!(f, "Significant Price Swings (>{threshold}%)")?;
            let rows = s.swings.iter().map(|c| SwingRow {
                date: c.swing.date.to_string(),
                pct_change: money(c.swing.pct_change),
                direction: c.swing.direction.to_string(),
            });
            writeln!(f, "{}", Table::new(rows))?;

            let news_enabled = s
                .swings
                .iter()
                .any(|c| !matches!(c.headlines, Headlines::Disabled));
            writeln!(f)?;
            writeln!(f, "Potential Reasons")?;
            if news_enabled {
                for c in &s.swings {
                    writeln!(f, "{} to {}:", c.query.from, c.query.to)?;
                    Self::write_headlines(f, &c.headlines)?;
                }
            } else {
                writeln!(
                    f,
                    "News headlines are not configured. Check financial news on these dates for context such as earnings or analyst changes."
                )?;
            }
        }

        if let Some(ind) = &s.indicators {
            writeln!(f)?;
            writeln!(f, "Indicators (latest)")?;
            if let Some(line) = &ind.ema {
                Self::write_indicator(f, "EMA", line)?;
            }
            if let Some(line) = &ind.rsi {
                Self::write_indicator(f, "RSI", line)?;
            }
        }

        if let Some(today) = &s.today_headlines {
            writeln!(f)?;
            writeln!(f, "Live Headlines ({})", today.query.from)?;
            Self::write_headlines(f, &today.headlines)?;
        }

        Ok(())
    }
}
