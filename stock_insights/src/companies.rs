//! Ticker to company name lookup, used when news is searched by name.

use std::collections::BTreeMap;

const BUILTIN: &[(&str, &str)] = &[
    ("AAPL", "Apple"),
    ("AMD", "Advanced Micro Devices"),
    ("AMZN", "Amazon"),
    ("GOOG", "Alphabet"),
    ("GOOGL", "Alphabet"),
    ("INTC", "Intel"),
    ("JPM", "JPMorgan Chase"),
    ("META", "Meta Platforms"),
    ("MSFT", "Microsoft"),
    ("NFLX", "Netflix"),
    ("NVDA", "Nvidia"),
    ("TSLA", "Tesla"),
];

#[derive(Debug, Clone)]
pub struct CompanyDirectory {
    names: BTreeMap<String, String>,
}

impl Default for CompanyDirectory {
    fn default() -> Self {
        Self {
            names: BUILTIN
                .iter()
                .map(|(t, n)| (t.to_string(), n.to_string()))
                .collect(),
        }
    }
}

impl CompanyDirectory {
    /// Built-in table extended (and overridden) by `extra`. Tickers are
    /// upper-cased.
    pub fn with_overrides<'a>(extra: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let mut dir = Self::default();
        for (ticker, name) in extra {
            dir.names
                .insert(ticker.trim().to_uppercase(), name.trim().to_string());
        }
        dir
    }

    pub fn name_for(&self, ticker: &str) -> Option<&str> {
        self.names.get(ticker).map(String::as_str)
    }
}
