use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::{
    models::request_params::{BarsRequest, ProviderParams},
    providers::{ProviderError, ValidationSnafu},
};

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

/// Specifies the source feed for stock data.
///
/// Free-tier keys can only query `iex`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    #[default]
    Iex,
    Sip,
    Otc,
}

/// Specifies the sort order for the bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

/// Alpaca-specific parameters for a bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

/// Alpaca expects RFC 3339 instants; a date means midnight UTC, which sits
/// before the 04:00Z/05:00Z stamp of that day's bar.
pub(crate) fn date_to_rfc3339(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn validate_request(request: &BarsRequest) -> Result<(), ProviderError> {
    ensure!(
        !request.symbol.trim().is_empty(),
        ValidationSnafu {
            message: "symbol must not be empty"
        }
    );
    ensure!(
        request.start < request.end,
        ValidationSnafu {
            message: format!(
                "start ({}) must be before end ({})",
                request.start, request.end
            )
        }
    );
    Ok(())
}

/// Universal query parameters for `/v2/stocks/bars`.
///
/// Provider-specific knobs are appended separately by serializing
/// [`AlpacaBarsParams`] as a second query set.
pub fn construct_params(request: &BarsRequest) -> Vec<(String, String)> {
    vec![
        ("symbols".to_string(), request.symbol.clone()),
        ("timeframe".to_string(), "1Day".to_string()),
        ("start".to_string(), date_to_rfc3339(request.start)),
        ("end".to_string(), date_to_rfc3339(request.end)),
    ]
}

/// The Alpaca parameters for a request: the request's own, or the defaults.
pub fn alpaca_params(request: &BarsRequest, defaults: &AlpacaBarsParams) -> AlpacaBarsParams {
    match &request.provider_specific {
        ProviderParams::Alpaca(p) => p.clone(),
        ProviderParams::None => defaults.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn params_encode_daily_window() {
        let req = BarsRequest::new("MSFT", d(2024, 1, 22), d(2024, 3, 4));
        let params = construct_params(&req);
        assert_eq!(
            params,
            vec![
                ("symbols".to_string(), "MSFT".to_string()),
                ("timeframe".to_string(), "1Day".to_string()),
                ("start".to_string(), "2024-01-22T00:00:00Z".to_string()),
                ("end".to_string(), "2024-03-04T00:00:00Z".to_string()),
            ]
        );
    }

    #[test]
    fn inverted_or_empty_range_is_rejected() {
        let req = BarsRequest::new("MSFT", d(2024, 3, 4), d(2024, 3, 4));
        let err = validate_request(&req).unwrap_err();
        assert!(err.to_string().contains("must be before end"));

        let blank = BarsRequest::new("  ", d(2024, 3, 1), d(2024, 3, 4));
        assert!(validate_request(&blank).is_err());
    }

    #[test]
    fn request_params_override_defaults() {
        let defaults = AlpacaBarsParams {
            feed: Some(Feed::Iex),
            ..Default::default()
        };
        let mut req = BarsRequest::new("MSFT", d(2024, 3, 1), d(2024, 3, 4));
        assert_eq!(alpaca_params(&req, &defaults), defaults);

        req.provider_specific = ProviderParams::Alpaca(AlpacaBarsParams {
            feed: Some(Feed::Sip),
            ..Default::default()
        });
        assert_eq!(alpaca_params(&req, &defaults).feed, Some(Feed::Sip));
    }

    #[test]
    fn unset_options_are_not_serialized() {
        let p = AlpacaBarsParams {
            adjustment: Some(Adjustment::Split),
            ..Default::default()
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json, serde_json::json!({ "adjustment": "split" }));
    }
}
