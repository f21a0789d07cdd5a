//! Opening gaps versus the previous close.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::series::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapDirection {
    Up,
    Down,
    Flat,
}

impl GapDirection {
    pub fn of(gap: f64) -> Self {
        if gap > 0.0 {
            GapDirection::Up
        } else if gap < 0.0 {
            GapDirection::Down
        } else {
            GapDirection::Flat
        }
    }
}

impl fmt::Display for GapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GapDirection::Up => "Up",
            GapDirection::Down => "Down",
            GapDirection::Flat => "Flat",
        })
    }
}

/// `open(t) - close(t-1)` for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapRecord {
    pub date: NaiveDate,
    pub gap: f64,
    pub direction: GapDirection,
}

/// One record per bar after the first; the first bar has no prior close.
pub fn compute_gaps(series: &Series) -> Vec<GapRecord> {
    series
        .consecutive_pairs()
        .map(|(prev, cur)| {
            let gap = cur.open - prev.close;
            GapRecord {
                date: cur.date,
                gap,
                direction: GapDirection::of(gap),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use market_feeds::models::bar::Bar;
    use proptest::prelude::*;

    use super::*;

    fn series(ohlc: &[(f64, f64)]) -> Series {
        let base = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        Series::normalize(ohlc.iter().enumerate().map(|(i, (open, close))| {
            Bar::new(
                base + Days::new(i as u64),
                *open,
                open.max(*close),
                open.min(*close),
                *close,
            )
        }))
    }

    #[test]
    fn classifies_each_direction() {
        let input = series(&[(10.0, 11.0), (12.0, 12.5), (12.0, 12.0), (12.0, 13.0)]);
        let gaps = compute_gaps(&input);
        assert_eq!(gaps.len(), 3);
        assert_eq!(gaps[0].gap, 1.0);
        assert_eq!(gaps[0].direction, GapDirection::Up);
        assert_eq!(gaps[1].gap, -0.5);
        assert_eq!(gaps[1].direction, GapDirection::Down);
        assert_eq!(gaps[2].gap, 0.0);
        assert_eq!(gaps[2].direction, GapDirection::Flat);
        assert_eq!(gaps[0].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn zero_prior_close_is_plain_arithmetic() {
        let gaps = compute_gaps(&series(&[(1.0, 0.0), (2.5, 3.0)]));
        assert_eq!(gaps[0].gap, 2.5);
        assert_eq!(gaps[0].direction, GapDirection::Up);
    }

    #[test]
    fn short_series_have_no_gaps() {
        assert!(compute_gaps(&Series::default()).is_empty());
        assert!(compute_gaps(&series(&[(1.0, 2.0)])).is_empty());
    }

    proptest! {
        #[test]
        fn one_gap_per_bar_after_first_and_sign_matches(
            ohlc in proptest::collection::vec((0.0f64..500.0, 0.0f64..500.0), 2..50),
        ) {
            let s = series(&ohlc);
            let gaps = compute_gaps(&s);
            prop_assert_eq!(gaps.len(), s.len() - 1);
            for g in gaps {
                let expected = if g.gap > 0.0 {
                    GapDirection::Up
                } else if g.gap < 0.0 {
                    GapDirection::Down
                } else {
                    GapDirection::Flat
                };
                prop_assert_eq!(g.direction, expected);
            }
        }
    }
}
