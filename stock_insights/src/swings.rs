//! Day-over-day percentage change and threshold-based swing detection.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::series::Series;

/// Close-to-close change for one session.
///
/// `pct_change` is `None` when the previous close is zero: the ratio is
/// undefined and must not leak into swing detection as `inf`/`NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub date: NaiveDate,
    pub pct_change: Option<f64>,
}

impl ChangeRecord {
    pub fn is_defined(&self) -> bool {
        self.pct_change.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwingDirection {
    Up,
    Down,
}

impl fmt::Display for SwingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SwingDirection::Up => "Up",
            SwingDirection::Down => "Down",
        })
    }
}

/// A session whose absolute change strictly exceeded the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Swing {
    pub date: NaiveDate,
    pub pct_change: f64,
    pub direction: SwingDirection,
}

/// Percentage change between two closes.
///
/// Written as `delta * 100 / prev` rather than `delta / prev * 100` so that
/// round percentages (e.g. 100 -> 103) come out exact.
pub fn pct_change(prev_close: f64, close: f64) -> Option<f64> {
    if prev_close == 0.0 {
        return None;
    }
    Some((close - prev_close) * 100.0 / prev_close).filter(|v| v.is_finite())
}

/// One record per bar after the first.
pub fn compute_changes(series: &Series) -> Vec<ChangeRecord> {
    series
        .consecutive_pairs()
        .map(|(prev, cur)| {
            let pct = pct_change(prev.close, cur.close);
            if pct.is_none() {
                warn!(date = %cur.date, prev_close = prev.close, "percentage change undefined");
            }
            ChangeRecord {
                date: cur.date,
                pct_change: pct,
            }
        })
        .collect()
}

/// Changes with `|pct_change| > threshold_pct`. A change exactly at the
/// threshold is not a swing.
pub fn detect_swings(changes: &[ChangeRecord], threshold_pct: f64) -> Vec<Swing> {
    changes
        .iter()
        .filter_map(|c| {
            let pct = c.pct_change?;
            (pct.abs() > threshold_pct).then(|| Swing {
                date: c.date,
                pct_change: pct,
                direction: if pct > 0.0 {
                    SwingDirection::Up
                } else {
                    SwingDirection::Down
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use market_feeds::models::bar::Bar;
    use proptest::prelude::*;

    use super::*;

    fn closes(values: &[f64]) -> Series {
        let base = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        Series::normalize(
            values
                .iter()
                .enumerate()
                .map(|(i, c)| Bar::new(base + Days::new(i as u64), *c, *c, *c, *c)),
        )
    }

    fn swings(values: &[f64], threshold: f64) -> Vec<Swing> {
        detect_swings(&compute_changes(&closes(values)), threshold)
    }

    #[test]
    fn exactly_at_threshold_is_not_a_swing() {
        assert!(swings(&[100.0, 103.0], 3.0).is_empty());
        assert!(swings(&[100.0, 97.0], 3.0).is_empty());
    }

    #[test]
    fn just_above_threshold_is_a_swing() {
        let found = swings(&[100.0, 103.01], 3.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].direction, SwingDirection::Up);
        assert!((found[0].pct_change - 3.01).abs() < 1e-9);
    }

    #[test]
    fn zero_prior_close_is_undefined_and_skipped() {
        let changes = compute_changes(&closes(&[0.0, 50.0, 55.0]));
        assert_eq!(changes.len(), 2);
        assert!(!changes[0].is_defined());
        assert!(changes[1].is_defined());

        let found = detect_swings(&changes, 5.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, changes[1].date);
    }

    #[test]
    fn thresholds_are_configuration_not_algorithm() {
        let values = [100.0, 104.0, 99.0];
        assert_eq!(swings(&values, 3.0).len(), 2);
        assert_eq!(swings(&values, 5.0).len(), 0);
    }

    #[test]
    fn down_swing_direction() {
        let found = swings(&[200.0, 180.0], 5.0);
        assert_eq!(found[0].direction, SwingDirection::Down);
        assert_eq!(found[0].pct_change, -10.0);
    }

    proptest! {
        #[test]
        fn every_swing_strictly_exceeds_threshold(
            values in proptest::collection::vec(0.0f64..1_000.0, 0..60),
            threshold in 0.0f64..20.0,
        ) {
            let changes = compute_changes(&closes(&values));
            let found = detect_swings(&changes, threshold);
            for s in &found {
                prop_assert!(s.pct_change.abs() > threshold);
                prop_assert!(s.pct_change.is_finite());
                prop_assert_eq!(s.direction == SwingDirection::Up, s.pct_change > 0.0);
            }
            let expected = changes
                .iter()
                .filter(|c| c.pct_change.is_some_and(|p| p.abs() > threshold))
                .count();
            prop_assert_eq!(found.len(), expected);
        }
    }
}
