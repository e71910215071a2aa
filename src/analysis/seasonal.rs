//! Seasonal Normalizer: per-calendar-year cumulative-return curves.
//!
//! Each year's closes are re-based to that year's first trading day, giving
//! the cumulative fractional change `close / first_close - 1` indexed by
//! day-of-year slot. Slots with no trading activity stay None — absence is
//! meaningful and is never back-filled, interpolated, or smoothed. Curves
//! are ephemeral: recomputed per request, never persisted.

use std::collections::BTreeMap;

use chrono::Datelike;
use itertools::Itertools;

use crate::config::DAY_SLOTS;
use crate::domain::{day_slot, PricePoint, PriceSeries};

/// One calendar year's normalized curve: always DAY_SLOTS entries,
/// None where that day had no trading activity.
pub type YearCurve = Vec<Option<f64>>;

/// Output of normalization, split at the cutoff year.
/// Historical years feed the window averages; the target year (the cutoff
/// itself) is returned separately and never averaged.
#[derive(Debug, Default)]
pub struct NormalizedYears {
    pub historical: BTreeMap<i32, YearCurve>,
    pub target: Option<YearCurve>,
}

/// Build normalized curves for every year before `cutoff_year`, plus the
/// cutoff year's own curve if it has points. Years with zero trading days or
/// an unusable first close are excluded entirely.
pub fn normalize(series: &PriceSeries, cutoff_year: i32) -> NormalizedYears {
    let by_year = series
        .points
        .iter()
        .filter(|p| p.date.year() <= cutoff_year)
        .map(|p| (p.date.year(), p))
        .into_group_map();

    let mut result = NormalizedYears::default();
    for (year, points) in by_year {
        let Some(curve) = year_curve(&points) else {
            continue;
        };
        if year == cutoff_year {
            result.target = Some(curve);
        } else {
            result.historical.insert(year, curve);
        }
    }
    result
}

/// Re-base one year's points to its first trading day.
/// Returns None when the year cannot anchor (no points, or a zero/non-finite
/// first close).
fn year_curve(points: &[&PricePoint]) -> Option<YearCurve> {
    let first = points.iter().min_by_key(|p| p.date)?;
    if first.close == 0.0 || !first.close.is_finite() {
        return None;
    }
    let first_close = first.close;

    let mut curve: YearCurve = vec![None; DAY_SLOTS];
    for point in points {
        let slot = day_slot(point.date) - 1;
        // First write wins: Feb 29 folds onto Feb 28's slot without displacing it
        if curve[slot].is_none() {
            curve[slot] = Some(point.close / first_close - 1.0);
        }
    }
    Some(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    fn series(points: Vec<PricePoint>) -> PriceSeries {
        PriceSeries::new(points)
    }

    #[test]
    fn test_anchor_day_is_exactly_zero() {
        // Closes chosen so the ratios are exact in f64
        let s = series(vec![
            point("2022-01-01", 100.0),
            point("2022-01-02", 125.0),
            point("2022-01-03", 75.0),
        ]);
        let normalized = normalize(&s, 2023);
        let curve = &normalized.historical[&2022];
        assert_eq!(curve.len(), DAY_SLOTS);
        assert_eq!(curve[0], Some(0.0));
        assert_eq!(curve[1], Some(0.25));
        assert_eq!(curve[2], Some(-0.25));
        assert_eq!(curve[3], None);
    }

    #[test]
    fn test_anchor_is_first_trading_day_not_jan_1() {
        // Markets closed Jan 1; the Jan 3 close anchors the year
        let s = series(vec![point("2022-01-03", 50.0), point("2022-01-04", 75.0)]);
        let normalized = normalize(&s, 2023);
        let curve = &normalized.historical[&2022];
        assert_eq!(curve[0], None);
        assert_eq!(curve[1], None);
        assert_eq!(curve[2], Some(0.0));
        assert_eq!(curve[3], Some(0.5));
    }

    #[test]
    fn test_target_year_split_from_historical() {
        let s = series(vec![
            point("2022-06-01", 10.0),
            point("2023-06-01", 20.0),
            point("2024-06-01", 30.0),
        ]);
        let normalized = normalize(&s, 2023);
        assert!(normalized.historical.contains_key(&2022));
        assert!(normalized.target.is_some());
        // 2024 is after the cutoff and must not appear anywhere
        assert!(!normalized.historical.contains_key(&2024));
    }

    #[test]
    fn test_zero_first_close_excludes_year() {
        let s = series(vec![
            point("2021-01-04", 0.0),
            point("2021-01-05", 5.0),
            point("2022-01-03", 100.0),
        ]);
        let normalized = normalize(&s, 2023);
        assert!(!normalized.historical.contains_key(&2021));
        assert!(normalized.historical.contains_key(&2022));
    }

    #[test]
    fn test_feb_29_does_not_displace_feb_28() {
        let s = series(vec![
            point("2024-01-01", 100.0),
            point("2024-02-28", 125.0),
            point("2024-02-29", 150.0),
            point("2024-03-01", 175.0),
        ]);
        let normalized = normalize(&s, 2025);
        let curve = &normalized.historical[&2024];
        let feb_28 = day_slot(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()) - 1;
        let mar_1 = day_slot(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()) - 1;
        // Feb 29's 0.5 must not overwrite Feb 28's 0.25 in the shared slot
        assert_eq!(curve[feb_28], Some(0.25));
        assert_eq!(curve[mar_1], Some(0.75));
    }
}
