//! COT Metrics Calculator: nets and period-over-period deltas over a
//! trailing window.
//!
//! Raw/derived weekly values only — no smoothing, no seasonal adjustment.
//! The window is anchored at the most recent stored report date (not at
//! wall-clock now), so the calculation stays a pure function of the series.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};

use crate::domain::CotSeries;

/// Index-aligned metric arrays over the reports inside the window.
/// The first report in the window has no prior reference, so its change
/// fields are None.
#[derive(Debug, Clone, Default)]
pub struct CotMetrics {
    pub dates: Vec<NaiveDate>,
    pub open_interest: Vec<i64>,
    pub noncomm_net: Vec<i64>,
    pub comm_net: Vec<i64>,
    pub noncomm_long: Vec<i64>,
    pub noncomm_short: Vec<i64>,
    pub comm_long: Vec<i64>,
    pub comm_short: Vec<i64>,
    pub noncomm_net_change: Vec<Option<i64>>,
    pub comm_net_change: Vec<Option<i64>>,
    pub oi_change: Vec<Option<i64>>,
}

/// Derive metrics for the reports within `window_years` calendar years of the
/// newest report. Fails with a descriptive message (never a panic) on an
/// empty series or an empty window.
pub fn compute_metrics(series: &CotSeries, window_years: u32) -> Result<CotMetrics> {
    let Some(newest) = series.last_date() else {
        bail!("No COT data in store. Please fetch data first.");
    };

    let window_start = years_back(newest, window_years as i32);
    let in_window: Vec<_> = series
        .reports
        .iter()
        .filter(|r| r.date >= window_start)
        .collect();

    if in_window.is_empty() {
        bail!("No data available for the last {} year(s)", window_years);
    }

    let mut metrics = CotMetrics::default();
    let mut prev: Option<(i64, i64, i64)> = None; // (noncomm_net, comm_net, oi)

    for report in in_window {
        let noncomm_net = report.noncomm_net();
        let comm_net = report.comm_net();

        metrics.dates.push(report.date);
        metrics.open_interest.push(report.open_interest);
        metrics.noncomm_net.push(noncomm_net);
        metrics.comm_net.push(comm_net);
        metrics.noncomm_long.push(report.noncomm_long);
        metrics.noncomm_short.push(report.noncomm_short);
        metrics.comm_long.push(report.comm_long);
        metrics.comm_short.push(report.comm_short);

        match prev {
            Some((p_noncomm, p_comm, p_oi)) => {
                metrics.noncomm_net_change.push(Some(noncomm_net - p_noncomm));
                metrics.comm_net_change.push(Some(comm_net - p_comm));
                metrics.oi_change.push(Some(report.open_interest - p_oi));
            }
            None => {
                metrics.noncomm_net_change.push(None);
                metrics.comm_net_change.push(None);
                metrics.oi_change.push(None);
            }
        }
        prev = Some((noncomm_net, comm_net, report.open_interest));
    }

    Ok(metrics)
}

fn years_back(date: NaiveDate, years: i32) -> NaiveDate {
    date.with_year(date.year() - years).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(date.year() - years, 3, 1).expect("Mar 1 exists in every year")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CotReport;

    fn report(date: &str, noncomm_net: i64, oi: i64) -> CotReport {
        CotReport {
            date: date.parse().unwrap(),
            open_interest: oi,
            noncomm_long: 200_000 + noncomm_net,
            noncomm_short: 200_000,
            comm_long: 90_000,
            comm_short: 100_000,
        }
    }

    #[test]
    fn test_delta_correctness() {
        let series = CotSeries::new(vec![
            report("2024-05-21", 100, 400_000),
            report("2024-05-28", 150, 410_000),
            report("2024-06-04", 120, 405_000),
        ]);

        let metrics = compute_metrics(&series, 1).unwrap();
        assert_eq!(metrics.noncomm_net, vec![100, 150, 120]);
        assert_eq!(metrics.noncomm_net_change, vec![None, Some(50), Some(-30)]);
        assert_eq!(metrics.oi_change, vec![None, Some(10_000), Some(-5_000)]);
        // Commercial nets are constant here, so every delta after the first is zero
        assert_eq!(metrics.comm_net_change, vec![None, Some(0), Some(0)]);
    }

    #[test]
    fn test_window_anchors_on_newest_report() {
        let series = CotSeries::new(vec![
            report("2021-06-01", 10, 100),
            report("2023-06-06", 20, 200),
            report("2024-06-04", 30, 300),
        ]);

        // One year back from 2024-06-04 is 2023-06-04: the 2021 report falls
        // out, 2023-06-06 stays in
        let metrics = compute_metrics(&series, 1).unwrap();
        assert_eq!(metrics.dates.len(), 2);
        assert_eq!(metrics.noncomm_net, vec![20, 30]);
        // First report inside the window carries no change values
        assert_eq!(metrics.noncomm_net_change[0], None);
    }

    #[test]
    fn test_empty_series_is_descriptive_failure() {
        let err = compute_metrics(&CotSeries::default(), 1).unwrap_err();
        assert!(err.to_string().contains("No COT data"));
    }

    #[test]
    fn test_arrays_stay_index_aligned() {
        let series = CotSeries::new(vec![
            report("2024-05-28", 150, 410_000),
            report("2024-06-04", 120, 405_000),
        ]);
        let m = compute_metrics(&series, 2).unwrap();
        let n = m.dates.len();
        assert!(
            [
                m.open_interest.len(),
                m.noncomm_net.len(),
                m.comm_net.len(),
                m.noncomm_long.len(),
                m.noncomm_short.len(),
                m.comm_long.len(),
                m.comm_short.len(),
                m.noncomm_net_change.len(),
                m.comm_net_change.len(),
                m.oi_change.len(),
            ]
            .iter()
            .all(|&len| len == n)
        );
    }
}
