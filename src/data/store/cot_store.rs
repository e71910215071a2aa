//! COT Store: append-only weekly positioning reports for one asset.
//!
//! Same merge discipline as the price store (all-or-nothing, temp file +
//! rename, uniqueness on report date), different schema. Reports are weekly,
//! so a store whose newest report is younger than the freshness window is
//! already current and skips the provider entirely. Missing weeks are never
//! interpolated.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

use crate::config::persistence::TMP_SUFFIX;
use crate::config::{ANALYSIS, COT_HEADER};
use crate::data::provider::{CotHistoryProvider, DateRange};
use crate::data::store::IngestOutcome;
use crate::domain::{CotReport, CotSeries};

pub struct CotStore {
    path: PathBuf,
}

impl CotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn has_rows(&self) -> bool {
        self.path
            .metadata()
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    /// Load the full report history. Missing/empty file → empty series;
    /// unparseable contents → hard error, no partial repair.
    pub fn load(&self) -> Result<CotSeries> {
        if !self.has_rows() {
            return Ok(CotSeries::default());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open COT store {:?}", self.path))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {:?}", self.path))?;
        for expected in COT_HEADER {
            if !headers.iter().any(|h| h == expected) {
                bail!("COT store {:?} is missing column '{}'", self.path, expected);
            }
        }

        let mut reports = Vec::new();
        for record in reader.deserialize::<CotReport>() {
            let report =
                record.with_context(|| format!("Corrupt row in COT store {:?}", self.path))?;
            reports.push(report);
        }

        let series = CotSeries::new(reports);
        series
            .validate_ordering()
            .with_context(|| format!("COT store {:?} violates date ordering", self.path))?;
        Ok(series)
    }

    fn write_atomic(&self, series: &CotSeries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        let mut writer = csv::Writer::from_path(&tmp)
            .with_context(|| format!("Failed to create temp store file {:?}", tmp))?;
        for report in &series.reports {
            writer
                .serialize(report)
                .with_context(|| format!("Failed to write report for {}", report.date))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush temp store file {:?}", tmp))?;
        drop(writer);

        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move {:?} into place", tmp))
    }

    /// Incremental, idempotent ingest of weekly reports.
    pub async fn ingest(
        &self,
        provider: &dyn CotHistoryProvider,
        symbol: &str,
        through: NaiveDate,
    ) -> Result<IngestOutcome> {
        let mut series = self.load()?;

        if let Some(last) = series.last_date() {
            if through - last < Duration::days(ANALYSIS.cot.freshness_days) {
                return Ok(IngestOutcome::already_current(
                    Some(last),
                    "COT data is current",
                ));
            }
        }

        // New stores backfill a fixed lookback; existing ones resume after
        // their last known report date
        let fetch_start = match series.last_date() {
            Some(last) => last + Duration::days(1),
            None => lookback_floor(through, ANALYSIS.cot.fetch_lookback_years),
        };

        if fetch_start > through {
            return Ok(IngestOutcome::already_current(
                series.last_date(),
                "COT data is current",
            ));
        }

        let fetched = provider
            .weekly_reports(symbol, DateRange::new(fetch_start, through))
            .await
            .with_context(|| format!("COT fetch failed for {}", symbol))?;

        let new_reports = validate_fetched(fetched, fetch_start, through);
        if new_reports.is_empty() {
            return Ok(IngestOutcome::already_current(
                series.last_date(),
                "No new data available",
            ));
        }

        let rows_added = new_reports.len() as u32;
        series.reports.extend(new_reports);
        series.validate_ordering()?;
        self.write_atomic(&series)?;

        Ok(IngestOutcome {
            rows_added,
            last_date: series.last_date(),
            message: "Successfully fetched COT data".to_string(),
        })
    }
}

fn lookback_floor(through: NaiveDate, years: i32) -> NaiveDate {
    through
        .with_year(through.year() - years)
        // Feb 29 minus N years may not exist; Mar 1 is close enough for a floor
        .unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(through.year() - years, 3, 1)
                .expect("Mar 1 exists in every year")
        })
}

/// Keep reports inside the merge window with strictly advancing dates.
fn validate_fetched(
    mut fetched: Vec<CotReport>,
    fetch_start: NaiveDate,
    through: NaiveDate,
) -> Vec<CotReport> {
    fetched.sort_by_key(|r| r.date);

    let mut kept: Vec<CotReport> = Vec::with_capacity(fetched.len());
    for report in fetched {
        if report.date < fetch_start || report.date > through {
            continue;
        }
        if kept.last().is_some_and(|prev| report.date <= prev.date) {
            continue;
        }
        kept.push(report);
    }
    kept
}
