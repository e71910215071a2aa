//! Series Store: append-only daily price history for one asset.
//!
//! The store is a headered CSV addressed by an opaque caller-supplied path.
//! A merge never rewrites or reorders previously stored rows; the whole file
//! is re-emitted to a sibling temp file and swapped in with `rename`, so a
//! reader sees either the pre-merge or fully-post-merge state and a failed
//! call leaves the file untouched.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};

use crate::config::persistence::TMP_SUFFIX;
use crate::config::{PRICE_HEADER, PROVIDER};
use crate::data::provider::{DateRange, PriceHistoryProvider};
use crate::data::store::IngestOutcome;
use crate::domain::{PricePoint, PriceSeries};

pub struct PriceStore {
    path: PathBuf,
}

impl PriceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn has_rows(&self) -> bool {
        self.path
            .metadata()
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    /// Load the full series. A missing or empty file is an empty series;
    /// unparseable contents are a hard error (no partial repair).
    pub fn load(&self) -> Result<PriceSeries> {
        if !self.has_rows() {
            return Ok(PriceSeries::default());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open price store {:?}", self.path))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {:?}", self.path))?;
        for expected in PRICE_HEADER {
            if !headers.iter().any(|h| h == expected) {
                bail!("Price store {:?} is missing column '{}'", self.path, expected);
            }
        }

        let mut points = Vec::new();
        for record in reader.deserialize::<PricePoint>() {
            let point = record
                .with_context(|| format!("Corrupt row in price store {:?}", self.path))?;
            points.push(point);
        }

        let series = PriceSeries::new(points);
        series
            .validate_ordering()
            .with_context(|| format!("Price store {:?} violates date ordering", self.path))?;
        Ok(series)
    }

    fn write_atomic(&self, series: &PriceSeries) -> Result<()> {
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
        for point in &series.points {
            writer
                .serialize(point)
                .with_context(|| format!("Failed to write row for {}", point.date))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush temp store file {:?}", tmp))?;
        drop(writer);

        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move {:?} into place", tmp))
    }

    /// Incremental, idempotent ingest (merge-on-fetch).
    ///
    /// A brand-new store fetches from the epoch floor; an existing one from
    /// the day after its last stored date. Re-invoking with the same or an
    /// earlier `through` date after a successful call adds zero rows.
    pub async fn ingest(
        &self,
        provider: &dyn PriceHistoryProvider,
        symbol: &str,
        through: NaiveDate,
    ) -> Result<IngestOutcome> {
        let mut series = self.load()?;

        let (ef_y, ef_m, ef_d) = PROVIDER.epoch_floor;
        let fetch_start = match series.last_date() {
            Some(last) => last + Duration::days(1),
            None => NaiveDate::from_ymd_opt(ef_y, ef_m, ef_d).expect("epoch floor is a real date"),
        };

        if fetch_start > through {
            return Ok(IngestOutcome::already_current(
                series.last_date(),
                "Data is already up to date",
            ));
        }

        let fetched = provider
            .daily_history(symbol, DateRange::new(fetch_start, through))
            .await
            .with_context(|| format!("Fetch failed for {}", symbol))?;

        let new_points = validate_fetched(fetched, fetch_start, through);
        if new_points.is_empty() {
            return Ok(IngestOutcome::already_current(
                series.last_date(),
                "No new data available",
            ));
        }

        let rows_added = new_points.len() as u32;
        series.points.extend(new_points);
        series.validate_ordering()?;
        self.write_atomic(&series)?;

        Ok(IngestOutcome {
            rows_added,
            last_date: series.last_date(),
            message: format!("Successfully updated {}", symbol),
        })
    }
}

/// Keep only rows that parse into the merge window and strictly advance the
/// date of the previous row emitted. Holiday gaps and stray duplicates from
/// the provider are skipped silently, not treated as errors.
fn validate_fetched(
    mut fetched: Vec<PricePoint>,
    fetch_start: NaiveDate,
    through: NaiveDate,
) -> Vec<PricePoint> {
    fetched.sort_by_key(|p| p.date);

    let mut kept: Vec<PricePoint> = Vec::with_capacity(fetched.len());
    for point in fetched {
        if point.date < fetch_start || point.date > through {
            continue;
        }
        if !point.close.is_finite() {
            log::warn!("Dropping row {}: close is not numeric", point.date);
            continue;
        }
        if kept.last().is_some_and(|prev| point.date <= prev.date) {
            continue;
        }
        kept.push(point);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    /// Fixture provider: serves a fixed row set, counts calls.
    struct FixtureProvider {
        rows: Vec<PricePoint>,
        calls: AtomicUsize,
    }

    impl FixtureProvider {
        fn new(rows: Vec<PricePoint>) -> Self {
            Self {
                rows,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceHistoryProvider for FixtureProvider {
        fn signature(&self) -> &'static str {
            "Fixture"
        }

        async fn daily_history(&self, _symbol: &str, range: DateRange) -> Result<Vec<PricePoint>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .iter()
                .filter(|p| range.contains(p.date))
                .cloned()
                .collect())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl PriceHistoryProvider for FailingProvider {
        fn signature(&self) -> &'static str {
            "Broken"
        }

        async fn daily_history(&self, _: &str, _: DateRange) -> Result<Vec<PricePoint>> {
            bail!("connection refused")
        }
    }

    fn through(date: &str) -> NaiveDate {
        date.parse().unwrap()
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = PriceStore::new(dir.path().join("gold.csv"));
        let provider = FixtureProvider::new(vec![
            point("2024-01-02", 100.0),
            point("2024-01-03", 102.0),
            point("2024-01-04", 101.0),
        ]);

        let first = store
            .ingest(&provider, "GC=F", through("2024-01-04"))
            .await
            .unwrap();
        assert_eq!(first.rows_added, 3);
        assert_eq!(first.last_date, Some(through("2024-01-04")));

        // Second call with the same through-date adds exactly zero rows
        let second = store
            .ingest(&provider, "GC=F", through("2024-01-04"))
            .await
            .unwrap();
        assert_eq!(second.rows_added, 0);
        assert_eq!(second.last_date, Some(through("2024-01-04")));

        // Reload round-trips the merged series in order
        let series = store.load().unwrap();
        assert_eq!(series.len(), 3);
        series.validate_ordering().unwrap();
    }

    #[tokio::test]
    async fn test_ingest_resumes_from_day_after_last_date() {
        let dir = TempDir::new().unwrap();
        let store = PriceStore::new(dir.path().join("gold.csv"));
        let provider = FixtureProvider::new(vec![
            point("2024-01-02", 100.0),
            point("2024-01-03", 102.0),
            point("2024-01-05", 104.0),
        ]);

        store
            .ingest(&provider, "GC=F", through("2024-01-03"))
            .await
            .unwrap();
        let outcome = store
            .ingest(&provider, "GC=F", through("2024-01-05"))
            .await
            .unwrap();

        // Only the row after 2024-01-03 is new; the Jan 4 holiday gap is fine
        assert_eq!(outcome.rows_added, 1);
        assert_eq!(store.load().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gold.csv");
        let store = PriceStore::new(&path);

        let good = FixtureProvider::new(vec![point("2024-01-02", 100.0)]);
        store
            .ingest(&good, "GC=F", through("2024-01-02"))
            .await
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = store
            .ingest(&FailingProvider, "GC=F", through("2024-02-01"))
            .await;
        assert!(err.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_series_not_error() {
        let dir = TempDir::new().unwrap();
        let store = PriceStore::new(dir.path().join("never-written.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_validate_fetched_drops_duplicates_and_nan() {
        let mut bad = point("2024-01-03", 0.0);
        bad.close = f64::NAN;
        let rows = vec![
            point("2024-01-02", 100.0),
            point("2024-01-02", 999.0), // duplicate date, first wins
            bad,
            point("2024-01-04", 101.0),
        ];
        let kept = validate_fetched(rows, through("2024-01-01"), through("2024-01-31"));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].close, 100.0);
        assert_eq!(kept[1].date, through("2024-01-04"));
    }
}
