//! The analytics engine behind the boundary API.
//!
//! Stores are the only stateful parts; the calculators are pure functions
//! over a loaded snapshot. Ingest calls for one asset serialize on a
//! per-path lock, and an ingest-then-compute pipeline holds that lock end to
//! end so the compute never sees a half-merged series. Reads do not lock:
//! merges replace the store file atomically, so a concurrent reader sees
//! either the pre-merge or the fully-merged state.

use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::analysis::{aggregate, compute_metrics, normalize};
use crate::config::ANALYSIS;
use crate::data::{
    AssetLocks, CftcProvider, CotHistoryProvider, CotStore, PriceHistoryProvider, PriceStore,
    YahooProvider,
};
use crate::engine::results::{CotMetricsResult, FetchResult, SeasonalityResult};
use crate::error::{EngineError, EngineResult};

pub struct AnalysisEngine {
    price_provider: Arc<dyn PriceHistoryProvider>,
    cot_provider: Arc<dyn CotHistoryProvider>,
    locks: AssetLocks,
}

impl AnalysisEngine {
    pub fn new(
        price_provider: Arc<dyn PriceHistoryProvider>,
        cot_provider: Arc<dyn CotHistoryProvider>,
    ) -> Self {
        Self {
            price_provider,
            cot_provider,
            locks: AssetLocks::new(),
        }
    }

    /// Engine wired to the real upstream sources.
    pub fn with_default_providers() -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(YahooProvider::new()?),
            Arc::new(CftcProvider::new()?),
        ))
    }

    // --- Boundary operations ---

    /// Fetch and merge daily price history up to today.
    pub async fn fetch_price_data(&self, symbol: &str, path: &Path) -> FetchResult {
        self.fetch_price_data_through(symbol, path, today()).await
    }

    /// Same as `fetch_price_data` with an explicit through-date (tests pin
    /// this; production passes today).
    pub async fn fetch_price_data_through(
        &self,
        symbol: &str,
        path: &Path,
        through: NaiveDate,
    ) -> FetchResult {
        if let Err(e) = validate_path(path) {
            return FetchResult::failure(e.to_string());
        }

        let lock = self.locks.lock_for(path);
        let _guard = lock.lock().await;

        match PriceStore::new(path)
            .ingest(self.price_provider.as_ref(), symbol, through)
            .await
        {
            Ok(outcome) => {
                log::info!(
                    "Price ingest via {} for {}: {}",
                    self.price_provider.signature(),
                    symbol,
                    outcome.message
                );
                FetchResult::from_outcome(outcome)
            }
            Err(e) => {
                log::error!(
                    "Price ingest via {} failed for {}: {:#}",
                    self.price_provider.signature(),
                    symbol,
                    e
                );
                FetchResult::failure(format!("Error fetching data: {:#}", e))
            }
        }
    }

    /// Compute the seasonality payload for `year` from the store at `path`.
    /// Pure over the store's current contents; nothing is persisted.
    pub async fn calculate_seasonality(&self, path: &Path, year: i32) -> SeasonalityResult {
        if let Err(e) = validate_path(path).and(validate_year(year)) {
            return SeasonalityResult::failure(e.to_string());
        }

        let store = PriceStore::new(path);
        if !path.exists() {
            return SeasonalityResult::failure("Data file not found. Please fetch data first.");
        }

        let series = match store.load() {
            Ok(series) => series,
            Err(e) => {
                log::error!("Price store load failed: {:#}", e);
                return SeasonalityResult::failure(format!("Error calculating metrics: {:#}", e));
            }
        };

        seasonality_payload(series, year)
    }

    /// The full pipeline: ingest, then compute, under one asset lock, with
    /// the ingest outcome echoed into the seasonality payload.
    pub async fn refresh_and_calculate(
        &self,
        symbol: &str,
        path: &Path,
        year: i32,
    ) -> SeasonalityResult {
        if let Err(e) = validate_path(path).and(validate_year(year)) {
            return SeasonalityResult::failure(e.to_string());
        }

        let lock = self.locks.lock_for(path);
        let _guard = lock.lock().await;

        let store = PriceStore::new(path);
        let outcome = match store
            .ingest(self.price_provider.as_ref(), symbol, today())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!(
                    "Price ingest via {} failed for {}: {:#}",
                    self.price_provider.signature(),
                    symbol,
                    e
                );
                return SeasonalityResult::failure(format!("Error fetching data: {:#}", e));
            }
        };

        let series = match store.load() {
            Ok(series) => series,
            Err(e) => {
                return SeasonalityResult::failure(format!("Error calculating metrics: {:#}", e))
            }
        };

        seasonality_payload(series, year).with_ingest(&outcome)
    }

    /// Fetch and merge weekly COT reports up to today.
    pub async fn fetch_cot_data(&self, symbol: &str, path: &Path) -> FetchResult {
        self.fetch_cot_data_through(symbol, path, today()).await
    }

    pub async fn fetch_cot_data_through(
        &self,
        symbol: &str,
        path: &Path,
        through: NaiveDate,
    ) -> FetchResult {
        if let Err(e) = validate_path(path) {
            return FetchResult::failure(e.to_string());
        }

        let lock = self.locks.lock_for(path);
        let _guard = lock.lock().await;

        match CotStore::new(path)
            .ingest(self.cot_provider.as_ref(), symbol, through)
            .await
        {
            Ok(outcome) => {
                log::info!(
                    "COT ingest via {} for {}: {}",
                    self.cot_provider.signature(),
                    symbol,
                    outcome.message
                );
                FetchResult::from_outcome(outcome)
            }
            Err(e) => {
                log::error!(
                    "COT ingest via {} failed for {}: {:#}",
                    self.cot_provider.signature(),
                    symbol,
                    e
                );
                FetchResult::failure(format!("Error fetching COT data: {:#}", e))
            }
        }
    }

    /// Compute COT metrics over the trailing `window_years` window.
    pub async fn calculate_cot_metrics(&self, path: &Path, window_years: u32) -> CotMetricsResult {
        if let Err(e) = validate_path(path).and(validate_cot_window(window_years)) {
            return CotMetricsResult::failure(e.to_string());
        }

        if !path.exists() {
            return CotMetricsResult::failure("COT data file not found. Please fetch data first.");
        }

        let series = match CotStore::new(path).load() {
            Ok(series) => series,
            Err(e) => {
                log::error!("COT store load failed: {:#}", e);
                return CotMetricsResult::failure(format!(
                    "Error calculating COT metrics: {:#}",
                    e
                ));
            }
        };

        match compute_metrics(&series, window_years) {
            Ok(metrics) => CotMetricsResult::from_metrics(metrics),
            Err(e) => CotMetricsResult::failure(e.to_string()),
        }
    }
}

/// Assemble the success payload: four window averages plus the target curve.
/// A request with no history before the target year is a legitimate no-data
/// result, not an error — arrays come back null-filled with a status message.
fn seasonality_payload(series: crate::domain::PriceSeries, year: i32) -> SeasonalityResult {
    let normalized = normalize(&series, year);

    let message = if normalized.historical.is_empty() {
        Some(format!("No historical data available before {}", year))
    } else {
        None
    };

    let [w2, w5, w6, w10] = ANALYSIS.seasonal.window_years;
    SeasonalityResult {
        success: true,
        message,
        rows_added: None,
        last_date: None,
        avg_2yr: Some(aggregate(&normalized.historical, w2)),
        avg_5yr: Some(aggregate(&normalized.historical, w5)),
        avg_6yr: Some(aggregate(&normalized.historical, w6)),
        avg_10yr: Some(aggregate(&normalized.historical, w10)),
        actual: Some(
            normalized
                .target
                .unwrap_or_else(|| vec![None; crate::config::DAY_SLOTS]),
        ),
        target_year: Some(year),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn validate_path(path: &Path) -> EngineResult<()> {
    if path.as_os_str().is_empty() {
        return Err(EngineError::Input("store path is empty".to_string()));
    }
    if path.is_dir() {
        return Err(EngineError::Input(format!(
            "store path {:?} is a directory",
            path
        )));
    }
    Ok(())
}

fn validate_year(year: i32) -> EngineResult<()> {
    let (min, max) = (ANALYSIS.seasonal.min_year, ANALYSIS.seasonal.max_year);
    if !(min..=max).contains(&year) {
        return Err(EngineError::Input(format!(
            "target year {} outside supported range {}..={}",
            year, min, max
        )));
    }
    Ok(())
}

fn validate_cot_window(window_years: u32) -> EngineResult<()> {
    if !ANALYSIS.cot.window_choices.contains(&window_years) {
        return Err(EngineError::Input(format!(
            "unsupported COT window: {} years (choose one of {:?})",
            window_years, ANALYSIS.cot.window_choices
        )));
    }
    Ok(())
}
