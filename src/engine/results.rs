//! Boundary result payloads.
//!
//! Every engine operation resolves to one of these — a uniform
//! `{success, message?}` discriminator plus payload, serialized as a single
//! JSON document for the consuming UI layer. Failures are data, never
//! transport faults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{CotMetrics, YearCurve};
use crate::data::IngestOutcome;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Outcome of a fetch-and-merge call.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FetchResult {
    pub success: bool,
    pub message: Option<String>,
    pub rows_added: Option<u32>,
    pub last_date: Option<String>,
}

impl FetchResult {
    pub fn from_outcome(outcome: IngestOutcome) -> Self {
        Self {
            success: true,
            message: Some(outcome.message),
            rows_added: Some(outcome.rows_added),
            last_date: outcome.last_date.map(format_date),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            rows_added: Some(0),
            last_date: None,
        }
    }
}

/// Seasonality payload: four trailing-window averages plus the target year's
/// own curve. Arrays are always 365 entries when present; a null entry means
/// no trading day existed for that slot in the window or target year.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SeasonalityResult {
    pub success: bool,
    pub message: Option<String>,
    pub rows_added: Option<u32>,
    pub last_date: Option<String>,
    pub avg_2yr: Option<YearCurve>,
    pub avg_5yr: Option<YearCurve>,
    pub avg_6yr: Option<YearCurve>,
    pub avg_10yr: Option<YearCurve>,
    pub actual: Option<YearCurve>,
    pub target_year: Option<i32>,
}

impl SeasonalityResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            rows_added: None,
            last_date: None,
            avg_2yr: None,
            avg_5yr: None,
            avg_6yr: None,
            avg_10yr: None,
            actual: None,
            target_year: None,
        }
    }

    /// Echo the preceding ingest outcome into this payload (used when fetch
    /// and calculate run as one pipeline).
    pub fn with_ingest(mut self, outcome: &IngestOutcome) -> Self {
        self.rows_added = Some(outcome.rows_added);
        self.last_date = outcome.last_date.map(format_date);
        self
    }
}

/// COT metrics payload: all arrays aligned by index to `dates`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CotMetricsResult {
    pub success: bool,
    pub message: Option<String>,
    pub dates: Vec<String>,
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

impl CotMetricsResult {
    pub fn from_metrics(metrics: CotMetrics) -> Self {
        Self {
            success: true,
            message: None,
            dates: metrics.dates.into_iter().map(format_date).collect(),
            open_interest: metrics.open_interest,
            noncomm_net: metrics.noncomm_net,
            comm_net: metrics.comm_net,
            noncomm_long: metrics.noncomm_long,
            noncomm_short: metrics.noncomm_short,
            comm_long: metrics.comm_long,
            comm_short: metrics.comm_short,
            noncomm_net_change: metrics.noncomm_net_change,
            comm_net_change: metrics.comm_net_change,
            oi_change: metrics.oi_change,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }
}
