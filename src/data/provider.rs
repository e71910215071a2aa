//! Upstream provider capability traits.
//!
//! The market-data and COT sources are modeled as capabilities so a test can
//! substitute a recorded fixture — there is no global singleton client. A
//! provider is queried by symbol and inclusive date range and returns rows in
//! any order; the stores own validation and merge discipline.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{CotReport, PricePoint};

/// Inclusive calendar date range for a provider query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetch daily OHLCV rows for `symbol` within `range`, or an anyhow::Error.
    /// Days the market did not trade are simply absent, not an error.
    async fn daily_history(&self, symbol: &str, range: DateRange) -> Result<Vec<PricePoint>>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

#[async_trait]
pub trait CotHistoryProvider: Send + Sync {
    /// Fetch weekly COT reports for `symbol` within `range`.
    async fn weekly_reports(&self, symbol: &str, range: DateRange) -> Result<Vec<CotReport>>;

    fn signature(&self) -> &'static str;
}
