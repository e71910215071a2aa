//! Yahoo Finance daily-history provider.
//!
//! Queries the v8 chart API for 1d bars. Days with no close (market
//! holidays, partial rows) are skipped silently; a missing result node or a
//! chart-level error is a provider failure.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::config::PROVIDER;
use crate::data::provider::{DateRange, PriceHistoryProvider};
use crate::domain::PricePoint;

pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(PROVIDER.client.timeout_ms))
            .user_agent(PROVIDER.client.user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

// --- Chart API response shape (only the fields we read) ---

#[derive(Deserialize, Debug)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize, Debug)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

fn epoch_to_date(epoch_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec, 0).map(|dt| dt.date_naive())
}

/// Pull index `i` out of an optional column, flattening missing columns to None.
fn column_value(column: &Option<Vec<Option<f64>>>, i: usize) -> Option<f64> {
    column.as_ref().and_then(|col| col.get(i).copied().flatten())
}

fn convert_chart(result: ChartResult, range: DateRange) -> Result<Vec<PricePoint>> {
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(date) = epoch_to_date(ts) else {
            bail!("Unrepresentable bar timestamp from Yahoo: {}", ts);
        };
        if !range.contains(date) {
            continue;
        }
        // A bar with no close is a non-trading day; skip it, not an error
        let Some(close) = column_value(&quote.close, i) else {
            continue;
        };
        points.push(PricePoint {
            date,
            open: column_value(&quote.open, i).unwrap_or(close),
            high: column_value(&quote.high, i).unwrap_or(close),
            low: column_value(&quote.low, i).unwrap_or(close),
            close,
            volume: column_value(&quote.volume, i).unwrap_or(0.0),
        });
    }
    Ok(points)
}

#[async_trait]
impl PriceHistoryProvider for YahooProvider {
    fn signature(&self) -> &'static str {
        "Yahoo Finance"
    }

    async fn daily_history(&self, symbol: &str, range: DateRange) -> Result<Vec<PricePoint>> {
        let period1 = range
            .start
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc()
            .timestamp();
        // period2 is exclusive, so step one day past the inclusive range end
        let period2 = (range.end + chrono::Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc()
            .timestamp();

        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            PROVIDER.yahoo.base_url, symbol, period1, period2
        );

        log::info!("Fetching daily history for {} ({} .. {})", symbol, range.start, range.end);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Chart request failed for {}", symbol))?;

        if !response.status().is_success() {
            bail!("Chart request for {} returned HTTP {}", symbol, response.status());
        }

        let body: ChartResponse = response
            .json()
            .await
            .with_context(|| format!("Malformed chart payload for {}", symbol))?;

        if let Some(err) = body.chart.error {
            bail!("Chart API error for {}: {} ({})", symbol, err.description, err.code);
        }

        let result = body
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .with_context(|| format!("Chart response for {} carried no result", symbol))?;

        convert_chart(result, range)
    }
}
