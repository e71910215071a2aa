use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV history for an asset.
/// The seasonality math only reads `close`; the remaining fields are kept
/// so the on-disk store stays a faithful daily history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered daily price history for one asset.
/// Invariant: dates strictly increasing, no duplicates. Owned exclusively by
/// the price store; mutated only by the ingestion merge, never truncated.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Check the strictly-increasing-date invariant across adjacent points.
    pub fn validate_ordering(&self) -> Result<()> {
        for pair in self.points.windows(2) {
            if pair[1].date <= pair[0].date {
                bail!(
                    "Price series ordering violated: {} does not follow {}",
                    pair[1].date,
                    pair[0].date
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_ordering_invariant_detects_duplicates() {
        let series = PriceSeries::new(vec![point("2024-01-02", 1.0), point("2024-01-02", 2.0)]);
        assert!(series.validate_ordering().is_err());
    }

    #[test]
    fn test_ordering_invariant_detects_regression() {
        let series = PriceSeries::new(vec![point("2024-01-03", 1.0), point("2024-01-02", 2.0)]);
        assert!(series.validate_ordering().is_err());
    }

    #[test]
    fn test_ordering_invariant_accepts_gaps() {
        // Market holidays leave gaps; gaps are fine, only regressions are not.
        let series = PriceSeries::new(vec![point("2024-01-02", 1.0), point("2024-01-05", 2.0)]);
        assert!(series.validate_ordering().is_ok());
        assert_eq!(series.last_date(), Some("2024-01-05".parse().unwrap()));
    }
}
