use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One weekly Commitments of Traders report for an asset.
/// Net positions are derived, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CotReport {
    /// Report/as-of date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open_Interest")]
    pub open_interest: i64,
    #[serde(rename = "NonComm_Long")]
    pub noncomm_long: i64,
    #[serde(rename = "NonComm_Short")]
    pub noncomm_short: i64,
    #[serde(rename = "Comm_Long")]
    pub comm_long: i64,
    #[serde(rename = "Comm_Short")]
    pub comm_short: i64,
}

impl CotReport {
    pub fn noncomm_net(&self) -> i64 {
        self.noncomm_long - self.noncomm_short
    }

    pub fn comm_net(&self) -> i64 {
        self.comm_long - self.comm_short
    }
}

/// Ordered weekly report history for one asset, typically one point per week.
/// Same ordering/uniqueness invariant as PriceSeries; missing weeks are never
/// interpolated.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct CotSeries {
    pub reports: Vec<CotReport>,
}

impl CotSeries {
    pub fn new(reports: Vec<CotReport>) -> Self {
        Self { reports }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.reports.last().map(|r| r.date)
    }

    pub fn validate_ordering(&self) -> Result<()> {
        for pair in self.reports.windows(2) {
            if pair[1].date <= pair[0].date {
                bail!(
                    "COT series ordering violated: {} does not follow {}",
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

    #[test]
    fn test_net_positions_derived() {
        let report = CotReport {
            date: "2024-06-04".parse().unwrap(),
            open_interest: 500_000,
            noncomm_long: 250_000,
            noncomm_short: 100_000,
            comm_long: 80_000,
            comm_short: 190_000,
        };
        assert_eq!(report.noncomm_net(), 150_000);
        assert_eq!(report.comm_net(), -110_000);
    }
}
