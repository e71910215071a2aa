//! CFTC Commitments of Traders provider.
//!
//! Queries the public Socrata dataset for disaggregated futures-only
//! reports. Only physical commodity futures carry COT data, so the ticker
//! must resolve through `cot_market_name` before any request is made.
//! Managed-money positions stand in for "non-commercial", producer/merchant
//! positions for "commercial".

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::PROVIDER;
use crate::data::provider::{CotHistoryProvider, DateRange};
use crate::domain::CotReport;

/// Ticker symbol → CFTC market-and-exchange name.
/// Returns None for symbols without COT coverage (indices, FX, crypto).
pub fn cot_market_name(symbol: &str) -> Option<&'static str> {
    let name = match symbol {
        // Precious metals
        "GC=F" => "GOLD - COMMODITY EXCHANGE INC.",
        "SI=F" => "SILVER - COMMODITY EXCHANGE INC.",
        "PL=F" => "PLATINUM - NEW YORK MERCANTILE EXCHANGE",
        "PA=F" => "PALLADIUM - NEW YORK MERCANTILE EXCHANGE",

        // Industrial metals
        "HG=F" => "COPPER- #1 - COMMODITY EXCHANGE INC.",

        // Energy
        "CL=F" => "WTI FINANCIAL CRUDE OIL - NEW YORK MERCANTILE EXCHANGE",
        "NG=F" => "HENRY HUB PENULTIMATE NAT GAS - NEW YORK MERCANTILE EXCHANGE",
        "HO=F" => "GULF JET NY HEAT OIL SPR - NEW YORK MERCANTILE EXCHANGE",
        "RB=F" => "GASOLINE RBOB - NEW YORK MERCANTILE EXCHANGE",

        // Grains
        "ZC=F" => "CORN - CHICAGO BOARD OF TRADE",
        "ZW=F" => "WHEAT-SRW - CHICAGO BOARD OF TRADE",
        "ZS=F" => "SOYBEANS - CHICAGO BOARD OF TRADE",

        // Softs
        "KC=F" => "COFFEE C - ICE FUTURES U.S.",
        "SB=F" => "SUGAR NO. 11 - ICE FUTURES U.S.",
        "CT=F" => "COTTON NO. 2 - ICE FUTURES U.S.",

        _ => return None,
    };
    Some(name)
}

pub struct CftcProvider {
    client: reqwest::Client,
}

impl CftcProvider {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(PROVIDER.client.timeout_ms))
            .user_agent(PROVIDER.client.user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

/// Socrata serves every numeric field as a string.
#[derive(Deserialize, Debug)]
struct SocrataRow {
    report_date_as_yyyy_mm_dd: String,
    open_interest_all: String,
    m_money_positions_long_all: String,
    m_money_positions_short_all: String,
    prod_merc_positions_long_all: String,
    prod_merc_positions_short_all: String,
}

fn parse_count(raw: &str, field: &str, date: &str) -> Result<i64> {
    // Counts occasionally arrive with a decimal point ("1234.0")
    raw.parse::<f64>()
        .map(|v| v.round() as i64)
        .with_context(|| format!("Unparseable {} '{}' in report dated {}", field, raw, date))
}

fn convert_row(row: SocrataRow) -> Result<CotReport> {
    // Report dates arrive as ISO timestamps ("2024-06-04T00:00:00.000")
    let date_text = row
        .report_date_as_yyyy_mm_dd
        .split('T')
        .next()
        .unwrap_or(&row.report_date_as_yyyy_mm_dd);
    let date: NaiveDate = date_text
        .parse()
        .with_context(|| format!("Unparseable report date '{}'", row.report_date_as_yyyy_mm_dd))?;

    Ok(CotReport {
        date,
        open_interest: parse_count(&row.open_interest_all, "open interest", date_text)?,
        noncomm_long: parse_count(&row.m_money_positions_long_all, "managed-money long", date_text)?,
        noncomm_short: parse_count(
            &row.m_money_positions_short_all,
            "managed-money short",
            date_text,
        )?,
        comm_long: parse_count(&row.prod_merc_positions_long_all, "producer long", date_text)?,
        comm_short: parse_count(&row.prod_merc_positions_short_all, "producer short", date_text)?,
    })
}

#[async_trait]
impl CotHistoryProvider for CftcProvider {
    fn signature(&self) -> &'static str {
        "CFTC Socrata"
    }

    async fn weekly_reports(&self, symbol: &str, range: DateRange) -> Result<Vec<CotReport>> {
        let Some(market_name) = cot_market_name(symbol) else {
            bail!(
                "COT data not available for {}. Only available for physical commodity futures.",
                symbol
            );
        };

        let where_clause = format!(
            "market_and_exchange_names='{}' AND report_date_as_yyyy_mm_dd between '{}T00:00:00' and '{}T23:59:59'",
            market_name, range.start, range.end
        );

        log::info!(
            "Fetching COT reports for {} ({} .. {})",
            market_name,
            range.start,
            range.end
        );

        let response = self
            .client
            .get(PROVIDER.cftc.base_url)
            .query(&[
                ("$where", where_clause.as_str()),
                ("$order", "report_date_as_yyyy_mm_dd"),
                ("$limit", &PROVIDER.cftc.row_limit.to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("COT request failed for {}", market_name))?;

        if !response.status().is_success() {
            bail!(
                "COT request for {} returned HTTP {}",
                market_name,
                response.status()
            );
        }

        let rows: Vec<SocrataRow> = response
            .json()
            .await
            .with_context(|| format!("Malformed COT payload for {}", market_name))?;

        rows.into_iter().map(convert_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_identifies_source_in_logs() {
        assert_eq!(CftcProvider::new().unwrap().signature(), "CFTC Socrata");
    }

    #[test]
    fn test_known_symbols_resolve() {
        assert_eq!(cot_market_name("GC=F"), Some("GOLD - COMMODITY EXCHANGE INC."));
        assert_eq!(cot_market_name("ZC=F"), Some("CORN - CHICAGO BOARD OF TRADE"));
        assert_eq!(cot_market_name("BTC-USD"), None);
    }

    #[test]
    fn test_convert_row_handles_socrata_strings() {
        let row = SocrataRow {
            report_date_as_yyyy_mm_dd: "2024-06-04T00:00:00.000".to_string(),
            open_interest_all: "443958".to_string(),
            m_money_positions_long_all: "180000.0".to_string(),
            m_money_positions_short_all: "35000".to_string(),
            prod_merc_positions_long_all: "20000".to_string(),
            prod_merc_positions_short_all: "110000".to_string(),
        };
        let report = convert_row(row).unwrap();
        assert_eq!(report.date, "2024-06-04".parse::<NaiveDate>().unwrap());
        assert_eq!(report.open_interest, 443_958);
        assert_eq!(report.noncomm_net(), 145_000);
        assert_eq!(report.comm_net(), -90_000);
    }

    #[test]
    fn test_convert_row_rejects_garbage() {
        let row = SocrataRow {
            report_date_as_yyyy_mm_dd: "not-a-date".to_string(),
            open_interest_all: "1".to_string(),
            m_money_positions_long_all: "1".to_string(),
            m_money_positions_short_all: "1".to_string(),
            prod_merc_positions_long_all: "1".to_string(),
            prod_merc_positions_short_all: "1".to_string(),
        };
        assert!(convert_row(row).is_err());
    }
}
