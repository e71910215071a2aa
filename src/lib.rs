// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use analysis::{CotMetrics, NormalizedYears, YearCurve};
pub use data::{CotHistoryProvider, DateRange, PriceHistoryProvider};
pub use domain::{CotReport, CotSeries, PricePoint, PriceSeries};
pub use engine::{AnalysisEngine, CotMetricsResult, FetchResult, SeasonalityResult};
pub use error::EngineError;

// CLI argument parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch and merge daily price history into a per-asset store
    Fetch {
        /// Upstream ticker symbol (e.g. "GC=F", "BTC-USD")
        #[arg(long)]
        symbol: String,
        /// Path to the per-asset price store
        #[arg(long)]
        file: PathBuf,
    },
    /// Calculate seasonality metrics for a target year
    Calculate {
        /// Path to the per-asset price store
        #[arg(long)]
        file: PathBuf,
        /// Target year to analyze
        #[arg(long)]
        year: i32,
    },
    /// Fetch and merge weekly COT reports into a per-asset store
    FetchCot {
        /// Upstream ticker symbol (must map to a CFTC market)
        #[arg(long)]
        symbol: String,
        /// Path to the per-asset COT store
        #[arg(long)]
        file: PathBuf,
    },
    /// Calculate COT positioning metrics over a trailing window
    CalculateCot {
        /// Path to the per-asset COT store
        #[arg(long)]
        file: PathBuf,
        /// Trailing window in years (1, 2, or 3)
        #[arg(long, default_value_t = 1)]
        years: u32,
    },
}
