pub mod core;
pub mod results;

// Re-export key components
pub use core::AnalysisEngine;
pub use results::{CotMetricsResult, FetchResult, SeasonalityResult};
