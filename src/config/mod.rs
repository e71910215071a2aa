//! Configuration module for the season-lens engine.

pub mod analysis;
pub mod persistence;
pub mod provider;

// Re-export commonly used items
pub use analysis::{AnalysisConfig, ANALYSIS, DAY_SLOTS};
pub use persistence::{COT_HEADER, PRICE_HEADER};
pub use provider::PROVIDER;
