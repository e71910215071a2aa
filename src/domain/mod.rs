// Domain types and value objects
pub mod cot_report;
pub mod day_slot;
pub mod price_point;

// Re-export commonly used types
pub use cot_report::{CotReport, CotSeries};
pub use day_slot::day_slot;
pub use price_point::{PricePoint, PriceSeries};
