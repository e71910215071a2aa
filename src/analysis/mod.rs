// Pure numeric transforms over stored series (no I/O in this module)
pub mod cot_metrics;
pub mod seasonal;
pub mod window;

// Re-export commonly used types
pub use cot_metrics::{compute_metrics, CotMetrics};
pub use seasonal::{normalize, NormalizedYears, YearCurve};
pub use window::aggregate;
