// Data acquisition and per-asset row stores
pub mod cftc;
pub mod provider;
pub mod store;
pub mod yahoo;

// Re-export commonly used types
pub use cftc::CftcProvider;
pub use provider::{CotHistoryProvider, DateRange, PriceHistoryProvider};
pub use store::{AssetLocks, CotStore, IngestOutcome, PriceStore};
pub use yahoo::YahooProvider;
