// Durable per-asset row stores and their merge discipline
pub mod cot_store;
pub mod locks;
pub mod price_store;

use chrono::NaiveDate;

pub use cot_store::CotStore;
pub use locks::AssetLocks;
pub use price_store::PriceStore;

/// What an ingest call accomplished. `rows_added == 0` with a message is a
/// normal outcome (data already current), not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub rows_added: u32,
    pub last_date: Option<NaiveDate>,
    pub message: String,
}

impl IngestOutcome {
    pub fn already_current(last_date: Option<NaiveDate>, message: &str) -> Self {
        Self {
            rows_added: 0,
            last_date,
            message: message.to_string(),
        }
    }
}
