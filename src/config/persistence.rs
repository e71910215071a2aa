//! On-disk row-store configuration
//!
//! Each asset gets one append-only CSV per series type, addressed by an
//! opaque path supplied by the caller. The engine never renames or deletes
//! these files; a merge rewrites via a temp file + atomic rename.

/// Column header for per-asset daily price history files
pub const PRICE_HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Column header for per-asset weekly COT report files.
/// Net positions are derived at read time, never stored.
pub const COT_HEADER: [&str; 6] = [
    "Date",
    "Open_Interest",
    "NonComm_Long",
    "NonComm_Short",
    "Comm_Long",
    "Comm_Short",
];

/// Suffix appended to a store path while writing the replacement file
pub const TMP_SUFFIX: &str = ".tmp";
