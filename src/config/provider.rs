//! Upstream provider configuration constants and types.

/// Default values for the HTTP client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

/// Yahoo Finance chart API settings
pub struct YahooConfig {
    pub base_url: &'static str,
}

/// CFTC Socrata API settings (disaggregated futures-only reports)
pub struct CftcConfig {
    pub base_url: &'static str,
    /// Socrata page size; a few years of weekly reports fits in one page
    pub row_limit: u32,
}

/// The Master Provider Configuration
pub struct ProviderConfig {
    pub client: ClientDefaults,
    pub yahoo: YahooConfig,
    pub cftc: CftcConfig,
    /// First date ever fetched for a brand-new asset store
    pub epoch_floor: (i32, u32, u32),
}

pub const PROVIDER: ProviderConfig = ProviderConfig {
    client: ClientDefaults {
        timeout_ms: 15_000,
        user_agent: "season-lens/0.1",
    },
    yahoo: YahooConfig {
        base_url: "https://query1.finance.yahoo.com/v8/finance/chart",
    },
    cftc: CftcConfig {
        base_url: "https://publicreporting.cftc.gov/resource/72hh-3qpy.json",
        row_limit: 1000,
    },
    epoch_floor: (2000, 1, 1),
};
