//! Analysis and computation configuration

/// Number of day-of-year slots in a normalized year curve.
/// Fixed at 365: leap days fold into the ordinary calendar (see domain::day_slot).
pub const DAY_SLOTS: usize = 365;

/// Settings for the seasonality calculation
pub struct SeasonalSettings {
    /// Trailing multi-year windows averaged for the chart (most recent first N years)
    pub window_years: [usize; 4],
    /// Earliest target year accepted by the boundary API
    pub min_year: i32,
    /// Latest target year accepted by the boundary API
    pub max_year: i32,
}

/// Settings for the COT metrics calculation
pub struct CotSettings {
    /// Trailing window choices (calendar years) accepted for charting
    pub window_choices: [u32; 3],
    /// Weekly reports: stored data younger than this is considered current
    pub freshness_days: i64,
    /// How many calendar years of reports one provider call covers
    pub fetch_lookback_years: i32,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub seasonal: SeasonalSettings,
    pub cot: CotSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    seasonal: SeasonalSettings {
        window_years: [2, 5, 6, 10],
        min_year: 1900,
        max_year: 2200,
    },
    cot: CotSettings {
        window_choices: [1, 2, 3],
        // COT reports are published weekly (Fridays)
        freshness_days: 7,
        fetch_lookback_years: 4,
    },
};
