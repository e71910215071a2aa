//! Window Aggregator: day-of-year-wise mean across trailing year windows.
//!
//! For a window of N years, the N most recent historical years are averaged
//! slot by slot, over present values only. A slot where no selected year
//! traded stays None — arrays keep their fixed length so the consumer's day
//! axis always aligns. Fewer than N available years is fine (we average what
//! exists); zero years yields an all-None curve.
//!
//! Determinism: selected years are summed in ascending year order (BTreeMap
//! iteration order), so the result is reproducible bit-for-bit on one
//! platform regardless of how the window was requested.

use std::collections::BTreeMap;

use crate::config::DAY_SLOTS;
use crate::analysis::seasonal::YearCurve;

/// Average the `window_years` most recent historical curves slot-wise.
pub fn aggregate(historical: &BTreeMap<i32, YearCurve>, window_years: usize) -> YearCurve {
    // BTreeMap keys ascend, so the window is the tail of the key sequence;
    // skipping to the tail keeps summation in ascending year order.
    let selected = historical.len().saturating_sub(window_years);
    let window = historical.values().skip(selected);

    let mut sums = vec![0.0_f64; DAY_SLOTS];
    let mut counts = vec![0_u32; DAY_SLOTS];
    for curve in window {
        for (slot, value) in curve.iter().enumerate() {
            if let Some(v) = value {
                sums[slot] += v;
                counts[slot] += 1;
            }
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count == 0 {
                None
            } else {
                Some(sum / count as f64)
            }
        })
        .collect()
}
