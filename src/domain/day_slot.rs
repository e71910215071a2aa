//! Fixed 365-slot day-of-year model.
//!
//! Seasonality curves share one x-axis across years of differing actual
//! dates, so every calendar date must map to a slot in 1..=365 regardless
//! of leap years. The rule: slots follow the ordinary (non-leap) calendar.
//! In a leap year, Feb 29 folds into slot 59 (Feb 28's slot) and every
//! later date uses `ordinal - 1`, which keeps Mar 1 at slot 60 and Dec 31
//! at slot 365 in all years. Writers treat collisions on slot 59 as
//! first-write-wins, so Feb 28 is never displaced by the leap day.

use chrono::{Datelike, NaiveDate};

/// Ordinal of Feb 28 (the last slot shared verbatim between calendars)
const FEB_28_ORDINAL: u32 = 59;

/// Map a calendar date to its 1-based slot in the fixed 365-slot year.
pub fn day_slot(date: NaiveDate) -> usize {
    let ordinal = date.ordinal();
    if date.leap_year() && ordinal > FEB_28_ORDINAL {
        (ordinal - 1) as usize
    } else {
        ordinal as usize
    }
}
