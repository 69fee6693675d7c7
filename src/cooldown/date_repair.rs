//! Repair of day/month-swapped contact dates.
//!
//! Workbooks edited under a US locale store a Dutch `06-02-2026` (6 February)
//! as 2 June. Such dates usually land in the future. When swapping day and
//! month turns a future date into a past one, the swap is taken to be the
//! intended date. Genuinely future entries (a planned meeting) are kept.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Return the repaired date, or the input unchanged.
pub fn repair_swapped_date(date: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    if date <= now || date.day() > 12 {
        return date;
    }

    match swap_day_and_month(date) {
        Some(swapped) if swapped <= now => swapped,
        _ => date,
    }
}

fn swap_day_and_month(date: NaiveDateTime) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(date.year(), date.day(), date.month())
        .map(|swapped| swapped.and_time(date.time()))
}
