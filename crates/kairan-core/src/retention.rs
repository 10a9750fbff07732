//! Retention windows — pure calendar-date predicates.
//!
//! Posts age out of every active view and aggregate after three calendar
//! months; the "recent updates" feed uses an exact seven-day window. Both
//! boundaries are inclusive.

use chrono::{Days, Months, NaiveDate};

/// Posts older than this many calendar months are excluded everywhere.
pub const RETENTION_MONTHS: u32 = 3;

/// Day window for the "recent updates" feed.
pub const RECENT_WINDOW_DAYS: u64 = 7;

/// True iff `date` falls within the retention window ending at `reference`.
/// Calendar-month arithmetic: the cutoff is `reference` minus three months,
/// clamped to the end of shorter months.
pub fn is_within_retention_period(date: NaiveDate, reference: NaiveDate) -> bool {
  date >= reference - Months::new(RETENTION_MONTHS)
}

/// True iff `date` falls within the last seven days before `reference`
/// (exact day arithmetic).
pub fn is_within_last_week(date: NaiveDate, reference: NaiveDate) -> bool {
  date >= reference - Days::new(RECENT_WINDOW_DAYS)
}
