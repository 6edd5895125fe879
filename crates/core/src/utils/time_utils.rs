use chrono::{Months, NaiveDate, Utc};

/// Current business date (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Adds calendar months to a date, clamping the day to the end of the target month.
///
/// `2025-01-31 + 1 month` is `2025-02-28`. Overflow past the calendar range
/// leaves the date unchanged.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}
