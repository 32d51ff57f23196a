use crate::models::common::{CalendarDate, Timestamp};
use chrono::{Datelike, Local, Utc};

/// Returns the current time.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Returns the current calendar date in the local time zone.
pub fn today() -> CalendarDate {
    Local::now().date_naive()
}

/// Formats a timestamp in local time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_date(date: &CalendarDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn same_month(a: &CalendarDate, b: &CalendarDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
