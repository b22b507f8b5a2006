pub mod petition;

pub use petition::*;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;

/// Storage form for every timestamp column. The offset is written literally.
pub const STORAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+10:00";

/// Queensland time: UTC+10 all year round.
pub static BRISBANE: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(10 * 3600).expect("valid UTC+10 offset"));

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(STORAGE_TIMESTAMP_FORMAT).to_string()
}

/// Dates are stored as midnight local time.
pub fn format_date(value: NaiveDate) -> String {
    format_timestamp(value.and_time(NaiveTime::MIN))
}
