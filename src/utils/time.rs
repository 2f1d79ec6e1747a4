use crate::error::{invalid_date_error, invalid_time_error, SlotResult};
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Minutes in a full day; "24:00" parses to this value as an end-of-day marker
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour == 24 && minute == 0 {
        return Some((hour, minute));
    }
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Convert "HH:MM" to minutes since midnight
pub fn to_minutes(time_str: &str) -> SlotResult<u32> {
    let (hour, minute) = parse_time(time_str.trim()).ok_or_else(|| invalid_time_error(time_str))?;
    Ok(hour * 60 + minute)
}

/// Format minutes since midnight as zero-padded "HH:MM"
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Wall-clock minutes since midnight of a local datetime, seconds dropped
pub fn minutes_of_day(dt: &NaiveDateTime) -> u32 {
    dt.hour() * 60 + dt.minute()
}

/// Parse a "YYYY-MM-DD" date
pub fn parse_date(date_str: &str) -> SlotResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| invalid_date_error(date_str))
}

/// Format a date as "YYYY-MM-DD"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
