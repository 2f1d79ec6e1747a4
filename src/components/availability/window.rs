use super::classifier::{classify_date, DayWindows};
use super::models::{DateClassification, DateEntry, DayName, Exception, WeeklySchedule};
use super::EngineSettings;
use crate::utils::time::{format_date, minutes_of_day};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Display label for a date relative to `today`
pub fn date_label(date: &NaiveDate, today: &NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

/// Whether today has already closed for a fully open day
fn is_past_closing(
    today: NaiveDate,
    now: &NaiveDateTime,
    schedule: &WeeklySchedule,
    exceptions: &[Exception],
) -> bool {
    if classify_date(today, schedule, exceptions) != DateClassification::FullyOpen {
        return false;
    }
    match DayWindows::for_date(today, schedule, exceptions) {
        Ok(Some(windows)) => windows
            .closing_time()
            .is_some_and(|closing| minutes_of_day(now) >= closing),
        _ => false,
    }
}

/// Build the rolling window of orderable dates, starting today or tomorrow
pub fn build_date_window(
    schedule: &WeeklySchedule,
    exceptions: &[Exception],
    now: &NaiveDateTime,
    settings: &EngineSettings,
) -> Vec<DateEntry> {
    let today = now.date();
    let first_day = if is_past_closing(today, now, schedule, exceptions) {
        debug!("Outlet already closed for {}, window starts tomorrow", today);
        today + Duration::days(1)
    } else {
        today
    };

    (0..settings.window_days)
        .map(|offset| {
            let date = first_day + Duration::days(i64::from(offset));
            let classification = classify_date(date, schedule, exceptions);
            DateEntry {
                date,
                date_string: format_date(&date),
                label: date_label(&date, &today),
                is_operate: classification != DateClassification::Closed,
                day_name: DayName::from(date.weekday()),
                is_partial_open: classification == DateClassification::PartiallyOpen,
                classification,
            }
        })
        .collect()
}
