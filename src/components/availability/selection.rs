use super::models::{DateEntry, Exception, Resolution, Selection, TimeSlot, WeeklySchedule, ASAP};
use super::slots::generate_slots;
use super::EngineSettings;
use crate::utils::time::{format_date, format_minutes, minutes_of_day, parse_date, to_minutes};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

const TODAY_PREFIX: &str = "Today";

impl Selection {
    /// Decode a persisted selection; corrupt or incomplete records read as absent
    pub fn from_persisted(raw: &str) -> Option<Self> {
        let selection: Selection = match serde_json::from_str(raw) {
            Ok(selection) => selection,
            Err(e) => {
                warn!("Ignoring corrupt persisted selection: {}", e);
                return None;
            }
        };
        if parse_date(&selection.date).is_err() || to_minutes(&selection.time).is_err() {
            warn!("Ignoring persisted selection with invalid date/time: {:?}", selection);
            return None;
        }
        Some(selection)
    }

    pub fn is_asap(&self) -> bool {
        self.estimated_time == ASAP
    }
}

fn matches_persisted(slot: &TimeSlot, persisted: &Selection) -> bool {
    if !slot.is_operate {
        return false;
    }
    if persisted.is_asap() {
        slot.is_asap()
    } else {
        !slot.is_asap() && slot.time == persisted.time
    }
}

/// Reconcile a previously persisted selection with a freshly built date window
///
/// Falls back to the first orderable date and the first selectable slot
/// whenever the stored choice is no longer available.
pub fn resolve_selection(
    persisted: Option<&Selection>,
    window: &[DateEntry],
    schedule: &WeeklySchedule,
    exceptions: &[Exception],
    now: &NaiveDateTime,
    settings: &EngineSettings,
) -> Resolution {
    let kept = persisted.and_then(|selection| {
        window
            .iter()
            .find(|entry| entry.is_operate && entry.date_string == selection.date)
    });
    if persisted.is_some() && kept.is_none() {
        debug!("Persisted date no longer orderable, falling back");
    }

    let Some(entry) = kept.or_else(|| window.iter().find(|entry| entry.is_operate)) else {
        debug!("No orderable date in window");
        return Resolution::default();
    };

    let slots = generate_slots(
        entry.date,
        entry.classification,
        schedule,
        exceptions,
        now,
        settings,
    );

    let index = persisted
        .and_then(|selection| slots.iter().position(|slot| matches_persisted(slot, selection)))
        .or_else(|| slots.iter().position(|slot| slot.is_operate));

    Resolution {
        date_entry: Some(entry.clone()),
        time_slot: index.map(|i| slots[i].clone()),
        index,
        slots,
    }
}

/// Human label for a chosen slot: "ASAP", "Today HH:MM" or "Oct 17 HH:MM"
pub fn selection_label(date: &NaiveDate, slot: &TimeSlot, today: &NaiveDate) -> String {
    if slot.is_asap() {
        ASAP.to_string()
    } else if date == today {
        format!("{} {}", TODAY_PREFIX, slot.time)
    } else {
        format!("{} {}", date.format("%b %-d"), slot.time)
    }
}

/// Parse "Oct 17 14:30" back into a date and minute-of-day
///
/// The year is the one that puts the date on or after `today`.
fn parse_dated_label(label: &str, today: &NaiveDate) -> Option<(NaiveDate, u32)> {
    let (day_part, time_part) = label.trim().rsplit_once(' ')?;
    let minute = to_minutes(time_part).ok()?;
    let parse_in = |year: i32| {
        NaiveDate::parse_from_str(&format!("{} {}", year, day_part), "%Y %b %d").ok()
    };
    let date = match parse_in(today.year()) {
        Some(date) if date >= *today => date,
        _ => parse_in(today.year() + 1)?,
    };
    Some((date, minute))
}

fn selection_at(label: &str, date: &NaiveDate, minute: u32) -> Selection {
    Selection {
        estimated_time: label.to_string(),
        date: format_date(date),
        time: format_minutes(minute),
    }
}

/// Convert a chosen label into the canonical `(date, time)` selection
///
/// ASAP and "Today" labels resolve to now, unless the chosen time on the
/// current date is at least the preparation buffer ahead, in which case that
/// exact time is kept.
pub fn finalize_selection(
    label: &str,
    date: &str,
    time: &str,
    now: &NaiveDateTime,
    settings: &EngineSettings,
) -> Selection {
    let today = now.date();
    let now_minute = minutes_of_day(now);

    if label == ASAP || label.starts_with(TODAY_PREFIX) {
        let chosen = label
            .strip_prefix(TODAY_PREFIX)
            .and_then(|rest| to_minutes(rest.trim()).ok())
            .or_else(|| to_minutes(time).ok());
        let on_today = parse_date(date).map(|d| d == today).unwrap_or(label != ASAP);

        return match chosen {
            Some(minute)
                if on_today && minute >= now_minute + settings.preparation_buffer_minutes =>
            {
                selection_at(label, &today, minute)
            }
            _ => selection_at(label, &today, now_minute),
        };
    }

    if let Some((parsed_date, minute)) = parse_dated_label(label, &today) {
        return selection_at(label, &parsed_date, minute);
    }

    // Unrecognised label: trust the explicit date/time when they parse
    match (parse_date(date), to_minutes(time)) {
        (Ok(explicit_date), Ok(minute)) => selection_at(label, &explicit_date, minute),
        _ => {
            warn!("Cannot resolve selection label {:?}, defaulting to now", label);
            selection_at(label, &today, now_minute)
        }
    }
}
