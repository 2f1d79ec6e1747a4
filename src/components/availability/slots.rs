use super::classifier::DayWindows;
use super::models::{DateClassification, Exception, TimeSlot, WeeklySchedule};
use super::time::{closed_slot_times, round_up_to_slot, slot_times, Interval};
use super::EngineSettings;
use crate::utils::time::{format_minutes, minutes_of_day};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Earliest slot start orderable today: now plus the preparation buffer, rounded up
pub fn earliest_slot_today(now: &NaiveDateTime, settings: &EngineSettings) -> u32 {
    round_up_to_slot(
        minutes_of_day(now) + settings.preparation_buffer_minutes,
        settings.slot_granularity_minutes,
    )
}

/// Period-by-period slot times, skipping anything before `cursor`
fn period_slots(windows: &DayWindows, cursor: u32, granularity: u32) -> Vec<u32> {
    windows
        .periods
        .iter()
        .flat_map(|period| {
            // The cursor never precedes the period's own start
            let from = cursor.max(period.start);
            slot_times(*period, granularity)
                .into_iter()
                .filter(move |slot| *slot >= from)
        })
        .collect()
}

/// ASAP is offered on a fully open day only while a period is running
fn offers_asap_fully_open(windows: &DayWindows, now_minute: u32) -> bool {
    windows.periods.iter().any(|period| period.holds(now_minute))
}

/// ASAP on a partially open day is gated on the hour of the rounded current
/// slot against the first and last closed hours, in exception order.
///
/// This is coarser than the fully open check and does not look at the
/// operating periods at all.
fn offers_asap_partially_open(closed: &[u32], now_minute: u32, granularity: u32) -> bool {
    let (Some(first), Some(last)) = (closed.first(), closed.last()) else {
        return true;
    };
    let hour = round_up_to_slot(now_minute, granularity) / 60;
    !(first / 60 <= hour && hour <= last / 60)
}

/// Generate the orderable time slots for one date
///
/// Slots are chronological within each period, periods follow the weekly
/// schedule's declared order, and ASAP (when offered) comes first.
pub fn generate_slots(
    date: NaiveDate,
    classification: DateClassification,
    schedule: &WeeklySchedule,
    exceptions: &[Exception],
    now: &NaiveDateTime,
    settings: &EngineSettings,
) -> Vec<TimeSlot> {
    let today = now.date();
    if classification == DateClassification::Closed || date < today {
        return Vec::new();
    }

    let windows = match DayWindows::for_date(date, schedule, exceptions) {
        Ok(Some(windows)) => windows,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Cannot generate slots for {}: {}", date, e);
            return Vec::new();
        }
    };

    let granularity = settings.slot_granularity_minutes;
    let is_today = date == today;
    let now_minute = minutes_of_day(now);
    let cursor = if is_today {
        earliest_slot_today(now, settings)
    } else {
        0
    };
    let times = period_slots(&windows, cursor, granularity);

    let asap = is_today
        && match classification {
            DateClassification::PartiallyOpen => {
                let closed: Vec<u32> = windows
                    .closures
                    .iter()
                    .flat_map(|closure| closed_slot_times(*closure, granularity))
                    .collect();
                offers_asap_partially_open(&closed, now_minute, granularity)
            }
            _ => offers_asap_fully_open(&windows, now_minute),
        };

    // Only partially open days carry closures into the slot list
    let closures: &[Interval] = match classification {
        DateClassification::PartiallyOpen => windows.closures.as_slice(),
        _ => &[],
    };

    let slots: Vec<TimeSlot> = asap
        .then(TimeSlot::asap)
        .into_iter()
        .chain(times.into_iter().map(|minute| TimeSlot {
            time: format_minutes(minute),
            is_operate: !closures.iter().any(|closure| closure.contains(minute)),
        }))
        .collect();

    debug!(
        "Generated {} slots for {} ({:?}, asap: {})",
        slots.len(),
        date,
        classification,
        asap
    );
    slots
}
