//! Outlet availability and order time-slot resolution.
//!
//! Everything here is pure computation over an already fetched
//! [`OutletSchedule`]; each call rebuilds its output from the inputs it is
//! given, so recomputing with the same inputs always yields the same result.

pub mod classifier;
pub mod models;
pub mod selection;
pub mod slots;
pub mod time;
pub mod window;

pub use classifier::classify_date;
pub use models::{
    DateClassification, DateEntry, DayName, DaySchedule, Exception, OperatingPeriod,
    OutletSchedule, Resolution, Selection, TimeSlot, WeeklySchedule, ASAP,
};
pub use selection::{finalize_selection, resolve_selection, selection_label};
pub use slots::generate_slots;
pub use window::build_date_window;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tunables for slot generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Step between generated slots
    pub slot_granularity_minutes: u32,
    /// Lead time added to "now" before the first same-day slot
    pub preparation_buffer_minutes: u32,
    /// Number of dates offered
    pub window_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: time::SLOT_MINUTES,
            preparation_buffer_minutes: 60,
            window_days: 7,
        }
    }
}

/// Availability engine bound to one outlet's schedule
#[derive(Debug, Clone)]
pub struct AvailabilityEngine {
    outlet: OutletSchedule,
    settings: EngineSettings,
}

impl AvailabilityEngine {
    pub fn new(outlet: OutletSchedule, settings: EngineSettings) -> Self {
        Self { outlet, settings }
    }

    /// Classification of a single date
    pub fn classify(&self, date: chrono::NaiveDate) -> DateClassification {
        classify_date(
            date,
            &self.outlet.operating_schedule,
            &self.outlet.exceptions,
        )
    }

    pub fn build_date_window(&self, now: &NaiveDateTime) -> Vec<DateEntry> {
        build_date_window(
            &self.outlet.operating_schedule,
            &self.outlet.exceptions,
            now,
            &self.settings,
        )
    }

    pub fn generate_slots(&self, entry: &DateEntry, now: &NaiveDateTime) -> Vec<TimeSlot> {
        generate_slots(
            entry.date,
            entry.classification,
            &self.outlet.operating_schedule,
            &self.outlet.exceptions,
            now,
            &self.settings,
        )
    }

    pub fn resolve_selection(
        &self,
        persisted: Option<&Selection>,
        window: &[DateEntry],
        now: &NaiveDateTime,
    ) -> Resolution {
        resolve_selection(
            persisted,
            window,
            &self.outlet.operating_schedule,
            &self.outlet.exceptions,
            now,
            &self.settings,
        )
    }

    /// Turn a resolved slot on a date into the canonical selection
    pub fn finalize(&self, entry: &DateEntry, slot: &TimeSlot, now: &NaiveDateTime) -> Selection {
        let label = selection_label(&entry.date, slot, &now.date());
        finalize_selection(&label, &entry.date_string, &slot.time, now, &self.settings)
    }
}
