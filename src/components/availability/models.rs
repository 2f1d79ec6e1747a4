use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label of the same-day "prepare immediately" pseudo-slot
pub const ASAP: &str = "ASAP";

/// Day of the week as the outlet service spells it ("Monday" ... "Sunday")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayName {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayName::Monday => "Monday",
            DayName::Tuesday => "Tuesday",
            DayName::Wednesday => "Wednesday",
            DayName::Thursday => "Thursday",
            DayName::Friday => "Friday",
            DayName::Saturday => "Saturday",
            DayName::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayName {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayName::Monday,
            Weekday::Tue => DayName::Tuesday,
            Weekday::Wed => DayName::Wednesday,
            Weekday::Thu => DayName::Thursday,
            Weekday::Fri => DayName::Friday,
            Weekday::Sat => DayName::Saturday,
            Weekday::Sun => DayName::Sunday,
        }
    }
}

/// A contiguous open interval within one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingPeriod {
    #[serde(alias = "start_time")]
    pub start_time: String,
    #[serde(alias = "end_time")]
    pub end_time: String,
}

impl OperatingPeriod {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// Operating hours for one weekday
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[serde(alias = "is_operated", default)]
    pub is_operated: bool,
    #[serde(default)]
    pub periods: Vec<OperatingPeriod>,
}

impl DaySchedule {
    /// An operated day with the given periods, in declared order
    pub fn open(periods: Vec<OperatingPeriod>) -> Self {
        Self {
            is_operated: true,
            periods,
        }
    }

    pub fn closed() -> Self {
        Self::default()
    }
}

/// Weekly operating schedule keyed by weekday
///
/// Unknown day names fail deserialization; days absent from the payload are
/// treated as not operated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    days: BTreeMap<DayName, DaySchedule>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for one weekday
    pub fn with_day(mut self, day: DayName, schedule: DaySchedule) -> Self {
        self.days.insert(day, schedule);
        self
    }

    /// Schedule for a weekday, if the outlet declared one
    pub fn day(&self, day: DayName) -> Option<&DaySchedule> {
        self.days.get(&day)
    }
}

/// A closure window on one specific calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    pub date: String,
    #[serde(alias = "start_time")]
    pub start_time: String,
    #[serde(alias = "end_time")]
    pub end_time: String,
}

impl Exception {
    pub fn new(
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// Payload returned by the outlet data service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutletSchedule {
    #[serde(alias = "operatingSchedule")]
    pub operating_schedule: WeeklySchedule,
    #[serde(default)]
    pub exceptions: Vec<Exception>,
}

/// Per-date availability verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateClassification {
    Closed,
    FullyOpen,
    PartiallyOpen,
}

/// One entry of the rolling date window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateEntry {
    pub date: NaiveDate,
    /// "YYYY-MM-DD"
    pub date_string: String,
    /// "Today" or "Oct 17"
    pub label: String,
    pub is_operate: bool,
    pub day_name: DayName,
    pub is_partial_open: bool,
    pub classification: DateClassification,
}

/// A candidate order time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// "HH:MM" or "ASAP"
    pub time: String,
    pub is_operate: bool,
}

impl TimeSlot {
    pub fn asap() -> Self {
        Self {
            time: ASAP.to_string(),
            is_operate: true,
        }
    }

    pub fn is_asap(&self) -> bool {
        self.time == ASAP
    }
}

/// The canonical, persisted order time choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Human label: "ASAP", "Today 14:30" or "Oct 17 14:30"
    pub estimated_time: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
}

/// Result of reconciling a persisted selection with fresh availability
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub date_entry: Option<DateEntry>,
    pub time_slot: Option<TimeSlot>,
    /// Position of `time_slot` within `slots`, for highlighting
    pub index: Option<usize>,
    /// Slots regenerated for `date_entry`
    pub slots: Vec<TimeSlot>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.time_slot.is_none()
    }
}
