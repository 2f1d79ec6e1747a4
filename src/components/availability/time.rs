use super::models::{Exception, OperatingPeriod};
use crate::error::SlotResult;
use crate::utils::time::{format_minutes, to_minutes};

/// Default slot granularity in minutes
pub const SLOT_MINUTES: u32 = 30;

/// Half-open time-of-day interval in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Inclusive.
    pub start: u32,
    /// Exclusive.
    pub end: u32,
}

impl Interval {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Parse a pair of "HH:MM" strings
    pub fn parse(start: &str, end: &str) -> SlotResult<Self> {
        Ok(Self::new(to_minutes(start)?, to_minutes(end)?))
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if `minute` falls inside the half-open range `start..end`
    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }

    /// True if `minute` falls inside the closed range `start..=end`
    pub fn holds(&self, minute: u32) -> bool {
        self.start <= minute && minute <= self.end
    }
}

impl TryFrom<&OperatingPeriod> for Interval {
    type Error = crate::error::Error;

    fn try_from(period: &OperatingPeriod) -> SlotResult<Self> {
        Interval::parse(&period.start_time, &period.end_time)
    }
}

impl TryFrom<&Exception> for Interval {
    type Error = crate::error::Error;

    fn try_from(exception: &Exception) -> SlotResult<Self> {
        Interval::parse(&exception.start_time, &exception.end_time)
    }
}

/// True if the intervals share any instant; touching endpoints do not count
pub fn overlaps(a: Interval, b: Interval) -> bool {
    a.start < b.end && b.start < a.end
}

/// True if `inner` lies entirely within `outer`
pub fn covers(outer: Interval, inner: Interval) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

/// Round a minute-of-day up to the next slot boundary; boundaries map to themselves
pub fn round_up_to_slot(minute: u32, granularity: u32) -> u32 {
    if granularity == 0 {
        return minute;
    }
    minute.div_ceil(granularity) * granularity
}

/// Slot start times from `start` up to but excluding `end`
pub fn slot_times(interval: Interval, granularity: u32) -> Vec<u32> {
    if granularity == 0 {
        return Vec::new();
    }
    (interval.start..interval.end)
        .step_by(granularity as usize)
        .collect()
}

/// Slot start times inside a closure window, aligned to the slot grid
pub fn closed_slot_times(closure: Interval, granularity: u32) -> Vec<u32> {
    let aligned = Interval::new(round_up_to_slot(closure.start, granularity), closure.end);
    slot_times(aligned, granularity)
}

/// Render minute values as "HH:MM" strings
pub fn format_slots(minutes: &[u32]) -> Vec<String> {
    minutes.iter().map(|m| format_minutes(*m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: &str, end: &str) -> Interval {
        Interval::parse(start, end).unwrap()
    }

    #[test]
    fn test_overlaps() {
        assert!(overlaps(iv("09:00", "12:00"), iv("11:00", "13:00")));
        assert!(overlaps(iv("09:00", "22:00"), iv("12:00", "13:00")));
        // Touching endpoints
        assert!(!overlaps(iv("09:00", "12:00"), iv("12:00", "13:00")));
        assert!(!overlaps(iv("12:00", "13:00"), iv("09:00", "12:00")));
        assert!(!overlaps(iv("09:00", "10:00"), iv("18:00", "22:00")));
    }

    #[test]
    fn test_contains_is_half_open() {
        let closure = iv("12:00", "13:00");
        assert!(closure.contains(720));
        assert!(closure.contains(765));
        assert!(!closure.contains(780));
        assert!(!closure.contains(719));
        assert!(closure.holds(780));
    }

    #[test]
    fn test_covers() {
        assert!(covers(iv("09:00", "22:00"), iv("12:00", "13:00")));
        assert!(covers(iv("09:00", "22:00"), iv("09:00", "22:00")));
        assert!(!covers(iv("09:00", "22:00"), iv("08:30", "13:00")));
        assert!(!covers(iv("12:00", "13:00"), iv("09:00", "22:00")));
    }

    #[test]
    fn test_round_up_to_slot() {
        assert_eq!(round_up_to_slot(600, 30), 600);
        assert_eq!(round_up_to_slot(601, 30), 630);
        assert_eq!(round_up_to_slot(629, 30), 630);
        assert_eq!(round_up_to_slot(630, 30), 630);
        assert_eq!(round_up_to_slot(631, 30), 660);
        assert_eq!(round_up_to_slot(23 * 60 + 45, 30), 24 * 60);
    }

    #[test]
    fn test_slot_times() {
        let slots = format_slots(&slot_times(iv("10:00", "12:00"), 30));
        assert_eq!(slots, vec!["10:00", "10:30", "11:00", "11:30"]);
        assert!(slot_times(iv("18:00", "18:00"), 30).is_empty());
    }

    #[test]
    fn test_closed_slot_times() {
        let closed = format_slots(&closed_slot_times(iv("12:00", "13:00"), 30));
        assert_eq!(closed, vec!["12:00", "12:30"]);

        // Unaligned closures only close the grid slots they reach
        let closed = format_slots(&closed_slot_times(iv("12:15", "13:00"), 30));
        assert_eq!(closed, vec!["12:30"]);
    }
}
