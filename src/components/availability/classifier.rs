use super::models::{DateClassification, DayName, Exception, WeeklySchedule};
use super::time::{covers, Interval};
use crate::error::SlotResult;
use crate::utils::time::format_date;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

/// Parsed operating periods and closures for one calendar date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayWindows {
    /// Operating periods in declared order
    pub periods: Vec<Interval>,
    /// Non-empty closures dated for this day
    pub closures: Vec<Interval>,
}

impl DayWindows {
    /// Resolve the weekday's periods and the date's closures
    ///
    /// Returns `Ok(None)` when the weekday is not operated. Unparsable times
    /// are reported as errors so the caller can close just this day.
    pub fn for_date(
        date: NaiveDate,
        schedule: &WeeklySchedule,
        exceptions: &[Exception],
    ) -> SlotResult<Option<Self>> {
        let day = match schedule.day(DayName::from(date.weekday())) {
            Some(day) if day.is_operated => day,
            _ => return Ok(None),
        };

        let periods = day
            .periods
            .iter()
            .map(Interval::try_from)
            .collect::<SlotResult<Vec<_>>>()?;

        let closures = exceptions_on(date, exceptions)
            .map(Interval::try_from)
            .collect::<SlotResult<Vec<_>>>()?
            .into_iter()
            // Zero-width closures remove nothing
            .filter(|closure| !closure.is_empty())
            .collect();

        Ok(Some(Self { periods, closures }))
    }

    /// Latest closing time across the day's periods
    pub fn closing_time(&self) -> Option<u32> {
        self.periods.iter().map(|p| p.end).max()
    }

    /// A single period opening and closing at the same instant marks the day closed
    fn is_closed_sentinel(&self) -> bool {
        match self.periods.as_slice() {
            [] => true,
            [only] => only.start == only.end,
            _ => false,
        }
    }

    /// Earliest opening to latest closing, regardless of declared order
    fn opening_span(&self) -> Option<Interval> {
        let opening = self.periods.iter().map(|p| p.start).min()?;
        let closing = self.closing_time()?;
        Some(Interval::new(opening, closing))
    }

    /// One closure spanning first opening to last closing shuts the whole day,
    /// even across a gap between periods.
    fn is_whole_day_closure(&self) -> bool {
        let Some(span) = self.opening_span() else {
            return false;
        };
        match self.closures.as_slice() {
            [only] => covers(*only, span),
            _ => false,
        }
    }

    fn is_period_closed(&self, period: &Interval) -> bool {
        self.closures.iter().any(|closure| closure == period)
    }

    fn has_sub_range_closure(&self, period: &Interval) -> bool {
        self.closures
            .iter()
            .any(|closure| closure != period && covers(*period, *closure))
    }

    /// Overlay the closures on the periods
    pub fn classify(&self) -> DateClassification {
        if self.is_closed_sentinel() {
            return DateClassification::Closed;
        }
        if self.closures.is_empty() {
            return DateClassification::FullyOpen;
        }

        // Full coverage must be decided before partial coverage
        if self.is_whole_day_closure() {
            return DateClassification::Closed;
        }
        let closed_periods = self
            .periods
            .iter()
            .filter(|period| self.is_period_closed(period))
            .count();
        if closed_periods == self.periods.len() {
            return DateClassification::Closed;
        }

        if closed_periods > 0
            || self
                .periods
                .iter()
                .any(|period| self.has_sub_range_closure(period))
        {
            return DateClassification::PartiallyOpen;
        }

        DateClassification::FullyOpen
    }
}

/// Exceptions dated for `date`
pub fn exceptions_on<'a>(
    date: NaiveDate,
    exceptions: &'a [Exception],
) -> impl Iterator<Item = &'a Exception> + 'a {
    let date_str = format_date(&date);
    exceptions
        .iter()
        .filter(move |exception| exception.date.trim() == date_str)
}

/// Classify a calendar date as Closed, FullyOpen or PartiallyOpen
///
/// Malformed schedule data closes only the affected date.
pub fn classify_date(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    exceptions: &[Exception],
) -> DateClassification {
    let classification = match DayWindows::for_date(date, schedule, exceptions) {
        Ok(Some(windows)) => windows.classify(),
        Ok(None) => DateClassification::Closed,
        Err(e) => {
            warn!("Malformed schedule data for {}, treating as closed: {}", date, e);
            DateClassification::Closed
        }
    };
    debug!("Classified {} as {:?}", date, classification);
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::availability::models::{DaySchedule, OperatingPeriod};

    // 2023-01-02 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
    }

    fn schedule(periods: &[(&str, &str)]) -> WeeklySchedule {
        WeeklySchedule::new().with_day(
            DayName::Monday,
            DaySchedule::open(
                periods
                    .iter()
                    .map(|(s, e)| OperatingPeriod::new(*s, *e))
                    .collect(),
            ),
        )
    }

    fn closure(start: &str, end: &str) -> Exception {
        Exception::new("2023-01-02", start, end)
    }

    #[test]
    fn test_not_operated_is_closed() {
        let schedule = WeeklySchedule::new().with_day(DayName::Monday, DaySchedule::closed());
        assert_eq!(classify_date(monday(), &schedule, &[]), DateClassification::Closed);

        // Undeclared weekday
        let tuesday = monday().succ_opt().unwrap();
        assert_eq!(
            classify_date(tuesday, &self::schedule(&[("09:00", "22:00")]), &[]),
            DateClassification::Closed
        );
    }

    #[test]
    fn test_sentinel_and_empty_periods_are_closed() {
        assert_eq!(classify_date(monday(), &schedule(&[]), &[]), DateClassification::Closed);
        assert_eq!(
            classify_date(monday(), &schedule(&[("00:00", "00:00")]), &[]),
            DateClassification::Closed
        );
    }

    #[test]
    fn test_no_exceptions_is_fully_open() {
        let exceptions = vec![Exception::new("2023-01-03", "09:00", "22:00")];
        assert_eq!(
            classify_date(monday(), &schedule(&[("09:00", "22:00")]), &exceptions),
            DateClassification::FullyOpen
        );
    }

    #[test]
    fn test_every_period_matched_is_closed() {
        let schedule = schedule(&[("10:00", "15:00"), ("18:00", "22:00")]);
        let exceptions = vec![closure("18:00", "22:00"), closure("10:00", "15:00")];
        assert_eq!(classify_date(monday(), &schedule, &exceptions), DateClassification::Closed);
    }

    #[test]
    fn test_whole_day_span_is_closed() {
        let schedule = schedule(&[("10:00", "15:00"), ("18:00", "22:00")]);
        let exceptions = vec![closure("10:00", "22:00")];
        assert_eq!(classify_date(monday(), &schedule, &exceptions), DateClassification::Closed);
    }

    #[test]
    fn test_out_of_order_periods_keep_gap_closure_open() {
        let schedule = schedule(&[("18:00", "22:00"), ("10:00", "15:00")]);
        let exceptions = vec![closure("16:00", "17:00")];
        assert_eq!(
            classify_date(monday(), &schedule, &exceptions),
            DateClassification::FullyOpen
        );

        // The whole-day span still closes the day in either order
        let exceptions = vec![closure("10:00", "22:00")];
        assert_eq!(classify_date(monday(), &schedule, &exceptions), DateClassification::Closed);
    }

    #[test]
    fn test_sub_range_is_partial() {
        let exceptions = vec![closure("12:00", "13:00")];
        assert_eq!(
            classify_date(monday(), &schedule(&[("09:00", "22:00")]), &exceptions),
            DateClassification::PartiallyOpen
        );
    }

    #[test]
    fn test_one_of_two_periods_closed_is_partial() {
        let schedule = schedule(&[("10:00", "15:00"), ("18:00", "22:00")]);
        let exceptions = vec![closure("10:00", "15:00")];
        assert_eq!(
            classify_date(monday(), &schedule, &exceptions),
            DateClassification::PartiallyOpen
        );
    }

    #[test]
    fn test_zero_width_exception_is_ignored() {
        let exceptions = vec![closure("18:00", "18:00")];
        assert_eq!(
            classify_date(monday(), &schedule(&[("09:00", "22:00")]), &exceptions),
            DateClassification::FullyOpen
        );
    }

    #[test]
    fn test_unrelated_exception_keeps_day_open() {
        // Outside any period
        let exceptions = vec![closure("06:00", "08:00")];
        assert_eq!(
            classify_date(monday(), &schedule(&[("09:00", "22:00")]), &exceptions),
            DateClassification::FullyOpen
        );
    }

    #[test]
    fn test_malformed_period_closes_day() {
        assert_eq!(
            classify_date(monday(), &schedule(&[("9am", "22:00")]), &[]),
            DateClassification::Closed
        );
        let exceptions = vec![closure("12:00", "late")];
        assert_eq!(
            classify_date(monday(), &schedule(&[("09:00", "22:00")]), &exceptions),
            DateClassification::Closed
        );
    }
}
