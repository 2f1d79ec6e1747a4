use chrono::{NaiveDate, NaiveDateTime};
use orderslot::components::availability::{
    classify_date, AvailabilityEngine, DateClassification, DayName, DaySchedule, EngineSettings,
    Exception, OperatingPeriod, OutletSchedule, Selection, TimeSlot, WeeklySchedule,
};

const ALL_DAYS: [DayName; 7] = [
    DayName::Monday,
    DayName::Tuesday,
    DayName::Wednesday,
    DayName::Thursday,
    DayName::Friday,
    DayName::Saturday,
    DayName::Sunday,
];

fn periods(ranges: &[(&str, &str)]) -> Vec<OperatingPeriod> {
    ranges
        .iter()
        .map(|(start, end)| OperatingPeriod::new(*start, *end))
        .collect()
}

/// Every day open with the same periods
fn every_day(ranges: &[(&str, &str)]) -> WeeklySchedule {
    ALL_DAYS.into_iter().fold(WeeklySchedule::new(), |schedule, day| {
        schedule.with_day(day, DaySchedule::open(periods(ranges)))
    })
}

/// 2023-01-02 is a Monday
fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 2)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn engine(schedule: WeeklySchedule, exceptions: Vec<Exception>) -> AvailabilityEngine {
    AvailabilityEngine::new(
        OutletSchedule {
            operating_schedule: schedule,
            exceptions,
        },
        EngineSettings::default(),
    )
}

fn times(slots: &[TimeSlot]) -> Vec<&str> {
    slots.iter().map(|slot| slot.time.as_str()).collect()
}

#[test]
fn test_not_operated_day_is_closed_regardless_of_exceptions() {
    let schedule =
        every_day(&[("09:00", "22:00")]).with_day(DayName::Monday, DaySchedule::closed());
    let monday = monday_at(0, 0).date();

    let exception_sets = vec![
        vec![],
        vec![Exception::new("2023-01-02", "12:00", "13:00")],
        vec![Exception::new("2023-01-02", "09:00", "22:00")],
        vec![Exception::new("2023-01-02", "18:00", "18:00")],
    ];
    for exceptions in exception_sets {
        assert_eq!(
            classify_date(monday, &schedule, &exceptions),
            DateClassification::Closed
        );
    }
}

#[test]
fn test_partial_closure_marks_only_closed_slots() {
    let engine = engine(
        every_day(&[("09:00", "22:00")]),
        vec![Exception::new("2023-01-03", "12:00", "13:00")],
    );
    let window = engine.build_date_window(&monday_at(10, 0));

    let tuesday = &window[1];
    assert_eq!(tuesday.date_string, "2023-01-03");
    assert_eq!(tuesday.classification, DateClassification::PartiallyOpen);
    assert!(tuesday.is_partial_open);

    let slots = engine.generate_slots(tuesday, &monday_at(10, 0));
    let is_operate = |time: &str| {
        slots
            .iter()
            .find(|slot| slot.time == time)
            .map(|slot| slot.is_operate)
            .unwrap()
    };
    assert!(is_operate("11:30"));
    assert!(!is_operate("12:00"));
    assert!(is_operate("13:00"));
}

#[test]
fn test_monday_before_opening() {
    let schedule = WeeklySchedule::new().with_day(
        DayName::Monday,
        DaySchedule::open(periods(&[("10:00", "15:00"), ("18:00", "22:00")])),
    );
    let engine = engine(schedule, vec![]);
    let now = monday_at(8, 0);

    let window = engine.build_date_window(&now);
    assert_eq!(window[0].date_string, "2023-01-02");
    assert!(window[0].is_operate);
    assert!(window[1..].iter().all(|entry| !entry.is_operate));

    let slots = engine.generate_slots(&window[0], &now);
    let expected = vec![
        "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30",
        "18:00", "18:30", "19:00", "19:30", "20:00", "20:30", "21:00", "21:30",
    ];
    assert_eq!(times(&slots), expected);
}

#[test]
fn test_late_evening_offers_only_asap() {
    let engine = engine(every_day(&[("09:00", "22:00")]), vec![]);
    let now = monday_at(21, 45);

    let window = engine.build_date_window(&now);
    assert_eq!(window[0].date_string, "2023-01-02");

    let slots = engine.generate_slots(&window[0], &now);
    assert_eq!(times(&slots), vec!["ASAP"]);
}

#[test]
fn test_persisted_date_closed_by_new_exception_falls_back() {
    let persisted = Selection {
        estimated_time: "Jan 3 18:00".to_string(),
        date: "2023-01-03".to_string(),
        time: "18:00".to_string(),
    };
    let now = monday_at(22, 30);

    // Monday already closed, Tuesday closed all day by an exception
    let engine = engine(
        every_day(&[("09:00", "22:00")]),
        vec![Exception::new("2023-01-03", "09:00", "22:00")],
    );
    let window = engine.build_date_window(&now);
    assert_eq!(window[0].date_string, "2023-01-03");
    assert!(!window[0].is_operate);

    let resolution = engine.resolve_selection(Some(&persisted), &window, &now);
    let entry = resolution.date_entry.unwrap();
    assert_eq!(entry.date_string, "2023-01-04");
    assert_ne!(entry.classification, DateClassification::Closed);

    // Same time still exists on the fallback date
    assert_eq!(resolution.time_slot.unwrap().time, "18:00");
}

#[test]
fn test_missing_slot_falls_back_to_first_selectable() {
    let persisted = Selection {
        estimated_time: "Jan 3 12:00".to_string(),
        date: "2023-01-03".to_string(),
        time: "12:00".to_string(),
    };
    let now = monday_at(10, 0);
    let engine = engine(
        every_day(&[("09:00", "22:00")]),
        vec![Exception::new("2023-01-03", "12:00", "13:00")],
    );

    let window = engine.build_date_window(&now);
    let resolution = engine.resolve_selection(Some(&persisted), &window, &now);
    assert_eq!(resolution.date_entry.unwrap().date_string, "2023-01-03");
    assert_eq!(resolution.index, Some(0));
    assert_eq!(resolution.time_slot.unwrap().time, "09:00");
}

#[test]
fn test_resolve_and_finalize_is_idempotent() {
    let engine = engine(every_day(&[("09:00", "22:00")]), vec![]);
    let now = monday_at(12, 10);
    let window = engine.build_date_window(&now);

    let seeds = vec![
        None,
        Some(Selection {
            estimated_time: "Today 15:00".to_string(),
            date: "2023-01-02".to_string(),
            time: "15:00".to_string(),
        }),
        Some(Selection {
            estimated_time: "Jan 5 18:30".to_string(),
            date: "2023-01-05".to_string(),
            time: "18:30".to_string(),
        }),
    ];

    for seed in seeds {
        let first = engine.resolve_selection(seed.as_ref(), &window, &now);
        let first = engine.finalize(
            first.date_entry.as_ref().unwrap(),
            first.time_slot.as_ref().unwrap(),
            &now,
        );

        let second = engine.resolve_selection(Some(&first), &window, &now);
        let second = engine.finalize(
            second.date_entry.as_ref().unwrap(),
            second.time_slot.as_ref().unwrap(),
            &now,
        );
        assert_eq!(first, second);
    }
}

#[test]
fn test_no_orderable_dates_resolves_to_nothing() {
    let engine = engine(WeeklySchedule::new(), vec![]);
    let now = monday_at(12, 0);
    let window = engine.build_date_window(&now);
    assert_eq!(window.len(), 7);
    assert!(window.iter().all(|entry| !entry.is_operate));

    let resolution = engine.resolve_selection(None, &window, &now);
    assert!(resolution.is_empty());
    assert!(resolution.date_entry.is_none());
    assert!(resolution.slots.is_empty());
}
