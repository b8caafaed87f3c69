// Test fixtures - reusable timetable data
// Provides consistent days and events across the integration tests

#![allow(dead_code)]

use chrono::{Duration, Local, TimeZone};
use rust_timetable::models::event::{EventDay, EventId, TimetableEvent, TimetableEventList};

/// Local midnight on Sep 1, 2023 plus `offset` days.
pub fn day(offset: i64) -> EventDay {
    let start = Local.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap() + Duration::days(offset);
    EventDay::new(start, start + Duration::days(1)).unwrap()
}

pub fn days(count: i64) -> Vec<EventDay> {
    (0..count).map(day).collect()
}

/// An event in `day` starting `start_minute` after midnight.
pub fn event(day: EventDay, start_minute: i64, minutes: i64) -> TimetableEvent {
    let starts_at = day.start + Duration::minutes(start_minute);
    TimetableEvent::new(
        EventId::new(format!("{}-{start_minute}", day.date_naive())),
        format!("Event at minute {start_minute}"),
        starts_at,
        starts_at + Duration::minutes(minutes),
        day,
    )
    .unwrap()
}

/// One event per day, each `minutes` long and starting at midnight.
pub fn one_per_day(day_count: i64, minutes: i64) -> TimetableEventList {
    let days = days(day_count);
    let items = days.iter().map(|d| event(*d, 0, minutes)).collect();
    TimetableEventList::new(items, days)
}
