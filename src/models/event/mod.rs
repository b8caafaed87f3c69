// Event module
// Timetable event, day column and event list models

use chrono::{DateTime, Local, NaiveDate};

use crate::utils::date::minutes_between;

/// Opaque, unique identity of a timetable event
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(String);

impl EventId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A contiguous `[start, end)` span rendered as one timetable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventDay {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl EventDay {
    /// Create a day column spanning `[start, end)`
    ///
    /// # Examples
    /// ```
    /// use rust_timetable::models::event::EventDay;
    /// use chrono::{Local, TimeZone};
    ///
    /// let start = Local.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap();
    /// let day = EventDay::new(start, start + chrono::Duration::days(1)).unwrap();
    /// assert_eq!(day.length_minutes(), 24 * 60);
    /// ```
    pub fn new(start: DateTime<Local>, end: DateTime<Local>) -> Result<Self, String> {
        if end <= start {
            return Err("Day end must be after day start".to_string());
        }
        Ok(Self { start, end })
    }

    /// The local calendar date the column starts on
    pub fn date_naive(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn length_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }

    pub fn contains(&self, instant: DateTime<Local>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// An immutable, time-boxed entry placed in one day column.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableEvent {
    pub id: EventId,
    pub title: String,
    pub starts_at: DateTime<Local>,
    pub ends_at: DateTime<Local>,
    pub day: EventDay,
}

impl TimetableEvent {
    /// Create a new event owned by `day`
    ///
    /// Zero-length events are accepted; they lay out with a height of zero.
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        starts_at: DateTime<Local>,
        ends_at: DateTime<Local>,
        day: EventDay,
    ) -> Result<Self, String> {
        let title = title.into();

        if title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if ends_at < starts_at {
            return Err("Event end time must not be before start time".to_string());
        }

        Ok(Self {
            id,
            title,
            starts_at,
            ends_at,
            day,
        })
    }

    /// Length of the event in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.starts_at, self.ends_at)
    }

    /// Minutes from the owning day's start to the event start
    pub fn minutes_into_day(&self) -> i64 {
        minutes_between(self.day.start, self.starts_at)
    }
}

/// Ordered events plus the ordered day columns they belong to.
///
/// The order of `days` defines the column index of each event. Events are
/// not required to be disjoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimetableEventList {
    items: Vec<TimetableEvent>,
    days: Vec<EventDay>,
}

impl TimetableEventList {
    pub fn new(items: Vec<TimetableEvent>, days: Vec<EventDay>) -> Self {
        Self { items, days }
    }

    pub fn items(&self) -> &[TimetableEvent] {
        &self.items
    }

    pub fn days(&self) -> &[EventDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimetableEvent> {
        self.items.get(index)
    }
}
