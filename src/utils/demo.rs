// Demo data source
// Three months of generated events for the demo timetable

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

use crate::models::event::{EventDay, EventId, TimetableEvent, TimetableEventList};
use crate::utils::date::format_day_label;

const EVENTS_PER_DAY: usize = 24;

/// (year, month, first day, last day)
const DEMO_MONTHS: [(i32, u32, u32, u32); 3] = [(2023, 9, 1, 29), (2023, 10, 1, 30), (2023, 11, 1, 29)];

/// Small xorshift generator so the demo looks varied but is reproducible.
#[derive(Debug, Clone)]
struct Variation(u64);

impl Variation {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform-ish value in `low..high`.
    fn range(&mut self, low: i64, high: i64) -> i64 {
        let span = (high - low).max(1) as u64;
        low + (self.next() % span) as i64
    }
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}

/// Day columns of the demo, each running from local midnight to the next.
pub fn demo_days() -> Vec<EventDay> {
    DEMO_MONTHS
        .iter()
        .flat_map(|&(year, month, first, last)| {
            (first..=last).filter_map(move |day| NaiveDate::from_ymd_opt(year, month, day))
        })
        .filter_map(|date| {
            let start = local_midnight(date)?;
            let end = local_midnight(date.succ_opt()?)?;
            EventDay::new(start, end).ok()
        })
        .collect()
}

/// Sequential events for every demo day: up to 24 per day, each starting
/// 10 to 59 minutes after the previous one ended and lasting 30 to 59
/// minutes. Events that would run past the end of their day are left out.
pub fn demo_event_list(seed: u64) -> TimetableEventList {
    let days = demo_days();
    let mut variation = Variation::new(seed);
    let mut items = Vec::new();

    for day in &days {
        let label = format_day_label(day.start);
        let mut last_end: Option<DateTime<Local>> = None;

        for index in 0..EVENTS_PER_DAY {
            let delay = Duration::minutes(variation.range(10, 60));
            let starts_at = last_end.unwrap_or(day.start) + delay;
            let ends_at = starts_at + Duration::minutes(variation.range(30, 60));
            last_end = Some(ends_at);

            if starts_at > day.end || ends_at > day.end {
                continue;
            }

            match TimetableEvent::new(
                EventId::new(format!("{}-{index}", day.date_naive())),
                format!("[Day {label}] Event #{index}"),
                starts_at,
                ends_at,
                *day,
            ) {
                Ok(event) => items.push(event),
                Err(e) => log::warn!("Skipping demo event: {e}"),
            }
        }
    }

    log::info!("Generated {} demo events over {} days", items.len(), days.len());
    TimetableEventList::new(items, days)
}
