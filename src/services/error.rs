use thiserror::Error;

use crate::models::event::EventId;

/// Contract violations detected while deriving timetable geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimetableError {
    #[error("event {event_id} belongs to a day that is not in the day list")]
    MissingDay { event_id: EventId },

    #[error("invalid pixel density: column width {column_width_px}px, {per_minute_height_px}px per minute")]
    InvalidDensity {
        column_width_px: i32,
        per_minute_height_px: f32,
    },
}
