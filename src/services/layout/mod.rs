//! Event geometry for the timetable grid.
//!
//! Each event becomes an [`EventLayoutInfo`]: a pixel rectangle in content
//! space (before scrolling) derived from its column index and its minute
//! offsets within the owning day. Geometry is computed once per
//! (event list, density) pair and never recomputed per frame.

pub mod driver;

use std::collections::HashMap;

use crate::models::event::{EventDay, TimetableEvent, TimetableEventList};
use crate::models::settings::TimetableDensity;
use crate::services::error::TimetableError;

/// Pixel rectangle and identity of one laid-out event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventLayoutInfo {
    /// Index of the event in [`TimetableEventList::items`]
    pub index: usize,
    /// Index of the owning day in [`TimetableEventList::days`]
    pub day_index: usize,
    pub left_px: i32,
    pub top_px: i32,
    pub width_px: i32,
    pub height_px: i32,
}

impl EventLayoutInfo {
    pub fn new(
        event: &TimetableEvent,
        index: usize,
        day_index: usize,
        density: TimetableDensity,
    ) -> Self {
        let per_minute = density.per_minute_height_px as f64;
        let height_px = (event.duration_minutes().max(0) as f64 * per_minute).round() as i32;
        let top_px = (event.minutes_into_day().max(0) as f64 * per_minute).round() as i32;

        Self {
            index,
            day_index,
            left_px: day_index as i32 * density.column_width_px,
            top_px,
            width_px: density.column_width_px,
            height_px,
        }
    }

    pub fn right_px(&self) -> i32 {
        self.left_px + self.width_px
    }

    pub fn bottom_px(&self) -> i32 {
        self.top_px + self.height_px
    }
}

/// All event geometries of a list plus the content extent they span.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableLayout {
    infos: Vec<EventLayoutInfo>,
    total_width_px: i32,
    total_height_px: i32,
    day_count: usize,
    density: TimetableDensity,
}

impl TimetableLayout {
    /// Lay out every event of `list`.
    ///
    /// Fails fast when an event's day is not part of the day list, since its
    /// column cannot be known.
    pub fn build(
        list: &TimetableEventList,
        density: TimetableDensity,
    ) -> Result<Self, TimetableError> {
        if !density.is_valid() {
            return Err(TimetableError::InvalidDensity {
                column_width_px: density.column_width_px,
                per_minute_height_px: density.per_minute_height_px,
            });
        }

        let day_indices = index_days(list.days());

        // Single pass: extents are folded while building.
        let mut max_right_px = 0;
        let mut max_bottom_px = 0;
        let mut infos = Vec::with_capacity(list.len());

        for (index, event) in list.items().iter().enumerate() {
            let day_index = *day_indices
                .get(&event.day)
                .ok_or_else(|| TimetableError::MissingDay {
                    event_id: event.id.clone(),
                })?;

            let info = EventLayoutInfo::new(event, index, day_index, density);
            max_right_px = max_right_px.max(info.right_px());
            max_bottom_px = max_bottom_px.max(info.bottom_px());
            infos.push(info);
        }

        log::debug!(
            "Laid out {} events over {} days: content {}x{}px",
            infos.len(),
            list.days().len(),
            max_right_px,
            max_bottom_px
        );

        Ok(Self {
            infos,
            total_width_px: max_right_px,
            total_height_px: max_bottom_px,
            day_count: list.days().len(),
            density,
        })
    }

    pub fn infos(&self) -> &[EventLayoutInfo] {
        &self.infos
    }

    /// Right-most edge over all events
    pub fn total_width_px(&self) -> i32 {
        self.total_width_px
    }

    /// Bottom-most edge over all events
    pub fn total_height_px(&self) -> i32 {
        self.total_height_px
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    pub fn density(&self) -> TimetableDensity {
        self.density
    }
}

fn index_days(days: &[EventDay]) -> HashMap<EventDay, usize> {
    let mut indices = HashMap::with_capacity(days.len());
    for (index, day) in days.iter().enumerate() {
        // Keep the first column if a day is listed twice.
        indices.entry(*day).or_insert(index);
    }
    indices
}
