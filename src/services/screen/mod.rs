//! Screen state for the timetable: event geometry, viewport size, scroll
//! offsets and everything derived from them.
//!
//! The visible set is recomputed on the throttle dispatcher whenever the
//! viewport size changes or a (throttled) offset changes, and published
//! through a watch channel so the layout pass always reads a complete set.
//! Grid line positions are cheap and follow the offsets synchronously.

pub mod dispatcher;
pub mod throttle;
pub mod visibility;

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use self::throttle::throttle_latest;
use self::visibility::{visible_layout_infos, ScreenSize, VisibleSet};
use crate::models::event::TimetableEventList;
use crate::models::settings::TimetableDensity;
use crate::services::error::TimetableError;
use crate::services::layout::{EventLayoutInfo, TimetableLayout};
use crate::services::scroll::{Offset, ScrollSnapshot, ScrollStates, Velocity};
use crate::utils::date::{HOURS_PER_DAY, MINUTES_PER_HOUR};

/// Line positions derived from one scroll offset.
#[derive(Debug, Clone, PartialEq)]
struct DerivedLines {
    offset: f32,
    lines: Vec<f32>,
}

impl DerivedLines {
    fn build(offset: f32, spacing: f32, indices: impl Iterator<Item = i64>) -> Self {
        Self {
            offset,
            lines: indices.map(|i| i as f32 * spacing - offset).collect(),
        }
    }
}

pub struct TimetableScreenState {
    layout: TimetableLayout,
    infos: Arc<[EventLayoutInfo]>,
    scroll_states: ScrollStates,
    screen_size: watch::Sender<ScreenSize>,
    visible: watch::Receiver<VisibleSet>,
    timeline_horizontal_lines: DerivedLines,
    day_vertical_lines: DerivedLines,
    tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for TimetableScreenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimetableScreenState")
            .field("events", &self.infos.len())
            .field("total_width_px", &self.layout.total_width_px())
            .field("total_height_px", &self.layout.total_height_px())
            .field("screen_size", &*self.screen_size.borrow())
            .field("scroll_states", &self.scroll_states)
            .finish()
    }
}

impl TimetableScreenState {
    /// Lay out `list` and start the visible-set recompute on `dispatcher`.
    ///
    /// Fails when an event's day is missing from the list's days or the
    /// density is not positive.
    pub fn new(
        list: &TimetableEventList,
        density: TimetableDensity,
        scroll_states: ScrollStates,
        throttle_window: Duration,
        dispatcher: &Handle,
    ) -> Result<Self, TimetableError> {
        let layout = TimetableLayout::build(list, density)?;
        let infos: Arc<[EventLayoutInfo]> = layout.infos().into();

        let (screen_size, size_rx) = watch::channel(ScreenSize::ZERO);
        let (throttled_x, throttled_x_rx) = watch::channel(scroll_states.offset_x());
        let (throttled_y, throttled_y_rx) = watch::channel(scroll_states.offset_y());
        let (visible_tx, visible) = watch::channel(VisibleSet::default());

        let tasks = vec![
            dispatcher.spawn(throttle_latest(
                scroll_states.subscribe_x(),
                throttled_x,
                throttle_window,
            )),
            dispatcher.spawn(throttle_latest(
                scroll_states.subscribe_y(),
                throttled_y,
                throttle_window,
            )),
            dispatcher.spawn(publish_visible_sets(
                Arc::clone(&infos),
                size_rx,
                throttled_x_rx,
                throttled_y_rx,
                visible_tx,
            )),
        ];

        let mut state = Self {
            timeline_horizontal_lines: DerivedLines::build(0.0, 0.0, std::iter::empty()),
            day_vertical_lines: DerivedLines::build(0.0, 0.0, std::iter::empty()),
            layout,
            infos,
            scroll_states,
            screen_size,
            visible,
            tasks,
        };
        state.refresh_lines(true);
        Ok(state)
    }

    /// Record the viewport size and push the resulting scroll range.
    pub fn update_screen_constraints(&mut self, width: i32, height: i32) {
        let size = ScreenSize::new(width.max(0), height.max(0));

        self.screen_size.send_if_modified(|current| {
            if *current == size {
                false
            } else {
                log::debug!("Viewport resized to {}x{}", size.width, size.height);
                *current = size;
                true
            }
        });

        let max_x = (self.layout.total_width_px() - size.width).max(0) as f32;
        let max_y = (self.layout.total_height_px() - size.height).max(0) as f32;
        self.scroll_states.update_bounds(max_x, max_y);
        self.refresh_lines(false);
    }

    /// The most recently published visible set.
    pub fn visible_layout_infos(&self) -> VisibleSet {
        self.visible.borrow().clone()
    }

    /// Receiver notified on every visible-set publication.
    pub fn subscribe_visible(&self) -> watch::Receiver<VisibleSet> {
        self.visible.clone()
    }

    /// Y positions of the hour lines (hours 1 to 23), scrolled.
    pub fn timeline_horizontal_lines(&self) -> &[f32] {
        &self.timeline_horizontal_lines.lines
    }

    /// X positions of the day column edges, scrolled.
    pub fn day_vertical_lines(&self) -> &[f32] {
        &self.day_vertical_lines.lines
    }

    pub fn scroll(&mut self, drag_amount: Offset, timestamp: Duration, position: Offset) {
        self.scroll_states.scroll(drag_amount, timestamp, position);
        self.refresh_lines(false);
    }

    pub fn fling(&mut self, now: Duration) -> Velocity {
        self.scroll_states.fling(now)
    }

    /// Advance any running fling; `true` while still animating.
    pub fn tick(&mut self, now: Duration) -> bool {
        let running = self.scroll_states.tick(now);
        self.refresh_lines(false);
        running
    }

    pub fn reset_scroll_tracking(&mut self) {
        self.scroll_states.reset_scroll_tracking();
    }

    pub fn offset_x(&self) -> f32 {
        self.scroll_states.offset_x()
    }

    pub fn offset_y(&self) -> f32 {
        self.scroll_states.offset_y()
    }

    pub fn is_animating(&self) -> bool {
        self.scroll_states.is_animating()
    }

    pub fn scroll_states(&self) -> &ScrollStates {
        &self.scroll_states
    }

    pub fn scroll_snapshot(&self) -> ScrollSnapshot {
        self.scroll_states.snapshot()
    }

    pub fn screen_size(&self) -> ScreenSize {
        *self.screen_size.borrow()
    }

    pub fn total_width_px(&self) -> i32 {
        self.layout.total_width_px()
    }

    pub fn total_height_px(&self) -> i32 {
        self.layout.total_height_px()
    }

    pub fn item_count(&self) -> usize {
        self.infos.len()
    }

    pub fn layout_info(&self, index: usize) -> Option<&EventLayoutInfo> {
        self.infos.get(index)
    }

    pub fn density(&self) -> TimetableDensity {
        self.layout.density()
    }

    fn refresh_lines(&mut self, force: bool) {
        let density = self.layout.density();

        let offset_y = self.scroll_states.offset_y();
        if force || self.timeline_horizontal_lines.offset != offset_y {
            self.timeline_horizontal_lines = DerivedLines::build(
                offset_y,
                MINUTES_PER_HOUR as f32 * density.per_minute_height_px,
                1..HOURS_PER_DAY,
            );
        }

        let offset_x = self.scroll_states.offset_x();
        if force || self.day_vertical_lines.offset != offset_x {
            self.day_vertical_lines = DerivedLines::build(
                offset_x,
                density.column_width_px as f32,
                0..self.layout.day_count() as i64,
            );
        }
    }
}

impl Drop for TimetableScreenState {
    fn drop(&mut self) {
        self.scroll_states.stop_animations();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Recompute the visible set whenever any input changes, until one of the
/// inputs closes.
async fn publish_visible_sets(
    infos: Arc<[EventLayoutInfo]>,
    mut size: watch::Receiver<ScreenSize>,
    mut offset_x: watch::Receiver<f32>,
    mut offset_y: watch::Receiver<f32>,
    output: watch::Sender<VisibleSet>,
) {
    let mut revision = 0;

    loop {
        let current_size = *size.borrow_and_update();
        let x = *offset_x.borrow_and_update();
        let y = *offset_y.borrow_and_update();

        revision += 1;
        let visible = visible_layout_infos(&infos, current_size, x, y);
        log::trace!(
            "Visible set #{revision}: {} of {} events at ({x}, {y})",
            visible.len(),
            infos.len()
        );
        output.send_replace(VisibleSet::new(revision, visible));

        let closed = tokio::select! {
            changed = size.changed() => changed.is_err(),
            changed = offset_x.changed() => changed.is_err(),
            changed = offset_y.changed() => changed.is_err(),
        };
        if closed {
            break;
        }
    }
}
