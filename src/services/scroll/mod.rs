//! Two-axis bounded scroll offsets driven by drag input and fling decay.
//!
//! ## Usage
//!
//! 1) Push the scrollable range with [`ScrollStates::update_bounds`] whenever
//!    the viewport or content changes.
//! 2) On every pointer move call [`ScrollStates::scroll`]; offsets follow the
//!    finger immediately.
//! 3) When the drag ends call [`ScrollStates::fling`], then drive the decay
//!    with [`ScrollStates::tick`] from the frame clock until it returns `false`.
//! 4) On drag cancellation call [`ScrollStates::reset_scroll_tracking`].
//!
//! Offsets are owned by the UI thread. Other threads observe them through
//! [`ScrollStates::subscribe_x`] / [`ScrollStates::subscribe_y`].

pub mod decay;
pub mod velocity;

use std::ops::{Add, Neg};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use self::decay::{DecayAnimation, ExponentialDecay};
use self::velocity::VelocityTracker;
use crate::models::settings::TimetableSettings;

/// A 2D amount in pixels: a drag delta or a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Pixels per second on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// Saved scroll position. Bounds are not part of it; they are recomputed
/// by the first layout pass after a restore.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollSnapshot {
    pub offset_x: f32,
    pub offset_y: f32,
}

impl ScrollSnapshot {
    pub fn to_values(self) -> [f32; 2] {
        [self.offset_x, self.offset_y]
    }

    pub fn from_values(values: [f32; 2]) -> Self {
        Self {
            offset_x: sanitize(values[0]),
            offset_y: sanitize(values[1]),
        }
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// One bounded offset with its in-flight fling.
///
/// `upper_bound` stays `None` until the first layout reports a range, so a
/// restored offset is not pulled to zero by input that arrives earlier.
#[derive(Debug)]
struct ScrollAxis {
    value: f32,
    upper_bound: Option<f32>,
    animation: Option<DecayAnimation>,
    publisher: watch::Sender<f32>,
}

impl ScrollAxis {
    fn new(initial: f32) -> Self {
        let (publisher, _) = watch::channel(initial);
        Self {
            value: initial,
            upper_bound: None,
            animation: None,
            publisher,
        }
    }

    /// NaN keeps the current offset; infinities land on a bound.
    fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.value;
        }
        match self.upper_bound {
            Some(upper) => value.clamp(0.0, upper),
            None if value.is_finite() => value.max(0.0),
            None if value < 0.0 => 0.0,
            None => self.value,
        }
    }

    fn max(&self) -> f32 {
        self.upper_bound.unwrap_or(0.0)
    }

    fn snap_to(&mut self, value: f32) {
        self.value = self.clamp(value);
        let value = self.value;
        self.publisher.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    fn update_bound(&mut self, upper_bound: f32) {
        self.upper_bound = Some(upper_bound);
        if self.value > upper_bound {
            self.snap_to(upper_bound);
        }
    }

    /// Advance the fling; returns `true` while it keeps running.
    fn tick(&mut self, now: Duration) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        let raw = animation.value_at(now);
        self.snap_to(raw);

        let hit_bound = self.value != raw;
        if hit_bound || animation.is_finished_at(now) {
            self.animation = None;
            return false;
        }
        true
    }
}

/// Scroll offsets, bounds, drag velocity tracking and per-axis fling.
#[derive(Debug)]
pub struct ScrollStates {
    x: ScrollAxis,
    y: ScrollAxis,
    velocity_tracker: VelocityTracker,
    decay: ExponentialDecay,
}

impl Default for ScrollStates {
    fn default() -> Self {
        Self::new(ScrollSnapshot::default(), ExponentialDecay::default())
    }
}

impl ScrollStates {
    /// Offsets start at `initial` and are clamped once bounds arrive.
    pub fn new(initial: ScrollSnapshot, decay: ExponentialDecay) -> Self {
        let initial = ScrollSnapshot::from_values(initial.to_values());
        Self {
            x: ScrollAxis::new(initial.offset_x),
            y: ScrollAxis::new(initial.offset_y),
            velocity_tracker: VelocityTracker::new(),
            decay,
        }
    }

    pub fn from_settings(initial: ScrollSnapshot, settings: &TimetableSettings) -> Self {
        Self::new(
            initial,
            ExponentialDecay::new(
                settings.fling_friction_multiplier,
                settings.fling_velocity_threshold,
            ),
        )
    }

    pub fn offset_x(&self) -> f32 {
        self.x.value
    }

    pub fn offset_y(&self) -> f32 {
        self.y.value
    }

    /// Horizontal range; zero until bounds have been set.
    pub fn max_x(&self) -> f32 {
        self.x.max()
    }

    pub fn max_y(&self) -> f32 {
        self.y.max()
    }

    pub fn subscribe_x(&self) -> watch::Receiver<f32> {
        self.x.publisher.subscribe()
    }

    pub fn subscribe_y(&self) -> watch::Receiver<f32> {
        self.y.publisher.subscribe()
    }

    /// Set the scrollable range. Negative bounds are treated as zero, and
    /// offsets beyond a shrunken range are pulled back in.
    pub fn update_bounds(&mut self, max_x: f32, max_y: f32) {
        let max_x = non_negative_bound(max_x, "x");
        let max_y = non_negative_bound(max_y, "y");

        if Some(max_x) != self.x.upper_bound || Some(max_y) != self.y.upper_bound {
            log::debug!("Scroll bounds updated to ({max_x}, {max_y})");
        }

        self.x.update_bound(max_x);
        self.y.update_bound(max_y);
    }

    /// Follow one pointer move.
    ///
    /// `drag_amount` is added to the offsets (clamped). `position` is the raw
    /// pointer position at `timestamp`; it is recorded inverted so that the
    /// tracked velocity points the same way offsets move.
    pub fn scroll(&mut self, drag_amount: Offset, timestamp: Duration, position: Offset) {
        self.x.animation = None;
        self.y.animation = None;

        let next_x = self.x.clamp(self.x.value + drag_amount.x);
        let next_y = self.y.clamp(self.y.value + drag_amount.y);

        self.velocity_tracker.add_position(timestamp, -position);

        self.x.snap_to(next_x);
        self.y.snap_to(next_y);
    }

    /// Start decaying both axes from the velocity of the finished drag.
    ///
    /// Returns the release velocity. Replaces any fling already running.
    /// The drag's samples are consumed, so the next drag is tracked from
    /// scratch.
    pub fn fling(&mut self, now: Duration) -> Velocity {
        let velocity = self.velocity_tracker.calculate_velocity();
        self.velocity_tracker.reset_tracking();
        log::debug!("Fling velocity=({}, {})", velocity.x, velocity.y);

        self.x.animation = DecayAnimation::start(self.x.value, velocity.x, now, self.decay);
        self.y.animation = DecayAnimation::start(self.y.value, velocity.y, now, self.decay);
        velocity
    }

    /// Advance running flings to frame time `now`.
    ///
    /// Each axis stops on its own when its speed has decayed or it reaches a
    /// bound. Returns `true` while either axis is still animating.
    pub fn tick(&mut self, now: Duration) -> bool {
        let x_running = self.x.tick(now);
        let y_running = self.y.tick(now);
        x_running || y_running
    }

    pub fn is_animating(&self) -> bool {
        self.x.animation.is_some() || self.y.animation.is_some()
    }

    /// Stop both flings where they are.
    pub fn stop_animations(&mut self) {
        self.x.animation = None;
        self.y.animation = None;
    }

    /// Drop recorded drag samples. Offsets and running flings are untouched.
    pub fn reset_scroll_tracking(&mut self) {
        log::debug!(
            "Reset scroll tracking ({} samples dropped)",
            self.velocity_tracker.sample_count()
        );
        self.velocity_tracker.reset_tracking();
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            offset_x: self.x.value,
            offset_y: self.y.value,
        }
    }
}

fn non_negative_bound(bound: f32, axis: &str) -> f32 {
    if bound.is_finite() && bound >= 0.0 {
        return bound;
    }
    log::warn!("Clamping invalid {axis} scroll bound {bound} to 0");
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn bounded(max_x: f32, max_y: f32) -> ScrollStates {
        let mut states = ScrollStates::default();
        states.update_bounds(max_x, max_y);
        states
    }

    #[test]
    fn test_defaults() {
        let states = ScrollStates::default();
        assert_eq!((states.offset_x(), states.offset_y()), (0.0, 0.0));
        assert_eq!((states.max_x(), states.max_y()), (0.0, 0.0));
        assert!(!states.is_animating());
    }

    #[test]
    fn test_drag_is_clamped_to_bounds() {
        let mut states = bounded(80.0, 1000.0);

        states.scroll(Offset::new(50.0, 0.0), ms(0), Offset::new(500.0, 0.0));
        states.scroll(Offset::new(50.0, 0.0), ms(16), Offset::new(450.0, 0.0));

        assert_eq!(states.offset_x(), 80.0);
        assert_eq!(states.offset_y(), 0.0);

        states.scroll(Offset::new(-500.0, -10.0), ms(32), Offset::new(950.0, 10.0));
        assert_eq!(states.offset_x(), 0.0);
        assert_eq!(states.offset_y(), 0.0);
    }

    #[test]
    fn test_no_scroll_range_pins_offsets() {
        let mut states = bounded(0.0, 0.0);
        states.scroll(Offset::new(120.0, -40.0), ms(0), Offset::ZERO);
        states.scroll(Offset::new(-3.0, 75.0), ms(8), Offset::ZERO);
        assert_eq!((states.offset_x(), states.offset_y()), (0.0, 0.0));
    }

    #[test]
    fn test_negative_bounds_become_zero() {
        let mut states = bounded(-50.0, f32::NAN);
        assert_eq!((states.max_x(), states.max_y()), (0.0, 0.0));
        states.scroll(Offset::new(10.0, 10.0), ms(0), Offset::ZERO);
        assert_eq!((states.offset_x(), states.offset_y()), (0.0, 0.0));
    }

    #[test]
    fn test_shrinking_bounds_reclamps_offsets() {
        let mut states = bounded(500.0, 500.0);
        states.scroll(Offset::new(400.0, 300.0), ms(0), Offset::ZERO);

        states.update_bounds(250.0, 600.0);

        assert_eq!(states.offset_x(), 250.0);
        assert_eq!(states.offset_y(), 300.0);
    }

    #[test]
    fn test_restored_offsets_wait_for_bounds() {
        let snapshot = ScrollSnapshot {
            offset_x: 320.0,
            offset_y: 900.0,
        };
        let mut states = ScrollStates::new(snapshot, ExponentialDecay::default());
        assert_eq!(states.snapshot(), snapshot);

        states.update_bounds(1000.0, 400.0);
        assert_eq!(states.offset_x(), 320.0);
        assert_eq!(states.offset_y(), 400.0);
    }

    #[test]
    fn test_scroll_before_bounds_keeps_restored_offsets() {
        let snapshot = ScrollSnapshot {
            offset_x: 320.0,
            offset_y: 900.0,
        };
        let mut states = ScrollStates::new(snapshot, ExponentialDecay::default());

        states.scroll(Offset::new(10.0, -5.0), ms(0), Offset::ZERO);
        assert_eq!((states.offset_x(), states.offset_y()), (330.0, 895.0));

        states.scroll(Offset::new(-400.0, 0.0), ms(16), Offset::ZERO);
        assert_eq!(states.offset_x(), 0.0);

        states.update_bounds(1000.0, 400.0);
        assert_eq!((states.offset_x(), states.offset_y()), (0.0, 400.0));
    }

    #[test]
    fn test_non_finite_targets_land_on_bounds() {
        let mut axis = ScrollAxis::new(0.0);
        axis.update_bound(50.0);

        axis.snap_to(f32::INFINITY);
        assert_eq!(axis.value, 50.0);
        axis.snap_to(f32::NEG_INFINITY);
        assert_eq!(axis.value, 0.0);

        axis.snap_to(20.0);
        axis.snap_to(f32::NAN);
        assert_eq!(axis.value, 20.0);
    }

    #[test]
    fn test_snapshot_values_are_sanitized() {
        let snapshot = ScrollSnapshot::from_values([f32::INFINITY, -3.0]);
        assert_eq!(snapshot.to_values(), [0.0, 0.0]);
        assert_eq!(ScrollSnapshot::from_values([12.5, 7.0]).to_values(), [12.5, 7.0]);
    }

    #[test]
    fn test_fling_without_samples_is_noop() {
        let mut states = bounded(1000.0, 1000.0);
        let velocity = states.fling(ms(0));

        assert_eq!(velocity, Velocity::ZERO);
        assert!(!states.is_animating());
        assert!(!states.tick(ms(100)));
        assert_eq!((states.offset_x(), states.offset_y()), (0.0, 0.0));
    }

    /// Finger moving left by 10px every 10ms: offsets grow by 10px per move.
    fn drag_left(states: &mut ScrollStates, moves: u64) {
        for i in 0..moves {
            let position = Offset::new(1000.0 - 10.0 * (i + 1) as f32, 300.0);
            states.scroll(Offset::new(10.0, 0.0), ms(i * 10), position);
        }
    }

    #[test]
    fn test_fling_continues_in_drag_direction() {
        let mut states = bounded(10_000.0, 10_000.0);
        drag_left(&mut states, 6);
        let released_at = states.offset_x();

        let velocity = states.fling(ms(60));
        assert!((velocity.x - 1000.0).abs() < 1.0, "{velocity:?}");
        assert!(states.is_animating());

        assert!(states.tick(ms(160)));
        let moved = states.offset_x();
        assert!(moved > released_at);
        assert_eq!(states.offset_y(), 0.0);

        // Run to completion
        let mut now = 160;
        while states.tick(ms(now)) {
            now += 16;
            assert!(now < 10_000, "fling never settled");
        }
        let target = released_at + 1000.0 / 4.2;
        assert!((states.offset_x() - target).abs() < 1.0);
    }

    #[test]
    fn test_fling_stops_at_bound() {
        let mut states = bounded(100.0, 0.0);
        drag_left(&mut states, 6);
        states.fling(ms(60));

        let mut now = 60;
        while states.tick(ms(now)) {
            now += 16;
        }

        assert_eq!(states.offset_x(), 100.0);
        assert!(!states.is_animating());
        // Stopped on hitting the bound, well before the decay would end
        assert!(now < 1000);
    }

    #[test]
    fn test_new_drag_cancels_fling() {
        let mut states = bounded(10_000.0, 10_000.0);
        drag_left(&mut states, 6);
        states.fling(ms(60));
        states.tick(ms(100));

        let before = states.offset_x();
        states.scroll(Offset::new(-5.0, 0.0), ms(120), Offset::new(400.0, 0.0));

        assert!(!states.is_animating());
        assert_eq!(states.offset_x(), before - 5.0);
        assert!(!states.tick(ms(500)));
        assert_eq!(states.offset_x(), before - 5.0);
    }

    #[test]
    fn test_reset_tracking_keeps_offsets_and_fling() {
        let mut states = bounded(10_000.0, 10_000.0);
        drag_left(&mut states, 6);
        states.fling(ms(60));
        let offset = states.offset_x();

        states.reset_scroll_tracking();

        assert!(states.is_animating());
        assert_eq!(states.offset_x(), offset);
        // With no samples left a second fling has nothing to throw
        assert_eq!(states.fling(ms(70)), Velocity::ZERO);
        assert!(!states.is_animating());
    }

    #[test]
    fn test_next_drag_starts_with_fresh_samples() {
        let mut states = bounded(10_000.0, 10_000.0);
        drag_left(&mut states, 6);
        assert!(states.fling(ms(60)).x > 900.0);

        // A single move 20ms later is not enough to throw again
        states.scroll(Offset::new(1.0, 0.0), ms(80), Offset::new(939.0, 300.0));
        assert_eq!(states.fling(ms(80)), Velocity::ZERO);
        assert!(!states.is_animating());
    }

    #[test]
    fn test_infinite_friction_multiplier_keeps_offsets_finite() {
        let decay = ExponentialDecay::new(f32::INFINITY, 0.1);
        let mut states = ScrollStates::new(ScrollSnapshot::default(), decay);
        states.update_bounds(5_000.0, 5_000.0);
        drag_left(&mut states, 6);
        states.fling(ms(60));

        for now in [76, 136, 400] {
            states.tick(ms(now));
            let x = states.offset_x();
            assert!(x.is_finite() && (0.0..=5_000.0).contains(&x), "{x}");
        }
    }

    #[test]
    fn test_offsets_are_published() {
        let mut states = bounded(500.0, 500.0);
        let mut rx = states.subscribe_x();
        let ry = states.subscribe_y();

        states.scroll(Offset::new(42.0, 7.0), ms(0), Offset::ZERO);

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 42.0);
        assert_eq!(*ry.borrow(), 7.0);

        // Unchanged values are not republished
        states.scroll(Offset::new(0.0, 0.0), ms(16), Offset::ZERO);
        assert!(!rx.has_changed().unwrap());
    }

    proptest! {
        #[test]
        fn prop_offsets_stay_within_bounds(
            max_x in 0.0f32..5_000.0,
            max_y in 0.0f32..5_000.0,
            drags in proptest::collection::vec((-800.0f32..800.0, -800.0f32..800.0), 1..40),
        ) {
            let mut states = bounded(max_x, max_y);
            let mut time = 0;
            for (dx, dy) in drags {
                time += 8;
                states.scroll(Offset::new(dx, dy), ms(time), Offset::new(-dx * time as f32, -dy * time as f32));
                prop_assert!((0.0..=max_x).contains(&states.offset_x()));
                prop_assert!((0.0..=max_y).contains(&states.offset_y()));
            }

            states.fling(ms(time));
            for step in 0..200u64 {
                states.tick(ms(time + step * 16));
                prop_assert!((0.0..=max_x).contains(&states.offset_x()));
                prop_assert!((0.0..=max_y).contains(&states.offset_y()));
            }
        }
    }
}
