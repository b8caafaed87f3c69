//! Exponential decay model for fling animations.

use std::time::Duration;

const EXPONENTIAL_DECAY_FRICTION: f32 = -4.2;
const DEFAULT_VELOCITY_THRESHOLD: f32 = 0.1;

/// Friction-based exponential decay of a release velocity.
///
/// `value(t) = v0 - v/f + (v/f) * e^(f*t)` and `velocity(t) = v * e^(f*t)`,
/// with `f` negative and `t` in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    friction: f32,
    abs_velocity_threshold: f32,
}

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_VELOCITY_THRESHOLD)
    }
}

impl ExponentialDecay {
    /// Higher `friction_multiplier` stops sooner; the animation ends once the
    /// speed falls under `abs_velocity_threshold` pixels per second.
    ///
    /// Values that would make the curve non-finite fall back to the defaults.
    pub fn new(friction_multiplier: f32, abs_velocity_threshold: f32) -> Self {
        let mut friction = EXPONENTIAL_DECAY_FRICTION * friction_multiplier.max(0.0001);
        if !friction.is_finite() {
            log::warn!("Ignoring fling friction multiplier {friction_multiplier}, using 1.0");
            friction = EXPONENTIAL_DECAY_FRICTION;
        }

        let mut abs_velocity_threshold = abs_velocity_threshold.abs();
        if abs_velocity_threshold.is_infinite() {
            log::warn!("Ignoring infinite fling velocity threshold, using {DEFAULT_VELOCITY_THRESHOLD}");
            abs_velocity_threshold = DEFAULT_VELOCITY_THRESHOLD;
        }

        Self {
            friction,
            abs_velocity_threshold: abs_velocity_threshold.max(0.000_000_1),
        }
    }

    pub fn value_at(&self, initial_value: f32, initial_velocity: f32, elapsed: Duration) -> f32 {
        let t = elapsed.as_secs_f32();
        let ratio = initial_velocity / self.friction;
        initial_value + ratio * ((self.friction * t).exp() - 1.0)
    }

    pub fn velocity_at(&self, initial_velocity: f32, elapsed: Duration) -> f32 {
        initial_velocity * (self.friction * elapsed.as_secs_f32()).exp()
    }

    /// Where an unbounded animation would come to rest.
    pub fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        initial_value - initial_velocity / self.friction
    }

    /// Time until the speed decays under the threshold.
    pub fn duration(&self, initial_velocity: f32) -> Duration {
        let speed = initial_velocity.abs();
        if speed <= self.abs_velocity_threshold {
            return Duration::ZERO;
        }
        let seconds = (self.abs_velocity_threshold / speed).ln() / self.friction;
        Duration::from_secs_f32(seconds.max(0.0))
    }

    pub fn abs_velocity_threshold(&self) -> f32 {
        self.abs_velocity_threshold
    }
}

/// One axis of an in-flight fling, evaluated against the frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayAnimation {
    start_value: f32,
    initial_velocity: f32,
    start_time: Duration,
    duration: Duration,
    decay: ExponentialDecay,
}

impl DecayAnimation {
    /// Returns `None` when the velocity is already too small to move.
    pub fn start(
        start_value: f32,
        initial_velocity: f32,
        start_time: Duration,
        decay: ExponentialDecay,
    ) -> Option<Self> {
        if !initial_velocity.is_finite() || initial_velocity.abs() <= decay.abs_velocity_threshold {
            return None;
        }

        Some(Self {
            start_value,
            initial_velocity,
            start_time,
            duration: decay.duration(initial_velocity),
            decay,
        })
    }

    fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start_time).min(self.duration)
    }

    pub fn value_at(&self, now: Duration) -> f32 {
        self.decay
            .value_at(self.start_value, self.initial_velocity, self.elapsed(now))
    }

    pub fn velocity_at(&self, now: Duration) -> f32 {
        self.decay.velocity_at(self.initial_velocity, self.elapsed(now))
    }

    pub fn is_finished_at(&self, now: Duration) -> bool {
        now.saturating_sub(self.start_time) >= self.duration
    }

    pub fn target_value(&self) -> f32 {
        self.decay.target_value(self.start_value, self.initial_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_initial_value_and_velocity() {
        let decay = ExponentialDecay::default();
        assert_eq!(decay.value_at(50.0, 1000.0, Duration::ZERO), 50.0);
        assert_eq!(decay.velocity_at(1000.0, Duration::ZERO), 1000.0);
    }

    #[test]
    fn test_moves_in_velocity_direction_and_slows_down() {
        let decay = ExponentialDecay::default();
        let a = decay.value_at(0.0, 1000.0, Duration::from_millis(100));
        let b = decay.value_at(0.0, 1000.0, Duration::from_millis(200));
        assert!(a > 0.0 && b > a);
        // Second interval covers less distance than the first
        assert!(b - a < a);

        let back = decay.value_at(0.0, -1000.0, Duration::from_millis(100));
        assert!(back < 0.0);
    }

    #[test]
    fn test_converges_to_target() {
        let decay = ExponentialDecay::default();
        let target = decay.target_value(0.0, 4200.0);
        assert!((target - 1000.0).abs() < 0.01);

        let end = decay.duration(4200.0);
        let settled = decay.value_at(0.0, 4200.0, end);
        assert!((settled - target).abs() < 0.1);
        assert!(decay.velocity_at(4200.0, end).abs() <= 0.1 + 1e-3);
    }

    #[test]
    fn test_higher_friction_stops_sooner() {
        let soft = ExponentialDecay::new(1.0, 0.1);
        let hard = ExponentialDecay::new(2.0, 0.1);
        assert!(hard.duration(1000.0) < soft.duration(1000.0));
        assert!(hard.target_value(0.0, 1000.0) < soft.target_value(0.0, 1000.0));
    }

    #[test]
    fn test_non_finite_settings_fall_back_to_defaults() {
        assert_eq!(ExponentialDecay::new(f32::INFINITY, 0.1), ExponentialDecay::default());
        assert_eq!(ExponentialDecay::new(f32::MAX, 0.1), ExponentialDecay::default());
        assert_eq!(ExponentialDecay::new(1.0, f32::NEG_INFINITY), ExponentialDecay::default());

        let decay = ExponentialDecay::new(f32::INFINITY, 0.1);
        let value = decay.value_at(0.0, 1000.0, Duration::from_millis(76));
        assert!(value.is_finite() && value > 0.0);
    }

    #[test]
    fn test_slow_velocity_does_not_animate() {
        let decay = ExponentialDecay::default();
        assert_eq!(decay.duration(0.05), Duration::ZERO);
        assert!(DecayAnimation::start(10.0, 0.0, Duration::ZERO, decay).is_none());
        assert!(DecayAnimation::start(10.0, 0.05, Duration::ZERO, decay).is_none());
        assert!(DecayAnimation::start(10.0, f32::NAN, Duration::ZERO, decay).is_none());
    }

    #[test]
    fn test_animation_is_relative_to_start_time() {
        let decay = ExponentialDecay::default();
        let start = Duration::from_secs(10);
        let animation = DecayAnimation::start(100.0, 500.0, start, decay).unwrap();

        assert_eq!(animation.value_at(start), 100.0);
        // Frames stamped before the start do not run backwards
        assert_eq!(animation.value_at(Duration::from_secs(9)), 100.0);
        assert!(!animation.is_finished_at(start + Duration::from_millis(16)));

        let done = start + decay.duration(500.0);
        assert!(animation.is_finished_at(done));
        assert!((animation.value_at(done + Duration::from_secs(5)) - animation.value_at(done)).abs() < f32::EPSILON);
    }
}
