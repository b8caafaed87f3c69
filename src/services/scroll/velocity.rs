//! Drag velocity estimation from a short history of pointer samples.

use std::collections::VecDeque;
use std::time::Duration;

use super::{Offset, Velocity};

/// Maximum fling speed in pixels per second, per axis.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

const HISTORY_SIZE: usize = 20;
const HORIZON: Duration = Duration::from_millis(100);
/// A gap this long between two samples means the pointer had stopped.
const ASSUME_STOPPED: Duration = Duration::from_millis(40);
/// Sample weight falls by `1/e` every this many milliseconds of age.
const AGE_WEIGHT_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    time: Duration,
    position: Offset,
}

/// Rolling pointer history producing a deterministic velocity estimate.
///
/// The estimate is a weighted linear least-squares fit of position against
/// time over the recent window, with newer samples weighted more heavily.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position at `time`.
    pub fn add_position(&mut self, time: Duration, position: Offset) {
        if let Some(last) = self.samples.back() {
            if time < last.time {
                // Timestamps from a different clock; the history is useless.
                self.samples.clear();
            }
        }

        self.samples.push_back(Sample { time, position });
        while self.samples.len() > HISTORY_SIZE {
            self.samples.pop_front();
        }
    }

    /// Velocity in pixels per second at the newest sample.
    ///
    /// Fewer than two usable samples yields zero velocity.
    pub fn calculate_velocity(&self) -> Velocity {
        let window = self.recent_window();
        if window.len() < 2 {
            return Velocity::ZERO;
        }

        let newest = window[0].time;
        let fit = |axis: fn(&Offset) -> f32| -> f32 {
            weighted_slope(window.iter().map(|sample| {
                let age = newest.saturating_sub(sample.time);
                (age, axis(&sample.position))
            }))
            .clamp(-MAX_FLING_VELOCITY, MAX_FLING_VELOCITY)
        };

        Velocity {
            x: fit(|p| p.x),
            y: fit(|p| p.y),
        }
    }

    /// Forget every recorded sample.
    pub fn reset_tracking(&mut self) {
        self.samples.clear();
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Samples newest first, cut at the horizon or at the first pause.
    fn recent_window(&self) -> Vec<Sample> {
        let mut window = Vec::with_capacity(self.samples.len());
        let Some(newest) = self.samples.back() else {
            return window;
        };

        let mut previous_time = newest.time;
        for sample in self.samples.iter().rev() {
            if newest.time - sample.time > HORIZON
                || previous_time - sample.time > ASSUME_STOPPED
            {
                break;
            }
            previous_time = sample.time;
            window.push(*sample);
        }
        window
    }
}

/// Slope of position over time in units per second. `samples` are
/// `(age, position)` pairs where age is measured back from the newest sample.
fn weighted_slope(samples: impl Iterator<Item = (Duration, f32)>) -> f32 {
    let points: Vec<(f64, f64, f64)> = samples
        .map(|(age, position)| {
            let age_ms = age.as_secs_f64() * 1000.0;
            let weight = (-age_ms / AGE_WEIGHT_MS).exp();
            (-age.as_secs_f64(), position as f64, weight)
        })
        .collect();

    let weight_sum: f64 = points.iter().map(|(_, _, w)| w).sum();
    if weight_sum <= 0.0 {
        return 0.0;
    }

    let mean_t = points.iter().map(|(t, _, w)| t * w).sum::<f64>() / weight_sum;
    let mean_p = points.iter().map(|(_, p, w)| p * w).sum::<f64>() / weight_sum;

    let mut s_tt = 0.0;
    let mut s_tp = 0.0;
    for (t, p, w) in &points {
        s_tt += w * (t - mean_t) * (t - mean_t);
        s_tp += w * (t - mean_t) * (p - mean_p);
    }

    if s_tt <= f64::EPSILON {
        // All samples share a timestamp.
        return 0.0;
    }
    (s_tp / s_tt) as f32
}
