// Settings module
// Timetable dimensions, throttling and fling tuning, persisted as TOML

use serde::{Deserialize, Serialize};

/// User-tunable timetable settings, in logical (unscaled) pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableSettings {
    pub column_width: f32,
    pub per_minute_height: f32,
    pub hours_column_width: f32,
    pub days_row_height: f32,
    pub line_stroke_width: f32,
    /// Window for throttling offset-driven visible set recomputes
    pub throttle_window_ms: u64,
    pub fling_friction_multiplier: f32,
    /// Fling stops once the decayed speed drops under this (px/s)
    pub fling_velocity_threshold: f32,
    /// Logical to physical pixel ratio
    pub scale_factor: f32,
}

impl Default for TimetableSettings {
    fn default() -> Self {
        Self {
            column_width: 200.0,
            per_minute_height: 4.0,
            hours_column_width: 64.0,
            days_row_height: 64.0,
            line_stroke_width: 1.0,
            throttle_window_ms: 200,
            fling_friction_multiplier: 1.0,
            fling_velocity_threshold: 0.1,
            scale_factor: 1.0,
        }
    }
}

impl TimetableSettings {
    /// Pixel densities used for event geometry.
    ///
    /// Column width is rounded to whole pixels; the per-minute height stays
    /// fractional and is rounded per geometry value instead.
    pub fn density(&self) -> TimetableDensity {
        TimetableDensity {
            column_width_px: (self.column_width * self.scale_factor).round() as i32,
            per_minute_height_px: self.per_minute_height * self.scale_factor,
        }
    }

    pub fn throttle_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.throttle_window_ms)
    }
}

/// Pixel densities a set of event geometries is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimetableDensity {
    pub column_width_px: i32,
    pub per_minute_height_px: f32,
}

impl TimetableDensity {
    pub fn new(column_width_px: i32, per_minute_height_px: f32) -> Self {
        Self {
            column_width_px,
            per_minute_height_px,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.column_width_px > 0
            && self.per_minute_height_px.is_finite()
            && self.per_minute_height_px > 0.0
    }
}
