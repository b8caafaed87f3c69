//! Days row and hours column around the timetable grid.
//!
//! Label positions come from the grid line positions, so both headers
//! follow the same offsets the grid is drawn with.

use egui::{Align2, FontId, Painter, Pos2, Rect};

use super::palette::TimetablePalette;
use crate::models::event::EventDay;
use crate::utils::date::{format_day_label, format_hour_label};

/// Label centers along the days row, in points relative to the row start.
pub fn day_label_centers(day_lines: &[f32], column_width_px: f32, points_per_px: f32) -> Vec<f32> {
    day_lines
        .iter()
        .map(|x| (x + column_width_px / 2.0) * points_per_px)
        .collect()
}

pub(crate) fn paint_days_row(
    painter: &Painter,
    rect: Rect,
    days: &[EventDay],
    centers: &[f32],
    palette: &TimetablePalette,
) {
    painter.rect_filled(rect, 0.0, palette.header_bg);

    let font = FontId::proportional(14.0);
    for (day, center) in days.iter().zip(centers) {
        let x = rect.left() + center;
        // Labels are ~100pt wide at most
        if x < rect.left() - 100.0 || x > rect.right() + 100.0 {
            continue;
        }
        painter.text(
            Pos2::new(x, rect.center().y),
            Align2::CENTER_CENTER,
            format_day_label(day.start),
            font.clone(),
            palette.header_text,
        );
    }
}

/// `hour_lines` holds the scrolled positions of hours 1 to 23.
pub(crate) fn paint_hours_column(
    painter: &Painter,
    rect: Rect,
    hour_lines: &[f32],
    points_per_px: f32,
    palette: &TimetablePalette,
) {
    painter.rect_filled(rect, 0.0, palette.header_bg);

    let font = FontId::proportional(14.0);
    for (hour, y) in (1..).zip(hour_lines) {
        let y = rect.top() + y * points_per_px;
        if y < rect.top() - 20.0 || y > rect.bottom() + 20.0 {
            continue;
        }
        painter.text(
            Pos2::new(rect.center().x, y),
            Align2::CENTER_CENTER,
            format_hour_label(hour),
            font.clone(),
            palette.header_text,
        );
    }
}
