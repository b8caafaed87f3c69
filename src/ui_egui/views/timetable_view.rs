//! The Timetable widget for egui.
//!
//! Owns the screen state and the throttle dispatcher it runs on. Each frame
//! it advances any fling, feeds drag input into the scroll state, runs the
//! virtualized layout pass over the visible events and paints the grid
//! lines and headers from the derived line positions.

use std::time::Duration;

use anyhow::Result;
use egui::{Key, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use tokio::task::JoinHandle;

use super::headers::{day_label_centers, paint_days_row, paint_hours_column};
use super::item_provider::ItemProvider;
use super::palette::TimetablePalette;
use crate::models::event::{TimetableEvent, TimetableEventList};
use crate::models::settings::TimetableSettings;
use crate::services::layout::driver::{layout_visible_items, FixedSize, LazyLayoutHost};
use crate::services::scroll::{Offset, ScrollSnapshot, ScrollStates};
use crate::services::screen::dispatcher::ThrottleDispatcher;
use crate::services::screen::visibility::ScreenSize;
use crate::services::screen::TimetableScreenState;

pub struct TimetableView {
    list: TimetableEventList,
    settings: TimetableSettings,
    state: TimetableScreenState,
    repaint_task: Option<JoinHandle<()>>,
    // Dropped last: the state's tasks run on it.
    dispatcher: ThrottleDispatcher,
}

impl TimetableView {
    /// Build the view over `list`, starting from a restored scroll position.
    pub fn new(
        list: TimetableEventList,
        settings: TimetableSettings,
        initial: ScrollSnapshot,
    ) -> Result<Self> {
        let dispatcher = ThrottleDispatcher::new()?;
        let state = TimetableScreenState::new(
            &list,
            settings.density(),
            ScrollStates::from_settings(initial, &settings),
            settings.throttle_window(),
            &dispatcher.handle(),
        )?;

        log::info!(
            "Timetable ready: {} events, {} days, restored offset ({}, {})",
            list.len(),
            list.days().len(),
            initial.offset_x,
            initial.offset_y
        );

        Ok(Self {
            list,
            settings,
            state,
            repaint_task: None,
            dispatcher,
        })
    }

    pub fn scroll_snapshot(&self) -> ScrollSnapshot {
        self.state.scroll_snapshot()
    }

    fn points_per_px(&self) -> f32 {
        1.0 / self.settings.scale_factor.max(f32::EPSILON)
    }

    /// Visible sets arrive from the worker threads between frames.
    fn ensure_repaint_on_publish(&mut self, ctx: &egui::Context) {
        if self.repaint_task.is_some() {
            return;
        }
        let mut visible = self.state.subscribe_visible();
        let ctx = ctx.clone();
        self.repaint_task = Some(self.dispatcher.handle().spawn(async move {
            while visible.changed().await.is_ok() {
                ctx.request_repaint();
            }
        }));
    }

    /// Lay out and paint the timetable into all remaining space of `ui`,
    /// drawing each visible event through `content`.
    pub fn show<F>(&mut self, ui: &mut egui::Ui, content: F)
    where
        F: FnMut(&Painter, Rect, usize, &TimetableEvent),
    {
        self.ensure_repaint_on_publish(ui.ctx());

        let points_per_px = self.points_per_px();
        let palette = TimetablePalette::from_visuals(ui.visuals());
        let full = ui.available_rect_before_wrap();
        let _ = ui.allocate_rect(full, Sense::hover());

        let hours_width = self.settings.hours_column_width;
        let days_height = self.settings.days_row_height;
        let corner = Rect::from_min_size(full.min, Vec2::new(hours_width, days_height));
        let days_rect = Rect::from_min_max(Pos2::new(corner.right(), full.top()), Pos2::new(full.right(), corner.bottom()));
        let hours_rect = Rect::from_min_max(Pos2::new(full.left(), corner.bottom()), Pos2::new(corner.right(), full.bottom()));
        let grid_rect = Rect::from_min_max(corner.max, full.max);

        let now = frame_time(ui);
        if self.state.tick(now) {
            ui.ctx().request_repaint();
        }

        let response = ui.interact(grid_rect, ui.id().with("timetable_grid"), Sense::drag());
        self.handle_drag(ui, &response, now, points_per_px);

        let painter = ui.painter_at(grid_rect);
        painter.rect_filled(grid_rect, 0.0, palette.grid_bg);
        self.paint_grid_lines(&painter, grid_rect, &palette, points_per_px);

        let viewport = ScreenSize::new(
            (grid_rect.width() / points_per_px).round() as i32,
            (grid_rect.height() / points_per_px).round() as i32,
        );
        let mut provider = ItemProvider::new(self.list.items(), content);
        let mut host = PainterLayoutHost {
            painter: &painter,
            origin: grid_rect.min,
            points_per_px,
            provider: &mut provider,
        };
        layout_visible_items(&mut self.state, viewport, &mut host);

        let density = self.state.density();
        let centers = day_label_centers(
            self.state.day_vertical_lines(),
            density.column_width_px as f32,
            points_per_px,
        );
        paint_days_row(&ui.painter_at(days_rect), days_rect, self.list.days(), &centers, &palette);
        paint_hours_column(
            &ui.painter_at(hours_rect),
            hours_rect,
            self.state.timeline_horizontal_lines(),
            points_per_px,
            &palette,
        );
        ui.painter_at(corner).rect_filled(corner, 0.0, palette.header_bg);
    }

    fn handle_drag(&mut self, ui: &egui::Ui, response: &egui::Response, now: Duration, points_per_px: f32) {
        if response.drag_started() {
            self.state.reset_scroll_tracking();
        }

        if response.dragged() {
            let delta = response.drag_delta() / points_per_px;
            if delta != Vec2::ZERO {
                let position = response
                    .interact_pointer_pos()
                    .map(|pos| Offset::new(pos.x / points_per_px, pos.y / points_per_px))
                    .unwrap_or(Offset::ZERO);
                // Content follows the finger, so offsets move against it
                self.state.scroll(Offset::new(-delta.x, -delta.y), now, position);
            }

            if ui.input(|i| i.key_pressed(Key::Escape)) {
                self.state.reset_scroll_tracking();
            }
        }

        if response.drag_stopped() {
            self.state.fling(now);
            ui.ctx().request_repaint();
        }
    }

    fn paint_grid_lines(&self, painter: &Painter, grid_rect: Rect, palette: &TimetablePalette, points_per_px: f32) {
        let stroke = Stroke::new(self.settings.line_stroke_width, palette.line);
        let right = grid_rect.left() + self.state.total_width_px() as f32 * points_per_px;
        let bottom = grid_rect.top() + self.state.total_height_px() as f32 * points_per_px;

        for y in self.state.timeline_horizontal_lines() {
            let y = grid_rect.top() + y * points_per_px;
            painter.line_segment([Pos2::new(grid_rect.left(), y), Pos2::new(right, y)], stroke);
        }
        for x in self.state.day_vertical_lines() {
            let x = grid_rect.left() + x * points_per_px;
            painter.line_segment([Pos2::new(x, grid_rect.top()), Pos2::new(x, bottom)], stroke);
        }
    }
}

impl Drop for TimetableView {
    fn drop(&mut self) {
        if let Some(task) = self.repaint_task.take() {
            task.abort();
        }
    }
}

fn frame_time(ui: &egui::Ui) -> Duration {
    Duration::from_secs_f64(ui.input(|i| i.time).max(0.0))
}

/// Paints measured slots straight into the grid painter.
struct PainterLayoutHost<'a, 'p, F>
where
    F: FnMut(&Painter, Rect, usize, &TimetableEvent),
{
    painter: &'a Painter,
    origin: Pos2,
    points_per_px: f32,
    provider: &'a mut ItemProvider<'p, F>,
}

impl<F> LazyLayoutHost for PainterLayoutHost<'_, '_, F>
where
    F: FnMut(&Painter, Rect, usize, &TimetableEvent),
{
    type Placeable = (usize, Vec2);

    fn measure(&mut self, index: usize, size: FixedSize) -> Self::Placeable {
        (
            index,
            Vec2::new(size.width as f32, size.height as f32) * self.points_per_px,
        )
    }

    fn place(&mut self, (index, size): Self::Placeable, x: i32, y: i32) {
        let min = self.origin + Vec2::new(x as f32, y as f32) * self.points_per_px;
        let slot = Rect::from_min_size(min, size);
        self.provider.item(self.painter, slot, index);
    }
}
