use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::models::event::TimetableEvent;
use crate::services::settings::{
    scroll_snapshot_path, settings_path, ScrollPositionStore, SettingsService,
};
use crate::ui_egui::views::palette::{card_color, card_text_color};
use crate::ui_egui::views::timetable_view::TimetableView;
use crate::utils::demo::demo_event_list;

const DEMO_SEED: u64 = 2023;
const CARD_ROUNDING: f32 = 12.0;
const CARD_PADDING: f32 = 8.0;

pub struct TimetableApp {
    view: Option<TimetableView>,
    /// Shown instead of the timetable when it could not be built
    startup_error: Option<String>,
    scroll_store: ScrollPositionStore,
}

impl eframe::App for TimetableApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("timetable_title").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Timetable");
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| match (&mut self.view, &self.startup_error) {
                (Some(view), _) => view.show(ui, paint_event_card),
                (None, Some(error)) => {
                    ui.centered_and_justified(|ui| {
                        ui.label(format!("Failed to start the timetable: {error}"));
                    });
                }
                (None, None) => {}
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.persist_scroll_position();
    }
}

impl TimetableApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_service = SettingsService::new(settings_path());
        let settings = settings_service.get_or_default();
        log::info!(
            "Loaded settings from {}: column_width={}, per_minute_height={}",
            settings_service.path().display(),
            settings.column_width,
            settings.per_minute_height
        );

        let scroll_store = ScrollPositionStore::new(scroll_snapshot_path());
        let snapshot = scroll_store.load_or_origin();

        let (view, startup_error) =
            match TimetableView::new(demo_event_list(DEMO_SEED), settings, snapshot) {
                Ok(view) => (Some(view), None),
                Err(err) => {
                    log::error!("Failed to build timetable: {err:#}");
                    (None, Some(format!("{err:#}")))
                }
            };

        Self {
            view,
            startup_error,
            scroll_store,
        }
    }

    fn persist_scroll_position(&self) {
        let Some(view) = &self.view else {
            return;
        };
        match self.scroll_store.save(view.scroll_snapshot()) {
            Ok(()) => log::info!(
                "Saved scroll position to {}",
                self.scroll_store.path().display()
            ),
            Err(err) => log::warn!("Failed to save scroll position: {err:#}"),
        }
    }
}

/// Colored card with the event title and its length.
fn paint_event_card(painter: &Painter, slot: Rect, index: usize, event: &TimetableEvent) {
    let fill = card_color(index);
    let text_color = card_text_color(fill);
    painter.rect(slot, CARD_ROUNDING, fill, Stroke::new(1.0, Color32::BLACK));

    if slot.height() < CARD_PADDING * 2.0 {
        return;
    }

    let text_width = (slot.width() - CARD_PADDING * 2.0).max(0.0);
    let title = painter.layout(
        event.title.clone(),
        FontId::proportional(14.0),
        text_color,
        text_width,
    );
    let title_height = title.size().y;
    let origin = Pos2::new(slot.left() + CARD_PADDING, slot.top() + CARD_PADDING);
    painter.galley(origin, title, text_color);

    painter.text(
        Pos2::new(origin.x, origin.y + title_height + 4.0),
        Align2::LEFT_TOP,
        format!("Duration: {} minutes", event.duration_minutes()),
        FontId::proportional(12.0),
        text_color,
    );
}
