// Rust Timetable Application
// Main entry point

use rust_timetable::ui_egui::TimetableApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Rust Timetable");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("Timetable"),
        ..Default::default()
    };

    eframe::run_native(
        "Timetable",
        options,
        Box::new(|cc| Ok(Box::new(TimetableApp::new(cc)))),
    )
}
