pub mod scroll_store;
pub mod service;

use std::path::PathBuf;

use directories::ProjectDirs;

pub use scroll_store::ScrollPositionStore;
pub use service::SettingsService;

const SETTINGS_FILE: &str = "settings.toml";
const SCROLL_FILE: &str = "scroll.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "RustTimetable", "Timetable")
}

/// `<config dir>/settings.toml`, or the working directory when no home
/// directory can be resolved.
pub fn settings_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
        None => PathBuf::from(SETTINGS_FILE),
    }
}

/// `<data dir>/scroll.json`, with the same fallback as [`settings_path`].
pub fn scroll_snapshot_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(SCROLL_FILE),
        None => PathBuf::from(SCROLL_FILE),
    }
}
