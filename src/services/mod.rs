// Service module exports
// Geometry, scroll and screen state for the timetable, plus settings storage

pub mod error;
pub mod layout;
pub mod screen;
pub mod scroll;
pub mod settings;
