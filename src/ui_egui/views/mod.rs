pub mod headers;
pub mod item_provider;
pub mod palette;
pub mod timetable_view;
