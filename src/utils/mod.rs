// Utility modules

pub mod date;
pub mod demo;
