// Date utility functions
// Minute arithmetic and label formatting for the timetable grid

use chrono::{DateTime, Local};

pub const MINUTES_PER_HOUR: i64 = 60;
pub const HOURS_PER_DAY: i64 = 24;

/// Whole minutes from `from` to `to`, truncated toward zero.
pub fn minutes_between(from: DateTime<Local>, to: DateTime<Local>) -> i64 {
    (to - from).num_minutes()
}

/// Medium-length date label for a day column header, e.g. "Sep 1, 2023".
pub fn format_day_label(date: DateTime<Local>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Zero-padded hour label for the hours column, e.g. "07:00".
pub fn format_hour_label(hour: i64) -> String {
    format!("{:02}:00", hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_minutes_between_truncates() {
        let start = Local.with_ymd_and_hms(2023, 9, 1, 8, 0, 0).unwrap();
        assert_eq!(minutes_between(start, start + Duration::seconds(119)), 1);
        assert_eq!(minutes_between(start, start + Duration::hours(2)), 120);
        assert_eq!(minutes_between(start, start), 0);
    }

    #[test]
    fn test_labels() {
        let date = Local.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap();
        assert_eq!(format_day_label(date), "Sep 1, 2023");
        assert_eq!(format_hour_label(7), "07:00");
        assert_eq!(format_hour_label(23), "23:00");
    }
}
