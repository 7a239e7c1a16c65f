//! Human-readable formatting for durations, timestamps and statuses

pub mod id;

pub use id::{generate_uuid, IdGenerator, RandomIds};

use crate::Status;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Month, day, year and a 12-hour clock with seconds: "Jan 5, 2024, 03:04:05 PM"
const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %I:%M:%S %p";

/// Shown for timestamps chrono cannot represent
pub const INVALID_DATE: &str = "Invalid Date";

/// Color for any status outside the known set
pub const UNKNOWN_STATUS_COLOR: &str = "#9E9E9E";

/// Which clock timestamps are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

/// Format a duration in milliseconds.
///
/// Sub-second values keep millisecond precision ("500ms"); longer values are
/// broken into hours, minutes and seconds with zero units left out
/// ("1h 2m 5s", "1m"). Zero renders as "0s".
pub fn format_duration(ms: u64) -> String {
    if ms == 0 {
        return "0s".to_string();
    }
    if ms < 1000 {
        return format!("{}ms", ms);
    }

    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let remaining_seconds = seconds % 60;
    let remaining_minutes = minutes % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if remaining_minutes > 0 {
        parts.push(format!("{}m", remaining_minutes));
    }
    if remaining_seconds > 0 || parts.is_empty() {
        parts.push(format!("{}s", remaining_seconds));
    }
    parts.join(" ")
}

/// Format a Unix timestamp in milliseconds
pub fn format_date_time(ms: i64, zone: TimeZoneMode) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(ms) else {
        return INVALID_DATE.to_string();
    };
    match zone {
        TimeZoneMode::Utc => utc.format(DATE_TIME_FORMAT).to_string(),
        TimeZoneMode::Local => utc.with_timezone(&Local).format(DATE_TIME_FORMAT).to_string(),
    }
}

/// Display color (hex) for a status
pub fn status_color(status: &Status) -> &'static str {
    match status {
        Status::Pass => "#4CAF50",
        Status::Fail => "#F44336",
        Status::Skip => "#FFC107",
        Status::Error => "#9C27B0",
        Status::Total => "#2196F3",
        Status::Other(_) | Status::Missing => UNKNOWN_STATUS_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_sub_second() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(1), "1ms");
        assert_eq!(format_duration(500), "500ms");
        assert_eq!(format_duration(999), "999ms");
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(1000), "1s");
        assert_eq!(format_duration(1999), "1s");
        assert_eq!(format_duration(60_000), "1m");
        assert_eq!(format_duration(3_600_000), "1h");
        assert_eq!(format_duration(3_661_000), "1h 1m 1s");
        assert_eq!(format_duration(3_725_000), "1h 2m 5s");
        assert_eq!(format_duration(3_605_000), "1h 5s");
    }

    #[test]
    fn test_format_duration_hours_are_not_wrapped() {
        assert_eq!(format_duration(90_000_000), "25h");
    }

    #[test]
    fn test_format_date_time_utc() {
        assert_eq!(
            format_date_time(1_704_467_045_000, TimeZoneMode::Utc),
            "Jan 5, 2024, 03:04:05 PM"
        );
        assert_eq!(
            format_date_time(1_700_472_600_000, TimeZoneMode::Utc),
            "Nov 20, 2023, 09:30:00 AM"
        );
        assert_eq!(
            format_date_time(0, TimeZoneMode::Utc),
            "Jan 1, 1970, 12:00:00 AM"
        );
    }

    #[test]
    fn test_format_date_time_out_of_range() {
        assert_eq!(format_date_time(i64::MAX, TimeZoneMode::Utc), INVALID_DATE);
    }

    #[test]
    fn test_format_date_time_local_has_same_shape() {
        let local = format_date_time(1_704_467_045_000, TimeZoneMode::Local);
        assert!(local.ends_with("AM") || local.ends_with("PM"), "got {}", local);
        assert!(local.contains("2024") || local.contains("2023") || local.contains("2025"));
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(&Status::Pass), "#4CAF50");
        assert_eq!(status_color(&Status::Fail), "#F44336");
        assert_eq!(status_color(&Status::Skip), "#FFC107");
        assert_eq!(status_color(&Status::Error), "#9C27B0");
        assert_eq!(status_color(&Status::Total), "#2196F3");
        assert_eq!(
            status_color(&Status::Other("No Tests".into())),
            UNKNOWN_STATUS_COLOR
        );
        assert_eq!(status_color(&Status::Missing), UNKNOWN_STATUS_COLOR);
    }

    #[test]
    fn test_time_zone_mode_from_config_string() {
        let zone: TimeZoneMode = serde_json::from_str("\"utc\"").unwrap();
        assert_eq!(zone, TimeZoneMode::Utc);
        assert_eq!(TimeZoneMode::default(), TimeZoneMode::Local);
    }
}
