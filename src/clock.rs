use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::models::Activity;

pub const MINUTES_PER_DAY: u32 = 1440;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClockError {
    #[error("Empty time string")]
    Empty,
    #[error("Invalid time format: {0}")]
    Format(String),
    #[error("Hour out of range: {0}")]
    Hour(String),
    #[error("Minute out of range: {0}")]
    Minute(String),
    #[error("Duration out of range")]
    Duration,
}

/// Parses a wall-clock string into minutes since midnight.
///
/// Accepts bare 24-hour input ("8:00", "17:30") and 12-hour input with an
/// AM/PM suffix ("8:00 AM", "11:30 pm"). A missing minute component reads as
/// ":00".
pub fn parse_clock_time(raw: &str) -> Result<u32, ClockError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClockError::Empty);
    }

    let (time_part, period) = match trimmed.rsplit_once(' ') {
        Some((time, suffix)) if suffix.eq_ignore_ascii_case("am") => (time.trim_end(), Some("am")),
        Some((time, suffix)) if suffix.eq_ignore_ascii_case("pm") => (time.trim_end(), Some("pm")),
        _ => (trimmed, None),
    };

    let (hour_part, minute_part) = match time_part.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None => (time_part, "0"),
    };

    let hour: u32 = hour_part
        .parse()
        .map_err(|_| ClockError::Format(raw.to_string()))?;
    let minute: u32 = minute_part
        .parse()
        .map_err(|_| ClockError::Format(raw.to_string()))?;

    if minute > 59 {
        return Err(ClockError::Minute(raw.to_string()));
    }

    // 12 PM stays 12, 12 AM wraps to hour 0.
    let hour = match period {
        Some("pm") if hour != 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };

    if hour > 23 {
        return Err(ClockError::Hour(raw.to_string()));
    }

    Ok(hour * 60 + minute)
}

/// Renders minutes since midnight as a 12-hour clock string ("9:45 PM").
/// Counts past the end of the day reduce modulo 24 hours for display.
pub fn format_clock_time(total_minutes: u32) -> String {
    let total_minutes = total_minutes % MINUTES_PER_DAY;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let hour12 = match hours {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    let suffix = if hours >= 12 { "PM" } else { "AM" };

    format!("{}:{:02} {}", hour12, minutes, suffix)
}

/// Annotates each activity with computed start and end times by walking a
/// running cursor from the schedule's start time through the activity
/// durations, in order. The cursor may pass midnight; display wraps. A
/// duration that would overflow the cursor is rejected rather than wrapped.
pub fn with_computed_times(
    start_time: &str,
    activities: Vec<Activity>,
) -> Result<Vec<Activity>, ClockError> {
    let mut cursor = parse_clock_time(start_time)?;

    activities
        .into_iter()
        .map(|mut activity| {
            activity.start_time = Some(format_clock_time(cursor));
            cursor = cursor
                .checked_add(activity.duration_minutes)
                .ok_or(ClockError::Duration)?;
            activity.end_time = Some(format_clock_time(cursor));
            Ok(activity)
        })
        .collect()
}

pub fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour() * 60 + time.minute())
}
