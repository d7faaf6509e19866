use crate::error::{HuntdError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

pub const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// ISO-8601 week key, e.g. `2025-W07`. Uses the ISO year, so the last days
/// of December can land in week 1 of the following year.
pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

pub fn month_key(timestamp: &NaiveDateTime) -> String {
    format!("{}-{:02}", timestamp.year(), timestamp.month())
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Human hour label: `12am`, `9am`, `12pm`, `3pm`.
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 => "12am".to_string(),
        h if h < 12 => format!("{h}am"),
        12 => "12pm".to_string(),
        h => format!("{}pm", h - 12),
    }
}

/// Parses a filter bound: RFC3339, `YYYY-MM-DD`, or a relative span such as
/// `3 months ago`, `2weeks` or `90d` measured back from `now`.
///
/// A bare date is the start of that day, or its last second when
/// `end_of_day` is set.
pub fn parse_date(input: &str, now: DateTime<Utc>, end_of_day: bool) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let time = if end_of_day {
            date.and_hms_opt(23, 59, 59)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(datetime) = time {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    let lowered = trimmed.to_lowercase();
    let compact: String = lowered
        .strip_suffix("ago")
        .unwrap_or(&lowered)
        .split_whitespace()
        .collect();
    let span = humantime::parse_duration(&compact)
        .map_err(|e| HuntdError::InvalidDate(format!("'{input}': {e}")))?;
    let span = Duration::from_std(span)
        .map_err(|_| HuntdError::InvalidDate(format!("Duration overflow for '{input}'")))?;
    now.checked_sub_signed(span)
        .ok_or_else(|| HuntdError::InvalidDate(format!("Duration overflow for '{input}'")))
}
