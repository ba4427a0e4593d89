use serde::{Deserialize, Serialize};
use std::fmt;

const HOURS_PER_DAY: f64 = 24.0;

/// A wall-clock time normalised to the 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Fractional hours since midnight.
    pub fn total_hours(&self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 60.0
    }

    pub fn to_display(&self) -> String {
        format_for_display(self.hour, self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Am,
    Pm,
}

impl Period {
    fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("am") {
            Some(Period::Am)
        } else if text.eq_ignore_ascii_case("pm") {
            Some(Period::Pm)
        } else {
            None
        }
    }
}

/// Parse `"HH:MM"` (24-hour) or `"H:MM AM"` / `"H:MM PM"` (12-hour).
///
/// Returns `None` for anything else; callers treat that as a zero-length
/// window rather than an error. A missing minute component reads as `:00`;
/// a present one must be two digits.
pub fn parse_time(text: &str) -> Option<TimeOfDay> {
    let mut parts = text.split_whitespace();
    let clock = parts.next()?;
    let period = match parts.next() {
        Some(raw) => Some(Period::parse(raw)?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }

    let (hour_text, minute_text) = match clock.split_once(':') {
        Some((hour, minute)) => (hour, Some(minute)),
        None => (clock, None),
    };
    if !(1..=2).contains(&hour_text.len()) || !is_digits(hour_text) {
        return None;
    }
    let hour: u32 = hour_text.parse().ok()?;
    let minute: u32 = match minute_text {
        Some(minute) if minute.len() == 2 && is_digits(minute) => minute.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };

    let hour = match period {
        None => hour,
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(Period::Am) => hour % 12,
        Some(Period::Pm) => hour % 12 + 12,
    };
    TimeOfDay::new(hour, minute)
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Elapsed hours from `start` to `end`, rounded to two decimals.
///
/// An end earlier than the start is an overnight shift and wraps past
/// midnight; equal times are an empty window, never a full day. Blank or
/// unparsable input yields `0.0`.
pub fn compute_hours(start: &str, end: &str) -> f64 {
    match (parse_time(start), parse_time(end)) {
        (Some(start), Some(end)) => hours_between(start, end),
        _ => 0.0,
    }
}

pub fn hours_between(start: TimeOfDay, end: TimeOfDay) -> f64 {
    let mut diff = end.total_hours() - start.total_hours();
    if diff < 0.0 {
        diff += HOURS_PER_DAY;
    }
    round_hundredths(diff)
}

/// Hours covered by a combined range such as `"9:00 AM - 1:00 PM"`.
pub fn compute_range_hours(range: &str) -> f64 {
    match range.split_once(" - ") {
        Some((start, end)) => compute_hours(start, end),
        None => 0.0,
    }
}

/// Render a 24-hour pair as `"H:MM AM"` / `"H:MM PM"`.
pub fn format_for_display(hour: u32, minute: u32) -> String {
    let period = if hour % 24 >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02} {period}")
}

/// Re-render any accepted time text as zero-padded `"HH:MM"`.
pub fn normalize_to_24h(text: &str) -> Option<String> {
    parse_time(text).map(|time| time.to_string())
}

pub(crate) fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
