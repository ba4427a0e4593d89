use crate::error::StoreError;
use crate::time_window::{compute_hours, round_hundredths};
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Monday-first week used for every schedule.
pub const DAYS_OF_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Accepts full (`"Monday"`) or short (`"Mon"`) names, any case.
pub fn parse_day(name: &str) -> Option<Weekday> {
    Weekday::from_str(name.trim()).ok()
}

mod weekday_name {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::day_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).ok_or_else(|| D::Error::custom(format!("unknown day '{raw}'")))
    }
}

/// One weekday of a worker's availability.
///
/// `hours` is derived from the two times and is recomputed whenever either
/// changes, including on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScheduleDayFields")]
pub struct ScheduleDay {
    #[serde(with = "weekday_name")]
    day: Weekday,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    hours: f64,
}

#[derive(Deserialize)]
struct ScheduleDayFields {
    #[serde(with = "weekday_name")]
    day: Weekday,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
}

impl From<ScheduleDayFields> for ScheduleDay {
    fn from(fields: ScheduleDayFields) -> Self {
        ScheduleDay::new(
            fields.day,
            fields.start_time.as_deref(),
            fields.end_time.as_deref(),
        )
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl ScheduleDay {
    pub fn new(day: Weekday, start_time: Option<&str>, end_time: Option<&str>) -> Self {
        let mut entry = Self {
            day,
            start_time: non_blank(start_time),
            end_time: non_blank(end_time),
            hours: 0.0,
        };
        entry.recompute();
        entry
    }

    /// A day with no shift.
    pub fn off(day: Weekday) -> Self {
        Self::new(day, None, None)
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn day_name(&self) -> &'static str {
        day_name(self.day)
    }

    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    pub fn end_time(&self) -> Option<&str> {
        self.end_time.as_deref()
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn is_scheduled(&self) -> bool {
        self.hours > 0.0
    }

    pub fn set_start_time(&mut self, start_time: Option<&str>) {
        self.start_time = non_blank(start_time);
        self.recompute();
    }

    pub fn set_end_time(&mut self, end_time: Option<&str>) {
        self.end_time = non_blank(end_time);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.hours = match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) => compute_hours(start, end),
            _ => 0.0,
        };
    }
}

/// Validate and order a submitted week.
///
/// A weekday listed twice is rejected. Weekdays left out are filled in as
/// days off, so a replace never keeps anything from the previous week.
pub fn normalize_week(days: Vec<ScheduleDay>) -> Result<Vec<ScheduleDay>, StoreError> {
    let mut slots: [Option<ScheduleDay>; 7] = Default::default();
    for entry in days {
        let idx = entry.day.num_days_from_monday() as usize;
        if slots[idx].is_some() {
            return Err(StoreError::Validation(format!(
                "schedule lists {} more than once",
                entry.day_name()
            )));
        }
        slots[idx] = Some(entry);
    }
    Ok(DAYS_OF_WEEK
        .into_iter()
        .zip(slots)
        .map(|(day, slot)| slot.unwrap_or_else(|| ScheduleDay::off(day)))
        .collect())
}

/// Sum of the daily hours, rounded to two decimals.
pub fn total_hours(days: &[ScheduleDay]) -> f64 {
    round_hundredths(days.iter().map(ScheduleDay::hours).sum())
}

/// A worker's weekly availability plus the two hour totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkerScheduleFields")]
pub struct WorkerSchedule {
    worker_id: String,
    days: Vec<ScheduleDay>,
    hours_picked: f64,
    hours_completed: f64,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WorkerScheduleFields {
    worker_id: String,
    days: Vec<ScheduleDay>,
    #[serde(default)]
    hours_completed: f64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WorkerScheduleFields> for WorkerSchedule {
    type Error = StoreError;

    fn try_from(fields: WorkerScheduleFields) -> Result<Self, Self::Error> {
        if fields.days.len() != DAYS_OF_WEEK.len() {
            return Err(StoreError::Validation(format!(
                "schedule for worker {} has {} days, expected 7",
                fields.worker_id,
                fields.days.len()
            )));
        }
        let days = normalize_week(fields.days)?;
        Ok(Self::from_parts(
            fields.worker_id,
            days,
            fields.hours_completed,
            fields.updated_at,
        ))
    }
}

impl WorkerSchedule {
    /// `days` must already be a normalized week.
    pub(crate) fn from_parts(
        worker_id: String,
        days: Vec<ScheduleDay>,
        hours_completed: f64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let hours_picked = total_hours(&days);
        Self {
            worker_id,
            days,
            hours_picked,
            hours_completed,
            updated_at,
        }
    }

    /// A record with every day off.
    pub fn empty(worker_id: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        let days = DAYS_OF_WEEK.into_iter().map(ScheduleDay::off).collect();
        Self::from_parts(worker_id.into(), days, 0.0, updated_at)
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn days(&self) -> &[ScheduleDay] {
        &self.days
    }

    pub fn day(&self, day: Weekday) -> &ScheduleDay {
        &self.days[day.num_days_from_monday() as usize]
    }

    pub fn hours_picked(&self) -> f64 {
        self.hours_picked
    }

    pub fn hours_completed(&self) -> f64 {
        self.hours_completed
    }

    /// Scheduled hours not yet reported as worked; negative when a worker
    /// reports more than they picked.
    pub fn hours_remaining(&self) -> f64 {
        round_hundredths(self.hours_picked - self.hours_completed)
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn works_on(&self, day: Weekday) -> bool {
        self.day(day).is_scheduled()
    }

    pub(crate) fn set_hours_completed(&mut self, hours: f64) {
        self.hours_completed = hours;
    }
}
