//! Day, month and instant references typed by the writer

use crate::domain::calendar;
use crate::error::{Result, StorybookError};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc, Weekday};

/// A reference to a calendar day, resolved against a base day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeReference {
    Today,
    Yesterday,
    Tomorrow,
    /// Current/most recent occurrence of a weekday
    Weekday(Weekday),
    /// Previous occurrence of a weekday (strictly before the base day)
    LastWeekday(Weekday),
    /// Next occurrence of a weekday (strictly after the base day)
    NextWeekday(Weekday),
    SpecificDate(NaiveDate),
}

impl TimeReference {
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        match normalized.as_str() {
            "today" | "now" => Ok(TimeReference::Today),
            "yesterday" => Ok(TimeReference::Yesterday),
            "tomorrow" => Ok(TimeReference::Tomorrow),
            _ if normalized.starts_with("last ") => parse_weekday(&normalized[5..])
                .map(TimeReference::LastWeekday)
                .ok_or_else(|| StorybookError::InvalidTimeReference(input.to_string())),
            _ if normalized.starts_with("next ") => parse_weekday(&normalized[5..])
                .map(TimeReference::NextWeekday)
                .ok_or_else(|| StorybookError::InvalidTimeReference(input.to_string())),
            _ => {
                if let Some(weekday) = parse_weekday(&normalized) {
                    return Ok(TimeReference::Weekday(weekday));
                }
                NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                    .or_else(|_| NaiveDate::parse_from_str(&normalized, "%d-%m-%Y"))
                    .map(TimeReference::SpecificDate)
                    .map_err(|_| StorybookError::InvalidTimeReference(input.to_string()))
            }
        }
    }

    pub fn resolve(&self, base_date: NaiveDate) -> NaiveDate {
        match self {
            TimeReference::Today => base_date,
            TimeReference::Yesterday => base_date - Duration::days(1),
            TimeReference::Tomorrow => base_date + Duration::days(1),
            TimeReference::Weekday(target) => {
                let back = days_between(*target, base_date.weekday());
                base_date - Duration::days(back)
            }
            TimeReference::LastWeekday(target) => {
                let back = match days_between(*target, base_date.weekday()) {
                    0 => 7,
                    n => n,
                };
                base_date - Duration::days(back)
            }
            TimeReference::NextWeekday(target) => {
                let forward = match days_between(base_date.weekday(), *target) {
                    0 => 7,
                    n => n,
                };
                base_date + Duration::days(forward)
            }
            TimeReference::SpecificDate(date) => *date,
        }
    }
}

/// Days to walk forward from `from` to reach `to`, in 0..7
fn days_between(from: Weekday, to: Weekday) -> i64 {
    ((to.num_days_from_monday() + 7 - from.num_days_from_monday()) % 7) as i64
}

fn parse_weekday(day: &str) -> Option<Weekday> {
    match day.trim() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// A reference to a calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthReference {
    ThisMonth,
    LastMonth,
    NextMonth,
    Specific { year: i32, month: u32 },
}

impl MonthReference {
    /// Accepts `this month`, `last month`, `next month` or `YYYY-MM`
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        match normalized.as_str() {
            "this month" | "month" => Ok(MonthReference::ThisMonth),
            "last month" => Ok(MonthReference::LastMonth),
            "next month" => Ok(MonthReference::NextMonth),
            _ => {
                let invalid = || StorybookError::InvalidTimeReference(input.to_string());
                let (year, month) = normalized.split_once('-').ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
                    return Err(invalid());
                }
                Ok(MonthReference::Specific { year, month })
            }
        }
    }

    /// Resolve to `(year, month)` relative to `base_date`
    pub fn resolve(&self, base_date: NaiveDate) -> (i32, u32) {
        let (year, month) = (base_date.year(), base_date.month());
        match self {
            MonthReference::ThisMonth => (year, month),
            MonthReference::LastMonth if month == 1 => (year - 1, 12),
            MonthReference::LastMonth => (year, month - 1),
            MonthReference::NextMonth if month == 12 => (year + 1, 1),
            MonthReference::NextMonth => (year, month + 1),
            MonthReference::Specific { year, month } => (*year, *month),
        }
    }
}

/// Parse the date a story is about.
///
/// Full RFC 3339 timestamps are taken as-is. Day references keep the
/// wall-clock time of `now`, so "yesterday" means this time yesterday.
pub fn parse_story_date(input: &str, now: DateTime<Local>) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(instant.with_timezone(&Utc));
    }

    let day = TimeReference::parse(input)?.resolve(now.date_naive());
    Ok(calendar::local_instant(day, now.time()))
}
