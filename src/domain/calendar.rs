//! Calendar-day helpers in the local timezone

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Calendar day of an instant in the local timezone
pub fn local_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Combine a local day and wall-clock time into an instant.
///
/// Times skipped by a DST jump fall back to noon of the same day.
pub fn local_instant(day: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    Local
        .from_local_datetime(&day.and_time(time))
        .earliest()
        .or_else(|| Local.from_local_datetime(&day.and_time(noon)).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| day.and_time(noon).and_utc())
}
