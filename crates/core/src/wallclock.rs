//! Wall-clock conversions for arbitrary IANA timezones
//!
//! Every hour/weekday/date computation in the engine goes through these
//! helpers so the scanner reasons in the caller's timezone, never in UTC or
//! server-local terms. Same-day comparisons use the `YYYY-MM-DD` string form,
//! never raw instant subtraction, to avoid DST/offset errors.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use slotwise_domain::{Result, SlotwiseError, TimeInterval};

/// Parse an IANA zone name
///
/// An unrecognized name fails loudly; a silent fallback would produce
/// wrong-but-plausible schedules.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| SlotwiseError::InvalidTimezone(name.to_string()))
}

/// The local hour (0-23) as displayed in `zone`
pub fn hour_in_zone(instant: DateTime<Utc>, zone: Tz) -> u32 {
    instant.with_timezone(&zone).hour()
}

/// The local minute (0-59) as displayed in `zone`
pub fn minute_in_zone(instant: DateTime<Utc>, zone: Tz) -> u32 {
    instant.with_timezone(&zone).minute()
}

/// The local weekday as displayed in `zone`, 0=Sunday .. 6=Saturday
pub fn weekday_in_zone(instant: DateTime<Utc>, zone: Tz) -> u32 {
    instant.with_timezone(&zone).weekday().num_days_from_sunday()
}

/// The local calendar date as a `YYYY-MM-DD` string
pub fn date_string_in_zone(instant: DateTime<Utc>, zone: Tz) -> String {
    instant.with_timezone(&zone).format("%Y-%m-%d").to_string()
}

/// The instant whose wall-clock time in `zone` is `hour:00:00.000` on the
/// same local calendar date as `instant`
///
/// Shifts by the signed hour difference to the target hour, then zeroes the
/// local minute/second/subsecond components. Exact away from DST transitions;
/// on a transition day the result can land an hour off the intended wall
/// clock. The scanner re-checks every snap against [`hour_in_zone`] on the
/// next iteration and carries a forward-progress guard, so a transition day
/// can not stall a scan.
pub fn at_hour_in_zone(instant: DateTime<Utc>, hour: u32, zone: Tz) -> DateTime<Utc> {
    let local = instant.with_timezone(&zone);
    let shifted = local + Duration::hours(i64::from(hour) - i64::from(local.hour()));
    let trimmed = shifted
        - Duration::minutes(i64::from(shifted.minute()))
        - Duration::seconds(i64::from(shifted.second()))
        - Duration::nanoseconds(i64::from(shifted.nanosecond()));
    trimmed.with_timezone(&Utc)
}

/// The `[local midnight, next local midnight)` window for a calendar date
///
/// Resolves DST gaps and folds explicitly: on a gap the earliest valid
/// instant after the skipped time is used, on a fold the first occurrence.
pub fn local_day_bounds(date: NaiveDate, zone: Tz) -> Result<TimeInterval> {
    let next = date.succ_opt().ok_or_else(|| {
        SlotwiseError::InvalidInput(format!("date {date} has no following day"))
    })?;
    TimeInterval::new(local_midnight(date, zone), local_midnight(next, zone))
}

/// Earliest instant of a local calendar date
///
/// Midnight itself can be skipped by a DST gap (some zones spring forward at
/// 00:00); probe forward on the half-hour grid until a valid local time is
/// found. A fold resolves to the first occurrence.
fn local_midnight(date: NaiveDate, zone: Tz) -> DateTime<Utc> {
    use chrono::offset::LocalResult;
    use chrono::TimeZone;

    let mut naive = date.and_time(NaiveTime::MIN);
    loop {
        match zone.from_local_datetime(&naive) {
            LocalResult::Single(local) => return local.with_timezone(&Utc),
            LocalResult::Ambiguous(first, _) => return first.with_timezone(&Utc),
            LocalResult::None => naive += Duration::minutes(30),
        }
    }
}
