use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Offset as _, TimeZone as _, Utc};
use chrono_tz::Tz;

use blockytime_types::events::TimeRange;

use crate::{AnalyticsError, Result};

pub const SECONDS_PER_HOUR: i64 = 60 * 60;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AnalyticsError::InvalidTimezone(name.to_owned()))
}

pub fn check_hour(hour: u32) -> Result<()> {
    if hour > 23 {
        return Err(AnalyticsError::InvalidCutoffHour(hour));
    }
    Ok(())
}

/// UTC offset in seconds in force at `instant`.
pub fn utc_offset_at(tz: Tz, instant: DateTime<Utc>) -> i64 {
    i64::from(
        tz.offset_from_utc_datetime(&instant.naive_utc())
            .fix()
            .local_minus_utc(),
    )
}

/// UTC offset in seconds for a wall clock time. Ambiguous times resolve to the
/// earlier offset, times skipped by a transition fall back to reading `local` as UTC.
fn utc_offset_at_local(tz: Tz, local: NaiveDateTime) -> i64 {
    let offset = tz
        .offset_from_local_datetime(&local)
        .earliest()
        .unwrap_or_else(|| tz.offset_from_utc_datetime(&local));
    i64::from(offset.fix().local_minus_utc())
}

fn local_to_timestamp(tz: Tz, local: NaiveDateTime) -> i64 {
    local.and_utc().timestamp() - utc_offset_at_local(tz, local)
}

/// Unix window of the sleep day ending at `cutoff_hour:00` local time on `date`.
///
/// The window always spans exactly 24 hours, so on days with a DST transition the
/// start is not necessarily `cutoff_hour:00` local on the previous day.
pub fn day_boundaries(date: NaiveDate, cutoff_hour: u32, tz: Tz) -> Result<TimeRange> {
    check_hour(cutoff_hour)?;

    let cutoff = NaiveTime::from_hms_opt(cutoff_hour, 0, 0)
        .ok_or(AnalyticsError::InvalidCutoffHour(cutoff_hour))?;
    let end = local_to_timestamp(tz, date.and_time(cutoff));

    Ok(TimeRange::new(end - SECONDS_PER_DAY, end))
}

pub fn local_midnight_timestamp(date: NaiveDate, tz: Tz) -> i64 {
    local_to_timestamp(tz, date.and_time(NaiveTime::MIN))
}

/// `[midnight(start), midnight(end))` in `tz`, or `None` for an empty date range.
pub fn local_date_range(start: NaiveDate, end: NaiveDate, tz: Tz) -> Option<TimeRange> {
    if start >= end {
        return None;
    }

    Some(TimeRange::new(
        local_midnight_timestamp(start, tz),
        local_midnight_timestamp(end, tz),
    ))
}

pub fn local_datetime(timestamp: i64, tz: Tz) -> Result<NaiveDateTime> {
    let utc = DateTime::from_timestamp(timestamp, 0)
        .ok_or(AnalyticsError::InvalidTimestamp(timestamp))?;
    Ok(utc.with_timezone(&tz).naive_local())
}

pub fn epoch_day_to_date(day: i64) -> Result<NaiveDate> {
    i32::try_from(day + UNIX_EPOCH_DAYS_FROM_CE)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(AnalyticsError::InvalidTimestamp(
            day.saturating_mul(SECONDS_PER_DAY),
        ))
}

/// Hour of day counted from `anchor_hour`, so the result lies in
/// `[anchor_hour, anchor_hour + 24)` and a night does not wrap at midnight.
pub fn normalize_hour(timestamp: i64, utc_offset: i64, anchor_hour: u32) -> f64 {
    let anchor = i64::from(anchor_hour) * SECONDS_PER_HOUR;
    let since_anchor = (timestamp + utc_offset - anchor).rem_euclid(SECONDS_PER_DAY);

    since_anchor as f64 / SECONDS_PER_HOUR as f64 + f64::from(anchor_hour)
}

pub fn round_float(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
