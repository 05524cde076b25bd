//! Timestamp helpers shared by schedule synthesis and the clock.
//!
//! Schedules carry their dates as RFC 3339 strings (millisecond precision,
//! `Z` suffix) so the persisted blob stays readable by any JSON consumer.

use chrono::{DateTime, Duration, Local, SecondsFormat, TimeZone, Utc};

/// Format a timestamp the way schedule documents store it.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Midnight of the local calendar day containing `now`, expressed in UTC.
///
/// Falls back to UTC midnight on days where local midnight does not exist
/// (DST transitions at 00:00).
pub fn local_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let local = now.with_timezone(&Local);
    let midnight = local.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    match Local.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// The 24-hour schedule period starting at local midnight of `now`.
pub fn day_period<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(now);
    (start, start + Duration::hours(24))
}
