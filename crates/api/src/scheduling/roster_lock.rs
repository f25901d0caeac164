use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown timezone: {0}")]
pub struct UnknownTimezone(pub String);

pub fn parse_timezone(name: &str) -> Result<Tz, UnknownTimezone> {
    name.parse::<Tz>()
        .map_err(|_| UnknownTimezone(name.to_string()))
}

/// A roster is locked once the facility's local date reaches the lock date.
pub fn is_roster_locked(lock_date: Option<NaiveDate>, tz: Tz, now: DateTime<Utc>) -> bool {
    match lock_date {
        Some(date) => now.with_timezone(&tz).date_naive() >= date,
        None => false,
    }
}

/// The UTC instant of local midnight on the lock date. When midnight falls
/// in a DST gap, the first valid local instant of the day is used.
pub fn lock_instant(lock_date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    (0..24u32)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| tz.from_local_datetime(&lock_date.and_time(time)).earliest())
        .map(|local| local.with_timezone(&Utc))
}
