//! Serde adapter for record timestamps.
//!
//! Stored documents carry dates either as RFC 3339 timestamps or as plain
//! `YYYY-MM-DD` days. A plain day is read as local midnight, or as the first
//! instant of the day when a DST jump skips midnight.

use chrono::{
    DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone,
    Utc,
};
use serde::{Deserialize as _, Deserializer, Serializer};

// Longest wall-clock gap searched when a local time does not exist.
const MAX_GAP_MINUTES: i64 = 24 * 60;

pub(crate) fn parse(raw: &str) -> Option<DateTime<Utc>> {
    parse_in(&Local, raw)
}

pub(crate) fn parse_in<Tz: TimeZone>(tz: &Tz, raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    earliest_local(tz, day.and_hms_opt(0, 0, 0)?)
}

/// First instant at or after the wall-clock time `local` in `tz`. A repeated
/// time resolves to its earlier occurrence.
pub(crate) fn earliest_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    resolve_local(tz, local, TimeDelta::minutes(1))
}

/// Last instant at or before the wall-clock time `local` in `tz`. A repeated
/// time resolves to its later occurrence.
pub(crate) fn latest_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    resolve_local(tz, local, TimeDelta::minutes(-1))
}

fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    local: NaiveDateTime,
    step: TimeDelta,
) -> Option<DateTime<Utc>> {
    let forward = step > TimeDelta::zero();
    let mut wall = local;
    for _ in 0..=MAX_GAP_MINUTES {
        let found = match tz.from_local_datetime(&wall) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(first, second) => Some(if forward { first } else { second }),
            LocalResult::None => None,
        };
        if let Some(dt) = found {
            return Some(dt.with_timezone(&Utc));
        }
        wall = wall.checked_add_signed(step)?;
    }
    None
}

pub(crate) fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_rfc3339(dt))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: '{s}'")))
}


#[cfg(test)]
mod tests {
    use chrono::Timelike as _;

    use super::{test_zone::SpringForward, *};

    #[test]
    fn plain_day_is_local_midnight() {
        let dt = parse("2024-03-05").unwrap().with_timezone(&Local);
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn rfc3339_keeps_instant() {
        let dt = parse("2024-03-05T10:30:00Z").unwrap();
        assert_eq!(to_rfc3339(&dt), "2024-03-05T10:30:00.000Z");
        assert!(parse("yesterday").is_none());
    }

    #[test]
    fn skipped_midnight_rolls_forward() {
        let dt = parse_in(&SpringForward, "2024-09-08").unwrap();
        assert_eq!(to_rfc3339(&dt), "2024-09-08T04:00:00.000Z");
        let day_before = parse_in(&SpringForward, "2024-09-07").unwrap();
        assert_eq!(to_rfc3339(&day_before), "2024-09-07T04:00:00.000Z");
    }

    #[test]
    fn skipped_time_rolls_back_for_latest() {
        let wall = NaiveDate::from_ymd_opt(2024, 9, 8)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap();
        let dt = latest_local(&SpringForward, wall).unwrap();
        assert_eq!(to_rfc3339(&dt), "2024-09-08T03:59:00.000Z");
    }
}
