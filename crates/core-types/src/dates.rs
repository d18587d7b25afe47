//! Lenient date parsing for request bodies.
//!
//! Clients send either a bare date (`2025-04-08`) or a full timestamp.
//! Bare dates are read as midnight.

use crate::error::CoreError;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub fn parse_lenient_datetime(raw: &str) -> Result<NaiveDateTime, CoreError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| CoreError::InvalidInput("date".to_string(), raw.to_string()))
}

/// Earliest year a crime record may carry.
pub const EARLIEST_RECORD_YEAR: i32 = 1900;

/// Accepts a record date between the start of [`EARLIEST_RECORD_YEAR`] and
/// one day past `now`.
pub fn check_record_date(
    date: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, CoreError> {
    let earliest = NaiveDate::from_ymd_opt(EARLIEST_RECORD_YEAR, 1, 1)
        .map(|d| d.and_time(chrono::NaiveTime::MIN));
    let latest = now.checked_add_days(Days::new(1));
    let in_range = earliest.is_none_or(|e| date >= e) && latest.is_none_or(|l| date <= l);
    if in_range {
        Ok(date)
    } else {
        Err(CoreError::InvalidInput(
            "date".to_string(),
            format!("{date} is outside {EARLIEST_RECORD_YEAR}-01-01 .. {now}"),
        ))
    }
}

/// `#[serde(deserialize_with = "...")]` adapter for a required timestamp.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient_datetime(&raw).map_err(serde::de::Error::custom)
}

/// `#[serde(deserialize_with = "...")]` adapter for an optional timestamp.
pub fn deserialize_lenient_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_lenient_datetime(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_dates_and_timestamps() {
        let d = parse_lenient_datetime("2025-04-08").unwrap();
        assert_eq!(d.to_string(), "2025-04-08 00:00:00");

        let d = parse_lenient_datetime("2025-04-08T13:45:00").unwrap();
        assert_eq!(d.to_string(), "2025-04-08 13:45:00");

        let d = parse_lenient_datetime("2025-04-08T13:45:00-05:00").unwrap();
        assert_eq!(d.to_string(), "2025-04-08 18:45:00");
    }

    #[test]
    fn record_dates_must_be_plausible() {
        let now = parse_lenient_datetime("2025-06-01T12:00:00").unwrap();
        let ok = parse_lenient_datetime("2025-06-02").unwrap();
        assert_eq!(check_record_date(ok, now).unwrap(), ok);
        assert!(check_record_date(parse_lenient_datetime("1900-01-01").unwrap(), now).is_ok());

        for raw in ["0001-01-01", "1899-12-31T23:59:59", "2025-06-03", "9999-01-01"] {
            let date = parse_lenient_datetime(raw).unwrap();
            assert!(check_record_date(date, now).is_err(), "{raw}");
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_lenient_datetime("08/04/2025").is_err());
    }
}
