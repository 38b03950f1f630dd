//! Timestamp and calendar-date helpers shared by model serialization.
//!
//! The canonical stored form of an instant is RFC 3339 at millisecond
//! precision with a `Z` suffix. Finer stored precision is truncated to the
//! millisecond when read, so the in-memory value always equals what the next
//! write produces and `write(read(x))` is stable after one cycle.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static CALENDAR_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid calendar date regex"));

/// Current instant truncated to the precision persisted on disk.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Canonical text form: RFC 3339, millisecond precision, `Z` suffix.
pub fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a strict `YYYY-MM-DD` calendar date to midnight UTC.
///
/// Returns `None` for any other shape or an impossible date.
pub fn parse_calendar_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if !CALENDAR_DATE_RE.is_match(trimmed) {
        return None;
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Parses stored date text: RFC 3339 first, then `YYYY-MM-DD`.
///
/// Sub-millisecond digits are dropped.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.with_timezone(&Utc).trunc_subsecs(3))
        .ok()
        .or_else(|| parse_calendar_date(trimmed))
}

/// Serde adapter for a required creation timestamp.
pub mod timestamp {
    use super::{format_instant, parse_instant};
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_instant(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_instant(&text).ok_or_else(|| D::Error::custom(format!("invalid timestamp `{text}`")))
    }
}

/// Serde adapter for optional record dates (job/education ranges).
///
/// Empty strings and `null` both read as `None`.
pub mod optional_instant {
    use super::{format_instant, parse_instant};
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(instant) => serializer.serialize_str(&format_instant(instant)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse_instant(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date `{text}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_instant, now, parse_calendar_date, parse_instant};

    #[test]
    fn calendar_date_requires_exact_shape() {
        assert!(parse_calendar_date("2020-01-01").is_some());
        assert!(parse_calendar_date("2020-1-1").is_none());
        assert!(parse_calendar_date("2020-02-30").is_none());
        assert!(parse_calendar_date("Present").is_none());
    }

    #[test]
    fn calendar_date_and_rfc3339_share_the_same_instant() {
        let from_date = parse_instant("2020-01-01").unwrap();
        let from_rfc = parse_instant("2020-01-01T00:00:00.000Z").unwrap();
        assert_eq!(from_date, from_rfc);
    }

    #[test]
    fn sub_millisecond_text_reads_as_canonical_instant() {
        let instant = parse_instant("2024-03-01T12:30:00.250123Z").unwrap();
        assert_eq!(format_instant(&instant), "2024-03-01T12:30:00.250Z");
        assert_eq!(parse_instant(&format_instant(&instant)), Some(instant));
    }

    #[test]
    fn formatted_now_parses_back_to_same_instant() {
        let instant = now();
        assert_eq!(parse_instant(&format_instant(&instant)), Some(instant));
    }
}
