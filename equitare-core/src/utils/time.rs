use std::fmt;

use time::{macros::format_description, Date, OffsetDateTime, Time};

/// Restituisce l'istante corrente in UTC, troncato al millisecondo
/// (la precisione con cui i timestamp vengono salvati).
pub fn now_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}

pub fn to_unix_millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

pub fn from_unix_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

/// Parses the calendar day of `raw`. Accepts a bare `YYYY-MM-DD` or anything
/// starting with one (e.g. an RFC3339 timestamp); the time of day and offset
/// are ignored.
pub fn parse_calendar_date(raw: &str) -> Option<Date> {
    let head = raw.trim().get(..10)?;
    Date::parse(head, format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_calendar_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Serde adapter: `Date` <-> `"YYYY-MM-DD"`.
pub mod calendar_date {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_calendar_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {raw}")))
    }
}

/// Ora del giorno espressa in minuti dalla mezzanotte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Parses a 24h `HH:MM` string.
    pub fn parse(raw: &str) -> Option<Self> {
        let t = Time::parse(raw.trim(), format_description!("[hour]:[minute]")).ok()?;
        Self::from_minutes(u16::from(t.hour()) * 60 + u16::from(t.minute()))
    }

    /// `None` outside `0..1440`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < 24 * 60).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Absolute distance in minutes. Does not wrap around midnight.
    pub fn distance(self, other: ClockTime) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn clock_time_parses_24h_values() {
        assert_eq!(ClockTime::parse("14:00").map(ClockTime::minutes), Some(840));
        assert_eq!(ClockTime::parse("00:00").map(ClockTime::minutes), Some(0));
        assert_eq!(ClockTime::parse("23:59").map(ClockTime::minutes), Some(1439));
        assert_eq!(ClockTime::parse(" 07:30 ").map(ClockTime::minutes), Some(450));
    }

    #[test]
    fn clock_time_rejects_garbage() {
        for raw in ["", "24:00", "12:60", "noon", "1400", "12:3x"] {
            assert!(ClockTime::parse(raw).is_none(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn clock_time_display_is_zero_padded() {
        let t = ClockTime::from_minutes(65).expect("in range");
        assert_eq!(t.to_string(), "01:05");
        assert!(ClockTime::from_minutes(24 * 60).is_none());
    }

    #[test]
    fn calendar_date_ignores_time_of_day() {
        assert_eq!(parse_calendar_date("2024-05-15"), Some(date!(2024 - 05 - 15)));
        assert_eq!(
            parse_calendar_date("2024-05-15T23:30:00.000Z"),
            Some(date!(2024 - 05 - 15))
        );
        assert_eq!(parse_calendar_date("15/05/2024"), None);
        assert_eq!(parse_calendar_date("2024-5"), None);
        assert_eq!(format_calendar_date(date!(2024 - 05 - 15)), "2024-05-15");
    }

    #[test]
    fn unix_millis_roundtrip_keeps_millisecond_precision() {
        let at = datetime!(2025-11-02 10:20:30.123 UTC);
        let millis = to_unix_millis(at);
        assert_eq!(from_unix_millis(millis), Some(at));
    }
}
