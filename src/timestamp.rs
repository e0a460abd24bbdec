//! Canonical snapshot timestamps.
//!
//! Every external identifier (URL segment, persistence key, file name) uses
//! one textual form, `YYYY-MM-DDTHH:MM:SSZ` in UTC. It sorts lexicographically
//! in time order and survives a round trip through [`Timestamp::parse`] and
//! [`Timestamp::format`] unchanged.
//!
//! Resolution is one second. Sub-second precision is truncated when a
//! timestamp is built from a [`DateTime`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The canonical `strftime` pattern for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Error returned when text is not a canonical timestamp.
///
/// # Example
///
/// ```
/// use conftrail::Timestamp;
///
/// let err = Timestamp::parse("yesterday").unwrap_err();
/// assert_eq!(err.input(), "yesterday");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedTimestamp {
    input: String,
    reason: &'static str,
}

impl MalformedTimestamp {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The rejected text.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for MalformedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed timestamp '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for MalformedTimestamp {}

/// A UTC instant with one-second resolution.
///
/// # Example
///
/// ```
/// use conftrail::Timestamp;
///
/// let t: Timestamp = "2024-03-10T00:00:00Z".parse()?;
/// assert_eq!(t.to_string(), "2024-03-10T00:00:00Z");
/// # Ok::<(), conftrail::MalformedTimestamp>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Build a timestamp, dropping anything below one second.
    ///
    /// A leap second folds into the second before it.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(
            datetime
                .with_nanosecond(0)
                .unwrap_or_else(|| datetime.trunc_subsecs(0)),
        )
    }

    /// Build a timestamp from seconds since the Unix epoch.
    ///
    /// Returns `None` when the value is outside chrono's range.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// The current time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Parse the canonical text form.
    ///
    /// Parsing is strict: the input must be exactly what [`format`](Self::format)
    /// would produce, so unpadded fields, surrounding whitespace and
    /// fractional seconds are all rejected.
    pub fn parse(text: &str) -> Result<Self, MalformedTimestamp> {
        if text.is_empty() {
            return Err(MalformedTimestamp::new(text, "empty input"));
        }

        let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .map_err(|_| MalformedTimestamp::new(text, "expected YYYY-MM-DDTHH:MM:SSZ"))?;
        // chrono reads `:60` as a leap second, which has no unix time of its own.
        if naive.nanosecond() != 0 {
            return Err(MalformedTimestamp::new(text, "leap seconds are not supported"));
        }
        let timestamp = Self(naive.and_utc());

        // chrono tolerates unpadded fields; the canonical form does not.
        if timestamp.format() != text {
            return Err(MalformedTimestamp::new(text, "not in canonical form"));
        }

        Ok(timestamp)
    }

    /// Render the canonical text form.
    pub fn format(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = MalformedTimestamp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parses_canonical_form() -> TestResult {
        let t = Timestamp::parse("2024-03-10T12:34:56Z")?;
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 10, 12, 34, 56)
            .single()
            .ok_or("ambiguous datetime")?;
        assert_eq!(t.as_datetime(), expected);
        assert_eq!(t.format(), "2024-03-10T12:34:56Z");
        Ok(())
    }

    #[test]
    fn rejects_non_canonical_text() {
        for input in [
            "",
            "2024-03-10",
            "2024-03-10T00:00:00",
            "2024-3-10T00:00:00Z",
            "2024-03-10 00:00:00Z",
            " 2024-03-10T00:00:00Z",
            "2024-03-10T00:00:00.5Z",
            "2024-02-30T00:00:00Z",
            "2024-03-10T24:00:00Z",
            "2024-03-10T12:00:60Z",
            "2016-12-31T23:59:60Z",
        ] {
            assert!(Timestamp::parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn truncates_sub_second_precision() -> TestResult {
        let precise = Utc
            .with_ymd_and_hms(2024, 3, 10, 0, 0, 1)
            .single()
            .ok_or("ambiguous datetime")?
            + Duration::milliseconds(750);
        let t = Timestamp::from_datetime(precise);
        assert_eq!(t.to_string(), "2024-03-10T00:00:01Z");
        assert_eq!(Timestamp::parse(&t.format())?, t);
        Ok(())
    }

    #[test]
    fn leap_second_folds_into_previous_second() -> TestResult {
        let leap = chrono::NaiveDate::from_ymd_opt(2016, 12, 31)
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 1_500))
            .ok_or("invalid leap second")?
            .and_utc();
        let t = Timestamp::from_datetime(leap);
        assert_eq!(t.format(), "2016-12-31T23:59:59Z");
        assert_eq!(Timestamp::parse(&t.format())?, t);
        Ok(())
    }

    #[test]
    fn orders_chronologically() -> TestResult {
        let earlier = Timestamp::parse("2023-12-31T23:59:59Z")?;
        let later = Timestamp::parse("2024-01-01T00:00:00Z")?;
        assert!(earlier < later);
        assert!(earlier.to_string() < later.to_string());
        Ok(())
    }

    #[test]
    fn serializes_as_canonical_string() -> TestResult {
        let t = Timestamp::parse("2024-03-01T00:00:00Z")?;
        let json = serde_json::to_string(&t)?;
        assert_eq!(json, "\"2024-03-01T00:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json)?;
        assert_eq!(back, t);
        assert!(serde_json::from_str::<Timestamp>("\"2024-03-01\"").is_err());
        Ok(())
    }

    #[test]
    fn unix_seconds() {
        let t = Timestamp::from_unix(1_709_251_200);
        assert_eq!(t.map(|t| t.to_string()).as_deref(), Some("2024-03-01T00:00:00Z"));
        assert_eq!(t.map(|t| t.unix()), Some(1_709_251_200));
    }
}
