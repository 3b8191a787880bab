//! Conversion between the API's timestamp strings and [`KenoTimestamp`].
//!
//! Upstream timestamps look like `2021-06-01T00:02:41.123456Z`. Callers may
//! also pass `2021-06-01 00:02:41` or a bare `2021-06-01` (midnight). All
//! values are treated as UTC; no local timezone or daylight-saving adjustment
//! is applied, so "midnight" below always means 00:00 UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TimeError;

const API_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const SPACED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = "YYYY-MM-DD".len();

/// An absolute UTC instant at microsecond precision.
///
/// Construction truncates to microseconds, the precision of the wire format,
/// which makes `parse(&format(t)) == t` hold for every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KenoTimestamp(DateTime<Utc>);

impl KenoTimestamp {
    #[must_use]
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.trunc_subsecs(6))
    }

    /// 00:00:00 UTC on `date`.
    #[must_use]
    pub fn midnight(date: NaiveDate) -> Self {
        Self(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    }

    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Calendar date of this instant in UTC.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Signed whole seconds from `earlier` to `self`; negative when `self`
    /// is the earlier of the two.
    #[must_use]
    pub fn seconds_since(&self, earlier: KenoTimestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }
}

/// Parses an API or caller-supplied timestamp.
///
/// The shape of `input` selects the format: ten characters is a bare date,
/// a `T` separator is the API form, anything else is the spaced form. The
/// whole string must match; nothing is partially parsed.
///
/// # Errors
///
/// Returns [`TimeError::Malformed`] if `input` does not match the selected
/// format.
pub fn parse(input: &str) -> Result<KenoTimestamp, TimeError> {
    let malformed = |source| TimeError::Malformed {
        input: input.to_owned(),
        source,
    };

    let naive = if input.len() == DATE_LEN {
        NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map_err(malformed)?
            .and_time(NaiveTime::MIN)
    } else if input.contains('T') {
        NaiveDateTime::parse_from_str(input, API_FORMAT).map_err(malformed)?
    } else {
        NaiveDateTime::parse_from_str(input, SPACED_FORMAT).map_err(malformed)?
    };

    Ok(KenoTimestamp::from_datetime(Utc.from_utc_datetime(&naive)))
}

/// Parses a bare `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`TimeError::Malformed`] if `input` is not a valid date.
pub fn parse_date(input: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| TimeError::Malformed {
        input: input.to_owned(),
        source,
    })
}

/// Formats a timestamp in the API form with six fractional digits.
#[must_use]
pub fn format(timestamp: KenoTimestamp) -> String {
    timestamp.0.format(OUTPUT_FORMAT).to_string()
}

impl fmt::Display for KenoTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(OUTPUT_FORMAT))
    }
}

impl FromStr for KenoTimestamp {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl From<DateTime<Utc>> for KenoTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

impl Serialize for KenoTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*self))
    }
}

impl<'de> Deserialize<'de> for KenoTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
