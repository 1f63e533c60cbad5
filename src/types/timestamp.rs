// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timestamps reported by phones.
//!
//! Call start times and log entries use several formats depending on the
//! firmware release and the API version.
//!
//! # Supported Formats
//!
//! - ISO 8601 without timezone: `"2024-01-15T10:30:00"`
//! - ISO 8601 with timezone: `"2024-01-15T10:30:00+01:00"`
//! - Space separated: `"2024-01-15 10:30:00"`
//! - US date: `"01/15/2024 10:30:00"`
//! - Unix epoch seconds: `"1705318200"`

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::ParseError;

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// A timestamp parsed from a phone response.
///
/// The timezone offset is kept when the phone supplied one; otherwise only
/// the naive local time is known.
///
/// # Examples
///
/// ```
/// use polyrest_lib::types::PhoneDateTime;
///
/// let dt: PhoneDateTime = "2019-02-20T10:21:14".parse().unwrap();
/// assert!(dt.timezone_offset().is_none());
/// assert_eq!(dt.to_string(), "2019-02-20T10:21:14");
///
/// let dt: PhoneDateTime = "2019-02-20T10:21:14+01:00".parse().unwrap();
/// assert_eq!(dt.to_string(), "2019-02-20T10:21:14+01:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhoneDateTime {
    naive: NaiveDateTime,
    offset_secs: Option<i32>,
}

impl PhoneDateTime {
    /// Parses a timestamp string, returning `None` if no format matches.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn parse_epoch(s: &str) -> Option<Self> {
        let secs: i64 = s.parse().ok()?;
        let datetime = Utc.timestamp_opt(secs, 0).single()?;
        Some(Self {
            naive: datetime.naive_utc(),
            offset_secs: Some(0),
        })
    }

    fn parse_with_tz(s: &str) -> Option<Self> {
        let datetime = DateTime::parse_from_rfc3339(s).ok()?;
        Some(datetime.into())
    }

    fn parse_naive(s: &str) -> Option<Self> {
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Self::from)
    }

    /// Returns the naive datetime (without timezone information).
    #[must_use]
    pub const fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    /// Returns the timezone offset, if the phone reported one.
    #[must_use]
    pub fn timezone_offset(&self) -> Option<FixedOffset> {
        self.offset_secs.and_then(FixedOffset::east_opt)
    }

    /// Returns the timezone-aware datetime, if the timezone is known.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.timezone_offset()
            .and_then(|tz| self.naive.and_local_timezone(tz).single())
    }
}

impl FromStr for PhoneDateTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let parsed = if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Self::parse_epoch(s)
        } else {
            Self::parse_with_tz(s).or_else(|| Self::parse_naive(s))
        };

        parsed.ok_or_else(|| ParseError::InvalidValue {
            field: "timestamp".to_string(),
            message: format!("unrecognized timestamp: {s}"),
        })
    }
}

impl From<NaiveDateTime> for PhoneDateTime {
    fn from(naive: NaiveDateTime) -> Self {
        Self {
            naive,
            offset_secs: None,
        }
    }
}

impl From<DateTime<FixedOffset>> for PhoneDateTime {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self {
            naive: datetime.naive_local(),
            offset_secs: Some(datetime.offset().local_minus_utc()),
        }
    }
}

impl From<DateTime<Utc>> for PhoneDateTime {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self {
            naive: datetime.naive_utc(),
            offset_secs: Some(0),
        }
    }
}

impl fmt::Display for PhoneDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%:z")),
            None => write!(f, "{}", self.naive.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl Serialize for PhoneDateTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_iso_without_timezone() {
        let dt: PhoneDateTime = "2024-01-15T10:30:00".parse().unwrap();
        assert_eq!(dt.naive().year(), 2024);
        assert_eq!(dt.naive().hour(), 10);
        assert!(dt.to_datetime().is_none());
    }

    #[test]
    fn parse_iso_with_offset() {
        let dt: PhoneDateTime = "2024-01-15T10:30:00-05:00".parse().unwrap();
        assert_eq!(dt.timezone_offset().unwrap().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn parse_space_separated() {
        let dt: PhoneDateTime = "2024-01-15 10:30:00".parse().unwrap();
        assert_eq!(dt.naive().minute(), 30);
    }

    #[test]
    fn parse_us_date() {
        let dt: PhoneDateTime = "01/15/2024 10:30:00".parse().unwrap();
        assert_eq!(dt.naive().day(), 15);
        let dt: PhoneDateTime = "01/15/2024 02:30:00 PM".parse().unwrap();
        assert_eq!(dt.naive().hour(), 14);
    }

    #[test]
    fn parse_epoch_seconds() {
        let dt: PhoneDateTime = "1705314600".parse().unwrap();
        assert_eq!(dt.naive().year(), 2024);
        assert_eq!(dt.timezone_offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn parse_invalid() {
        assert!("".parse::<PhoneDateTime>().is_err());
        assert!("yesterday".parse::<PhoneDateTime>().is_err());
        assert!(PhoneDateTime::parse("2024-13-45").is_none());
    }

    #[test]
    fn serializes_as_iso_string() {
        let dt: PhoneDateTime = "2024-01-15 10:30:00".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&dt).unwrap(),
            "\"2024-01-15T10:30:00\""
        );
    }
}
