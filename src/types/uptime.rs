// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-text uptime parsing.
//!
//! Older phone firmware reports uptime as a human-readable string rather
//! than a structured object. Observed forms include:
//!
//! - `"2 days 3 hours 14 minutes"`
//! - `"1 Day 20:13:49"`
//! - `"0 day(s) 5 hour(s) 2 minute(s) 9 second(s)"`
//! - `"45 mins, 12 secs"`
//! - `"3:14:07"`
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use polyrest_lib::types::parse_uptime;
//!
//! let duration = parse_uptime("1 Day 20:13:49").unwrap();
//! assert_eq!(duration, Duration::from_secs(159_229));
//! ```

use std::time::Duration;

use crate::error::ParseError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    fn from_word(word: &str) -> Option<Self> {
        let word = word.to_ascii_lowercase();
        let word = word.trim_end_matches("(s)");
        match word {
            "d" | "day" | "days" => Some(Self::Day),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Self::Hour),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(Self::Minute),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Second),
            _ => None,
        }
    }

    const fn seconds(self) -> u64 {
        match self {
            Self::Day => SECS_PER_DAY,
            Self::Hour => SECS_PER_HOUR,
            Self::Minute => SECS_PER_MINUTE,
            Self::Second => 1,
        }
    }
}

fn invalid(message: String) -> ParseError {
    ParseError::InvalidValue {
        field: "uptime".to_string(),
        message,
    }
}

/// Parses a free-text uptime string into a [`Duration`].
///
/// # Grammar
///
/// A sequence of `<number> <unit>` pairs, optionally followed by (or
/// consisting only of) a clock in `H:MM:SS` or `MM:SS` form. Units are
/// case-insensitive and may be singular, plural, abbreviated, or carry a
/// `(s)` suffix. Commas are ignored. The number and unit may be written
/// together (`"3d"`).
///
/// # Errors
///
/// Returns [`ParseError::InvalidValue`] if:
/// - The string is empty
/// - A number is not followed by a known unit
/// - A unit appears twice, or a clock appears twice
/// - A clock has minutes or seconds above 59
pub fn parse_uptime(s: &str) -> Result<Duration, ParseError> {
    let text = s.replace(',', " ");
    let mut tokens = text.split_whitespace().peekable();

    if tokens.peek().is_none() {
        return Err(invalid("empty uptime string".to_string()));
    }

    let mut seen: Vec<Unit> = Vec::new();
    let mut clock_seen = false;
    let mut total: u64 = 0;

    while let Some(token) = tokens.next() {
        if token.contains(':') {
            if clock_seen {
                return Err(invalid(format!("more than one clock value in: {s}")));
            }
            clock_seen = true;
            total = total.saturating_add(parse_clock(token)?);
            continue;
        }

        let digits_end = token
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(token.len());
        if digits_end == 0 {
            return Err(invalid(format!("expected a number, got: {token}")));
        }
        let value: u64 = token[..digits_end]
            .parse()
            .map_err(|_| invalid(format!("invalid number: {token}")))?;

        let unit_word = if digits_end < token.len() {
            &token[digits_end..]
        } else {
            tokens
                .next()
                .ok_or_else(|| invalid(format!("number {value} has no unit")))?
        };
        let unit = Unit::from_word(unit_word)
            .ok_or_else(|| invalid(format!("unknown unit: {unit_word}")))?;

        if seen.contains(&unit) {
            return Err(invalid(format!("unit repeated: {unit_word}")));
        }
        seen.push(unit);
        total = total.saturating_add(value.saturating_mul(unit.seconds()));
    }

    Ok(Duration::from_secs(total))
}

/// Parses `H:MM:SS` or `MM:SS` into seconds.
pub(crate) fn parse_clock(token: &str) -> Result<u64, ParseError> {
    let parts: Vec<&str> = token.split(':').collect();
    let numbers = parts
        .iter()
        .map(|p| {
            p.parse::<u64>()
                .map_err(|_| invalid(format!("invalid clock component: {p}")))
        })
        .collect::<Result<Vec<u64>, ParseError>>()?;

    let (hours, minutes, seconds) = match numbers.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => (0, *m, *s),
        _ => return Err(invalid(format!("expected H:MM:SS or MM:SS, got: {token}"))),
    };

    if minutes > 59 {
        return Err(invalid(format!("minutes must be 0-59, got: {minutes}")));
    }
    if seconds > 59 {
        return Err(invalid(format!("seconds must be 0-59, got: {seconds}")));
    }

    Ok(hours
        .saturating_mul(SECS_PER_HOUR)
        .saturating_add(minutes * SECS_PER_MINUTE + seconds))
}

/// Formats a duration in the long form accepted by [`parse_uptime`].
///
/// Sub-second precision is dropped.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use polyrest_lib::types::{format_uptime, parse_uptime};
///
/// let text = format_uptime(Duration::from_secs(93_784));
/// assert_eq!(text, "1 days 2 hours 3 minutes 4 seconds");
/// assert_eq!(parse_uptime(&text).unwrap(), Duration::from_secs(93_784));
/// ```
#[must_use]
pub fn format_uptime(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;
    format!("{days} days {hours} hours {minutes} minutes {seconds} seconds")
}
