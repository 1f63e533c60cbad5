// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Elapsed call duration from descriptive status text.

use std::time::Duration;

use crate::error::ParseError;
use crate::types::uptime::{parse_clock, parse_uptime};

/// Prefix phrases that precede the duration in status text.
///
/// Longer phrases come first so `"Call duration:"` wins over `"Duration:"`.
const PREFIXES: &[&str] = &["call duration:", "connected for", "duration:", "duration"];

/// Extracts the elapsed duration from a status string.
///
/// A known prefix phrase (`"Call duration:"`, `"Connected for"`,
/// `"Duration:"`) is stripped case-insensitively, then the remainder is read
/// as bare seconds, a clock (`H:MM:SS` / `MM:SS`), or the word form accepted
/// by [`parse_uptime`]. Input without a prefix is parsed as-is.
///
/// # Errors
///
/// Returns [`ParseError::InvalidValue`] if nothing parseable remains.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use polyrest_lib::types::parse_call_duration;
///
/// assert_eq!(
///     parse_call_duration("Connected for 0:05:23").unwrap(),
///     Duration::from_secs(323)
/// );
/// assert_eq!(
///     parse_call_duration("Duration: 42").unwrap(),
///     Duration::from_secs(42)
/// );
/// ```
pub fn parse_call_duration(text: &str) -> Result<Duration, ParseError> {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();

    let rest = PREFIXES
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map_or(trimmed, |prefix| &trimmed[prefix.len()..])
        .trim();

    if rest.is_empty() {
        return Err(ParseError::InvalidValue {
            field: "duration".to_string(),
            message: format!("no duration in: {text}"),
        });
    }

    if rest.bytes().all(|b| b.is_ascii_digit()) {
        let secs: u64 = rest.parse().map_err(|_| ParseError::InvalidValue {
            field: "duration".to_string(),
            message: format!("invalid seconds: {rest}"),
        })?;
        return Ok(Duration::from_secs(secs));
    }

    if !rest.contains(' ') && rest.contains(':') {
        return parse_clock(rest).map(Duration::from_secs);
    }

    parse_uptime(rest)
}
