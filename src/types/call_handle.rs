// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Call handle type.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueError;

/// An opaque per-call reference assigned by the phone.
///
/// Phones report handles as hexadecimal strings such as `"0x2d8a6c0"`. The
/// `0x` prefix is optional on input; the digits are stored lower-cased.
///
/// # Examples
///
/// ```
/// use polyrest_lib::types::CallHandle;
///
/// let handle = CallHandle::parse("0x2D8A6C0").unwrap();
/// assert_eq!(handle.hex_digits(), "2d8a6c0");
/// assert_eq!(handle.to_string(), "0x2d8a6c0");
///
/// assert!(CallHandle::parse("0xZZ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallHandle(String);

impl CallHandle {
    /// Longest digit string a handle may carry (64 bits).
    pub const MAX_DIGITS: usize = 16;

    /// Parses a call handle, with or without the `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidCallHandle`] if the digits are empty,
    /// too long, or not hexadecimal.
    pub fn parse(input: &str) -> Result<Self, ValueError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty()
            || digits.len() > Self::MAX_DIGITS
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(ValueError::InvalidCallHandle(input.to_string()));
        }

        Ok(Self(digits.to_ascii_lowercase()))
    }

    /// Returns the handle digits without the `0x` prefix.
    ///
    /// This is the form the v2 call status endpoint expects in its `handle`
    /// query parameter.
    #[must_use]
    pub fn hex_digits(&self) -> &str {
        &self.0
    }
}

impl FromStr for CallHandle {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CallHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

impl Serialize for CallHandle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
