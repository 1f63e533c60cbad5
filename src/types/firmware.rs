// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Firmware version numbers.
//!
//! Phones embed version numbers in longer strings, for example
//! `"5.9.0.9373 10-Jan-19 13:11"` for the application or
//! `"3.0.4.0117 (64167-001)"` for the boot block. [`FirmwareVersion::find`]
//! extracts the first version number found in such a string.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseError;

/// A dotted firmware version such as `5.5.2.1234A`.
///
/// The last numeric group may carry a letter build suffix.
///
/// # Examples
///
/// ```
/// use polyrest_lib::types::FirmwareVersion;
///
/// let version = FirmwareVersion::find("5.9.0.9373 10-Jan-19 13:11").unwrap();
/// assert_eq!(version.components(), &[5, 9, 0, 9373]);
/// assert_eq!(version.to_string(), "5.9.0.9373");
///
/// let version: FirmwareVersion = "5.5.2.1234A".parse().unwrap();
/// assert_eq!(version.suffix(), Some("A"));
/// assert!(version.starts_with(&[5, 5, 2]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirmwareVersion {
    components: Vec<u32>,
    suffix: Option<String>,
    text: String,
}

impl FirmwareVersion {
    /// Finds the first version number inside `text`.
    ///
    /// A version number is at least two digit groups joined by dots, where
    /// the final group may be followed by ASCII letters. Returns `None` if no
    /// such run exists.
    #[must_use]
    pub fn find(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let mut start = 0;

        while start < bytes.len() {
            let at_boundary = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
            if bytes[start].is_ascii_digit()
                && at_boundary
                && let Some(version) = Self::match_at(text, start)
            {
                return Some(version);
            }
            start += 1;
        }

        None
    }

    fn match_at(text: &str, start: usize) -> Option<Self> {
        let bytes = text.as_bytes();
        let mut components = Vec::new();
        let mut pos = start;

        loop {
            let group_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == group_start {
                break;
            }
            components.push(text[group_start..pos].parse::<u32>().ok()?);

            if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
                pos += 1;
            } else {
                break;
            }
        }

        if components.len() < 2 {
            return None;
        }

        let suffix_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        let suffix = (pos > suffix_start).then(|| text[suffix_start..pos].to_string());

        Some(Self {
            components,
            suffix,
            text: text[start..pos].to_string(),
        })
    }

    /// Returns the numeric groups.
    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Returns the letter build suffix, if any.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Returns the major version (first group).
    #[must_use]
    pub fn major(&self) -> u32 {
        self.components[0]
    }

    /// Returns the minor version (second group).
    #[must_use]
    pub fn minor(&self) -> u32 {
        self.components[1]
    }

    /// Returns the version as it appeared in the source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the leading groups equal `prefix`.
    ///
    /// `starts_with(&[5, 5, 2])` matches the `5.5.2.*` release family.
    #[must_use]
    pub fn starts_with(&self, prefix: &[u32]) -> bool {
        self.components.starts_with(prefix)
    }
}

impl FromStr for FirmwareVersion {
    type Err = ParseError;

    /// Parses a string that must consist of exactly one version number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match Self::find(trimmed) {
            Some(v) if v.text.len() == trimmed.len() => Ok(v),
            _ => Err(ParseError::InvalidValue {
                field: "firmware".to_string(),
                message: format!("not a version number: {s}"),
            }),
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for FirmwareVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
