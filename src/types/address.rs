// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device address type.
//!
//! Phones are addressed by a dotted-quad IPv4 string. The default parser is
//! deliberately loose: every segment may be any one-to-three digit number
//! from 0 to 299, which is what existing provisioning scripts accept. Use
//! [`DeviceAddress::parse_strict`] to reject segments above 255.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueError;

/// An IPv4 address identifying a target phone.
///
/// # Examples
///
/// ```
/// use polyrest_lib::types::DeviceAddress;
///
/// let addr: DeviceAddress = "192.168.1.40".parse().unwrap();
/// assert_eq!(addr.as_str(), "192.168.1.40");
///
/// // The loose pattern accepts segments up to 299
/// assert!(DeviceAddress::parse("10.0.0.256").is_ok());
/// assert!(DeviceAddress::parse_strict("10.0.0.256").is_err());
///
/// // Anything that is not four numeric segments is refused
/// assert!(DeviceAddress::parse("phone.local").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Highest segment value the loose pattern accepts.
    pub const LOOSE_SEGMENT_MAX: u16 = 299;

    /// Parses an address with the loose dotted-quad pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidAddress`] unless the input is four
    /// dot-separated groups of one to three digits, each at most 299.
    pub fn parse(input: &str) -> Result<Self, ValueError> {
        Self::parse_with_limit(input, Self::LOOSE_SEGMENT_MAX)
    }

    /// Parses an address, rejecting segments above 255.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidAddress`] if the input is not a valid
    /// IPv4 dotted quad.
    pub fn parse_strict(input: &str) -> Result<Self, ValueError> {
        Self::parse_with_limit(input, u16::from(u8::MAX))
    }

    /// Parses a list of addresses, stopping at the first invalid entry.
    ///
    /// # Errors
    ///
    /// Returns the error of the first address that fails to parse.
    pub fn parse_all<I, S>(inputs: I) -> Result<Vec<Self>, ValueError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        inputs
            .into_iter()
            .map(|s| Self::parse(s.as_ref()))
            .collect()
    }

    fn parse_with_limit(input: &str, limit: u16) -> Result<Self, ValueError> {
        let trimmed = input.trim();
        let invalid = || ValueError::InvalidAddress(input.to_string());

        let segments: Vec<&str> = trimmed.split('.').collect();
        if segments.len() != 4 {
            return Err(invalid());
        }

        for segment in segments {
            if segment.is_empty()
                || segment.len() > 3
                || !segment.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(invalid());
            }
            let value: u16 = segment.parse().map_err(|_| invalid())?;
            if value > limit {
                return Err(invalid());
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the address as it was supplied (whitespace trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts to a standard IPv4 address when every segment fits in a byte.
    #[must_use]
    pub fn to_ipv4(&self) -> Option<Ipv4Addr> {
        self.0.parse().ok()
    }
}

impl FromStr for DeviceAddress {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for DeviceAddress {
    type Error = ValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Ipv4Addr> for DeviceAddress {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr.to_string())
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
