// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Retry count type.

use std::fmt;

use crate::error::ValueError;

/// Number of attempts the transport makes per request (1-100).
///
/// A count of one means a single attempt with no retry.
///
/// # Examples
///
/// ```
/// use polyrest_lib::types::RetryCount;
///
/// let retries = RetryCount::new(3).unwrap();
/// assert_eq!(retries.value(), 3);
///
/// assert!(RetryCount::new(0).is_err());
/// assert!(RetryCount::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RetryCount(u8);

impl RetryCount {
    /// A single attempt.
    pub const ONCE: Self = Self(1);

    /// Largest accepted count.
    pub const MAX: Self = Self(100);

    /// Creates a retry count.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless `value` is within 1-100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value == 0 || value > Self::MAX.0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: u16::from(Self::MAX.0),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the number of attempts.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for RetryCount {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for RetryCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
