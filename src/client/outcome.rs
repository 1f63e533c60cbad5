// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device results of batch operations.

use crate::error::Error;
use crate::types::{CallHandle, DeviceAddress};

/// The result of one operation on one phone.
///
/// Batch operations return one outcome per address, in the order the
/// addresses were given. A failure on one phone never affects the others.
#[derive(Debug)]
pub struct DeviceOutcome<T> {
    address: DeviceAddress,
    result: Result<T, Error>,
}

impl<T> DeviceOutcome<T> {
    /// Creates an outcome for `address`.
    #[must_use]
    pub const fn new(address: DeviceAddress, result: Result<T, Error>) -> Self {
        Self { address, result }
    }

    /// Returns the phone this outcome belongs to.
    #[must_use]
    pub const fn address(&self) -> &DeviceAddress {
        &self.address
    }

    /// Returns the result.
    #[must_use]
    pub const fn result(&self) -> &Result<T, Error> {
        &self.result
    }

    /// Returns `true` if the operation succeeded on this phone.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the value if the operation succeeded.
    #[must_use]
    pub fn ok(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// Returns the error if the operation failed.
    #[must_use]
    pub fn err(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }

    /// Splits the outcome into its address and result.
    #[must_use]
    pub fn into_parts(self) -> (DeviceAddress, Result<T, Error>) {
        (self.address, self.result)
    }
}

/// What a call control operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    /// The phone accepted the operation for this call.
    Completed(CallHandle),
    /// No handle was given and no call could be found; nothing was sent.
    NoActiveCall,
}

impl ControlOutcome {
    /// Returns `true` if a request was sent and accepted.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;

    #[test]
    fn outcome_accessors() {
        let address = DeviceAddress::parse("10.0.0.5").unwrap();
        let ok = DeviceOutcome::new(address.clone(), Ok(7));
        assert!(ok.is_ok());
        assert_eq!(ok.ok(), Some(&7));
        assert!(ok.err().is_none());

        let failed: DeviceOutcome<i32> =
            DeviceOutcome::new(address.clone(), Err(ValueError::NoParameters.into()));
        assert!(!failed.is_ok());
        let (addr, result) = failed.into_parts();
        assert_eq!(addr, address);
        assert!(result.is_err());
    }

    #[test]
    fn control_outcome() {
        assert!(ControlOutcome::Completed(CallHandle::parse("1").unwrap()).is_completed());
        assert!(!ControlOutcome::NoActiveCall.is_completed());
    }
}
