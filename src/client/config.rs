// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-client operation settings.

use std::time::Duration;

use crate::types::RetryCount;

/// Operation settings shared by every request a client sends.
///
/// Connection details (scheme, port, credentials) belong to the transport;
/// this holds what the operations themselves choose.
///
/// # Examples
///
/// ```
/// use polyrest_lib::client::ClientConfig;
/// use polyrest_lib::types::RetryCount;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_retries(RetryCount::new(5).unwrap())
///     .with_timeout(Duration::from_secs(3));
///
/// assert_eq!(config.retries().value(), 5);
/// assert_eq!(config.sign_in_timeout(), Duration::from_secs(155));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    retries: RetryCount,
    timeout: Option<Duration>,
    sign_in_timeout: Duration,
}

impl ClientConfig {
    /// Sign-in only answers once the account is registered.
    pub const DEFAULT_SIGN_IN_TIMEOUT: Duration = Duration::from_secs(155);

    /// Creates the default settings: three attempts, the transport's
    /// timeout, and a 155 second sign-in timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            retries: RetryCount::default(),
            timeout: None,
            sign_in_timeout: Self::DEFAULT_SIGN_IN_TIMEOUT,
        }
    }

    /// Sets the number of attempts per request.
    #[must_use]
    pub const fn with_retries(mut self, retries: RetryCount) -> Self {
        self.retries = retries;
        self
    }

    /// Overrides the transport's default timeout for every request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout used for UC sign-in.
    #[must_use]
    pub const fn with_sign_in_timeout(mut self, timeout: Duration) -> Self {
        self.sign_in_timeout = timeout;
        self
    }

    /// Returns the number of attempts per request.
    #[must_use]
    pub const fn retries(&self) -> RetryCount {
        self.retries
    }

    /// Returns the request timeout override, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the sign-in timeout.
    #[must_use]
    pub const fn sign_in_timeout(&self) -> Duration {
        self.sign_in_timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
