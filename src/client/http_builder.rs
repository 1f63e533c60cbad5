// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client builder.

use std::time::Duration;

use crate::client::{ClientConfig, PhoneClient};
use crate::error::Error;
use crate::protocol::{HttpClient, HttpConfig};
use crate::types::RetryCount;

/// Builder for clients that reach phones over HTTP(S).
///
/// This builder can be created in two ways:
/// - `PhoneClient::http()` - HTTPS on port 443 with no credentials
/// - `PhoneClient::http_config(config)` - A prepared [`HttpConfig`]
///
/// # Examples
///
/// ```
/// use polyrest_lib::PhoneClient;
/// use polyrest_lib::types::RetryCount;
/// use std::time::Duration;
///
/// let client = PhoneClient::http()
///     .with_credentials("Polycom", "456")
///     .with_timeout(Duration::from_secs(5))
///     .with_retries(RetryCount::new(2).unwrap())
///     .accept_invalid_certs()
///     .build()
///     .unwrap();
///
/// assert_eq!(client.config().retries().value(), 2);
/// assert_eq!(client.transport().config().port(), 443);
/// ```
#[derive(Debug)]
pub struct PhoneClientBuilder {
    http: HttpConfig,
    config: ClientConfig,
}

impl PhoneClientBuilder {
    pub(crate) fn new(http: HttpConfig) -> Self {
        Self {
            http,
            config: ClientConfig::new(),
        }
    }

    /// Sets the admin credentials for HTTP basic authentication.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.http = self.http.with_credentials(username, password);
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.http = self.http.with_port(port);
        self
    }

    /// Uses plain HTTP instead of HTTPS.
    #[must_use]
    pub fn with_http(mut self) -> Self {
        self.http = self.http.with_http();
        self
    }

    /// Accepts self-signed phone certificates.
    #[must_use]
    pub fn accept_invalid_certs(mut self) -> Self {
        self.http = self.http.accept_invalid_certs();
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Sets the number of attempts per request.
    #[must_use]
    pub fn with_retries(mut self, retries: RetryCount) -> Self {
        self.config = self.config.with_retries(retries);
        self
    }

    /// Sets the UC sign-in timeout.
    #[must_use]
    pub fn with_sign_in_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_sign_in_timeout(timeout);
        self
    }

    /// Replaces the operation settings.
    #[must_use]
    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the client.
    ///
    /// No request is sent; phones are contacted per operation.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build(self) -> Result<PhoneClient<HttpClient>, Error> {
        let transport = self.http.into_client()?;
        Ok(PhoneClient::with_transport(transport, self.config))
    }
}

impl PhoneClient<HttpClient> {
    /// Starts building an HTTPS client with default settings.
    #[must_use]
    pub fn http() -> PhoneClientBuilder {
        PhoneClientBuilder::new(HttpConfig::new())
    }

    /// Starts building a client from a prepared HTTP configuration.
    #[must_use]
    pub fn http_config(config: HttpConfig) -> PhoneClientBuilder {
        PhoneClientBuilder::new(config)
    }
}
