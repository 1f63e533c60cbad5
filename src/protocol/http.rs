// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the phone management API.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::ProtocolError;
use crate::protocol::{ApiRequest, ApiResponse, Method, Transport};
use crate::types::{DeviceAddress, RetryCount};

// ============================================================================
// HttpConfig - Connection settings shared by every phone
// ============================================================================

/// Connection settings for reaching phones over HTTP(S).
///
/// One configuration serves every address: phones provisioned together
/// normally share a port, scheme and admin credentials.
///
/// # Examples
///
/// ```
/// use polyrest_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new()
///     .with_credentials("Polycom", "456")
///     .with_timeout(Duration::from_secs(5))
///     .accept_invalid_certs();
///
/// assert_eq!(config.port(), 443);
/// assert!(config.use_https());
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    port: u16,
    port_explicit: bool,
    use_https: bool,
    credentials: Option<(String, String)>,
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration using HTTPS on port 443 without credentials.
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: Self::DEFAULT_HTTPS_PORT,
            port_explicit: false,
            use_https: true,
            credentials: None,
            timeout: Self::DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    /// Sets a custom port, kept regardless of the scheme.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self.port_explicit = true;
        self
    }

    /// Switches to plain HTTP.
    ///
    /// Unless a port was set with [`with_port`](Self::with_port), it
    /// becomes 80.
    #[must_use]
    pub fn with_http(mut self) -> Self {
        self.use_https = false;
        if !self.port_explicit {
            self.port = Self::DEFAULT_PORT;
        }
        self
    }

    /// Sets Basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accepts self-signed certificates, as shipped on phones by default.
    #[must_use]
    pub fn accept_invalid_certs(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the default timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL for a phone.
    #[must_use]
    pub fn base_url(&self, address: &DeviceAddress) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let default_port = if self.use_https {
            Self::DEFAULT_HTTPS_PORT
        } else {
            Self::DEFAULT_PORT
        };
        if self.port == default_port {
            format!("{scheme}://{address}")
        } else {
            format!("{scheme}://{address}:{}", self.port)
        }
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            config: self,
            client,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HttpClient - reqwest-backed transport
// ============================================================================

/// HTTP transport that sends Basic-authenticated JSON requests.
///
/// Transient failures (connection refused, timeouts, HTTP 5xx without an
/// envelope) are retried up to the attempt budget of each request.
/// Authentication failures and malformed bodies are not retried.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: HttpConfig,
    client: Client,
}

/// Outcome of one attempt.
enum Attempt {
    Done(ApiResponse),
    Transient(ProtocolError),
}

impl HttpClient {
    /// Returns the configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    async fn attempt(&self, url: &str, request: &ApiRequest) -> Result<Attempt, ProtocolError> {
        let timeout = request.timeout().unwrap_or(self.config.timeout);

        let mut builder = match request.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        }
        .timeout(timeout);

        if let Some((username, password)) = self.config.credentials() {
            builder = builder.basic_auth(username, Some(password));
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                return Ok(Attempt::Transient(ProtocolError::Timeout(millis)));
            }
            Err(e) if e.is_connect() => {
                return Ok(Attempt::Transient(ProtocolError::ConnectionFailed(
                    e.to_string(),
                )));
            }
            Err(e) => return Err(ProtocolError::Http(e)),
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProtocolError::AuthenticationFailed);
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;
        tracing::debug!(status = status.as_u16(), body = %body, "Received HTTP response");

        if status.is_success() {
            return ApiResponse::from_body(&body).map(Attempt::Done);
        }

        // Phones report logical failures with a JSON envelope on 4xx/5xx.
        // Any other body on an error status is a transport failure.
        if let Ok(envelope) = ApiResponse::from_body(&body) {
            let reported = envelope.status();
            if reported.is_reported() && !reported.is_success() {
                return Ok(Attempt::Done(envelope));
            }
        }

        let failure = ProtocolError::ConnectionFailed(format!(
            "HTTP {} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ));
        if status.is_server_error() {
            Ok(Attempt::Transient(failure))
        } else {
            Err(failure)
        }
    }
}

impl Transport for HttpClient {
    async fn invoke(
        &self,
        address: &DeviceAddress,
        request: &ApiRequest,
        retries: RetryCount,
    ) -> Result<ApiResponse, ProtocolError> {
        let url = format!("{}{}", self.config.base_url(address), request.path());
        let attempts = retries.value();
        let mut last = None;

        for attempt in 1..=attempts {
            tracing::debug!(
                method = %request.method(),
                url = %url,
                attempt,
                "Sending HTTP request"
            );

            match self.attempt(&url, request).await? {
                Attempt::Done(response) => return Ok(response),
                Attempt::Transient(e) => {
                    if attempt < attempts {
                        tracing::warn!(
                            address = %address,
                            attempt,
                            error = %e,
                            "Request failed, retrying"
                        );
                    }
                    last = Some(e);
                }
            }
        }

        let last = last.unwrap_or_else(|| ProtocolError::ConnectionFailed(url));
        if attempts == 1 {
            Err(last)
        } else {
            Err(ProtocolError::RetriesExhausted {
                attempts,
                last: Box::new(last),
            })
        }
    }
}
