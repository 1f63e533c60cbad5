// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for the phone management API.
//!
//! Every operation is one JSON request/response round trip against a single
//! phone. The [`Transport`] trait is the seam between the endpoint
//! operations and the wire; [`HttpClient`] is the shipped implementation.
//!
//! # Envelope
//!
//! Phones wrap every response in an envelope carrying a status indicator
//! and a `data` payload:
//!
//! ```json
//! {"Status": "2000", "data": {"ModelNumber": "VVX 411"}}
//! ```
//!
//! [`ApiResponse`] gives access to both halves without assuming anything
//! about the payload schema.

mod endpoint;
#[cfg(feature = "http")]
mod http;

pub use endpoint::{CallLogKind, CallStatusFilter, Endpoint, Method, ResetScope};
#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use std::time::Duration;

use serde_json::Value;

use crate::error::{ParseError, ProtocolError};
use crate::response::ApiStatus;
use crate::types::{DeviceAddress, RetryCount};

/// A single request to a phone.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    timeout: Option<Duration>,
}

impl ApiRequest {
    /// Creates a request for `endpoint` with no body.
    #[must_use]
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            method: endpoint.method(),
            path: endpoint.path(),
            body: None,
            timeout: None,
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Overrides the transport's default timeout for this request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the path including any query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the per-request timeout override, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Parsed response envelope from a phone.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    body: Value,
}

impl ApiResponse {
    /// Wraps an already-parsed JSON body.
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Parses a raw response body.
    ///
    /// An empty body is treated as an empty envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedBody`] if the body is not JSON.
    pub fn from_body(text: &str) -> Result<Self, ProtocolError> {
        if text.trim().is_empty() {
            return Ok(Self::new(Value::Null));
        }
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|e| ProtocolError::MalformedBody(e.to_string()))
    }

    /// Returns the whole JSON body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the status indicator of the envelope.
    #[must_use]
    pub fn status(&self) -> ApiStatus {
        ApiStatus::from_envelope(&self.body)
    }

    /// Returns `true` if the envelope reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// Returns the `data` payload, or `Null` if absent.
    #[must_use]
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&Value::Null)
    }

    /// Deserializes the `data` payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns error if the payload does not match `T`.
    pub fn parse_data<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        T::deserialize(self.data()).map_err(Into::into)
    }
}

/// Trait for transports that carry requests to phones.
///
/// Implementations own connection details (scheme, port, credentials,
/// default timeout) and the retry loop; callers only choose the target
/// address and the attempt budget per request.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends `request` to the phone at `address`.
    ///
    /// # Arguments
    ///
    /// * `address` - The target phone
    /// * `request` - Method, path, optional body and timeout
    /// * `retries` - Maximum number of attempts for transient failures
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the phone cannot be reached or the reply
    /// is not a JSON envelope.
    async fn invoke(
        &self,
        address: &DeviceAddress,
        request: &ApiRequest,
        retries: RetryCount,
    ) -> Result<ApiResponse, ProtocolError>;
}
