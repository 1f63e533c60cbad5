// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `PolyREST` library.
//!
//! This module provides the error hierarchy used across the library: input
//! validation, transport communication, response parsing, and failures
//! reported by the phone itself.

use thiserror::Error;

use crate::response::ApiStatus;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during input validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the phone.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The phone refused or failed the operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

impl Error {
    /// Returns `true` if the phone answered but reported a failure.
    #[must_use]
    pub fn is_device_failure(&self) -> bool {
        matches!(self, Self::Device(_))
    }

    /// Returns `true` if the phone could not be reached.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// Errors related to input validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// The device address is not a dotted-quad IPv4 address.
    #[error("invalid device address: {0}")]
    InvalidAddress(String),

    /// More parameter names were requested than one call allows.
    #[error("too many parameters: {actual} requested, at most {max} per call")]
    TooManyParameters {
        /// Maximum number of names per request.
        max: usize,
        /// Number of names supplied.
        actual: usize,
    },

    /// No parameter names were supplied.
    #[error("at least one parameter name is required")]
    NoParameters,

    /// A call handle is not a hexadecimal reference.
    #[error("invalid call handle: {0}")]
    InvalidCallHandle(String),

    /// A DTMF digit string contains characters the phone cannot send.
    #[error("invalid DTMF digits: {0}")]
    InvalidDtmf(String),

    /// A string cannot be embedded in a request body.
    #[error("{field} cannot be embedded in a JSON body: {reason}")]
    Unencodable {
        /// The request field that was being encoded.
        field: String,
        /// Why the value was refused.
        reason: String,
    },

    /// A required string was empty.
    #[error("{0} must not be empty")]
    Empty(String),
}

/// Errors related to HTTP communication with the phone.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The response body was not a JSON envelope.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// Every attempt failed.
    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u8,
        /// The error returned by the final attempt.
        last: Box<ProtocolError>,
    },
}

/// Errors related to parsing phone responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors reported by, or about, the phone.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The phone answered with a failure status.
    #[error("device rejected {endpoint}: {status}")]
    Rejected {
        /// The endpoint that was called.
        endpoint: String,
        /// The status the phone reported.
        status: ApiStatus,
    },

    /// The phone runs firmware on which the operation is known to hang the API.
    #[error(
        "refusing {operation} on firmware {firmware}: this release is known to hang the management API (pass an override to proceed)"
    )]
    UnsafeFirmware {
        /// The blocked operation.
        operation: String,
        /// The firmware version the phone reported.
        firmware: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::TooManyParameters { max: 20, actual: 21 };
        assert_eq!(
            err.to_string(),
            "too many parameters: 21 requested, at most 20 per call"
        );
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidAddress("10.0.0".to_string()).into();
        assert!(matches!(err, Error::Value(ValueError::InvalidAddress(_))));
        assert!(!err.is_device_failure());
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("data".to_string());
        assert_eq!(err.to_string(), "missing field in response: data");
    }

    #[test]
    fn device_error_is_distinct_from_transport() {
        let err: Error = DeviceError::Rejected {
            endpoint: "/api/v1/callctrl/dial".to_string(),
            status: ApiStatus::from_code("4002"),
        }
        .into();
        assert!(err.is_device_failure());
        assert!(!err.is_transport_failure());

        let err: Error = ProtocolError::Timeout(500).into();
        assert!(err.is_transport_failure());
    }

    #[test]
    fn retries_exhausted_display() {
        let err = ProtocolError::RetriesExhausted {
            attempts: 3,
            last: Box::new(ProtocolError::ConnectionFailed("refused".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "giving up after 3 attempts: connection failed: refused"
        );
    }
}
