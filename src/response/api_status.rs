// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Envelope status indicator.

use std::fmt;

use serde_json::Value;

/// Status indicator found in a response envelope.
///
/// Most firmware reports a four-digit `Status` code (`"2000"` on success);
/// some endpoints instead carry a boolean `Success` flag.
///
/// # Examples
///
/// ```
/// use polyrest_lib::response::ApiStatus;
/// use serde_json::json;
///
/// let ok = ApiStatus::from_envelope(&json!({"Status": "2000"}));
/// assert!(ok.is_success());
///
/// let busy = ApiStatus::from_envelope(&json!({"Status": "4001"}));
/// assert!(!busy.is_success());
/// assert_eq!(busy.description(), Some("device busy"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus {
    /// A vendor status code.
    Code(String),
    /// A boolean success flag.
    Flag(bool),
    /// The envelope carried no indicator.
    Unreported,
}

impl ApiStatus {
    /// The code phones return on success.
    pub const SUCCESS_CODE: &'static str = "2000";

    /// Wraps a status code.
    #[must_use]
    pub fn from_code(code: impl Into<String>) -> Self {
        Self::Code(code.into())
    }

    /// Reads the indicator from a response body.
    ///
    /// `Status` wins over `Success` when both are present. Numeric and
    /// string codes are both accepted.
    #[must_use]
    pub fn from_envelope(body: &Value) -> Self {
        match body.get("Status") {
            Some(Value::String(code)) => return Self::Code(code.trim().to_string()),
            Some(Value::Number(code)) => return Self::Code(code.to_string()),
            _ => {}
        }

        match body.get("Success").or_else(|| body.get("success")) {
            Some(Value::Bool(flag)) => Self::Flag(*flag),
            Some(Value::String(text)) => Self::Flag(text.eq_ignore_ascii_case("true")),
            _ => Self::Unreported,
        }
    }

    /// Returns `true` if the envelope carries a `Status` code or a
    /// `Success` flag.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        !matches!(self, Self::Unreported)
    }

    /// Returns `true` if the phone reported success.
    ///
    /// An envelope without any indicator counts as success; the HTTP layer
    /// only hands over such envelopes for 2xx replies.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Code(code) => code.starts_with('2'),
            Self::Flag(flag) => *flag,
            Self::Unreported => true,
        }
    }

    /// Returns the documented meaning of a status code.
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        let Self::Code(code) = self else {
            return None;
        };
        let text = match code.as_str() {
            "2000" => "success",
            "4000" => "invalid input parameters",
            "4001" => "device busy",
            "4002" => "line not registered",
            "4003" => "operation not allowed",
            "4004" => "operation not supported",
            "4005" => "line does not exist",
            "4006" => "URLs not configured",
            "4007" => "call does not exist",
            "4008" => "configuration export failed",
            "4009" => "input size limit exceeded",
            "4010" => "default password not allowed",
            "5000" => "failed to process request",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.description()) {
            (Self::Code(code), Some(text)) => write!(f, "status {code} ({text})"),
            (Self::Code(code), None) => write!(f, "status {code}"),
            (Self::Flag(flag), _) => write!(f, "success={flag}"),
            (Self::Unreported, _) => f.write_str("no status reported"),
        }
    }
}
