// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line registration responses (`mgmt/lineInfo`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;
use crate::protocol::ApiResponse;
use crate::response::value;
use crate::types::DeviceAddress;

/// One line entry as the phone sends it.
///
/// Scalars are kept as raw JSON because firmware mixes strings and numbers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLine {
    line_number: Option<Value>,
    label: Option<Value>,
    #[serde(rename = "SIPAddress")]
    sip_address: Option<Value>,
    #[serde(rename = "UserID")]
    user_id: Option<Value>,
    protocol: Option<Value>,
    line_type: Option<Value>,
    proxy_address: Option<Value>,
    registration_status: Option<Value>,
    calls_in_progress: Option<Value>,
}

/// One configured line of a phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineRecord {
    /// One-based line number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u16>,
    /// Display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Registered SIP URI.
    #[serde(rename = "SIPAddress", skip_serializing_if = "Option::is_none")]
    pub sip_address: Option<String>,
    /// Authentication user.
    #[serde(rename = "UserID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Signalling protocol, upper-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// `private`, `shared`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_type: Option<String>,
    /// Outbound proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_address: Option<String>,
    /// Registration state; `None` if the phone sent something unrecognized.
    pub registered: Option<bool>,
    /// Number of calls currently on the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls_in_progress: Option<u32>,
    /// The phone the record came from.
    pub device_address: DeviceAddress,
}

impl LineRecord {
    fn from_raw(address: &DeviceAddress, raw: RawLine) -> Self {
        let text = |v: Option<Value>| v.as_ref().and_then(value::text);
        let number = |v: &Option<Value>| v.as_ref().and_then(value::unsigned);

        Self {
            line_number: number(&raw.line_number).and_then(|n| u16::try_from(n).ok()),
            calls_in_progress: number(&raw.calls_in_progress).and_then(|n| u32::try_from(n).ok()),
            registered: raw.registration_status.as_ref().and_then(value::boolean),
            label: text(raw.label),
            sip_address: text(raw.sip_address),
            user_id: text(raw.user_id),
            protocol: text(raw.protocol).map(|p| p.to_ascii_uppercase()),
            line_type: text(raw.line_type),
            proxy_address: text(raw.proxy_address),
            device_address: address.clone(),
        }
    }
}

/// Normalizes a `lineInfo` response. `data` may be one line or a list.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if an entry is not an object.
pub fn normalize_line_info(
    address: &DeviceAddress,
    response: &ApiResponse,
) -> Result<Vec<LineRecord>, ParseError> {
    let raw: Vec<RawLine> = match response.data() {
        Value::Null => Vec::new(),
        Value::Array(_) => response.parse_data()?,
        single => vec![serde_json::from_value(single.clone())?],
    };

    Ok(raw
        .into_iter()
        .map(|line| LineRecord::from_raw(address, line))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address() -> DeviceAddress {
        DeviceAddress::parse("10.0.0.5").unwrap()
    }

    #[test]
    fn registration_coerced() {
        let response = ApiResponse::new(json!({
            "Status": "2000",
            "data": [
                {"LineNumber": "1", "RegistrationStatus": "Registered", "Protocol": "sip"},
                {"LineNumber": 2, "RegistrationStatus": "unregistered"},
                {"LineNumber": "3", "RegistrationStatus": "pending"}
            ]
        }));
        let lines = normalize_line_info(&address(), &response).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].registered, Some(true));
        assert_eq!(lines[0].protocol.as_deref(), Some("SIP"));
        assert_eq!(lines[1].registered, Some(false));
        assert_eq!(lines[1].line_number, Some(2));
        assert_eq!(lines[2].registered, None);
    }

    #[test]
    fn single_object_accepted() {
        let response = ApiResponse::new(json!({
            "data": {"LineNumber": "1", "SIPAddress": "1001@pbx", "CallsInProgress": "0"}
        }));
        let lines = normalize_line_info(&address(), &response).unwrap();
        assert_eq!(lines[0].sip_address.as_deref(), Some("1001@pbx"));
        assert_eq!(lines[0].calls_in_progress, Some(0));
    }

    #[test]
    fn no_data_no_lines() {
        let response = ApiResponse::new(json!({"Status": "2000"}));
        assert!(normalize_line_info(&address(), &response).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_object_entries() {
        let response = ApiResponse::new(json!({"data": ["line1"]}));
        assert!(normalize_line_info(&address(), &response).is_err());
    }
}
