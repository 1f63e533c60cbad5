// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Call log responses (`mgmt/callLogs`).

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::{ApiResponse, CallLogKind};
use crate::response::value;
use crate::types::{DeviceAddress, PhoneDateTime, parse_call_duration};

/// One entry of a phone's call history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallLogEntry {
    /// List the entry belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CallLogKind>,
    /// Line the call was on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u16>,
    /// Signalling protocol, upper-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Far end display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_party_name: Option<String>,
    /// Far end number or URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_party_number: Option<String>,
    /// When the call started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<PhoneDateTime>,
    /// Call length, serialized in whole seconds.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "value::serialize_seconds"
    )]
    pub duration: Option<Duration>,
    /// The phone the entry came from.
    pub device_address: DeviceAddress,
}

fn parse_entry(
    address: &DeviceAddress,
    kind: Option<CallLogKind>,
    entry: &Map<String, Value>,
) -> CallLogEntry {
    let text = |names: &[&str]| value::field(entry, names).and_then(value::text);

    let duration = match value::field(entry, &["Duration", "CallDuration"]) {
        Some(Value::Number(n)) => n.as_u64().map(Duration::from_secs),
        Some(Value::String(s)) => parse_call_duration(s)
            .inspect_err(|e| tracing::debug!(address = %address, error = %e, "Unparseable call log duration"))
            .ok(),
        _ => None,
    };

    CallLogEntry {
        kind,
        line_number: value::field(entry, &["LineNumber", "Line"])
            .and_then(value::unsigned)
            .and_then(|n| u16::try_from(n).ok()),
        protocol: text(&["Protocol"]).map(|p| p.to_ascii_uppercase()),
        remote_party_name: text(&["RemotePartyName"]),
        remote_party_number: text(&["RemotePartyNumber"]),
        start_time: text(&["StartTime"]).and_then(|t| PhoneDateTime::parse(&t)),
        duration,
        device_address: address.clone(),
    }
}

fn parse_list(
    address: &DeviceAddress,
    kind: Option<CallLogKind>,
    list: &Value,
) -> impl Iterator<Item = CallLogEntry> {
    list.as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .map(move |entry| parse_entry(address, kind, entry))
}

/// Normalizes a call log response.
///
/// A filtered read (`requested` set) returns a plain list. An unfiltered
/// read returns an object keyed by list (`Missed`, `Received`, `Placed`);
/// entries are emitted in that order.
#[must_use]
pub fn normalize_call_logs(
    address: &DeviceAddress,
    requested: Option<CallLogKind>,
    response: &ApiResponse,
) -> Vec<CallLogEntry> {
    const LISTS: [(&str, CallLogKind); 3] = [
        ("Missed", CallLogKind::Missed),
        ("Received", CallLogKind::Received),
        ("Placed", CallLogKind::Placed),
    ];

    match response.data() {
        list @ Value::Array(_) => parse_list(address, requested, list).collect(),
        Value::Object(lists) => LISTS
            .iter()
            .filter_map(|(key, kind)| lists.get(*key).map(|list| (*kind, list)))
            .flat_map(|(kind, list)| parse_list(address, Some(kind), list))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address() -> DeviceAddress {
        DeviceAddress::parse("10.0.0.5").unwrap()
    }

    #[test]
    fn unfiltered_lists_in_order() {
        let response = ApiResponse::new(json!({
            "Status": "2000",
            "data": {
                "Placed": [{"RemotePartyNumber": "300", "Duration": "0:01:05"}],
                "Missed": [{"RemotePartyNumber": "100"}, {"RemotePartyNumber": "101"}]
            }
        }));
        let entries = normalize_call_logs(&address(), None, &response);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, Some(CallLogKind::Missed));
        assert_eq!(entries[2].kind, Some(CallLogKind::Placed));
        assert_eq!(entries[2].duration, Some(Duration::from_secs(65)));
    }

    #[test]
    fn filtered_list() {
        let response = ApiResponse::new(json!({
            "data": [{
                "LineNumber": "1",
                "Protocol": "sip",
                "StartTime": "2024-01-15T10:30:00",
                "Duration": "Duration: 2 minutes 3 seconds"
            }]
        }));
        let entries = normalize_call_logs(&address(), Some(CallLogKind::Received), &response);
        assert_eq!(entries[0].kind, Some(CallLogKind::Received));
        assert_eq!(entries[0].line_number, Some(1));
        assert_eq!(entries[0].protocol.as_deref(), Some("SIP"));
        assert_eq!(entries[0].duration, Some(Duration::from_secs(123)));
        assert!(entries[0].start_time.is_some());
    }

    #[test]
    fn bad_duration_is_absent() {
        let response = ApiResponse::new(json!({"data": [{"Duration": "forever"}]}));
        let entries = normalize_call_logs(&address(), None, &response);
        assert!(entries[0].duration.is_none());
    }

    #[test]
    fn numeric_duration_is_seconds() {
        let response = ApiResponse::new(json!({"data": [{"Duration": 42}]}));
        let json = serde_json::to_value(&normalize_call_logs(&address(), None, &response)[0]).unwrap();
        assert_eq!(json["Duration"], 42);
    }

    #[test]
    fn empty_data() {
        let response = ApiResponse::new(json!({"Status": "2000"}));
        assert!(normalize_call_logs(&address(), None, &response).is_empty());
    }
}
