// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot status reads with no fixed schema.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::{ApiResponse, Endpoint};
use crate::types::DeviceAddress;

/// Which read produced a [`StatusSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SnapshotKind {
    /// `mgmt/device/stats`.
    DeviceStats,
    /// `mgmt/network/info`.
    NetworkInfo,
    /// `mgmt/network/stats`.
    NetworkStats,
    /// `webCallControl/sipStatus`.
    SipStatus,
    /// `mgmt/pollForStatus`.
    PollForStatus,
    /// `mgmt/location`.
    LocationInfo,
}

impl SnapshotKind {
    /// Returns the endpoint this kind of snapshot is read from.
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::DeviceStats => Endpoint::DeviceStats,
            Self::NetworkInfo => Endpoint::NetworkInfo,
            Self::NetworkStats => Endpoint::NetworkStats,
            Self::SipStatus => Endpoint::SipStatus,
            Self::PollForStatus => Endpoint::PollForStatus,
            Self::LocationInfo => Endpoint::LocationInfo,
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DeviceStats => "device stats",
            Self::NetworkInfo => "network info",
            Self::NetworkStats => "network stats",
            Self::SipStatus => "SIP status",
            Self::PollForStatus => "poll for status",
            Self::LocationInfo => "location info",
        };
        f.write_str(name)
    }
}

/// Device state as reported by one read.
///
/// `fields` holds the `data` object as the phone sent it. A `data` array is
/// stored under `Items`; a scalar under `Value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusSnapshot {
    /// The read that produced the snapshot.
    pub kind: SnapshotKind,
    /// Reported fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// The phone the snapshot came from.
    pub device_address: DeviceAddress,
}

impl StatusSnapshot {
    /// Looks up a reported field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Wraps a status read into a [`StatusSnapshot`].
#[must_use]
pub fn normalize_snapshot(
    address: &DeviceAddress,
    kind: SnapshotKind,
    response: &ApiResponse,
) -> StatusSnapshot {
    let fields = match response.data() {
        Value::Object(fields) => fields.clone(),
        Value::Null => Map::new(),
        Value::Array(items) => Map::from_iter([("Items".to_string(), Value::Array(items.clone()))]),
        scalar => Map::from_iter([("Value".to_string(), scalar.clone())]),
    };

    StatusSnapshot {
        kind,
        fields,
        device_address: address.clone(),
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
    fn object_data_kept_as_fields() {
        let response = ApiResponse::new(json!({
            "Status": "2000",
            "data": {"IPV4Address": "10.0.0.5", "VLANID": ""}
        }));
        let snapshot = normalize_snapshot(&address(), SnapshotKind::NetworkInfo, &response);
        assert_eq!(snapshot.get("IPV4Address"), Some(&json!("10.0.0.5")));
        assert_eq!(snapshot.device_address, address());
    }

    #[test]
    fn array_data_goes_under_items() {
        let response = ApiResponse::new(json!({"data": [{"Port": 1}, {"Port": 2}]}));
        let snapshot = normalize_snapshot(&address(), SnapshotKind::NetworkStats, &response);
        assert_eq!(snapshot.get("Items").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn missing_data_is_empty() {
        let response = ApiResponse::new(json!({"Status": "2000"}));
        let snapshot = normalize_snapshot(&address(), SnapshotKind::PollForStatus, &response);
        assert!(snapshot.fields.is_empty());
    }

    #[test]
    fn serializes_flat_with_kind_and_address() {
        let response = ApiResponse::new(json!({"data": {"CPULoad": "12"}}));
        let snapshot = normalize_snapshot(&address(), SnapshotKind::DeviceStats, &response);
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({"Kind": "DeviceStats", "CPULoad": "12", "DeviceAddress": "10.0.0.5"})
        );
    }

    #[test]
    fn kind_maps_to_endpoint() {
        assert_eq!(SnapshotKind::SipStatus.endpoint(), Endpoint::SipStatus);
        assert_eq!(SnapshotKind::LocationInfo.to_string(), "location info");
    }
}
