// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UC presence responses (`mgmt/skype/getPresence`).

use serde::Serialize;
use serde_json::Map;

use crate::protocol::ApiResponse;
use crate::response::value;
use crate::types::DeviceAddress;

/// Presence state of the UC account signed in on a phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PresenceRecord {
    /// Presence as reported (`Available`, `Busy`, `Away`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence: Option<String>,
    /// Whether an account is signed in; `None` if not reported.
    pub signed_in: Option<bool>,
    /// Signed-in account address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// The phone the record came from.
    pub device_address: DeviceAddress,
}

/// Normalizes a presence response.
///
/// Firmware reports sign-in state either as a flag (`SignedIn`) or as a
/// state string (`SignInStatus`, `Status` inside `data`).
#[must_use]
pub fn normalize_presence(address: &DeviceAddress, response: &ApiResponse) -> PresenceRecord {
    let empty = Map::new();
    let data = response.data().as_object().unwrap_or(&empty);

    PresenceRecord {
        presence: value::field(data, &["Presence", "PresenceState", "State"]).and_then(value::text),
        signed_in: value::field(data, &["SignedIn", "SignInStatus", "Status"])
            .and_then(value::boolean),
        user: value::field(data, &["User", "UserName", "Address"]).and_then(value::text),
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
    fn signed_in_flag_coerced() {
        let response = ApiResponse::new(json!({
            "Status": "2000",
            "data": {"Presence": "Available", "SignedIn": "True", "User": "a@b.com"}
        }));
        let record = normalize_presence(&address(), &response);
        assert_eq!(record.presence.as_deref(), Some("Available"));
        assert_eq!(record.signed_in, Some(true));
        assert_eq!(record.user.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn sign_in_status_text() {
        let response = ApiResponse::new(json!({"data": {"SignInStatus": "SignedOut"}}));
        assert_eq!(normalize_presence(&address(), &response).signed_in, Some(false));
    }

    #[test]
    fn unknown_state_serializes_null() {
        let response = ApiResponse::new(json!({"data": {}}));
        let json = serde_json::to_value(normalize_presence(&address(), &response)).unwrap();
        assert_eq!(json, json!({"SignedIn": null, "DeviceAddress": "10.0.0.5"}));
    }
}
