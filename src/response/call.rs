// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Call status normalization.
//!
//! The v1 endpoint reports at most one call as an object; the v2 endpoint
//! reports a list. Firmware 5.5 through 5.8 also disagree on the name of the
//! duration field. Both APIs are normalized into [`CallRecord`].
//!
//! # Examples
//!
//! ```
//! use polyrest_lib::protocol::ApiResponse;
//! use polyrest_lib::response::normalize_call_status_v1;
//! use polyrest_lib::types::DeviceAddress;
//! use serde_json::json;
//!
//! let address = DeviceAddress::parse("10.0.0.5").unwrap();
//! let response = ApiResponse::new(json!({
//!     "Status": "2000",
//!     "data": {"CallHandle": "0x1a2b", "DurationSeconds": "42", "UIAppearanceIndex": "3*"}
//! }));
//!
//! let calls = normalize_call_status_v1(&address, &response);
//! assert_eq!(calls[0].duration.unwrap().as_secs(), 42);
//! assert_eq!(calls[0].ui_appearance_index.as_deref(), Some("3"));
//! assert_eq!(calls[0].active_call, Some(true));
//! ```

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::ApiResponse;
use crate::response::value;
use crate::types::{CallHandle, DeviceAddress, PhoneDateTime};

/// Marker UI appearance indexes carry when the call is the active one.
const ACTIVE_MARKER: char = '*';

/// Name of the duration field, which depends on the firmware release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationField {
    /// `DurationSeconds`.
    Seconds,
    /// `DurationInSeconds`.
    InSeconds,
}

impl DurationField {
    /// Detects which duration field a call object carries.
    #[must_use]
    pub fn probe(call: &Map<String, Value>) -> Option<Self> {
        [Self::Seconds, Self::InSeconds]
            .into_iter()
            .find(|field| call.get(field.key()).is_some_and(|v| !v.is_null()))
    }

    /// Returns the JSON key of this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Seconds => "DurationSeconds",
            Self::InSeconds => "DurationInSeconds",
        }
    }
}

/// A call in progress on one phone.
///
/// Fields the phone did not report are omitted from serialized output, except
/// `ActiveCall` and `StartTime`, which serialize as `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallRecord {
    /// Incoming or outgoing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    /// Reference used by call control operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_handle: Option<CallHandle>,
    /// Elapsed time, serialized in whole seconds.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "value::serialize_seconds"
    )]
    pub duration: Option<Duration>,
    /// Signalling protocol, upper-cased (`SIP`, `H323`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Call state as reported (`Connected`, `Ringing`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_state: Option<String>,
    /// Display name of the far end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_party_name: Option<String>,
    /// Line the call is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<u16>,
    /// Number or URI of the far end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_party_number: Option<String>,
    /// Microphone muted (`0`/`1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<u8>,
    /// Call is ringing (`0`/`1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ringing: Option<u8>,
    /// Sequence of the call on its line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_sequence: Option<u32>,
    /// Call appearance slot, without the active marker.
    #[serde(rename = "UIAppearanceIndex", skip_serializing_if = "Option::is_none")]
    pub ui_appearance_index: Option<String>,
    /// Whether this is the active call; unknown when not reported.
    pub active_call: Option<bool>,
    /// Local RTP port.
    #[serde(rename = "RTPPort", skip_serializing_if = "Option::is_none")]
    pub rtp_port: Option<u16>,
    /// Local RTCP port.
    #[serde(rename = "RTCPPort", skip_serializing_if = "Option::is_none")]
    pub rtcp_port: Option<u16>,
    /// When the call started.
    pub start_time: Option<PhoneDateTime>,
    /// The phone the call is on.
    pub device_address: DeviceAddress,
}

/// Splits a v1 UI appearance index into its slot and active flag.
///
/// `"3*"` is the active call on slot 3, `"3"` an inactive call; anything
/// else keeps its text with the active flag unknown.
#[must_use]
pub fn split_appearance_index(raw: &str) -> (String, Option<bool>) {
    let raw = raw.trim();
    if let Some(slot) = raw.strip_suffix(ACTIVE_MARKER) {
        return (slot.trim().to_string(), Some(true));
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return (raw.to_string(), Some(false));
    }
    (raw.to_string(), None)
}

fn parse_start_time(call: &Map<String, Value>) -> Option<PhoneDateTime> {
    let text = value::field(call, &["StartTime"]).and_then(value::text)?;
    if text.len() <= 2 {
        return None;
    }
    let parsed = PhoneDateTime::parse(&text);
    if parsed.is_none() {
        tracing::debug!(start_time = %text, "Unrecognized call start time");
    }
    parsed
}

fn small<T: TryFrom<u64>>(call: &Map<String, Value>, key: &str) -> Option<T> {
    value::field(call, &[key])
        .and_then(value::unsigned)
        .and_then(|n| T::try_from(n).ok())
}

fn text_field(call: &Map<String, Value>, key: &str) -> Option<String> {
    value::field(call, &[key]).and_then(value::text)
}

/// Normalizes one call object. `markers` enables v1 appearance markers.
fn normalize_call(address: &DeviceAddress, call: &Map<String, Value>, markers: bool) -> CallRecord {
    let duration = DurationField::probe(call)
        .and_then(|field| call.get(field.key()))
        .and_then(value::unsigned)
        .map(Duration::from_secs);

    let call_handle = text_field(call, "CallHandle").and_then(|raw| {
        CallHandle::parse(&raw)
            .inspect_err(|e| tracing::warn!(address = %address, error = %e, "Ignoring call handle"))
            .ok()
    });

    let (ui_appearance_index, active_call) = match text_field(call, "UIAppearanceIndex") {
        Some(raw) if markers => {
            let (slot, active) = split_appearance_index(&raw);
            ((!slot.is_empty()).then_some(slot), active)
        }
        other => (other, None),
    };

    CallRecord {
        r#type: text_field(call, "Type"),
        call_handle,
        duration,
        protocol: text_field(call, "Protocol").map(|p| p.to_ascii_uppercase()),
        call_state: text_field(call, "CallState"),
        remote_party_name: text_field(call, "RemotePartyName"),
        line_id: small(call, "LineId"),
        remote_party_number: text_field(call, "RemotePartyNumber"),
        muted: value::field(call, &["Muted"]).and_then(value::flag),
        ringing: value::field(call, &["Ringing"]).and_then(value::flag),
        call_sequence: small(call, "CallSequence"),
        ui_appearance_index,
        active_call,
        rtp_port: small(call, "RTPPort"),
        rtcp_port: small(call, "RTCPPort"),
        start_time: parse_start_time(call),
        device_address: address.clone(),
    }
}

/// Normalizes a v1 call status response.
///
/// Returns an empty list when the phone reports no duration field, which is
/// how v1 signals that no call is active.
#[must_use]
pub fn normalize_call_status_v1(address: &DeviceAddress, response: &ApiResponse) -> Vec<CallRecord> {
    let Some(call) = response.data().as_object() else {
        return Vec::new();
    };
    if DurationField::probe(call).is_none() {
        tracing::debug!(address = %address, "No active call");
        return Vec::new();
    }
    vec![normalize_call(address, call, true)]
}

/// Normalizes a v2 call status response.
///
/// The payload is normally a list; a single call object is also accepted.
#[must_use]
pub fn normalize_call_status_v2(address: &DeviceAddress, response: &ApiResponse) -> Vec<CallRecord> {
    match response.data() {
        Value::Array(calls) => calls
            .iter()
            .filter_map(Value::as_object)
            .map(|call| normalize_call(address, call, false))
            .collect(),
        Value::Object(call) if !call.is_empty() => vec![normalize_call(address, call, false)],
        _ => Vec::new(),
    }
}
