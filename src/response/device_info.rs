// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device information normalization.
//!
//! Firmware and uptime each come in two shapes depending on the release.
//! The shape is detected first ([`FirmwareShape::probe`],
//! [`UptimeShape::probe`]) and then normalized by its own function.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::ApiResponse;
use crate::response::value;
use crate::types::{DeviceAddress, FirmwareVersion, PhoneDateTime, parse_uptime};

/// Model string some Trio firmware reports without its product family.
const SHORT_TRIO_MODEL: &str = "Trio 8800";
/// Full product name for [`SHORT_TRIO_MODEL`].
const FULL_TRIO_MODEL: &str = "RealPresence Trio 8800";

/// How a response describes the firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareShape<'a> {
    /// Older firmware: a single `FirmwareRelease` string.
    Flat(&'a str),
    /// Newer firmware: a `Firmware` object with `Updater`, `Application`
    /// and `BootBlock` strings.
    Nested(&'a Map<String, Value>),
    /// No firmware information.
    Missing,
}

impl<'a> FirmwareShape<'a> {
    /// Detects the firmware shape of a device info payload.
    #[must_use]
    pub fn probe(data: &'a Map<String, Value>) -> Self {
        if let Some(Value::Object(nested)) = data.get("Firmware") {
            return Self::Nested(nested);
        }
        match data.get("FirmwareRelease") {
            Some(Value::String(release)) if !release.trim().is_empty() => Self::Flat(release),
            _ => Self::Missing,
        }
    }
}

/// How a response describes the uptime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UptimeShape<'a> {
    /// Newer firmware: `Days`/`Hours`/`Minutes`/`Seconds` object.
    Structured(&'a Map<String, Value>),
    /// Older firmware: free text such as `"1 Day 20:13:49"`.
    Text(&'a str),
    /// No uptime information.
    Missing,
}

impl<'a> UptimeShape<'a> {
    const KEYS: [&'static str; 3] = ["UpTime", "Uptime", "UpTimeSinceLastReboot"];

    /// Detects the uptime shape of a device info payload.
    #[must_use]
    pub fn probe(data: &'a Map<String, Value>) -> Self {
        for key in Self::KEYS {
            match data.get(key) {
                Some(Value::Object(parts)) => return Self::Structured(parts),
                Some(Value::String(text)) if !text.trim().is_empty() => return Self::Text(text),
                _ => {}
            }
        }
        Self::Missing
    }
}

/// Normalized firmware fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Firmware {
    release: Option<FirmwareVersion>,
    updater: Option<String>,
    boot_block: Option<FirmwareVersion>,
}

fn normalize_flat_firmware(release: &str) -> Firmware {
    Firmware {
        release: FirmwareVersion::find(release),
        ..Firmware::default()
    }
}

fn normalize_nested_firmware(firmware: &Map<String, Value>) -> Firmware {
    let version = |key: &str| {
        value::field(firmware, &[key])
            .and_then(Value::as_str)
            .and_then(FirmwareVersion::find)
    };
    Firmware {
        release: version("Application"),
        updater: value::field(firmware, &["Updater"]).and_then(value::text),
        boot_block: version("BootBlock"),
    }
}

fn normalize_structured_uptime(parts: &Map<String, Value>) -> Duration {
    let part = |key: &str| {
        value::field(parts, &[key])
            .and_then(value::unsigned)
            .unwrap_or(0)
    };
    Duration::from_secs(
        part("Days")
            .saturating_mul(86_400)
            .saturating_add(part("Hours").saturating_mul(3_600))
            .saturating_add(part("Minutes").saturating_mul(60))
            .saturating_add(part("Seconds")),
    )
}

/// Rewrites vendor model strings to their full product names.
///
/// # Examples
///
/// ```
/// use polyrest_lib::response::normalize_model;
///
/// assert_eq!(normalize_model("Trio 8800"), "RealPresence Trio 8800");
/// assert_eq!(normalize_model("VVX 411"), "VVX 411");
/// ```
#[must_use]
pub fn normalize_model(model: &str) -> String {
    if model == SHORT_TRIO_MODEL {
        FULL_TRIO_MODEL.to_string()
    } else {
        model.to_string()
    }
}

/// Formats a MAC address as upper-case colon-separated octets.
///
/// Input that is not twelve hex digits (after removing separators) is
/// returned unchanged.
fn normalize_mac(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();
    if digits.len() != 12 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return raw.to_string();
    }
    digits
        .to_ascii_uppercase()
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(":")
}

/// Normalized `device/info` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceInfo {
    /// Product model, vendor inconsistencies corrected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Application firmware version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_release: Option<FirmwareVersion>,
    /// Updater version (nested firmware shape only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updater: Option<String>,
    /// Boot block version (nested firmware shape only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_block: Option<FirmwareVersion>,
    /// Time since the last reboot, serialized in whole seconds.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "value::serialize_seconds"
    )]
    pub uptime: Option<Duration>,
    /// When the phone last rebooted (UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reboot: Option<PhoneDateTime>,
    /// Hardware address.
    #[serde(rename = "MACAddress", skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    /// IPv4 address the phone reports for itself.
    #[serde(rename = "IPV4Address", skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    /// IPv6 address the phone reports for itself.
    #[serde(rename = "IPV6Address", skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    /// Endpoint category (`hardwareEndpoint`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Vendor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_vendor: Option<String>,
    /// Peripherals (cameras, expansion modules) keyed by kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_hardware: Option<Map<String, Value>>,
    /// The phone the record came from.
    pub device_address: DeviceAddress,
}

impl DeviceInfo {
    /// Returns `true` if the application firmware belongs to the release
    /// family starting with `prefix` (e.g. `&[5, 5, 2]`).
    #[must_use]
    pub fn firmware_matches(&self, prefix: &[u32]) -> bool {
        self.firmware_release
            .as_ref()
            .is_some_and(|v| v.starts_with(prefix))
    }
}

/// Normalizes a `device/info` response.
///
/// `now` is the reference time for computing `LastReboot`. Missing firmware
/// or uptime information is logged and leaves the corresponding fields
/// empty; the record is always returned.
#[must_use]
pub fn normalize_device_info(
    address: &DeviceAddress,
    response: &ApiResponse,
    now: DateTime<Utc>,
) -> DeviceInfo {
    let empty = Map::new();
    let data = response.data().as_object().unwrap_or(&empty);
    let text = |key: &str| value::field(data, &[key]).and_then(value::text);

    let firmware = match FirmwareShape::probe(data) {
        FirmwareShape::Flat(release) => normalize_flat_firmware(release),
        FirmwareShape::Nested(nested) => normalize_nested_firmware(nested),
        FirmwareShape::Missing => Firmware::default(),
    };
    if firmware.release.is_none() {
        tracing::warn!(address = %address, "Device reported no usable firmware version");
    }

    let uptime = match UptimeShape::probe(data) {
        UptimeShape::Structured(parts) => Some(normalize_structured_uptime(parts)),
        UptimeShape::Text(text) => parse_uptime(text)
            .inspect_err(|e| tracing::warn!(address = %address, error = %e, "Unparseable uptime"))
            .ok(),
        UptimeShape::Missing => None,
    };

    let last_reboot = uptime
        .and_then(|up| TimeDelta::from_std(up).ok())
        .and_then(|delta| now.checked_sub_signed(delta))
        .map(PhoneDateTime::from);

    DeviceInfo {
        model: text("ModelNumber").map(|m| normalize_model(&m)),
        firmware_release: firmware.release,
        updater: firmware.updater,
        boot_block: firmware.boot_block,
        uptime,
        last_reboot,
        mac_address: text("MACAddress").map(|m| normalize_mac(&m)),
        ipv4_address: text("IPV4Address"),
        ipv6_address: text("IPV6Address"),
        device_type: text("DeviceType"),
        device_vendor: text("DeviceVendor"),
        attached_hardware: value::field(data, &["AttachedHardware"])
            .and_then(Value::as_object)
            .filter(|hw| !hw.is_empty())
            .cloned(),
        device_address: address.clone(),
    }
}
