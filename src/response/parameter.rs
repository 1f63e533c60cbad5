// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration parameter responses.

use serde::Serialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::protocol::ApiResponse;
use crate::types::DeviceAddress;

/// Where a parameter record's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParameterSource {
    /// The phone reported the value.
    Device,
    /// The phone answered but the value could not be read.
    Error,
    /// The phone reported the name as invalid.
    InvalidParams,
}

/// One configuration parameter read from, or written to, one phone.
///
/// Serializes with the field names `DeviceAddress`, `ParameterName`, `Value`,
/// `Source` and `IsValid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterRecord {
    /// The phone the record came from.
    pub device_address: DeviceAddress,
    /// The parameter name, e.g. `device.prov.serverName`.
    pub parameter_name: String,
    /// The value, absent for invalid or unreadable parameters.
    pub value: Option<String>,
    /// Provenance of the value.
    pub source: ParameterSource,
    /// Whether the phone accepted the parameter name.
    pub is_valid: bool,
}

impl ParameterRecord {
    /// Builds a record from a field of the `data` object.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] if the field is not a scalar.
    pub fn from_field(
        address: &DeviceAddress,
        name: &str,
        value: &Value,
    ) -> Result<Self, ParseError> {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            other => {
                return Err(ParseError::InvalidValue {
                    field: name.to_string(),
                    message: format!("expected a scalar, got {other}"),
                });
            }
        };

        Ok(Self {
            device_address: address.clone(),
            parameter_name: name.to_string(),
            value: Some(value),
            source: ParameterSource::Device,
            is_valid: true,
        })
    }

    /// Builds the record for a name the phone reported as invalid.
    #[must_use]
    pub fn invalid(address: &DeviceAddress, name: &str) -> Self {
        Self {
            device_address: address.clone(),
            parameter_name: name.to_string(),
            value: None,
            source: ParameterSource::InvalidParams,
            is_valid: false,
        }
    }

    /// Builds the record for a parameter whose value could not be read.
    #[must_use]
    pub fn error(address: &DeviceAddress, name: &str) -> Self {
        Self {
            device_address: address.clone(),
            parameter_name: name.to_string(),
            value: None,
            source: ParameterSource::Error,
            is_valid: true,
        }
    }

    /// Builds the record confirming a successful write.
    #[must_use]
    pub fn written(address: &DeviceAddress, name: &str, value: &str) -> Self {
        Self {
            device_address: address.clone(),
            parameter_name: name.to_string(),
            value: Some(value.to_string()),
            source: ParameterSource::Device,
            is_valid: true,
        }
    }
}

/// Collects the names listed under `InvalidParams`.
///
/// The list may sit at the top level or inside `data`, and may be an array
/// or a comma-separated string.
fn invalid_names(response: &ApiResponse) -> Vec<String> {
    let listed = response
        .body()
        .get("InvalidParams")
        .or_else(|| response.data().get("InvalidParams"));

    match listed {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .collect(),
        Some(Value::String(list)) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalizes a `config/get` response into one record per requested name.
///
/// Records follow the order of `names`. A name is reported as
/// [`ParameterSource::InvalidParams`] if the phone listed it as invalid,
/// [`ParameterSource::Device`] if its value is present, and
/// [`ParameterSource::Error`] otherwise. A bad field never affects the
/// records of other names.
#[must_use]
pub fn normalize_config_get(
    address: &DeviceAddress,
    names: &[String],
    response: &ApiResponse,
) -> Vec<ParameterRecord> {
    let invalid = invalid_names(response);
    let fields = response.data().as_object();

    names
        .iter()
        .map(|name| {
            if invalid.iter().any(|n| n == name) {
                return ParameterRecord::invalid(address, name);
            }

            let Some(value) = fields.and_then(|f| f.get(name.as_str())) else {
                tracing::warn!(address = %address, parameter = %name, "Parameter missing from response");
                return ParameterRecord::error(address, name);
            };

            ParameterRecord::from_field(address, name, value).unwrap_or_else(|e| {
                tracing::warn!(address = %address, parameter = %name, error = %e, "Unreadable parameter value");
                ParameterRecord::error(address, name)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address() -> DeviceAddress {
        DeviceAddress::parse("10.0.0.5").unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn valid_fields_are_device_records() {
        let response = ApiResponse::new(json!({
            "Status": "2000",
            "data": {"voIpProt.SIP.enable": "1", "up.backlight.idleIntensity": 2}
        }));
        let records = normalize_config_get(
            &address(),
            &names(&["voIpProt.SIP.enable", "up.backlight.idleIntensity"]),
            &response,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value.as_deref(), Some("1"));
        assert_eq!(records[0].source, ParameterSource::Device);
        assert_eq!(records[1].value.as_deref(), Some("2"));
    }

    #[test]
    fn invalid_names_at_top_level() {
        let response = ApiResponse::new(json!({
            "Status": "2000",
            "data": {"a.valid": "x"},
            "InvalidParams": ["bogus.param"]
        }));
        let records =
            normalize_config_get(&address(), &names(&["a.valid", "bogus.param"]), &response);
        assert_eq!(records[1].source, ParameterSource::InvalidParams);
        assert!(!records[1].is_valid);
        assert!(records[1].value.is_none());
    }

    #[test]
    fn invalid_names_as_string_inside_data() {
        let response = ApiResponse::new(json!({
            "data": {"InvalidParams": "x.one, x.two"}
        }));
        let records = normalize_config_get(&address(), &names(&["x.one", "x.two"]), &response);
        assert!(records
            .iter()
            .all(|r| r.source == ParameterSource::InvalidParams));
    }

    #[test]
    fn missing_and_unreadable_fields_become_errors() {
        let response = ApiResponse::new(json!({
            "data": {"nested": {"a": 1}, "ok": ""}
        }));
        let records =
            normalize_config_get(&address(), &names(&["nested", "missing", "ok"]), &response);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source, ParameterSource::Error);
        assert!(records[0].value.is_none());
        assert_eq!(records[1].source, ParameterSource::Error);
        assert_eq!(records[2].source, ParameterSource::Device);
        assert_eq!(records[2].value.as_deref(), Some(""));
    }

    #[test]
    fn records_carry_address() {
        let response = ApiResponse::new(json!({"data": {"a": "1"}}));
        let records = normalize_config_get(&address(), &names(&["a"]), &response);
        assert_eq!(records[0].device_address, address());
    }

    #[test]
    fn serializes_with_pascal_case() {
        let record = ParameterRecord::written(&address(), "a", "1");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({
                "DeviceAddress": "10.0.0.5",
                "ParameterName": "a",
                "Value": "1",
                "Source": "Device",
                "IsValid": true
            })
        );
    }
}
