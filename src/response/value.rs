// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar coercion for loosely typed response fields.
//!
//! Firmware releases disagree on whether numbers and booleans are sent as
//! JSON numbers, JSON booleans, or strings. These helpers accept all of them.

use std::time::Duration;

use serde::Serializer;
use serde_json::{Map, Value};

/// Returns the first non-null field among `names`.
pub(crate) fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find(|value| !value.is_null())
}

/// Reads a scalar as text. Empty strings count as absent.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads an unsigned integer from a number or numeric string.
pub(crate) fn unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerces the many spellings of a boolean.
pub(crate) fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "registered" | "active" | "signedin" => Some(true),
            "0" | "false" | "no" | "off" | "unregistered" | "inactive" | "signedout" => {
                Some(false)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Coerces a boolean-like field to the integer flag `0` or `1`.
pub(crate) fn flag(value: &Value) -> Option<u8> {
    boolean(value).map(u8::from)
}

/// Serializes an optional duration as whole seconds.
#[allow(clippy::ref_option)]
pub(crate) fn serialize_seconds<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_u64(d.as_secs()),
        None => serializer.serialize_none(),
    }
}
