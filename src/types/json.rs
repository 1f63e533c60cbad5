// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON string escaping for request bodies.
//!
//! Request bodies are serialized with `serde_json`, but every caller-supplied
//! string passes through [`escape_json_string`] first. The phone firmware
//! cuts request bodies at the first NUL byte, so such strings are refused
//! here instead of being sent half-truncated.

use serde::Serialize;

use crate::error::ValueError;

/// Refuses strings the phone firmware would truncate.
///
/// # Errors
///
/// Returns [`ValueError::Unencodable`] if `value` contains a NUL character.
pub fn check_embeddable(field: &str, value: &str) -> Result<(), ValueError> {
    if value.contains('\0') {
        return Err(unencodable(field, "contains a NUL character"));
    }
    Ok(())
}

/// Produces the JSON-escaped form of `value`, without surrounding quotes.
///
/// The escaping is `serde_json`'s, so it matches what ends up in request
/// bodies.
///
/// # Errors
///
/// Returns [`ValueError::Unencodable`] if `value` contains a NUL character.
///
/// # Examples
///
/// ```
/// use polyrest_lib::types::escape_json_string;
///
/// let escaped = escape_json_string("label", "Front \"Desk\"\n").unwrap();
/// assert_eq!(escaped, r#"Front \"Desk\"\n"#);
///
/// assert!(escape_json_string("label", "a\0b").is_err());
/// ```
pub fn escape_json_string(field: &str, value: &str) -> Result<String, ValueError> {
    check_embeddable(field, value)?;

    let encoded =
        serde_json::to_string(value).map_err(|e| unencodable(field, &e.to_string()))?;
    encoded
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map(ToString::to_string)
        .ok_or_else(|| unencodable(field, "not encoded as a JSON string"))
}

fn unencodable(field: &str, reason: &str) -> ValueError {
    ValueError::Unencodable {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// A string that has been checked for embedding in a request body.
///
/// Serializes as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JsonText(String);

impl JsonText {
    /// Checks `value` with [`check_embeddable`] and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Unencodable`] if the value cannot be embedded.
    pub fn new(field: &str, value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into();
        check_embeddable(field, &value)?;
        Ok(Self(value))
    }

    /// Returns an empty string leaf.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the unescaped value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape_json_string("f", "device.sip").unwrap(), "device.sip");
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(
            escape_json_string("f", r#"a"b\c"#).unwrap(),
            r#"a\"b\\c"#
        );
    }

    #[test]
    fn escapes_control_characters() {
        assert_eq!(
            escape_json_string("f", "\u{1}\u{1f}\t").unwrap(),
            "\\u0001\\u001f\\t"
        );
    }

    #[test]
    fn json_text_refuses_nul() {
        assert!(check_embeddable("name", "reg.1.label").is_ok());
        assert!(matches!(
            JsonText::new("name", "reg\0.label"),
            Err(ValueError::Unencodable { .. })
        ));
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(escape_json_string("f", "Zoë ✓").unwrap(), "Zoë ✓");
    }

    #[test]
    fn refuses_nul() {
        let err = escape_json_string("value", "a\0").unwrap_err();
        assert_eq!(
            err,
            ValueError::Unencodable {
                field: "value".to_string(),
                reason: "contains a NUL character".to_string()
            }
        );
    }

    #[test]
    fn json_text_serializes_as_string() {
        let text = JsonText::new("dest", "1001").unwrap();
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"1001\"");
        assert_eq!(JsonText::empty().as_str(), "");
    }
}
