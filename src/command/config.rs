// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration parameter commands.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::command::{Command, envelope};
use crate::error::ValueError;
use crate::protocol::Endpoint;
use crate::types::JsonText;

/// Most parameter names a single `config/get` request may carry.
pub const MAX_PARAMETERS: usize = 20;

/// Command to read configuration parameters.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::{Command, ConfigGetCommand};
/// use serde_json::json;
///
/// let cmd = ConfigGetCommand::new(["device.prov.serverName", "voIpProt.SIP.enable"]).unwrap();
/// assert_eq!(
///     cmd.payload().unwrap(),
///     Some(json!({"data": ["device.prov.serverName", "voIpProt.SIP.enable"]}))
/// );
///
/// let too_many: Vec<String> = (0..21).map(|i| format!("p{i}")).collect();
/// assert!(ConfigGetCommand::new(too_many).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigGetCommand {
    names: Vec<JsonText>,
}

impl ConfigGetCommand {
    /// Creates a read of one to [`MAX_PARAMETERS`] parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NoParameters`] for an empty list,
    /// [`ValueError::TooManyParameters`] above the cap, and
    /// [`ValueError::Unencodable`] if a name cannot be embedded.
    pub fn new<I, S>(names: I) -> Result<Self, ValueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(ValueError::NoParameters);
        }
        if names.len() > MAX_PARAMETERS {
            return Err(ValueError::TooManyParameters {
                max: MAX_PARAMETERS,
                actual: names.len(),
            });
        }

        let names = names
            .into_iter()
            .map(|name| JsonText::new("parameter name", name))
            .collect::<Result<_, _>>()?;

        Ok(Self { names })
    }

    /// Returns the requested names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(JsonText::as_str)
    }
}

impl Command for ConfigGetCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::ConfigGet
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&self.names)
    }
}

/// A configuration value to write.
///
/// Booleans are written the way phones store them: `"1"` or `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue(String);

impl ParameterValue {
    /// Returns the value as sent.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self(if value { "1" } else { "0" }.to_string())
    }
}

/// Command to write one configuration parameter.
///
/// A name that cannot be embedded is an error; a value that cannot be
/// embedded is replaced by the empty string and logged.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::ConfigSetCommand;
///
/// let cmd = ConfigSetCommand::new("feature.enhancedFeatureKeys.enabled", true).unwrap();
/// assert_eq!(cmd.value(), "1");
///
/// let cmd = ConfigSetCommand::new("reg.1.label", "bad\0value").unwrap();
/// assert_eq!(cmd.value(), "");
///
/// assert!(ConfigSetCommand::new("bad\0name", "x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSetCommand {
    name: JsonText,
    value: JsonText,
}

impl ConfigSetCommand {
    /// Creates a write of `value` to parameter `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Empty`] for an empty name and
    /// [`ValueError::Unencodable`] if the name cannot be embedded.
    pub fn new(name: &str, value: impl Into<ParameterValue>) -> Result<Self, ValueError> {
        if name.trim().is_empty() {
            return Err(ValueError::Empty("parameter name".to_string()));
        }
        let name = JsonText::new("parameter name", name)?;

        let value = JsonText::new("parameter value", value.into().0).unwrap_or_else(|e| {
            tracing::warn!(parameter = %name.as_str(), error = %e, "Sending empty value instead");
            JsonText::empty()
        });

        Ok(Self { name, value })
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the value that will be written.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

impl Command for ConfigSetCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::ConfigSet
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&BTreeMap::from([(self.name.as_str(), &self.value)]))
    }
}
