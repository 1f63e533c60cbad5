// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device management commands.

use serde::Serialize;
use serde_json::Value;

use crate::command::{Command, envelope};
use crate::error::ValueError;
use crate::protocol::{Endpoint, ResetScope};
use crate::types::JsonText;

/// Body-less management actions.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::{Command, ManagementCommand};
/// use polyrest_lib::protocol::ResetScope;
///
/// let cmd = ManagementCommand::ConfigReset(Some(ResetScope::Web));
/// assert_eq!(cmd.endpoint().to_string(), "POST /api/v1/mgmt/configReset/web");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagementCommand {
    /// Reboot once no call is active.
    SafeReboot,
    /// Restart the application once no call is active.
    SafeRestart,
    /// Clear configuration, optionally one layer only.
    ConfigReset(Option<ResetScope>),
    /// Restore factory defaults.
    FactoryReset,
    /// Sign the UC account out.
    SignOut,
}

impl Command for ManagementCommand {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::SafeReboot => Endpoint::SafeReboot,
            Self::SafeRestart => Endpoint::SafeRestart,
            Self::ConfigReset(scope) => Endpoint::ConfigReset(*scope),
            Self::FactoryReset => Endpoint::FactoryReset,
            Self::SignOut => Endpoint::SignOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignInBody {
    address: JsonText,
    user: JsonText,
    domain: JsonText,
    password: JsonText,
}

/// Command to sign a UC account in.
///
/// The phone answers only once the sign-in has completed, which can take
/// minutes; the client sends this command with its sign-in timeout.
#[derive(Clone, PartialEq, Eq)]
pub struct SignInCommand {
    body: SignInBody,
}

impl SignInCommand {
    /// Creates a sign-in for `user@domain` signing in as `address`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Empty`] if `address` or `user` is empty and
    /// [`ValueError::Unencodable`] if a field cannot be embedded.
    pub fn new(address: &str, user: &str, domain: &str, password: &str) -> Result<Self, ValueError> {
        for (field, value) in [("sign-in address", address), ("sign-in user", user)] {
            if value.trim().is_empty() {
                return Err(ValueError::Empty(field.to_string()));
            }
        }

        Ok(Self {
            body: SignInBody {
                address: JsonText::new("sign-in address", address.trim())?,
                user: JsonText::new("sign-in user", user.trim())?,
                domain: JsonText::new("sign-in domain", domain.trim())?,
                password: JsonText::new("sign-in password", password)?,
            },
        })
    }

    /// Returns the account address.
    #[must_use]
    pub fn address(&self) -> &str {
        self.body.address.as_str()
    }
}

impl std::fmt::Debug for SignInCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInCommand")
            .field("address", &self.body.address.as_str())
            .field("user", &self.body.user.as_str())
            .field("domain", &self.body.domain.as_str())
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Command for SignInCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::SignIn
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&self.body)
    }
}

#[derive(Debug, Serialize)]
struct CaptureBody {
    state: &'static str,
}

/// Command to start or stop a background packet capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureCommand {
    /// Begin capturing.
    Start,
    /// Stop and upload the capture.
    Stop,
}

impl Command for CaptureCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::BackgroundCapture
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&CaptureBody {
            state: match self {
                Self::Start => "start",
                Self::Stop => "stop",
            },
        })
    }
}
