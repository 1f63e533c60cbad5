// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed request definitions for the phone management API.
//!
//! Each command names its [`Endpoint`] and, for write operations, a typed
//! payload. Payloads are wrapped in the `{"data": ...}` envelope the phones
//! expect and serialized with `serde_json`. Caller-supplied strings are
//! checked with [`JsonText`](crate::types::JsonText) when the command is
//! built, so a constructed command always encodes.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Endpoint |
//! |-------------|---------|---------|
//! | [`ConfigGetCommand`] | Read up to 20 parameters | `mgmt/config/get` |
//! | [`ConfigSetCommand`] | Write one parameter | `mgmt/config/set` |
//! | [`QueryCommand`] | Status reads | `mgmt/device/info`, ... |
//! | [`CallStatusCommand`] | Active call status | `webCallControl/callStatus` |
//! | [`DialCommand`] | Place a call | `callctrl/dial` |
//! | [`CallCommand`] | End, hold, resume, answer, reject, ignore | `callctrl/<op>` |
//! | [`MuteCommand`] | Microphone mute | `callctrl/mute` |
//! | [`TransferCommand`] | Blind transfer | `callctrl/transferCall` |
//! | [`DtmfCommand`] | Send digits | `callctrl/sendDTMF` |
//! | [`ManagementCommand`] | Reboot, restart, resets, sign-out | `mgmt/...` |
//! | [`SignInCommand`] | UC account sign-in | `mgmt/skype/signIn` |
//! | [`CaptureCommand`] | Background packet capture | `mgmt/network/uploadBgCapture` |
//!
//! # Examples
//!
//! ```
//! use polyrest_lib::command::{Command, ConfigSetCommand};
//! use serde_json::json;
//!
//! let cmd = ConfigSetCommand::new("up.backlight.idleIntensity", "2").unwrap();
//! assert_eq!(cmd.endpoint().to_string(), "POST /api/v1/mgmt/config/set");
//! assert_eq!(
//!     cmd.payload().unwrap(),
//!     Some(json!({"data": {"up.backlight.idleIntensity": "2"}}))
//! );
//! ```

mod call;
mod config;
mod management;
mod status;

pub use call::{CallAction, CallCommand, CallType, DialCommand, DtmfCommand, MuteCommand, TransferCommand};
pub use config::{ConfigGetCommand, ConfigSetCommand, MAX_PARAMETERS, ParameterValue};
pub use management::{CaptureCommand, ManagementCommand, SignInCommand};
pub use status::{CallStatusCommand, QueryCommand};

use serde::Serialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::protocol::{ApiRequest, Endpoint};

/// The `{"data": ...}` envelope every request body is wrapped in.
#[derive(Debug, Serialize)]
struct Payload<'a, T: Serialize> {
    data: &'a T,
}

/// Serializes `data` inside the request envelope.
fn envelope<T: Serialize>(data: &T) -> Result<Option<Value>, serde_json::Error> {
    serde_json::to_value(Payload { data }).map(Some)
}

/// A request that can be sent to a phone.
pub trait Command {
    /// Returns the endpoint the command is sent to.
    fn endpoint(&self) -> Endpoint;

    /// Returns the JSON body, or `None` for body-less requests.
    ///
    /// # Errors
    ///
    /// Returns error if the payload cannot be serialized.
    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        Ok(None)
    }

    /// Builds the transport request for this command.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the payload cannot be serialized.
    fn to_request(&self) -> Result<ApiRequest, ParseError> {
        let request = ApiRequest::new(&self.endpoint());
        Ok(match self.payload()? {
            Some(body) => request.with_body(body),
            None => request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Method;
    use serde_json::json;

    #[test]
    fn body_less_request() {
        let request = ManagementCommand::SafeReboot.to_request().unwrap();
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "/api/v1/mgmt/safeReboot");
        assert!(request.body().is_none());
    }

    #[test]
    fn request_carries_envelope() {
        let request = MuteCommand::new(true).to_request().unwrap();
        assert_eq!(request.body(), Some(&json!({"data": {"state": "1"}})));
    }
}
