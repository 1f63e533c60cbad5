// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Call control commands.
//!
//! All call control endpoints live under `/api/v1/callctrl/` and take a
//! `POST` with a `{"data": {...}}` body.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::command::{Command, envelope};
use crate::error::ValueError;
use crate::protocol::Endpoint;
use crate::types::{CallHandle, JsonText};

/// Signalling used to place a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CallType {
    /// SIP call.
    #[default]
    #[serde(rename = "SIP")]
    Sip,
    /// H.323 call.
    #[serde(rename = "H323")]
    H323,
    /// Analog/PSTN call.
    #[serde(rename = "TEL")]
    Tel,
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sip => "SIP",
            Self::H323 => "H323",
            Self::Tel => "TEL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DialBody {
    dest: JsonText,
    line: String,
    r#type: CallType,
}

/// Command to place a call.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::{CallType, Command, DialCommand};
/// use serde_json::json;
///
/// let cmd = DialCommand::new("1001", 1, CallType::Sip).unwrap();
/// assert_eq!(
///     cmd.payload().unwrap(),
///     Some(json!({"data": {"Dest": "1001", "Line": "1", "Type": "SIP"}}))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialCommand {
    body: DialBody,
}

impl DialCommand {
    /// Creates a dial of `destination` on `line`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Empty`] for an empty destination,
    /// [`ValueError::OutOfRange`] for line `0`, and
    /// [`ValueError::Unencodable`] if the destination cannot be embedded.
    pub fn new(destination: &str, line: u16, call_type: CallType) -> Result<Self, ValueError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(ValueError::Empty("dial destination".to_string()));
        }
        if line == 0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: u16::MAX,
                actual: line,
            });
        }

        Ok(Self {
            body: DialBody {
                dest: JsonText::new("dial destination", destination)?,
                line: line.to_string(),
                r#type: call_type,
            },
        })
    }

    /// Returns the destination number or URI.
    #[must_use]
    pub fn destination(&self) -> &str {
        self.body.dest.as_str()
    }
}

impl Command for DialCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Dial
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&self.body)
    }
}

/// Operations that act on one call identified by its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallAction {
    /// Hang up.
    End,
    /// Put on hold.
    Hold,
    /// Take off hold.
    Resume,
    /// Answer a ringing call.
    Answer,
    /// Reject a ringing call.
    Reject,
    /// Silence a ringing call without rejecting it.
    Ignore,
}

impl CallAction {
    /// Returns the endpoint implementing this action.
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::End => Endpoint::EndCall,
            Self::Hold => Endpoint::HoldCall,
            Self::Resume => Endpoint::ResumeCall,
            Self::Answer => Endpoint::AnswerCall,
            Self::Reject => Endpoint::RejectCall,
            Self::Ignore => Endpoint::IgnoreCall,
        }
    }
}

impl fmt::Display for CallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::End => "end call",
            Self::Hold => "hold",
            Self::Resume => "resume",
            Self::Answer => "answer",
            Self::Reject => "reject",
            Self::Ignore => "ignore",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CallRef<'a> {
    r#ref: &'a CallHandle,
}

/// Command applying a [`CallAction`] to one call.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::{CallAction, CallCommand, Command};
/// use polyrest_lib::types::CallHandle;
/// use serde_json::json;
///
/// let handle = CallHandle::parse("0x2d8a6c0").unwrap();
/// let cmd = CallCommand::new(CallAction::Hold, handle);
/// assert_eq!(cmd.endpoint().to_string(), "POST /api/v1/callctrl/holdCall");
/// assert_eq!(cmd.payload().unwrap(), Some(json!({"data": {"Ref": "0x2d8a6c0"}})));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallCommand {
    action: CallAction,
    handle: CallHandle,
}

impl CallCommand {
    /// Creates a command applying `action` to the call `handle`.
    #[must_use]
    pub const fn new(action: CallAction, handle: CallHandle) -> Self {
        Self { action, handle }
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> CallAction {
        self.action
    }

    /// Returns the target call.
    #[must_use]
    pub const fn handle(&self) -> &CallHandle {
        &self.handle
    }
}

impl Command for CallCommand {
    fn endpoint(&self) -> Endpoint {
        self.action.endpoint()
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&CallRef {
            r#ref: &self.handle,
        })
    }
}

#[derive(Debug, Serialize)]
struct MuteBody {
    state: &'static str,
}

/// Command to mute or unmute the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteCommand {
    muted: bool,
}

impl MuteCommand {
    /// Creates a mute (`true`) or unmute (`false`) command.
    #[must_use]
    pub const fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl Command for MuteCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Mute
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&MuteBody {
            state: if self.muted { "1" } else { "0" },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TransferBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    r#ref: Option<&'a CallHandle>,
    transfer_dest: &'a JsonText,
}

/// Command to blind-transfer a call.
///
/// Without a handle the phone transfers its active call.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::{Command, TransferCommand};
/// use polyrest_lib::types::CallHandle;
/// use serde_json::json;
///
/// let cmd = TransferCommand::new("2002")
///     .unwrap()
///     .with_handle(CallHandle::parse("1f").unwrap());
/// assert_eq!(
///     cmd.payload().unwrap(),
///     Some(json!({"data": {"Ref": "0x1f", "TransferDest": "2002"}}))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    handle: Option<CallHandle>,
    destination: JsonText,
}

impl TransferCommand {
    /// Creates a transfer to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Empty`] for an empty destination and
    /// [`ValueError::Unencodable`] if it cannot be embedded.
    pub fn new(destination: &str) -> Result<Self, ValueError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(ValueError::Empty("transfer destination".to_string()));
        }
        Ok(Self {
            handle: None,
            destination: JsonText::new("transfer destination", destination)?,
        })
    }

    /// Returns a copy of this command targeting call `handle`.
    #[must_use]
    pub fn with_handle(&self, handle: CallHandle) -> Self {
        Self {
            handle: Some(handle),
            destination: self.destination.clone(),
        }
    }

    /// Returns the target call, if set.
    #[must_use]
    pub const fn handle(&self) -> Option<&CallHandle> {
        self.handle.as_ref()
    }
}

impl Command for TransferCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::TransferCall
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&TransferBody {
            r#ref: self.handle.as_ref(),
            transfer_dest: &self.destination,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DtmfBody<'a> {
    digits: &'a str,
}

/// Command to send DTMF digits on the active call.
///
/// Digits are limited to `0-9`, `*`, `#` and `A-D`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtmfCommand {
    digits: String,
}

impl DtmfCommand {
    /// Creates a DTMF command. Lower-case `a-d` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidDtmf`] for an empty string or any
    /// character outside the DTMF set.
    pub fn new(digits: &str) -> Result<Self, ValueError> {
        let digits = digits.trim().to_ascii_uppercase();
        let valid = |c: char| c.is_ascii_digit() || matches!(c, '*' | '#' | 'A'..='D');

        if digits.is_empty() || !digits.chars().all(valid) {
            return Err(ValueError::InvalidDtmf(digits));
        }
        Ok(Self { digits })
    }

    /// Returns the digits.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl Command for DtmfCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::SendDtmf
    }

    fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        envelope(&DtmfBody {
            digits: &self.digits,
        })
    }
}
