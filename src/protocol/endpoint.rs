// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST endpoints exposed by the phone management API.

use std::fmt;

use serde::Serialize;

use crate::types::CallHandle;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`, used by read-only status endpoints.
    Get,
    /// `POST`, used by everything that takes a body or changes state.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Server-side filter for the v2 call status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CallStatusFilter {
    /// Every call on the phone.
    #[default]
    All,
    /// The call with this handle.
    Handle(CallHandle),
    /// Calls on a line, optionally narrowed to one call sequence.
    Line {
        /// Line number (1-based).
        line: u16,
        /// Call sequence on that line.
        sequence: Option<u32>,
    },
}

impl CallStatusFilter {
    fn query(&self) -> String {
        match self {
            Self::All => String::new(),
            Self::Handle(handle) => {
                format!("?handle={}", urlencoding::encode(handle.hex_digits()))
            }
            Self::Line { line, sequence } => match sequence {
                Some(seq) => format!("?line={line}&sequence={seq}"),
                None => format!("?line={line}"),
            },
        }
    }
}

/// Which call log list to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CallLogKind {
    /// Missed calls.
    Missed,
    /// Received calls.
    Received,
    /// Placed calls.
    Placed,
}

impl CallLogKind {
    /// Returns the path segment for this list.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Missed => "missed",
            Self::Received => "received",
            Self::Placed => "placed",
        }
    }
}

/// Which configuration layer a reset clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetScope {
    /// Settings made on the phone's own menu.
    Local,
    /// Settings made through the web interface.
    Web,
    /// Settings received from cloud provisioning.
    Cloud,
    /// Device-level settings.
    Device,
}

impl ResetScope {
    /// Returns the path segment for this scope.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Web => "web",
            Self::Cloud => "cloud",
            Self::Device => "device",
        }
    }
}

/// A management API endpoint.
///
/// # Examples
///
/// ```
/// use polyrest_lib::protocol::{Endpoint, Method};
///
/// assert_eq!(Endpoint::DeviceInfo.path(), "/api/v1/mgmt/device/info");
/// assert_eq!(Endpoint::DeviceInfo.method(), Method::Get);
/// assert_eq!(Endpoint::Dial.method(), Method::Post);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Read configuration parameters.
    ConfigGet,
    /// Write a configuration parameter.
    ConfigSet,
    /// Model, firmware, uptime and addressing.
    DeviceInfo,
    /// CPU, memory and uptime counters.
    DeviceStats,
    /// Network configuration.
    NetworkInfo,
    /// Network counters.
    NetworkStats,
    /// Per-line registration.
    LineInfo,
    /// SIP registration status.
    SipStatus,
    /// Unified-communications presence.
    Presence,
    /// Current phone state (idle, in call, ...).
    PollForStatus,
    /// Call history, optionally one list only.
    CallLogs(Option<CallLogKind>),
    /// Call status, API v1 (single call).
    CallStatusV1,
    /// Call status, API v2 (list of calls).
    CallStatusV2(CallStatusFilter),
    /// Place a call.
    Dial,
    /// Hang up a call.
    EndCall,
    /// Mute or unmute the microphone.
    Mute,
    /// Put a call on hold.
    HoldCall,
    /// Resume a held call.
    ResumeCall,
    /// Transfer a call.
    TransferCall,
    /// Send DTMF digits.
    SendDtmf,
    /// Answer an incoming call.
    AnswerCall,
    /// Reject an incoming call.
    RejectCall,
    /// Silence an incoming call.
    IgnoreCall,
    /// Reboot when idle.
    SafeReboot,
    /// Restart the application when idle.
    SafeRestart,
    /// Reset configuration, optionally one layer only.
    ConfigReset(Option<ResetScope>),
    /// Reset to factory defaults.
    FactoryReset,
    /// Sign a unified-communications user in.
    SignIn,
    /// Sign the unified-communications user out.
    SignOut,
    /// Emergency location information.
    LocationInfo,
    /// Start or stop a background packet capture.
    BackgroundCapture,
}

impl Endpoint {
    /// Returns the HTTP method of this endpoint.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::DeviceInfo
            | Self::DeviceStats
            | Self::NetworkInfo
            | Self::NetworkStats
            | Self::LineInfo
            | Self::SipStatus
            | Self::Presence
            | Self::PollForStatus
            | Self::CallLogs(_)
            | Self::CallStatusV1
            | Self::CallStatusV2(_)
            | Self::LocationInfo => Method::Get,
            _ => Method::Post,
        }
    }

    /// Returns the request path, including any query string.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::CallLogs(Some(kind)) => format!("/api/v1/mgmt/callLogs/{}", kind.segment()),
            Self::CallStatusV2(filter) => {
                format!("/api/v2/webCallControl/callStatus{}", filter.query())
            }
            Self::ConfigReset(Some(scope)) => {
                format!("/api/v1/mgmt/configReset/{}", scope.segment())
            }
            other => other.base_path().to_string(),
        }
    }

    fn base_path(&self) -> &'static str {
        match self {
            Self::ConfigGet => "/api/v1/mgmt/config/get",
            Self::ConfigSet => "/api/v1/mgmt/config/set",
            Self::DeviceInfo => "/api/v1/mgmt/device/info",
            Self::DeviceStats => "/api/v1/mgmt/device/stats",
            Self::NetworkInfo => "/api/v1/mgmt/network/info",
            Self::NetworkStats => "/api/v1/mgmt/network/stats",
            Self::LineInfo => "/api/v2/mgmt/lineInfo",
            Self::SipStatus => "/api/v1/webCallControl/sipStatus",
            Self::Presence => "/api/v1/mgmt/skype/getPresence",
            Self::PollForStatus => "/api/v1/mgmt/pollForStatus",
            Self::CallLogs(_) => "/api/v1/mgmt/callLogs",
            Self::CallStatusV1 => "/api/v1/webCallControl/callStatus",
            Self::CallStatusV2(_) => "/api/v2/webCallControl/callStatus",
            Self::Dial => "/api/v1/callctrl/dial",
            Self::EndCall => "/api/v1/callctrl/endCall",
            Self::Mute => "/api/v1/callctrl/mute",
            Self::HoldCall => "/api/v1/callctrl/holdCall",
            Self::ResumeCall => "/api/v1/callctrl/resumeCall",
            Self::TransferCall => "/api/v1/callctrl/transferCall",
            Self::SendDtmf => "/api/v1/callctrl/sendDTMF",
            Self::AnswerCall => "/api/v1/callctrl/answerCall",
            Self::RejectCall => "/api/v1/callctrl/rejectCall",
            Self::IgnoreCall => "/api/v1/callctrl/ignoreCall",
            Self::SafeReboot => "/api/v1/mgmt/safeReboot",
            Self::SafeRestart => "/api/v1/mgmt/safeRestart",
            Self::ConfigReset(_) => "/api/v1/mgmt/configReset",
            Self::FactoryReset => "/api/v1/mgmt/factoryReset",
            Self::SignIn => "/api/v1/mgmt/skype/signIn",
            Self::SignOut => "/api/v1/mgmt/skype/signOut",
            Self::LocationInfo => "/api/v1/mgmt/location/info",
            Self::BackgroundCapture => "/api/v1/mgmt/network/uploadBgCapture",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_status_v2_queries() {
        assert_eq!(
            Endpoint::CallStatusV2(CallStatusFilter::All).path(),
            "/api/v2/webCallControl/callStatus"
        );

        let handle = CallHandle::parse("0x2D8A").unwrap();
        assert_eq!(
            Endpoint::CallStatusV2(CallStatusFilter::Handle(handle)).path(),
            "/api/v2/webCallControl/callStatus?handle=2d8a"
        );

        let filter = CallStatusFilter::Line {
            line: 2,
            sequence: Some(5),
        };
        assert_eq!(
            Endpoint::CallStatusV2(filter).path(),
            "/api/v2/webCallControl/callStatus?line=2&sequence=5"
        );
    }

    #[test]
    fn scoped_paths() {
        assert_eq!(
            Endpoint::CallLogs(Some(CallLogKind::Missed)).path(),
            "/api/v1/mgmt/callLogs/missed"
        );
        assert_eq!(Endpoint::CallLogs(None).path(), "/api/v1/mgmt/callLogs");
        assert_eq!(
            Endpoint::ConfigReset(Some(ResetScope::Web)).path(),
            "/api/v1/mgmt/configReset/web"
        );
    }

    #[test]
    fn methods() {
        assert_eq!(Endpoint::ConfigGet.method(), Method::Post);
        assert_eq!(Endpoint::CallStatusV1.method(), Method::Get);
        assert_eq!(Endpoint::SafeReboot.method(), Method::Post);
    }

    #[test]
    fn display() {
        assert_eq!(
            Endpoint::SendDtmf.to_string(),
            "POST /api/v1/callctrl/sendDTMF"
        );
    }
}
