// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status query commands.
//!
//! Queries are body-less `GET` requests.

use crate::command::Command;
use crate::protocol::{CallLogKind, CallStatusFilter, Endpoint};
use crate::response::SnapshotKind;

/// Read-only status query.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::{Command, QueryCommand};
/// use polyrest_lib::protocol::CallLogKind;
///
/// let cmd = QueryCommand::DeviceInfo;
/// assert_eq!(cmd.endpoint().to_string(), "GET /api/v1/mgmt/device/info");
///
/// let logs = QueryCommand::CallLogs(Some(CallLogKind::Missed));
/// assert_eq!(logs.endpoint().path(), "/api/v1/mgmt/callLogs/missed");
/// assert!(logs.payload().unwrap().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCommand {
    /// Model, firmware, uptime and addresses.
    DeviceInfo,
    /// Registration of every configured line.
    LineInfo,
    /// UC presence and sign-in state.
    Presence,
    /// Call history, optionally one list only.
    CallLogs(Option<CallLogKind>),
    /// A schema-less status read.
    Snapshot(SnapshotKind),
}

impl Command for QueryCommand {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::DeviceInfo => Endpoint::DeviceInfo,
            Self::LineInfo => Endpoint::LineInfo,
            Self::Presence => Endpoint::Presence,
            Self::CallLogs(kind) => Endpoint::CallLogs(*kind),
            Self::Snapshot(kind) => kind.endpoint(),
        }
    }
}

/// Query of in-progress calls.
///
/// `V1` reports at most one call; `V2` reports every call and can be
/// filtered.
///
/// # Examples
///
/// ```
/// use polyrest_lib::command::{CallStatusCommand, Command};
/// use polyrest_lib::protocol::CallStatusFilter;
///
/// let v2 = CallStatusCommand::V2(CallStatusFilter::Line { line: 1, sequence: None });
/// assert_eq!(v2.endpoint().path(), "/api/v2/webCallControl/callStatus?line=1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatusCommand {
    /// Legacy single-call status.
    V1,
    /// Multi-call status.
    V2(CallStatusFilter),
}

impl Command for CallStatusCommand {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::V1 => Endpoint::CallStatusV1,
            Self::V2(filter) => Endpoint::CallStatusV2(filter.clone()),
        }
    }
}
