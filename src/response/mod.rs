// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalization of phone responses into stable output records.
//!
//! Phones running different firmware releases answer the same endpoint
//! with differently shaped payloads. Each submodule turns one family of
//! responses into a record type with a fixed serialized form. Every record
//! carries the [`DeviceAddress`](crate::types::DeviceAddress) it came from.

mod api_status;
mod call;
mod call_log;
mod device_info;
mod line;
mod parameter;
mod presence;
mod snapshot;
mod value;

pub use api_status::ApiStatus;
pub use call::{
    CallRecord, DurationField, normalize_call_status_v1, normalize_call_status_v2,
    split_appearance_index,
};
pub use call_log::{CallLogEntry, normalize_call_logs};
pub use device_info::{
    DeviceInfo, FirmwareShape, UptimeShape, normalize_device_info, normalize_model,
};
pub use line::{LineRecord, normalize_line_info};
pub use parameter::{ParameterRecord, ParameterSource, normalize_config_get};
pub use presence::{PresenceRecord, normalize_presence};
pub use snapshot::{SnapshotKind, StatusSnapshot, normalize_snapshot};
