// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for phone management.
//!
//! This module provides validated representations of the values passed to
//! and parsed from the phone management API. Constrained types check their
//! input at construction time.
//!
//! # Types
//!
//! - [`DeviceAddress`] - Dotted-quad address of a phone
//! - [`CallHandle`] - Hexadecimal reference to an in-progress call
//! - [`RetryCount`] - Attempts per request (1-100)
//! - [`FirmwareVersion`] - Dotted version number with optional build suffix
//! - [`PhoneDateTime`] - Timestamp in any of the formats phones emit
//! - [`JsonText`] - A string checked for embedding in a request body
//!
//! # Parsers
//!
//! - [`parse_uptime`] / [`format_uptime`] - Free-text uptime strings
//! - [`parse_call_duration`] - Elapsed time from descriptive status text
//! - [`escape_json_string`] / [`check_embeddable`] - Request body string checks

mod address;
mod call_duration;
mod call_handle;
mod firmware;
mod json;
mod retry;
mod timestamp;
mod uptime;

pub use address::DeviceAddress;
pub use call_duration::parse_call_duration;
pub use call_handle::CallHandle;
pub use firmware::FirmwareVersion;
pub use json::{JsonText, check_embeddable, escape_json_string};
pub use retry::RetryCount;
pub use timestamp::PhoneDateTime;
pub use uptime::{format_uptime, parse_uptime};
