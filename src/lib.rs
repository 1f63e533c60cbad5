// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `PolyRest` Lib - A Rust library to manage Polycom VoIP phones.
//!
//! This library provides async batch APIs over the phones' REST management
//! interface. Every operation takes a list of addresses and returns one
//! [`DeviceOutcome`] per phone, so one unreachable or failing phone never
//! hides the results of the others.
//!
//! # Supported Features
//!
//! - **Configuration**: Read up to 20 parameters, write single parameters
//! - **Call status**: v1 and v2 call status with per-firmware normalization
//! - **Call control**: Dial, end, hold, resume, transfer, mute, DTMF, answer,
//!   reject, ignore
//! - **Device info**: Model, firmware, uptime and last reboot time
//! - **Management**: Reboot, restart, resets, UC sign-in/out, packet capture
//! - **Status reads**: Lines, presence, call logs, network and device stats
//!
//! # Quick Start
//!
//! ```no_run
//! use polyrest_lib::PhoneClient;
//! use polyrest_lib::types::DeviceAddress;
//!
//! #[tokio::main]
//! async fn main() -> polyrest_lib::Result<()> {
//!     let client = PhoneClient::http()
//!         .with_credentials("Polycom", "456")
//!         .accept_invalid_certs()
//!         .build()?;
//!
//!     let phones = DeviceAddress::parse_all(["10.0.0.5", "10.0.0.6"])?;
//!
//!     for outcome in client.device_info(&phones).await {
//!         match outcome.result() {
//!             Ok(info) => println!("{}: {:?}", outcome.address(), info.model),
//!             Err(e) => eprintln!("{}: {e}", outcome.address()),
//!         }
//!     }
//!
//!     client.hold(&phones, None).await;
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library logs through [`tracing`] and installs no subscriber.
//! Requests are logged at `debug`, per-phone failures and firmware
//! overrides at `warn`.

pub mod client;
pub mod command;
pub mod error;
pub mod protocol;
pub mod response;
pub mod types;

pub use client::{ClientConfig, ControlOutcome, DeviceOutcome, PhoneClient};
#[cfg(feature = "http")]
pub use client::PhoneClientBuilder;
pub use command::Command;
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::{ApiRequest, ApiResponse, Transport};
pub use response::{
    ApiStatus, CallLogEntry, CallRecord, DeviceInfo, LineRecord, ParameterRecord, ParameterSource,
    PresenceRecord, SnapshotKind, StatusSnapshot,
};
pub use types::{CallHandle, DeviceAddress, FirmwareVersion, PhoneDateTime, RetryCount};
