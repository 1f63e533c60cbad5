// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level batch operations on phones.
//!
//! A [`PhoneClient`] runs one operation against a list of addresses, one
//! phone at a time, and returns one [`DeviceOutcome`] per address in input
//! order. Input that is wrong for every phone (too many parameter names, an
//! invalid DTMF string) fails the whole call before any request is sent.
//!
//! ```no_run
//! use polyrest_lib::PhoneClient;
//! use polyrest_lib::types::DeviceAddress;
//!
//! # async fn example() -> polyrest_lib::Result<()> {
//! let client = PhoneClient::http()
//!     .with_credentials("Polycom", "456")
//!     .accept_invalid_certs()
//!     .build()?;
//!
//! let phones = DeviceAddress::parse_all(["10.0.0.5", "10.0.0.6"])?;
//! for outcome in client.get_parameters(&phones, &["device.prov.serverName"]).await? {
//!     match outcome.result() {
//!         Ok(records) => println!("{}: {:?}", outcome.address(), records),
//!         Err(e) => eprintln!("{}: {e}", outcome.address()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod call_control;
mod config;
#[cfg(feature = "http")]
mod http_builder;
mod outcome;

pub use config::ClientConfig;
#[cfg(feature = "http")]
pub use http_builder::PhoneClientBuilder;
pub use outcome::{ControlOutcome, DeviceOutcome};

use std::future::Future;

use chrono::Utc;

use crate::command::{
    CaptureCommand, Command, ConfigGetCommand, ConfigSetCommand, ManagementCommand,
    ParameterValue, QueryCommand, SignInCommand,
};
use crate::error::{DeviceError, Error};
use crate::protocol::{ApiRequest, ApiResponse, CallLogKind, ResetScope, Transport};
use crate::response::{
    CallLogEntry, DeviceInfo, LineRecord, ParameterRecord, PresenceRecord, SnapshotKind,
    StatusSnapshot, normalize_call_logs, normalize_config_get, normalize_device_info,
    normalize_line_info, normalize_presence, normalize_snapshot,
};
use crate::types::DeviceAddress;

/// Client running management operations against phones.
///
/// The type parameter `T` is the transport; [`HttpClient`] for real
/// phones.
///
/// [`HttpClient`]: crate::protocol::HttpClient
#[derive(Debug)]
pub struct PhoneClient<T: Transport> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> PhoneClient<T> {
    /// Creates a client on top of an existing transport.
    #[must_use]
    pub const fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the operation settings.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    /// Sends one request and turns a device-reported failure into an error.
    async fn send(&self, address: &DeviceAddress, request: ApiRequest) -> Result<ApiResponse, Error> {
        let request = match (request.timeout(), self.config.timeout()) {
            (None, Some(timeout)) => request.with_timeout(timeout),
            _ => request,
        };

        let response = self
            .transport
            .invoke(address, &request, self.config.retries())
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Rejected {
                endpoint: format!("{} {}", request.method(), request.path()),
                status,
            }
            .into());
        }

        tracing::debug!(address = %address, path = %request.path(), %status, "Request accepted");
        Ok(response)
    }

    async fn execute<C: Command>(
        &self,
        address: &DeviceAddress,
        command: &C,
    ) -> Result<ApiResponse, Error> {
        self.send(address, command.to_request()?).await
    }

    /// Runs `op` on every address in order, collecting one outcome each.
    async fn each<'a, R, F, Fut>(
        &self,
        addresses: &'a [DeviceAddress],
        mut op: F,
    ) -> Vec<DeviceOutcome<R>>
    where
        F: FnMut(&'a DeviceAddress) -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut outcomes = Vec::with_capacity(addresses.len());
        for address in addresses {
            let result = op(address).await;
            if let Err(e) = &result {
                tracing::warn!(address = %address, error = %e, "Operation failed on device");
            }
            outcomes.push(DeviceOutcome::new(address.clone(), result));
        }
        outcomes
    }

    async fn unit<C: Command>(&self, address: &DeviceAddress, command: &C) -> Result<(), Error> {
        self.execute(address, command).await.map(|_| ())
    }

    // ========================================================================
    // Configuration parameters
    // ========================================================================

    /// Reads up to 20 configuration parameters from every phone.
    ///
    /// Each outcome holds one record per requested name, in request order.
    ///
    /// # Errors
    ///
    /// Fails before any request if `names` is empty, longer than
    /// [`MAX_PARAMETERS`](crate::command::MAX_PARAMETERS), or holds a name
    /// that cannot be embedded.
    pub async fn get_parameters<S: AsRef<str>>(
        &self,
        addresses: &[DeviceAddress],
        names: &[S],
    ) -> Result<Vec<DeviceOutcome<Vec<ParameterRecord>>>, Error> {
        let command = ConfigGetCommand::new(names.iter().map(|n| n.as_ref().to_string()))?;
        let names: Vec<String> = command.names().map(ToString::to_string).collect();

        Ok(self
            .each(addresses, |address| {
                let (command, names) = (&command, &names);
                async move {
                    let response = self.execute(address, command).await?;
                    Ok(normalize_config_get(address, names, &response))
                }
            })
            .await)
    }

    /// Writes one configuration parameter on every phone.
    ///
    /// # Errors
    ///
    /// Fails before any request if `name` is empty or cannot be embedded.
    pub async fn set_parameter(
        &self,
        addresses: &[DeviceAddress],
        name: &str,
        value: impl Into<ParameterValue>,
    ) -> Result<Vec<DeviceOutcome<ParameterRecord>>, Error> {
        let command = ConfigSetCommand::new(name, value)?;

        Ok(self
            .each(addresses, |address| {
                let command = &command;
                async move {
                    self.execute(address, command).await?;
                    Ok(ParameterRecord::written(
                        address,
                        command.name(),
                        command.value(),
                    ))
                }
            })
            .await)
    }

    // ========================================================================
    // Status reads
    // ========================================================================

    async fn device_info_one(&self, address: &DeviceAddress) -> Result<DeviceInfo, Error> {
        let response = self.execute(address, &QueryCommand::DeviceInfo).await?;
        Ok(normalize_device_info(address, &response, Utc::now()))
    }

    /// Reads model, firmware, uptime and addresses from every phone.
    pub async fn device_info(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<DeviceInfo>> {
        self.each(addresses, |address| self.device_info_one(address))
            .await
    }

    /// Reads line registration from every phone.
    pub async fn line_info(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<Vec<LineRecord>>> {
        self.each(addresses, |address| async move {
            let response = self.execute(address, &QueryCommand::LineInfo).await?;
            Ok(normalize_line_info(address, &response)?)
        })
        .await
    }

    /// Reads UC presence from every phone.
    pub async fn presence(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<PresenceRecord>> {
        self.each(addresses, |address| async move {
            let response = self.execute(address, &QueryCommand::Presence).await?;
            Ok(normalize_presence(address, &response))
        })
        .await
    }

    /// Reads call history from every phone, optionally one list only.
    pub async fn call_logs(
        &self,
        addresses: &[DeviceAddress],
        kind: Option<CallLogKind>,
    ) -> Vec<DeviceOutcome<Vec<CallLogEntry>>> {
        self.each(addresses, |address| async move {
            let response = self.execute(address, &QueryCommand::CallLogs(kind)).await?;
            Ok(normalize_call_logs(address, kind, &response))
        })
        .await
    }

    /// Takes a schema-less status snapshot from every phone.
    pub async fn snapshot(
        &self,
        addresses: &[DeviceAddress],
        kind: SnapshotKind,
    ) -> Vec<DeviceOutcome<StatusSnapshot>> {
        self.each(addresses, |address| async move {
            let response = self.execute(address, &QueryCommand::Snapshot(kind)).await?;
            Ok(normalize_snapshot(address, kind, &response))
        })
        .await
    }

    // ========================================================================
    // Device management
    // ========================================================================

    /// Reboots every phone once it is idle.
    pub async fn reboot(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<()>> {
        self.each(addresses, |address| {
            self.unit(address, &ManagementCommand::SafeReboot)
        })
        .await
    }

    /// Restarts the application on every phone once it is idle.
    pub async fn restart(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<()>> {
        self.each(addresses, |address| {
            self.unit(address, &ManagementCommand::SafeRestart)
        })
        .await
    }

    /// Clears configuration on every phone, optionally one layer only.
    pub async fn config_reset(
        &self,
        addresses: &[DeviceAddress],
        scope: Option<ResetScope>,
    ) -> Vec<DeviceOutcome<()>> {
        self.each(addresses, |address| async move {
            self.unit(address, &ManagementCommand::ConfigReset(scope)).await
        })
        .await
    }

    /// Restores factory defaults on every phone.
    pub async fn factory_reset(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<()>> {
        self.each(addresses, |address| {
            self.unit(address, &ManagementCommand::FactoryReset)
        })
        .await
    }

    /// Signs a UC account in on every phone.
    ///
    /// Uses [`ClientConfig::sign_in_timeout`] instead of the normal timeout.
    pub async fn sign_in(
        &self,
        addresses: &[DeviceAddress],
        command: &SignInCommand,
    ) -> Vec<DeviceOutcome<()>> {
        let timeout = self.config.sign_in_timeout();
        self.each(addresses, |address| async move {
            tracing::debug!(address = %address, account = %command.address(), "Signing in");
            let request = command.to_request()?.with_timeout(timeout);
            self.send(address, request).await.map(|_| ())
        })
        .await
    }

    /// Signs the UC account out on every phone.
    pub async fn sign_out(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<()>> {
        self.each(addresses, |address| {
            self.unit(address, &ManagementCommand::SignOut)
        })
        .await
    }

    /// Starts or stops a background packet capture on every phone.
    pub async fn capture(
        &self,
        addresses: &[DeviceAddress],
        command: CaptureCommand,
    ) -> Vec<DeviceOutcome<()>> {
        self.each(addresses, |address| async move {
            self.unit(address, &command).await
        })
        .await
    }
}
