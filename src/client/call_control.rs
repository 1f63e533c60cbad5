// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Call status and call control operations.
//!
//! Operations on a single call take an optional handle. When it is omitted
//! or malformed, the client looks the call up on the phone, first through
//! the v2 call status endpoint and then through v1. If no call is found the
//! operation sends nothing and reports [`ControlOutcome::NoActiveCall`].

use crate::client::{ControlOutcome, DeviceOutcome, PhoneClient};
use crate::command::{
    CallAction, CallCommand, CallStatusCommand, CallType, Command, DialCommand, DtmfCommand,
    MuteCommand, QueryCommand, TransferCommand,
};
use crate::error::{DeviceError, Error};
use crate::protocol::{CallStatusFilter, Transport};
use crate::response::{
    CallRecord, DeviceInfo, normalize_call_status_v1, normalize_call_status_v2,
    normalize_device_info,
};
use crate::types::{CallHandle, DeviceAddress};

/// Firmware family on which `endCall` hangs the management API.
const END_CALL_UNSAFE_FIRMWARE: [u32; 3] = [5, 5, 2];

impl<T: Transport> PhoneClient<T> {
    async fn call_status_v1_one(&self, address: &DeviceAddress) -> Result<Vec<CallRecord>, Error> {
        let response = self.execute(address, &CallStatusCommand::V1).await?;
        Ok(normalize_call_status_v1(address, &response))
    }

    async fn call_status_v2_one(
        &self,
        address: &DeviceAddress,
        filter: &CallStatusFilter,
    ) -> Result<Vec<CallRecord>, Error> {
        let command = CallStatusCommand::V2(filter.clone());
        let response = self.execute(address, &command).await?;
        Ok(normalize_call_status_v2(address, &response))
    }

    /// Reads the active call from every phone (v1 endpoint).
    ///
    /// A phone with no call yields an empty list.
    pub async fn call_status(&self, addresses: &[DeviceAddress]) -> Vec<DeviceOutcome<Vec<CallRecord>>> {
        self.each(addresses, |address| self.call_status_v1_one(address))
            .await
    }

    /// Reads every call from every phone (v2 endpoint), optionally
    /// filtered by handle or line.
    pub async fn call_status_v2(
        &self,
        addresses: &[DeviceAddress],
        filter: &CallStatusFilter,
    ) -> Vec<DeviceOutcome<Vec<CallRecord>>> {
        self.each(addresses, |address| self.call_status_v2_one(address, filter))
            .await
    }

    /// Finds the handle of the call to act on.
    ///
    /// Returns `Ok(None)` when the phone reports no call.
    async fn resolve_handle(
        &self,
        address: &DeviceAddress,
        requested: Option<&str>,
    ) -> Result<Option<CallHandle>, Error> {
        if let Some(text) = requested {
            match CallHandle::parse(text) {
                Ok(handle) => return Ok(Some(handle)),
                Err(e) => {
                    tracing::warn!(address = %address, error = %e, "Ignoring malformed call handle");
                }
            }
        }

        let v2 = self
            .call_status_v2_one(address, &CallStatusFilter::All)
            .await
            .inspect_err(|e| {
                tracing::debug!(address = %address, error = %e, "v2 call status unavailable");
            })
            .unwrap_or_default();
        if let Some(handle) = preferred_handle(&v2) {
            return Ok(Some(handle));
        }

        let v1 = self.call_status_v1_one(address).await?;
        Ok(preferred_handle(&v1))
    }

    /// Resolves the target call and sends the command built for it.
    async fn on_call<C, B>(
        &self,
        address: &DeviceAddress,
        requested: Option<&str>,
        operation: &str,
        build: B,
    ) -> Result<ControlOutcome, Error>
    where
        C: Command,
        B: Fn(CallHandle) -> C,
    {
        let Some(handle) = self.resolve_handle(address, requested).await? else {
            tracing::warn!(address = %address, operation, "No active call; nothing sent");
            return Ok(ControlOutcome::NoActiveCall);
        };

        self.execute(address, &build(handle.clone())).await?;
        Ok(ControlOutcome::Completed(handle))
    }

    async fn call_action(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
        action: CallAction,
    ) -> Vec<DeviceOutcome<ControlOutcome>> {
        let operation = action.to_string();
        self.each(addresses, |address| {
            self.on_call(address, handle, &operation, move |h| CallCommand::new(action, h))
        })
        .await
    }

    /// Places a call from every phone.
    ///
    /// # Errors
    ///
    /// Fails before any request if the destination or line is invalid.
    pub async fn dial(
        &self,
        addresses: &[DeviceAddress],
        destination: &str,
        line: u16,
        call_type: CallType,
    ) -> Result<Vec<DeviceOutcome<()>>, Error> {
        let command = DialCommand::new(destination, line, call_type)?;
        Ok(self
            .each(addresses, |address| self.unit(address, &command))
            .await)
    }

    /// Ends a call on every phone.
    ///
    /// Phones on firmware 5.5.2 are refused with
    /// [`DeviceError::UnsafeFirmware`] unless `allow_unsafe_firmware` is set,
    /// because `endCall` hangs their management API.
    pub async fn end_call(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
        allow_unsafe_firmware: bool,
    ) -> Vec<DeviceOutcome<ControlOutcome>> {
        self.each(addresses, |address| async move {
            let response = self.execute(address, &QueryCommand::DeviceInfo).await?;
            let info = normalize_device_info(address, &response, chrono::Utc::now());
            check_end_call_firmware(address, &info, allow_unsafe_firmware)?;

            self.on_call(address, handle, "end call", |h| {
                CallCommand::new(CallAction::End, h)
            })
            .await
        })
        .await
    }

    /// Puts a call on hold on every phone.
    pub async fn hold(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
    ) -> Vec<DeviceOutcome<ControlOutcome>> {
        self.call_action(addresses, handle, CallAction::Hold).await
    }

    /// Resumes a held call on every phone.
    pub async fn resume(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
    ) -> Vec<DeviceOutcome<ControlOutcome>> {
        self.call_action(addresses, handle, CallAction::Resume).await
    }

    /// Answers a ringing call on every phone.
    pub async fn answer(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
    ) -> Vec<DeviceOutcome<ControlOutcome>> {
        self.call_action(addresses, handle, CallAction::Answer).await
    }

    /// Rejects a ringing call on every phone.
    pub async fn reject(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
    ) -> Vec<DeviceOutcome<ControlOutcome>> {
        self.call_action(addresses, handle, CallAction::Reject).await
    }

    /// Silences a ringing call on every phone.
    pub async fn ignore(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
    ) -> Vec<DeviceOutcome<ControlOutcome>> {
        self.call_action(addresses, handle, CallAction::Ignore).await
    }

    /// Transfers a call on every phone to `destination`.
    ///
    /// # Errors
    ///
    /// Fails before any request if the destination is invalid.
    pub async fn transfer(
        &self,
        addresses: &[DeviceAddress],
        handle: Option<&str>,
        destination: &str,
    ) -> Result<Vec<DeviceOutcome<ControlOutcome>>, Error> {
        let template = TransferCommand::new(destination)?;
        Ok(self
            .each(addresses, |address| {
                self.on_call(address, handle, "transfer", |h| template.with_handle(h))
            })
            .await)
    }

    /// Mutes (`true`) or unmutes (`false`) every phone.
    pub async fn mute(&self, addresses: &[DeviceAddress], muted: bool) -> Vec<DeviceOutcome<()>> {
        let command = MuteCommand::new(muted);
        self.each(addresses, |address| self.unit(address, &command))
            .await
    }

    /// Sends DTMF digits on the active call of every phone.
    ///
    /// # Errors
    ///
    /// Fails before any request if `digits` holds a non-DTMF character.
    pub async fn send_dtmf(
        &self,
        addresses: &[DeviceAddress],
        digits: &str,
    ) -> Result<Vec<DeviceOutcome<()>>, Error> {
        let command = DtmfCommand::new(digits)?;
        Ok(self
            .each(addresses, |address| self.unit(address, &command))
            .await)
    }
}

/// Picks the call to act on: the one marked active, else the first.
fn preferred_handle(calls: &[CallRecord]) -> Option<CallHandle> {
    calls
        .iter()
        .find(|c| c.active_call == Some(true) && c.call_handle.is_some())
        .or_else(|| calls.iter().find(|c| c.call_handle.is_some()))
        .and_then(|c| c.call_handle.clone())
}

fn check_end_call_firmware(
    address: &DeviceAddress,
    info: &DeviceInfo,
    allow_unsafe_firmware: bool,
) -> Result<(), DeviceError> {
    if !info.firmware_matches(&END_CALL_UNSAFE_FIRMWARE) {
        return Ok(());
    }

    let firmware = info
        .firmware_release
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    if allow_unsafe_firmware {
        tracing::warn!(address = %address, %firmware, "Ending call on firmware known to hang the API");
        return Ok(());
    }

    Err(DeviceError::UnsafeFirmware {
        operation: "end call".to_string(),
        firmware,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::client::tests::{ScriptedTransport, addresses, ok};
    use crate::protocol::Method;
    use serde_json::json;

    fn client(
        replies: Vec<Result<serde_json::Value, crate::error::ProtocolError>>,
    ) -> PhoneClient<ScriptedTransport> {
        PhoneClient::with_transport(ScriptedTransport::new(replies), ClientConfig::new())
    }

    #[tokio::test]
    async fn explicit_handle_skips_lookup() {
        let client = client(vec![ok(json!({}))]);
        let outcomes = client
            .hold(&addresses(&["10.0.0.5"]), Some("0x1A"))
            .await;

        assert_eq!(
            outcomes[0].ok(),
            Some(&ControlOutcome::Completed(CallHandle::parse("1a").unwrap()))
        );
        let sent = client.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/api/v1/callctrl/holdCall");
        assert_eq!(sent[0].body, Some(json!({"data": {"Ref": "0x1a"}})));
    }

    #[tokio::test]
    async fn malformed_handle_resolved_from_v2() {
        let client = client(vec![
            ok(json!([{"CallHandle": "0x22", "LineId": "1"}])),
            ok(json!({})),
        ]);
        let outcomes = client
            .answer(&addresses(&["10.0.0.5"]), Some("not-a-handle"))
            .await;

        assert!(outcomes[0].ok().unwrap().is_completed());
        let sent = client.transport().sent();
        assert_eq!(sent[0].path, "/api/v2/webCallControl/callStatus");
        assert_eq!(sent[1].body, Some(json!({"data": {"Ref": "0x22"}})));
    }

    #[tokio::test]
    async fn falls_back_to_v1() {
        let client = client(vec![
            Ok(json!({"Status": "4004"})),
            ok(json!({"CallHandle": "0x33", "DurationSeconds": "5"})),
            ok(json!({})),
        ]);
        let outcomes = client.resume(&addresses(&["10.0.0.5"]), None).await;

        assert_eq!(
            outcomes[0].ok(),
            Some(&ControlOutcome::Completed(CallHandle::parse("33").unwrap()))
        );
        let paths: Vec<String> = client.transport().sent().into_iter().map(|s| s.path).collect();
        assert_eq!(
            paths,
            [
                "/api/v2/webCallControl/callStatus",
                "/api/v1/webCallControl/callStatus",
                "/api/v1/callctrl/resumeCall"
            ]
        );
    }

    #[tokio::test]
    async fn no_call_sends_nothing() {
        let client = client(vec![ok(json!([])), ok(json!({}))]);
        let outcomes = client.reject(&addresses(&["10.0.0.5"]), None).await;

        assert_eq!(outcomes[0].ok(), Some(&ControlOutcome::NoActiveCall));
        assert!(client
            .transport()
            .sent()
            .iter()
            .all(|s| s.method == Method::Get));
    }

    #[tokio::test]
    async fn end_call_refused_on_unsafe_firmware() {
        let client = client(vec![ok(json!({"FirmwareRelease": "5.5.2.8571"}))]);
        let outcomes = client
            .end_call(&addresses(&["10.0.0.5"]), Some("0x1"), false)
            .await;

        assert!(matches!(
            outcomes[0].err(),
            Some(Error::Device(DeviceError::UnsafeFirmware { .. }))
        ));
        assert_eq!(client.transport().sent().len(), 1);
    }

    #[tokio::test]
    async fn end_call_override_proceeds() {
        let client = client(vec![ok(json!({"FirmwareRelease": "5.5.2.8571"})), ok(json!({}))]);
        let outcomes = client
            .end_call(&addresses(&["10.0.0.5"]), Some("0x1"), true)
            .await;

        assert!(outcomes[0].ok().unwrap().is_completed());
        assert_eq!(
            client.transport().sent()[1].path,
            "/api/v1/callctrl/endCall"
        );
    }

    #[tokio::test]
    async fn end_call_on_other_firmware() {
        let client = client(vec![
            ok(json!({"Firmware": {"Application": "6.4.0.1234 01-Jan-21"}})),
            ok(json!({})),
        ]);
        let outcomes = client
            .end_call(&addresses(&["10.0.0.5"]), Some("0x1"), false)
            .await;
        assert!(outcomes[0].is_ok());
    }

    #[tokio::test]
    async fn dtmf_validated_before_sending() {
        let client = client(vec![]);
        let result = client.send_dtmf(&addresses(&["10.0.0.5"]), "12x").await;
        assert!(result.is_err());
        assert!(client.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn transfer_uses_resolved_handle() {
        let client = client(vec![ok(json!({}))]);
        let outcomes = client
            .transfer(&addresses(&["10.0.0.5"]), Some("2d"), "2002")
            .await
            .unwrap();
        assert!(outcomes[0].is_ok());
        assert_eq!(
            client.transport().sent()[0].body,
            Some(json!({"data": {"Ref": "0x2d", "TransferDest": "2002"}}))
        );
    }

    #[tokio::test]
    async fn dial_reports_rejection_per_phone() {
        let client = client(vec![Ok(json!({"Status": "4002"})), ok(json!({}))]);
        let outcomes = client
            .dial(&addresses(&["10.0.0.5", "10.0.0.6"]), "1001", 1, CallType::Sip)
            .await
            .unwrap();
        assert!(outcomes[0].err().unwrap().is_device_failure());
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn active_call_preferred() {
        let address = DeviceAddress::parse("10.0.0.5").unwrap();
        let response = crate::protocol::ApiResponse::new(json!({"data": {
            "CallHandle": "0x9", "DurationSeconds": "1", "UIAppearanceIndex": "2*"
        }}));
        let calls = normalize_call_status_v1(&address, &response);
        assert_eq!(preferred_handle(&calls), CallHandle::parse("9").ok());
        assert_eq!(preferred_handle(&[]), None);
    }
}
