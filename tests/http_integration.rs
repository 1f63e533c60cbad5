// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport and batch operations using wiremock.

use std::time::Duration;

use polyrest_lib::command::SignInCommand;
use polyrest_lib::protocol::{CallLogKind, CallStatusFilter};
use polyrest_lib::response::ParameterSource;
use polyrest_lib::types::{CallHandle, DeviceAddress, RetryCount};
use polyrest_lib::{
    ControlOutcome, DeviceError, Error, HttpClient, PhoneClient, ProtocolError, ValueError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn phone() -> DeviceAddress {
    DeviceAddress::parse("127.0.0.1").unwrap()
}

fn client_for(server: &MockServer, retries: RetryCount) -> PhoneClient<HttpClient> {
    PhoneClient::http()
        .with_http()
        .with_port(server.address().port())
        .with_credentials("Polycom", "456")
        .with_timeout(Duration::from_secs(2))
        .with_retries(retries)
        .build()
        .unwrap()
}

fn client(server: &MockServer) -> PhoneClient<HttpClient> {
    client_for(server, RetryCount::ONCE)
}

fn success(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"Status": "2000", "data": data}))
}

// ============================================================================
// Configuration parameters
// ============================================================================

mod parameters {
    use super::*;

    #[tokio::test]
    async fn get_reports_each_name() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/config/get"))
            .and(header("authorization", "Basic UG9seWNvbTo0NTY="))
            .and(body_json(json!({"data": ["a.valid", "bogus", "a.missing"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Status": "2000",
                "data": {"a.valid": "1"},
                "InvalidParams": ["bogus"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcomes = client(&server)
            .get_parameters(&[phone()], &["a.valid", "bogus", "a.missing"])
            .await
            .unwrap();

        let records = outcomes[0].ok().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source, ParameterSource::Device);
        assert_eq!(records[0].value.as_deref(), Some("1"));
        assert_eq!(records[1].source, ParameterSource::InvalidParams);
        assert!(!records[1].is_valid);
        assert_eq!(records[2].source, ParameterSource::Error);
        assert!(records[2].value.is_none());
    }

    #[tokio::test]
    async fn get_over_cap_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(success(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let names: Vec<String> = (0..21).map(|i| format!("p.{i}")).collect();
        let result = client(&server).get_parameters(&[phone()], &names).await;

        assert!(matches!(
            result,
            Err(Error::Value(ValueError::TooManyParameters {
                max: 20,
                actual: 21
            }))
        ));
    }

    #[tokio::test]
    async fn set_sends_value_and_records_it() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/config/set"))
            .and(body_json(json!({"data": {"reg.1.label": "Lobby \"East\""}})))
            .respond_with(success(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let outcomes = client(&server)
            .set_parameter(&[phone()], "reg.1.label", "Lobby \"East\"")
            .await
            .unwrap();

        let record = outcomes[0].ok().unwrap();
        assert_eq!(record.value.as_deref(), Some("Lobby \"East\""));
        assert_eq!(record.source, ParameterSource::Device);
        assert!(record.is_valid);
    }

    #[tokio::test]
    async fn set_then_get_reads_value_back() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/config/set"))
            .and(body_json(json!({"data": {"feature.callRecording.enabled": "1"}})))
            .respond_with(success(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/config/get"))
            .and(body_json(json!({"data": ["feature.callRecording.enabled"]})))
            .respond_with(success(json!({"feature.callRecording.enabled": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let written = client
            .set_parameter(&[phone()], "feature.callRecording.enabled", "1")
            .await
            .unwrap();
        assert!(written[0].is_ok());

        let outcomes = client
            .get_parameters(&[phone()], &["feature.callRecording.enabled"])
            .await
            .unwrap();
        let records = outcomes[0].ok().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, ParameterSource::Device);
        assert_eq!(records[0].value.as_deref(), Some("1"));
        assert!(records[0].is_valid);
    }

    #[tokio::test]
    async fn set_rejected_by_phone() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/config/set"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"Status": "4000"})))
            .mount(&server)
            .await;

        let outcomes = client(&server)
            .set_parameter(&[phone()], "x.y", "1")
            .await
            .unwrap();

        assert!(matches!(
            outcomes[0].err(),
            Some(Error::Device(DeviceError::Rejected { .. }))
        ));
    }
}

// ============================================================================
// Transport behavior
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn retries_transient_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/mgmt/network/info"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/mgmt/network/info"))
            .respond_with(success(json!({"IPV4Address": "127.0.0.1"})))
            .mount(&server)
            .await;

        let client = client_for(&server, RetryCount::new(3).unwrap());
        let outcomes = client
            .snapshot(&[phone()], polyrest_lib::SnapshotKind::NetworkInfo)
            .await;

        assert_eq!(
            outcomes[0].ok().unwrap().get("IPV4Address"),
            Some(&json!("127.0.0.1"))
        );
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server, RetryCount::new(2).unwrap());
        let outcomes = client.reboot(&[phone()]).await;

        assert!(matches!(
            outcomes[0].err(),
            Some(Error::Protocol(ProtocolError::RetriesExhausted { attempts: 2, .. }))
        ));
    }

    #[tokio::test]
    async fn error_status_without_envelope_is_not_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/config/set"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "internal"})))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server, RetryCount::new(2).unwrap());
        let outcomes = client
            .set_parameter(&[phone()], "a.b", "1")
            .await
            .unwrap();

        assert!(!outcomes[0].is_ok());
        assert!(matches!(
            outcomes[0].err(),
            Some(Error::Protocol(ProtocolError::RetriesExhausted { attempts: 2, .. }))
        ));
    }

    #[tokio::test]
    async fn client_error_without_envelope_is_transport_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/safeRestart"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, RetryCount::new(3).unwrap());
        let outcomes = client.restart(&[phone()]).await;

        assert!(matches!(
            outcomes[0].err(),
            Some(Error::Protocol(ProtocolError::ConnectionFailed(_)))
        ));
    }

    #[tokio::test]
    async fn authentication_failure_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, RetryCount::new(5).unwrap());
        let outcomes = client.device_info(&[phone()]).await;

        assert!(matches!(
            outcomes[0].err(),
            Some(Error::Protocol(ProtocolError::AuthenticationFailed))
        ));
    }

    #[tokio::test]
    async fn unreachable_phone_does_not_stop_batch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/mgmt/lineInfo"))
            .respond_with(success(json!([
                {"LineNumber": "1", "RegistrationStatus": "registered"}
            ])))
            .mount(&server)
            .await;

        // Nothing listens on 127.0.0.2 at the mock server's port.
        let phones = DeviceAddress::parse_all(["127.0.0.2", "127.0.0.1"]).unwrap();
        let outcomes = client(&server).line_info(&phones).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].err().unwrap().is_transport_failure());
        assert_eq!(outcomes[1].address(), &phones[1]);
        assert_eq!(outcomes[1].ok().unwrap()[0].registered, Some(true));
    }
}

// ============================================================================
// Status reads
// ============================================================================

mod status {
    use super::*;

    #[tokio::test]
    async fn device_info_nested_firmware() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/mgmt/device/info"))
            .respond_with(success(json!({
                "ModelNumber": "Trio 8800",
                "Firmware": {
                    "Updater": "7.0.0.1",
                    "Application": "7.2.0.1234 11-Mar-22 10:12",
                    "BootBlock": "3.0.4.0117 (64167-001)"
                },
                "UpTime": {"Days": "0", "Hours": "1", "Minutes": "0", "Seconds": "0"},
                "MACAddress": "0004f2112233"
            })))
            .mount(&server)
            .await;

        let outcomes = client(&server).device_info(&[phone()]).await;
        let info = outcomes[0].ok().unwrap();

        assert_eq!(info.model.as_deref(), Some("RealPresence Trio 8800"));
        assert_eq!(info.firmware_release.as_ref().unwrap().as_str(), "7.2.0.1234");
        assert_eq!(info.uptime, Some(Duration::from_secs(3_600)));
        assert!(info.last_reboot.is_some());
        assert_eq!(info.mac_address.as_deref(), Some("00:04:F2:11:22:33"));
        assert_eq!(info.device_address, phone());
    }

    #[tokio::test]
    async fn call_status_v1_both_duration_spellings() {
        for key in ["DurationSeconds", "DurationInSeconds"] {
            let server = MockServer::start().await;

            let mut call = json!({
                "CallHandle": "0x2d8a6c0",
                "UIAppearanceIndex": "1*",
                "Protocol": "sip"
            });
            call[key] = json!("42");

            Mock::given(method("GET"))
                .and(path("/api/v1/webCallControl/callStatus"))
                .respond_with(success(call))
                .mount(&server)
                .await;

            let outcomes = client(&server).call_status(&[phone()]).await;
            let calls = outcomes[0].ok().unwrap();
            assert_eq!(calls.len(), 1, "{key}");
            assert_eq!(calls[0].duration, Some(Duration::from_secs(42)));
            assert_eq!(calls[0].active_call, Some(true));
            assert_eq!(calls[0].ui_appearance_index.as_deref(), Some("1"));
            assert_eq!(calls[0].protocol.as_deref(), Some("SIP"));
        }
    }

    #[tokio::test]
    async fn call_status_v1_without_call_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/webCallControl/callStatus"))
            .respond_with(success(json!({})))
            .mount(&server)
            .await;

        let outcomes = client(&server).call_status(&[phone()]).await;
        assert!(outcomes[0].ok().unwrap().is_empty());
    }

    #[tokio::test]
    async fn call_status_v2_filtered_by_handle() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/webCallControl/callStatus"))
            .and(query_param("handle", "2d8a6c0"))
            .respond_with(success(json!([{"CallHandle": "0x2d8a6c0", "Muted": "1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = CallStatusFilter::Handle(CallHandle::parse("0x2D8A6C0").unwrap());
        let outcomes = client(&server).call_status_v2(&[phone()], &filter).await;
        let calls = outcomes[0].ok().unwrap();
        assert_eq!(calls[0].muted, Some(1));
        assert_eq!(calls[0].active_call, None);
    }

    #[tokio::test]
    async fn missed_call_log() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/mgmt/callLogs/missed"))
            .respond_with(success(json!([{"RemotePartyNumber": "1001", "Duration": "0:00:00"}])))
            .mount(&server)
            .await;

        let outcomes = client(&server)
            .call_logs(&[phone()], Some(CallLogKind::Missed))
            .await;
        let entries = outcomes[0].ok().unwrap();
        assert_eq!(entries[0].kind, Some(CallLogKind::Missed));
        assert_eq!(entries[0].duration, Some(Duration::ZERO));
    }
}

// ============================================================================
// Call control
// ============================================================================

mod call_control {
    use super::*;

    #[tokio::test]
    async fn hold_without_handle_resolves_active_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/webCallControl/callStatus"))
            .respond_with(success(json!([{"CallHandle": "0x1f"}])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/callctrl/holdCall"))
            .and(body_json(json!({"data": {"Ref": "0x1f"}})))
            .respond_with(success(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let outcomes = client(&server).hold(&[phone()], None).await;
        assert_eq!(
            outcomes[0].ok(),
            Some(&ControlOutcome::Completed(CallHandle::parse("1f").unwrap()))
        );
    }

    #[tokio::test]
    async fn no_active_call_is_a_no_op() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/webCallControl/callStatus"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/webCallControl/callStatus"))
            .respond_with(success(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(success(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let outcomes = client(&server).resume(&[phone()], None).await;
        assert_eq!(outcomes[0].ok(), Some(&ControlOutcome::NoActiveCall));
    }

    #[tokio::test]
    async fn end_call_blocked_on_5_5_2() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/mgmt/device/info"))
            .respond_with(success(json!({"FirmwareRelease": "5.5.2.8571"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/callctrl/endCall"))
            .respond_with(success(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let outcomes = client(&server)
            .end_call(&[phone()], Some("0x1"), false)
            .await;

        assert!(matches!(
            outcomes[0].err(),
            Some(Error::Device(DeviceError::UnsafeFirmware { .. }))
        ));
    }

    #[tokio::test]
    async fn dial_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/callctrl/dial"))
            .and(body_json(json!({"data": {"Dest": "sip:2002@pbx", "Line": "1", "Type": "SIP"}})))
            .respond_with(success(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let outcomes = client(&server)
            .dial(&[phone()], "sip:2002@pbx", 1, polyrest_lib::command::CallType::Sip)
            .await
            .unwrap();
        assert!(outcomes[0].is_ok());
    }

    #[tokio::test]
    async fn sign_in_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mgmt/skype/signIn"))
            .and(body_json(json!({"data": {
                "Address": "alice@example.com",
                "User": "alice",
                "Domain": "EXAMPLE",
                "Password": "pw"
            }})))
            .respond_with(success(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let command = SignInCommand::new("alice@example.com", "alice", "EXAMPLE", "pw").unwrap();
        let outcomes = client(&server).sign_in(&[phone()], &command).await;
        assert!(outcomes[0].is_ok());
    }
}
