//! Control-protocol wire format and dispatch semantics.

mod helpers;

use helpers::*;
use httptest::Server;

use truthlens::{ControlMessage, ControlResponse, Status};

const PAGE: &str = "<html><body></body></html>";

#[test]
fn messages_round_trip_the_wire_format() {
    for (json, expected) in [
        (r#"{"type":"GET_ACTIVE"}"#, ControlMessage::GetActive),
        (
            r#"{"type":"SET_ACTIVE","active":true}"#,
            ControlMessage::SetActive { active: true },
        ),
        (r#"{"type":"GET_STATUS"}"#, ControlMessage::GetStatus),
        (
            r#"{"type":"SET_STATUS","status":"legit"}"#,
            ControlMessage::SetStatus {
                status: Status::Legit,
            },
        ),
    ] {
        let parsed: ControlMessage = serde_json::from_str(json).expect(json);
        assert_eq!(parsed, expected);
        // Serialization emits the same tagged shape.
        let emitted = serde_json::to_string(&expected).unwrap();
        let reparsed: ControlMessage = serde_json::from_str(&emitted).unwrap();
        assert_eq!(reparsed, expected);
    }
}

#[test]
fn unknown_message_types_are_rejected() {
    assert!(serde_json::from_str::<ControlMessage>(r#"{"type":"PING"}"#).is_err());
    assert!(serde_json::from_str::<ControlMessage>(r#"{"type":"SET_ACTIVE"}"#).is_err());
}

#[tokio::test]
async fn queries_report_current_state() {
    let server = Server::run();
    let mut engine = engine_for(&server, PAGE, "https://example.com/");
    engine.start().await;

    let resp = engine.handle_message(ControlMessage::GetActive).await;
    assert_eq!(resp, ControlResponse::Active { active: true });

    let resp = engine.handle_message(ControlMessage::GetStatus).await;
    assert_eq!(
        resp,
        ControlResponse::Status {
            status: Status::Uncertain
        }
    );
}

#[tokio::test]
async fn set_messages_echo_the_applied_value() {
    let server = Server::run();
    let mut engine = engine_for(&server, PAGE, "https://example.com/");
    engine.start().await;

    let resp = engine
        .handle_message(ControlMessage::SetActive { active: false })
        .await;
    assert_eq!(resp, ControlResponse::Active { active: false });
    assert!(!engine.is_active());

    let resp = engine
        .handle_message(ControlMessage::SetStatus {
            status: Status::Legit,
        })
        .await;
    assert_eq!(
        resp,
        ControlResponse::Status {
            status: Status::Legit
        }
    );
    assert_eq!(engine.status(), Status::Legit);
}

#[tokio::test]
async fn json_dispatch_matches_typed_dispatch() {
    let server = Server::run();
    let mut engine = engine_for(&server, PAGE, "https://example.com/");
    engine.start().await;

    let message: ControlMessage =
        serde_json::from_str(r#"{"type":"SET_STATUS","status":"scam"}"#).unwrap();
    let resp = engine.handle_message(message).await;
    assert_eq!(
        serde_json::to_string(&resp).unwrap(),
        r#"{"status":"scam"}"#
    );
}
