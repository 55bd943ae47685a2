//! Integration tests for the registration token fetch.
//!
//! Uses a local mock gateway; asserts the one-completion-per-invocation
//! contract of the token provider.

use std::time::Duration;

use pushclip::{TokenEvent, TokenProvider, TokenState};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runtime driving the mock server while the provider blocks.
fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

#[test]
fn successful_fetch_delivers_exactly_one_token() {
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/registrations"))
            .and(body_partial_json(serde_json::json!({
                "device_name": "test-device"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token": "issued-token" })),
            )
            .expect(1)
            .mount(&server),
    );

    let provider = TokenProvider::new(server.uri(), "test-device");
    let rx = provider.spawn_fetch();

    let event = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("one completion");
    assert_eq!(event, TokenEvent::Received("issued-token".to_string()));

    // Exactly one completion per invocation: the channel yields nothing more.
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn failed_fetch_delivers_exactly_one_failure() {
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/registrations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
            .expect(1)
            .mount(&server),
    );

    let provider = TokenProvider::new(server.uri(), "test-device");
    let rx = provider.spawn_fetch();

    let event = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("one completion");
    match event {
        TokenEvent::Failed(reason) => assert!(reason.contains("500"), "reason: {reason}"),
        other => panic!("Expected failure, got {other:?}"),
    }

    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn completion_drives_the_state_machine_once() {
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/registrations"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token": "issued-token" })),
            )
            .mount(&server),
    );

    let rx = TokenProvider::new(server.uri(), "test-device").spawn_fetch();
    let event = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("one completion");

    let mut state = TokenState::Pending;
    assert!(state.complete(event));
    assert_eq!(state.token(), Some("issued-token"));

    // A hypothetical late completion cannot move the state again.
    assert!(!state.complete(TokenEvent::Failed("late".to_string())));
    assert_eq!(state.token(), Some("issued-token"));
}
