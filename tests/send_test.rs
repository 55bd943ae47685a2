//! Integration tests for FCM HTTP v1 message delivery.

use pushclip::MessageSender;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runtime driving the mock server while the sender blocks.
fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn sender_for(server: &MockServer) -> MessageSender {
    let client = reqwest::blocking::Client::new();
    MessageSender::new(client, server.uri(), "demo-project", "test-access-token")
}

#[test]
fn send_posts_the_v1_data_message() {
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/messages:send"))
            .and(header("authorization", "Bearer test-access-token"))
            .and(body_partial_json(serde_json::json!({
                "message": {
                    "token": "device-token",
                    "data": {
                        "title": "Press button to copy",
                        "body": "Hello from the desktop",
                        "copy": "true"
                    },
                    "android": { "priority": "high", "ttl": "4500s" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/demo-project/messages/0:12345"
            })))
            .expect(1)
            .mount(&server),
    );

    let result = sender_for(&server)
        .send("device-token", "Hello from the desktop")
        .expect("send succeeds");
    assert_eq!(result["name"], "projects/demo-project/messages/0:12345");
}

#[test]
fn send_surfaces_api_errors_with_the_response_body() {
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/messages:send"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("Requested entity was not found."),
            )
            .mount(&server),
    );

    let err = sender_for(&server)
        .send("stale-token", "Hello")
        .expect_err("send fails");
    let message = err.to_string();
    assert!(message.contains("404"), "error: {message}");
    assert!(
        message.contains("Requested entity was not found."),
        "error: {message}"
    );
}
