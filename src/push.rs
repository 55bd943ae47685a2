//! Push message subscription.
//!
//! Subscribes to the gateway's message channel over WebSocket and turns
//! inbound frames into typed [`PushEvent`]s delivered to the UI thread.
//! The transport itself is opaque: frames are JSON objects tagged with an
//! `event` field, and the payload of a message frame is a flat key-value
//! map (the gateway requires nothing of its contents; display rules are
//! applied downstream).
//!
//! Per the app's best-effort policy there is no reconnect, timeout, or
//! backpressure handling here: a dropped connection surfaces as a single
//! [`PushEvent::Disconnected`] and the subscription ends.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite;

/// A message pushed to this device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    /// Sender identity as reported by the gateway, if any.
    pub from: Option<String>,
    /// Key-value payload; `title`/`body` are required for display.
    pub data: HashMap<String, String>,
}

/// Events produced by a channel subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// The subscription is established.
    Connected,
    /// A data message arrived.
    Message(PushMessage),
    /// The gateway rotated this device's registration token.
    TokenRefreshed(String),
    /// The connection ended; human-readable reason.
    Disconnected(String),
}

/// Inbound wire frame.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Frame {
    /// Data message frame.
    Message {
        /// Sender identity.
        #[serde(default)]
        from: Option<String>,
        /// Message payload.
        data: HashMap<String, String>,
    },
    /// Token rotation frame.
    Token {
        /// The replacement registration token.
        token: String,
    },
}

/// Builds the channel URL for a registration token.
///
/// Maps the gateway's HTTP origin onto its WebSocket endpoint.
fn channel_url(server_url: &str, token: &str) -> String {
    let ws_base = if let Some(rest) = server_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = server_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        server_url.to_string()
    };
    format!("{}/api/channel?token={token}", ws_base.trim_end_matches('/'))
}

/// Starts a subscription, delivering events on the returned channel.
///
/// The subscription runs on a background thread with its own runtime;
/// events are drained by the UI thread's tick. The thread exits after
/// sending `Disconnected`.
pub fn subscribe(server_url: &str, token: &str) -> mpsc::Receiver<PushEvent> {
    let (tx, rx) = mpsc::channel();
    let url = channel_url(server_url, token);

    let spawned = thread::Builder::new()
        .name("push-channel".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = tx.send(PushEvent::Disconnected(format!("runtime: {e}")));
                    return;
                }
            };

            let reason = match runtime.block_on(run_subscription(&url, &tx)) {
                Ok(reason) => reason,
                Err(e) => format!("{e:#}"),
            };
            log::info!("Push channel closed: {reason}");
            let _ = tx.send(PushEvent::Disconnected(reason));
        });

    if let Err(e) = spawned {
        log::error!("Failed to spawn push channel thread: {e}");
    }
    rx
}

/// Reads frames until the stream ends; returns the close reason.
async fn run_subscription(url: &str, tx: &mpsc::Sender<PushEvent>) -> Result<String> {
    let (stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .context("Push channel connect failed")?;
    let (mut write, mut read) = stream.split();

    log::info!("Push channel connected");
    let _ = tx.send(PushEvent::Connected);

    while let Some(message) = read.next().await {
        match message.context("Push channel read failed")? {
            tungstenite::Message::Text(text) => {
                if let Some(event) = parse_frame(&text) {
                    if tx.send(event).is_err() {
                        // UI is gone; stop reading.
                        return Ok("receiver dropped".to_string());
                    }
                }
            }
            tungstenite::Message::Ping(data) => {
                write
                    .send(tungstenite::Message::Pong(data))
                    .await
                    .context("Push channel pong failed")?;
            }
            tungstenite::Message::Close(frame) => {
                let reason = frame
                    .map(|f| f.reason.to_string())
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| "closed by gateway".to_string());
                return Ok(reason);
            }
            // Binary and pong frames are not part of the channel protocol.
            other => log::debug!("Ignoring unexpected frame: {other:?}"),
        }
    }

    Ok("stream ended".to_string())
}

/// Parses one text frame; malformed frames are skipped with a log line.
fn parse_frame(text: &str) -> Option<PushEvent> {
    match serde_json::from_str::<Frame>(text) {
        Ok(Frame::Message { from, data }) => Some(PushEvent::Message(PushMessage { from, data })),
        Ok(Frame::Token { token }) => Some(PushEvent::TokenRefreshed(token)),
        Err(e) => {
            log::debug!("Skipping malformed push frame: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_url_mapping() {
        assert_eq!(
            channel_url("https://gateway.example", "tok"),
            "wss://gateway.example/api/channel?token=tok"
        );
        assert_eq!(
            channel_url("http://localhost:3000/", "tok"),
            "ws://localhost:3000/api/channel?token=tok"
        );
    }

    #[test]
    fn test_parse_message_frame() {
        let event = parse_frame(
            r#"{"event":"message","from":"sender","data":{"title":"Hi","body":"Hello"}}"#,
        )
        .expect("valid frame");
        match event {
            PushEvent::Message(msg) => {
                assert_eq!(msg.from.as_deref(), Some("sender"));
                assert_eq!(msg.data.get("title").map(String::as_str), Some("Hi"));
                assert_eq!(msg.data.get("body").map(String::as_str), Some("Hello"));
            }
            other => panic!("Expected message event, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_token_frame() {
        let event = parse_frame(r#"{"event":"token","token":"fresh"}"#).expect("valid frame");
        assert_eq!(event, PushEvent::TokenRefreshed("fresh".to_string()));
    }

    #[test]
    fn test_malformed_frames_are_skipped() {
        assert_eq!(parse_frame("not json"), None);
        assert_eq!(parse_frame(r#"{"event":"unknown"}"#), None);
        assert_eq!(parse_frame(r#"{"event":"message"}"#), None);
    }
}
