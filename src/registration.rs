//! Device registration token state and fetch.
//!
//! The registration token identifies this device to the push gateway.
//! Its lifecycle is deliberately minimal: created `Pending` at shell
//! startup, completed exactly once by the fetch result, held for the
//! session only. There is no persistence, no invalidation, and no
//! automatic retry. A failed fetch is logged and the UI simply shows no
//! token.

// Rust guideline compliant 2026-02

use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::HTTP_REQUEST_TIMEOUT;

/// Session-lifetime state of the registration token.
///
/// Transitions exactly once, from `Pending` to either `Available` or
/// `Failed`; later completions are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenState {
    /// Fetch is in flight; the UI shows a placeholder.
    #[default]
    Pending,
    /// Fetch succeeded; the value is displayable and copyable.
    Available(String),
    /// Fetch failed; the reason is shown in the UI, never copied.
    Failed(String),
}

impl TokenState {
    /// Applies a completion event.
    ///
    /// Returns `true` if the state transitioned. A second completion is
    /// ignored with a warning, preserving the transition-once invariant.
    pub fn complete(&mut self, event: TokenEvent) -> bool {
        if !matches!(self, TokenState::Pending) {
            log::warn!("Ignoring duplicate token completion: {event:?}");
            return false;
        }
        *self = match event {
            TokenEvent::Received(token) => TokenState::Available(token),
            TokenEvent::Failed(reason) => TokenState::Failed(reason),
        };
        true
    }

    /// Returns the token value when available.
    pub fn token(&self) -> Option<&str> {
        match self {
            TokenState::Available(token) => Some(token),
            _ => None,
        }
    }

    /// Returns true while the fetch is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, TokenState::Pending)
    }
}

/// One-shot completion of a registration fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    /// The gateway issued a registration token.
    Received(String),
    /// The fetch failed; human-readable reason.
    Failed(String),
}

/// Response from POST /api/registrations
#[derive(Debug, Deserialize)]
struct RegistrationResponse {
    /// The registration token issued to this device.
    token: String,
}

/// Fetches registration tokens from the push gateway.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    server_url: String,
    device_name: String,
}

impl TokenProvider {
    /// Creates a provider for the given gateway and device identity.
    pub fn new(server_url: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            device_name: device_name.into(),
        }
    }

    /// Starts one asynchronous fetch, completing on the returned channel.
    ///
    /// Exactly one [`TokenEvent`] is delivered per invocation: success or
    /// failure, never both, never neither. The receiver is drained on the
    /// UI thread's tick.
    pub fn spawn_fetch(&self) -> mpsc::Receiver<TokenEvent> {
        let (tx, rx) = mpsc::channel();
        let provider = self.clone();

        let spawned = thread::Builder::new()
            .name("token-fetch".to_string())
            .spawn(move || {
                let event = match provider.fetch() {
                    Ok(token) => {
                        log::info!("Registration token received ({} chars)", token.len());
                        TokenEvent::Received(token)
                    }
                    Err(e) => {
                        log::warn!("Registration token fetch failed: {e:#}");
                        TokenEvent::Failed(format!("{e:#}"))
                    }
                };
                // The shell may have exited before the fetch completed.
                if tx.send(event).is_err() {
                    log::debug!("Token completion dropped: receiver gone");
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn token fetch thread: {e}");
        }
        rx
    }

    /// Performs the blocking registration request.
    fn fetch(&self) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        let url = format!("{}/api/registrations", self.server_url);
        let response = client
            .post(&url)
            .json(&serde_json::json!({ "device_name": self.device_name }))
            .send()
            .context("Registration request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Gateway returned {status}: {body}");
        }

        let registration: RegistrationResponse = response
            .json()
            .context("Invalid registration response")?;

        if registration.token.is_empty() {
            anyhow::bail!("Gateway issued an empty registration token");
        }

        Ok(registration.token)
    }
}
