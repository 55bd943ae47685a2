//! Outbound message delivery via the FCM HTTP v1 API.
//!
//! The desktop side of the transfer: posts a data message at a device
//! registration token so the receiving device can surface it as a
//! copy-to-clipboard notification. Authentication uses an OAuth access
//! token resolved from the environment or an external command; the
//! OAuth signing flow itself stays outside this crate.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::constants::{FCM_API_BASE, HTTP_REQUEST_TIMEOUT, SEND_ANDROID_TTL, SEND_TITLE};

/// The subset of a service account key file the sender needs.
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    /// Google Cloud project that owns the messaging endpoint.
    project_id: String,
}

/// Reads the project id out of a service account key file.
///
/// # Errors
///
/// Returns an error if the file is missing or not a valid key file.
pub fn project_id(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read service account key at {}", path.display()))?;
    let key: ServiceAccountKey =
        serde_json::from_str(&content).context("Invalid service account key file")?;
    Ok(key.project_id)
}

/// Resolves an OAuth access token for the messaging API.
///
/// `PUSHCLIP_ACCESS_TOKEN` wins when set; otherwise the configured token
/// command is run and its stdout is used.
pub fn resolve_access_token(config: &Config) -> Result<String> {
    if let Ok(token) = std::env::var("PUSHCLIP_ACCESS_TOKEN") {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }

    log::debug!("Resolving access token via: {}", config.token_command);
    let output = Command::new("sh")
        .arg("-c")
        .arg(&config.token_command)
        .output()
        .with_context(|| format!("Failed to run token command '{}'", config.token_command))?;

    if !output.status.success() {
        anyhow::bail!(
            "Token command failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        anyhow::bail!("Token command produced no output");
    }
    Ok(token)
}

/// Builds the messages:send request body for one recipient.
fn build_payload(to: &str, body: &str) -> serde_json::Value {
    serde_json::json!({
        "message": {
            "token": to,
            "data": {
                "title": SEND_TITLE,
                "body": body,
                "copy": "true"
            },
            "apns": {
                "payload": {
                    "aps": {
                        "sound": "default",
                    },
                },
            },
            "android": {
                "priority": "high",
                "ttl": SEND_ANDROID_TTL
            }
        }
    })
}

/// Sends data messages through the FCM HTTP v1 API.
#[derive(Debug, Clone)]
pub struct MessageSender {
    client: Client,
    api_base: String,
    project_id: String,
    access_token: String,
}

impl MessageSender {
    /// Creates a sender for a project.
    ///
    /// `api_base` is the API origin; production callers pass
    /// [`FCM_API_BASE`], tests point it at a local mock.
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        project_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            project_id: project_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Delivers `body` as a data message to the device at `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a
    /// non-success status; the response body is included in the error.
    pub fn send(&self, to: &str, body: &str) -> Result<serde_json::Value> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base, self.project_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&build_payload(to, body))
            .send()
            .context("Message send request failed")?;

        if response.status().is_success() {
            let result: serde_json::Value =
                response.json().context("Invalid messages:send response")?;
            log::info!("Message delivered to device token ({} chars)", to.len());
            Ok(result)
        } else {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            anyhow::bail!("Failed to send notification: {status} - {text}")
        }
    }
}

/// Runs the send command end to end.
///
/// The recipient comes from `--to` or the remembered token; `remember`
/// persists the recipient for next time, `forget` clears it.
pub fn run(
    config: &Config,
    to: Option<String>,
    body: &str,
    remember: bool,
    forget: bool,
) -> Result<()> {
    let recipient = to
        .or_else(Config::load_saved_token)
        .context("No recipient token: pass --to or save one with --remember")?;

    if body.trim().is_empty() {
        anyhow::bail!("Message body must not be empty");
    }

    let project = project_id(&config.credentials_path)?;
    let access_token = resolve_access_token(config)?;

    let client = Client::builder()
        .timeout(HTTP_REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let sender = MessageSender::new(client, FCM_API_BASE, project, access_token);

    let result = sender.send(&recipient, body)?;

    if remember {
        Config::save_token(&recipient)?;
    } else if forget {
        Config::delete_saved_token()?;
    }

    println!("Notification sent.");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
