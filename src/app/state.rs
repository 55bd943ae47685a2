//! Application state types for the pushclip TUI.

use std::time::Instant;

use chrono::{DateTime, Local};

use crate::constants::STATUS_MESSAGE_TTL;

/// The current operational mode of the TUI application.
///
/// Transitions are driven by keypresses; all modes return to `Normal`
/// via Escape.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum AppMode {
    /// Default mode: token panel and status line.
    ///
    /// Key bindings in this mode:
    /// - `c`: Copy the registration token
    /// - `n`: Post the demo notification
    /// - `?`/`h`: Open help
    /// - `q`: Quit application
    #[default]
    Normal,

    /// Help overlay is displayed over the token panel.
    ///
    /// Key bindings:
    /// - `Esc/q/?`: Close help, return to Normal
    Help,
}

impl AppMode {
    /// Returns true if this mode is a modal overlay.
    pub fn is_modal(&self) -> bool {
        !matches!(self, AppMode::Normal)
    }
}

/// Severity of a transient status message.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatusLevel {
    /// Confirmation of a completed action.
    Info,
    /// Something was skipped or unavailable.
    Warn,
}

/// A short-lived message shown in the status line.
#[derive(Clone, Debug)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,
    /// Severity, used for styling.
    pub level: StatusLevel,
    shown_at: Instant,
}

impl StatusMessage {
    /// Creates an info-level message.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
            shown_at: Instant::now(),
        }
    }

    /// Creates a warn-level message.
    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Warn,
            shown_at: Instant::now(),
        }
    }

    /// Returns true once the message has outlived its display window.
    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= STATUS_MESSAGE_TTL
    }
}

/// State of the push channel subscription.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Not subscribed (waiting for a registration token).
    #[default]
    Idle,
    /// Subscribed and receiving messages.
    Listening {
        /// When the subscription was established.
        since: DateTime<Local>,
    },
    /// The subscription ended.
    Lost(String),
}

impl ConnectionStatus {
    /// One-line description for the status bar.
    pub fn describe(&self) -> String {
        match self {
            ConnectionStatus::Idle => "not connected".to_string(),
            ConnectionStatus::Listening { since } => {
                format!("listening since {}", since.format("%H:%M:%S"))
            }
            ConnectionStatus::Lost(reason) => format!("connection lost: {reason}"),
        }
    }
}
