//! Pushclip - push-to-clipboard desktop companion.
//!
//! This crate provides the core functionality for the pushclip CLI:
//! receiving pushed messages, presenting them as desktop notifications
//! with a copy action, and moving text onto the system clipboard.
//!
//! # Architecture
//!
//! The crate follows a centralized state store pattern:
//!
//! - **AppShell** - Owns session state, runs the UI event loop
//! - **TokenProvider** - One-shot registration fetch against the gateway
//! - **Push channel** - WebSocket subscription delivering message events
//! - **NotificationPresenter** - Posts notifications, routes their actions
//! - **ClipboardBridge** - Validated primary-clip writes + confirmation
//! - **MessageSender** - Outbound FCM HTTP v1 delivery (send command)
//!
//! # Modules
//!
//! - [`app`] - Shell state, input handling, and rendering
//! - [`push`] - Gateway subscription and frame parsing
//! - [`notify`] - Notification channel, presenter, and toasts
//! - [`actions`] - Event-kind keyed action dispatch
//! - [`config`] - Configuration loading/saving

// Library modules
pub mod actions;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod notify;
pub mod push;
pub mod registration;
pub mod sender;

// Re-export commonly used types
pub use app::AppShell;
pub use clipboard::{ClipboardBridge, ClipboardRequest};
pub use config::Config;
pub use notify::{NotificationPayload, NotificationPresenter};
pub use registration::{TokenEvent, TokenProvider, TokenState};
pub use sender::MessageSender;
