//! Application-wide constants for pushclip.
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and discoverability. Constants are grouped
//! by domain with documentation explaining their purpose.
//!
//! # Categories
//!
//! - **Notification channel**: delivery channel identity and behavior
//! - **Payload keys**: wire keys shared with the push gateway and sender
//! - **Timeouts**: network and display timeouts
//! - **Event loop**: tick intervals and status message lifetime

use std::time::Duration;

// ============================================================================
// Notification channel
// ============================================================================

/// Identifier of the default notification delivery channel.
///
/// Registered once per process; surfaced to the notification server as
/// the category of every notification pushclip posts.
pub const CHANNEL_ID: &str = "default_channel_id";

/// Human-readable name of the default channel.
pub const CHANNEL_NAME: &str = "Default Channel";

/// Description shown in notification settings UIs that support it.
pub const CHANNEL_DESCRIPTION: &str = "Channel for default notifications";

// ============================================================================
// Payload keys
// ============================================================================

/// Key carrying the notification title in a push data payload.
pub const KEY_TITLE: &str = "title";

/// Key carrying the notification body in a push data payload.
pub const KEY_BODY: &str = "body";

/// Key carrying the copy payload delivered by the notification action.
pub const KEY_MESSAGE: &str = "message";

/// Key carrying the copy payload delivered by the in-app copy binding.
pub const KEY_TEXT_TO_COPY: &str = "text_to_copy";

/// Event kind fired when the user invokes the notification copy action.
pub const ACTION_COPY: &str = "copy";

/// Event kind fired when the user presses the in-app copy binding.
pub const ACTION_COPY_TEXT: &str = "copy_text";

// ============================================================================
// Token display
// ============================================================================

/// Placeholder shown while the registration token fetch is in flight.
///
/// Never a valid clipboard payload; [`crate::clipboard::ClipboardRequest`]
/// rejects it.
pub const PLACEHOLDER_TOKEN: &str = "Fetching FCM Token...";

// ============================================================================
// Timeouts
// ============================================================================

/// HTTP client request timeout for API calls.
///
/// Applies to individual requests (registration, message send). 10 seconds
/// is sufficient for these operations while preventing indefinite hangs.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Display timeout for message notifications, in milliseconds.
pub const NOTIFICATION_TIMEOUT_MS: u32 = 6_000;

/// Display timeout for confirmation toasts, in milliseconds.
///
/// Matches the short auto-dismiss behavior users expect from a
/// "copied to clipboard" confirmation.
pub const TOAST_TIMEOUT_MS: u32 = 2_000;

// ============================================================================
// Event loop
// ============================================================================

/// TUI input poll interval.
///
/// 50ms keeps keypresses responsive while leaving the loop mostly idle.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Headless loop sleep interval.
///
/// Headless mode has no input to poll, so a slower tick is plenty.
pub const HEADLESS_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Lifetime of a transient status line message in the TUI.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(2);

// ============================================================================
// Demo notification
// ============================================================================

/// Title of the locally fired demo notification.
pub const DEMO_TITLE: &str = "Notification Title";

/// Body of the locally fired demo notification.
pub const DEMO_BODY: &str = "Some text for notification here";

/// Copy payload attached to the demo notification's action.
pub const DEMO_COPY_TEXT: &str = "Thiss_is_the_text_to_copy";

// ============================================================================
// Sender defaults
// ============================================================================

/// Title the sender attaches to outgoing data messages.
pub const SEND_TITLE: &str = "Press button to copy";

/// Base URL of the FCM HTTP v1 API.
pub const FCM_API_BASE: &str = "https://fcm.googleapis.com";

/// Android message TTL requested by the sender.
pub const SEND_ANDROID_TTL: &str = "4500s";
