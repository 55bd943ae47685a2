//! Desktop notification presentation.
//!
//! Turns push payloads into desktop notifications carrying a "Copy"
//! action. The notification server and its rendering are opaque; this
//! module only builds and posts notifications and listens for action
//! invocations.
//!
//! # Permission gate
//!
//! Whether notifications may be shown is decided once at startup by
//! [`NotificationPresenter::probe`]: the user-level switch in the config
//! plus a reachability probe of the notification server. When the gate is
//! closed, [`NotificationPresenter::show`] is a silent no-op with a log
//! line: user consent, not an error.
//!
//! # Actions
//!
//! Action callbacks are only delivered on XDG platforms; elsewhere the
//! notification is shown without a usable action and copying stays
//! available from the shell keybinding.

use std::sync::{Arc, OnceLock};
#[cfg(all(unix, not(target_os = "macos")))]
use std::thread;

use notify_rust::{Notification, Timeout};

use crate::actions::{ActionDispatcher, EventPayload};
use crate::constants::{
    ACTION_COPY, CHANNEL_DESCRIPTION, CHANNEL_ID, CHANNEL_NAME, KEY_BODY, KEY_MESSAGE, KEY_TITLE,
    NOTIFICATION_TIMEOUT_MS, TOAST_TIMEOUT_MS,
};

/// A renderable push payload.
///
/// Created when a push message arrives; consumed once to render a
/// notification; not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Notification title.
    pub title: String,
    /// Notification body; also the copy-action payload.
    pub body: String,
}

impl NotificationPayload {
    /// Extracts a payload from a push data map.
    ///
    /// Returns `None` unless both the `title` and `body` keys are present;
    /// absence of either suppresses display entirely.
    pub fn from_data(data: &EventPayload) -> Option<Self> {
        let title = data.get(KEY_TITLE)?;
        let body = data.get(KEY_BODY)?;
        Some(Self {
            title: title.clone(),
            body: body.clone(),
        })
    }
}

/// Identity and behavior of the delivery channel notifications go out on.
///
/// Fixed at build time; registered process-wide exactly once.
#[derive(Debug)]
pub struct NotificationChannel {
    /// Stable channel identifier, surfaced as the notification category.
    pub id: &'static str,
    /// Human-readable channel name.
    pub name: &'static str,
    /// Channel description for settings UIs.
    pub description: &'static str,
}

static CHANNEL: OnceLock<NotificationChannel> = OnceLock::new();

/// Returns the process-wide default channel, registering it on first use.
pub fn channel() -> &'static NotificationChannel {
    CHANNEL.get_or_init(|| {
        log::info!("Registering notification channel '{CHANNEL_ID}' ({CHANNEL_NAME})");
        NotificationChannel {
            id: CHANNEL_ID,
            name: CHANNEL_NAME,
            description: CHANNEL_DESCRIPTION,
        }
    })
}

/// Posts message notifications and routes their actions.
pub struct NotificationPresenter {
    granted: bool,
    dispatcher: Arc<ActionDispatcher>,
}

impl std::fmt::Debug for NotificationPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationPresenter")
            .field("granted", &self.granted)
            .finish_non_exhaustive()
    }
}

impl NotificationPresenter {
    /// Creates a presenter with an explicit gate state.
    ///
    /// Tests and headless flows use this to keep the gate closed.
    pub fn new(dispatcher: Arc<ActionDispatcher>, granted: bool) -> Self {
        Self { granted, dispatcher }
    }

    /// Probes the permission gate once and creates the presenter.
    ///
    /// The gate is open when notifications are enabled in the config and
    /// the notification server responds to a capability query.
    pub fn probe(dispatcher: Arc<ActionDispatcher>, enabled: bool) -> Self {
        let granted = enabled && server_available();
        if !granted {
            log::info!("Notification permission not granted; message display disabled");
        }
        Self::new(dispatcher, granted)
    }

    /// Returns whether the permission gate is open.
    pub fn granted(&self) -> bool {
        self.granted
    }

    /// Displays `payload` as a desktop notification with a copy action.
    ///
    /// The copy action carries the body text. Returns `true` if the
    /// notification was posted. With the gate closed, or if the
    /// notification server rejects the post, this is a no-op apart from a
    /// log line, never an error.
    pub fn show(&self, payload: &NotificationPayload) -> bool {
        let body = payload.body.clone();
        self.show_with_copy(payload, &body)
    }

    /// Like [`Self::show`], with an explicit copy-action payload.
    ///
    /// Used by the demo notification, whose copy text differs from its
    /// body.
    pub fn show_with_copy(&self, payload: &NotificationPayload, copy_text: &str) -> bool {
        if !self.granted {
            log::debug!("Notification permission not granted");
            return false;
        }

        let notification = build(payload);
        match notification.show() {
            Ok(handle) => {
                #[cfg(all(unix, not(target_os = "macos")))]
                self.spawn_action_listener(handle, copy_text.to_string());

                #[cfg(not(all(unix, not(target_os = "macos"))))]
                {
                    let _ = (handle, copy_text);
                    log::debug!("Notification actions unsupported on this platform");
                }
                true
            }
            Err(e) => {
                log::warn!("Notification server rejected post: {e}");
                false
            }
        }
    }

    /// Waits for the copy action on a detached thread and dispatches it.
    #[cfg(all(unix, not(target_os = "macos")))]
    fn spawn_action_listener(&self, handle: notify_rust::NotificationHandle, body: String) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let spawned = thread::Builder::new()
            .name("notify-action".to_string())
            .spawn(move || {
                handle.wait_for_action(|action| {
                    if action == ACTION_COPY {
                        let mut data = EventPayload::new();
                        data.insert(KEY_MESSAGE.to_string(), body);
                        dispatcher.dispatch(ACTION_COPY, &data);
                    }
                });
            });
        if let Err(e) = spawned {
            log::warn!("Failed to spawn notification action listener: {e}");
        }
    }
}

/// Builds the notification for a payload: title, body, one copy action.
fn build(payload: &NotificationPayload) -> Notification {
    let chan = channel();
    let mut notification = Notification::new();
    notification
        .appname("pushclip")
        .summary(&payload.title)
        .body(&payload.body)
        .action(ACTION_COPY, "Copy")
        .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS));

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        use notify_rust::{Hint, Urgency};
        notification
            .urgency(Urgency::Critical)
            .hint(Hint::Category(chan.id.to_string()));
    }
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    let _ = chan;

    notification
}

/// Shows a short auto-dismissing confirmation message.
///
/// Toasts bypass the presenter gate (they confirm a user-initiated copy,
/// not an unsolicited message); a failed post is only logged.
pub fn toast(text: &str) {
    let mut notification = Notification::new();
    notification
        .appname("pushclip")
        .summary(text)
        .timeout(Timeout::Milliseconds(TOAST_TIMEOUT_MS));

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        use notify_rust::{Hint, Urgency};
        notification.urgency(Urgency::Low).hint(Hint::Transient(true));
    }

    if let Err(e) = notification.show() {
        log::debug!("Toast not shown: {e}");
    }
}

/// Probes whether a notification server is reachable.
#[cfg(all(unix, not(target_os = "macos")))]
fn server_available() -> bool {
    match notify_rust::get_server_information() {
        Ok(info) => {
            log::debug!("Notification server: {} {}", info.name, info.version);
            true
        }
        Err(e) => {
            log::warn!("No notification server reachable: {e}");
            false
        }
    }
}

/// Non-XDG platforms have no queryable server; assume available.
#[cfg(not(all(unix, not(target_os = "macos"))))]
fn server_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> EventPayload {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_data_requires_both_keys() {
        assert_eq!(NotificationPayload::from_data(&data(&[])), None);
        assert_eq!(
            NotificationPayload::from_data(&data(&[(KEY_TITLE, "Hi")])),
            None
        );
        assert_eq!(
            NotificationPayload::from_data(&data(&[(KEY_BODY, "Hello")])),
            None
        );
    }

    #[test]
    fn test_from_data_extracts_title_and_body() {
        let payload = NotificationPayload::from_data(&data(&[
            (KEY_TITLE, "Hi"),
            (KEY_BODY, "Hello"),
            ("copy", "true"),
        ]))
        .expect("payload with both keys");
        assert_eq!(payload.title, "Hi");
        assert_eq!(payload.body, "Hello");
    }

    #[test]
    fn test_channel_registered_once() {
        let first = channel() as *const NotificationChannel;
        let second = channel() as *const NotificationChannel;
        assert_eq!(first, second);
        assert_eq!(channel().id, CHANNEL_ID);
    }

    #[test]
    fn test_build_carries_fields_and_one_action() {
        let payload = NotificationPayload {
            title: "Hi".to_string(),
            body: "Hello".to_string(),
        };
        let notification = build(&payload);
        assert_eq!(notification.summary, "Hi");
        assert_eq!(notification.body, "Hello");
        // Actions are stored as (identifier, label) pairs in a flat list.
        assert_eq!(notification.actions, vec!["copy".to_string(), "Copy".to_string()]);
    }

    #[test]
    fn test_gated_presenter_shows_nothing() {
        let dispatcher = Arc::new(ActionDispatcher::new());
        let presenter = NotificationPresenter::new(dispatcher, false);
        let payload = NotificationPayload {
            title: "Hi".to_string(),
            body: "Hello".to_string(),
        };
        assert!(!presenter.show(&payload));
    }
}
