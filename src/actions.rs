//! Process-wide action dispatch for fire-and-forget system events.
//!
//! Notification actions arrive from the notification server on arbitrary
//! threads with nothing but an event kind and a key-value payload; no
//! receiver instance survives between deliveries. This module models that
//! as a registry of callbacks keyed by event kind: handlers are registered
//! once at startup and invoked with the payload map on every delivery.
//!
//! Two copy receivers are registered by [`copy_dispatcher`]:
//!
//! - [`ACTION_COPY`]: payload under the `message` key (notification action)
//! - [`ACTION_COPY_TEXT`]: payload under the `text_to_copy` key (in-app copy)
//!
//! A delivery with an unknown kind or a missing payload key does nothing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::clipboard::{ClipboardBridge, ClipboardRequest};
use crate::constants::{ACTION_COPY, ACTION_COPY_TEXT, KEY_MESSAGE, KEY_TEXT_TO_COPY};

/// Key-value payload carried by a dispatched event.
pub type EventPayload = HashMap<String, String>;

/// Handler invoked for a registered event kind.
type Handler = Box<dyn Fn(&EventPayload) + Send + Sync>;

/// Registry of event handlers keyed by event kind.
pub struct ActionDispatcher {
    handlers: HashMap<&'static str, Handler>,
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` for `kind`, replacing any previous handler.
    pub fn register<F>(&mut self, kind: &'static str, handler: F)
    where
        F: Fn(&EventPayload) + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Delivers an event to the handler registered for `kind`.
    ///
    /// Unknown kinds are ignored with a log line; handlers have no return
    /// value, only effects.
    pub fn dispatch(&self, kind: &str, payload: &EventPayload) {
        match self.handlers.get(kind) {
            Some(handler) => handler(payload),
            None => log::debug!("No handler registered for event kind '{kind}'"),
        }
    }
}

/// Builds the dispatcher with both copy receivers wired to `bridge`.
///
/// Each receiver extracts its designated payload key and hands the value
/// to the clipboard bridge; a missing key is a no-op.
pub fn copy_dispatcher(bridge: Arc<ClipboardBridge>) -> ActionDispatcher {
    let mut dispatcher = ActionDispatcher::new();

    let notification_bridge = Arc::clone(&bridge);
    dispatcher.register(ACTION_COPY, move |payload| {
        let Some(message) = payload.get(KEY_MESSAGE) else {
            log::debug!("Copy action fired without a '{KEY_MESSAGE}' payload");
            return;
        };
        notification_bridge.copy(&ClipboardRequest::new(message, "FCM Notification"));
    });

    dispatcher.register(ACTION_COPY_TEXT, move |payload| {
        let Some(text) = payload.get(KEY_TEXT_TO_COPY) else {
            log::debug!("Copy action fired without a '{KEY_TEXT_TO_COPY}' payload");
            return;
        };
        bridge.copy(&ClipboardRequest::new(text, "copied_text"));
    });

    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardSink, MemoryClipboard};

    fn dispatcher_with_sink() -> (ActionDispatcher, Arc<MemoryClipboard>) {
        let sink = Arc::new(MemoryClipboard::new());
        let bridge = Arc::new(ClipboardBridge::with_sink(
            Arc::clone(&sink) as Arc<dyn ClipboardSink>
        ));
        (copy_dispatcher(bridge), sink)
    }

    fn payload(key: &str, value: &str) -> EventPayload {
        let mut map = EventPayload::new();
        map.insert(key.to_string(), value.to_string());
        map
    }

    #[test]
    fn test_copy_action_writes_message_payload() {
        let (dispatcher, sink) = dispatcher_with_sink();
        dispatcher.dispatch(ACTION_COPY, &payload(KEY_MESSAGE, "Hello"));
        assert_eq!(sink.contents().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_copy_text_action_writes_text_payload() {
        let (dispatcher, sink) = dispatcher_with_sink();
        dispatcher.dispatch(ACTION_COPY_TEXT, &payload(KEY_TEXT_TO_COPY, "token-abc"));
        assert_eq!(sink.contents().as_deref(), Some("token-abc"));
    }

    #[test]
    fn test_missing_payload_key_is_noop() {
        let (dispatcher, sink) = dispatcher_with_sink();
        dispatcher.dispatch(ACTION_COPY, &payload("unrelated", "Hello"));
        assert_eq!(sink.contents(), None);
    }

    #[test]
    fn test_unknown_event_kind_is_noop() {
        let (dispatcher, sink) = dispatcher_with_sink();
        dispatcher.dispatch("open", &payload(KEY_MESSAGE, "Hello"));
        assert_eq!(sink.contents(), None);
    }
}
