//! System clipboard writes with validation and confirmation.
//!
//! All clipboard traffic in the crate goes through [`ClipboardBridge`],
//! which enforces the one invariant of the copy path: the primary clip is
//! never overwritten with an empty or placeholder value. Callers are
//! expected to validate first (so they can surface a useful status
//! message), but the bridge re-checks and silently skips bad requests.
//!
//! The actual write happens behind the [`ClipboardSink`] trait so tests
//! and headless flows can observe copies without touching the real
//! clipboard.

// Rust guideline compliant 2026-03

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::constants::PLACEHOLDER_TOKEN;
use crate::notify;

/// A single clipboard write request.
///
/// Ephemeral: constructed immediately before a write, no lifecycle beyond
/// the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardRequest {
    /// Text to place on the primary clip.
    pub text: String,
    /// Display label describing the clip's origin.
    pub label: String,
}

impl ClipboardRequest {
    /// Creates a request from borrowed parts.
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }

    /// Returns true if `text` is a legal clipboard payload.
    ///
    /// Empty, whitespace-only, and the token placeholder are all rejected.
    pub fn is_copyable(text: &str) -> bool {
        !text.trim().is_empty() && text != PLACEHOLDER_TOKEN
    }
}

/// Destination for clipboard writes.
pub trait ClipboardSink: Send + Sync {
    /// Replaces the primary clip with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying clipboard is unavailable.
    fn set_text(&self, text: &str) -> Result<()>;
}

/// The real system clipboard, via arboard.
///
/// A fresh `arboard::Clipboard` handle is opened per write; the handles
/// are cheap and arboard's context is not `Sync`.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access system clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to copy text to clipboard")?;
        Ok(())
    }
}

/// In-memory sink for tests and copy-flow assertions.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Creates an empty in-memory clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last written value, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().expect("clipboard lock poisoned").clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        *self.contents.lock().expect("clipboard lock poisoned") = Some(text.to_string());
        Ok(())
    }
}

/// Validated writes to the primary clip plus user-visible confirmation.
pub struct ClipboardBridge {
    sink: Arc<dyn ClipboardSink>,
    confirm: bool,
}

impl std::fmt::Debug for ClipboardBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardBridge")
            .field("confirm", &self.confirm)
            .finish_non_exhaustive()
    }
}

impl ClipboardBridge {
    /// Bridge backed by the system clipboard, with confirmation toasts.
    pub fn system() -> Self {
        Self {
            sink: Arc::new(SystemClipboard),
            confirm: true,
        }
    }

    /// Bridge backed by an explicit sink, with confirmation disabled.
    ///
    /// Used by tests and by flows that report copies through their own UI.
    pub fn with_sink(sink: Arc<dyn ClipboardSink>) -> Self {
        Self {
            sink,
            confirm: false,
        }
    }

    /// Copies `request.text` onto the primary clip.
    ///
    /// The write is best-effort: a sink failure is logged, never
    /// propagated. Requests failing [`ClipboardRequest::is_copyable`] are
    /// skipped silently (with a log line), preserving the invariant that
    /// placeholder values never reach the clipboard.
    pub fn copy(&self, request: &ClipboardRequest) {
        if !ClipboardRequest::is_copyable(&request.text) {
            log::debug!("Skipping clipboard write: payload empty or placeholder");
            return;
        }

        match self.sink.set_text(&request.text) {
            Ok(()) => {
                log::info!("Copied {} bytes to clipboard ({})", request.text.len(), request.label);
                if self.confirm {
                    notify::toast("Text copied to clipboard");
                }
            }
            Err(e) => log::warn!("Clipboard write failed: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_copyable_rejects_empty_and_placeholder() {
        assert!(!ClipboardRequest::is_copyable(""));
        assert!(!ClipboardRequest::is_copyable("   "));
        assert!(!ClipboardRequest::is_copyable(PLACEHOLDER_TOKEN));
        assert!(ClipboardRequest::is_copyable("hello"));
    }

    #[test]
    fn test_copy_writes_to_sink() {
        let sink = Arc::new(MemoryClipboard::new());
        let bridge = ClipboardBridge::with_sink(Arc::clone(&sink) as Arc<dyn ClipboardSink>);

        bridge.copy(&ClipboardRequest::new("Hello", "test"));
        assert_eq!(sink.contents().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_copy_skips_invalid_payloads() {
        let sink = Arc::new(MemoryClipboard::new());
        let bridge = ClipboardBridge::with_sink(Arc::clone(&sink) as Arc<dyn ClipboardSink>);

        bridge.copy(&ClipboardRequest::new("", "empty"));
        bridge.copy(&ClipboardRequest::new(PLACEHOLDER_TOKEN, "placeholder"));
        assert_eq!(sink.contents(), None);
    }

    #[test]
    fn test_copy_preserves_exact_text() {
        let sink = Arc::new(MemoryClipboard::new());
        let bridge = ClipboardBridge::with_sink(Arc::clone(&sink) as Arc<dyn ClipboardSink>);

        let text = "multi\nline ✓ payload";
        bridge.copy(&ClipboardRequest::new(text, "test"));
        assert_eq!(sink.contents().as_deref(), Some(text));
    }
}
