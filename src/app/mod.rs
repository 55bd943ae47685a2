//! AppShell - the pushclip UI shell and event loop.
//!
//! The shell owns all session state (token, connection, status line) and
//! runs the single UI thread. Background work (the registration fetch
//! and the push channel) delivers completions over mpsc channels that
//! [`AppShell::tick`] drains, so no locking is needed anywhere: the token
//! state is written exactly once by the fetch completion and read only on
//! this thread.
//!
//! # Modes
//!
//! The shell runs with a ratatui terminal ([`run_tui`]) or without one
//! ([`run_headless_loop`]) for daemon/CI use; both share `tick`.

// Rust guideline compliant 2026-03

pub mod input;
pub mod state;
pub mod ui;

pub use input::InputAction;
pub use state::{AppMode, ConnectionStatus, StatusLevel, StatusMessage};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::actions::{self, ActionDispatcher, EventPayload};
use crate::clipboard::{ClipboardBridge, ClipboardRequest};
use crate::config::Config;
use crate::constants::{
    ACTION_COPY_TEXT, DEMO_BODY, DEMO_COPY_TEXT, DEMO_TITLE, HEADLESS_TICK_INTERVAL,
    KEY_TEXT_TO_COPY, TICK_INTERVAL,
};
use crate::notify::{NotificationPayload, NotificationPresenter};
use crate::push::{self, PushEvent};
use crate::registration::{TokenEvent, TokenProvider, TokenState};

/// The pushclip application shell.
///
/// Owns session state and wires user interactions to the notification
/// presenter and clipboard bridge.
pub struct AppShell {
    /// Application configuration.
    pub config: Config,
    /// Current UI mode.
    pub mode: AppMode,
    /// Registration token state; transitions exactly once.
    pub token: TokenState,
    /// Push channel state, for the status bar.
    pub connection: ConnectionStatus,
    /// Transient status line message.
    pub status: Option<StatusMessage>,
    /// Set when the user asked to quit.
    pub quit: bool,

    presenter: NotificationPresenter,
    dispatcher: Arc<ActionDispatcher>,
    token_rx: mpsc::Receiver<TokenEvent>,
    push_rx: Option<mpsc::Receiver<PushEvent>>,
    subscribe_on_token: bool,
}

impl std::fmt::Debug for AppShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("mode", &self.mode)
            .field("token", &self.token)
            .field("connection", &self.connection)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

impl AppShell {
    /// Creates the shell and starts the registration fetch.
    ///
    /// Probes the notification permission gate once, wires the copy
    /// receivers to the system clipboard, and kicks off the one-shot
    /// token fetch. The push subscription starts later, when the token
    /// becomes available.
    pub fn new(config: Config) -> Self {
        let bridge = Arc::new(ClipboardBridge::system());
        let dispatcher = Arc::new(actions::copy_dispatcher(Arc::clone(&bridge)));
        let presenter = NotificationPresenter::probe(
            Arc::clone(&dispatcher),
            config.notifications_enabled,
        );
        let token_rx =
            TokenProvider::new(&config.server_url, &config.device_name).spawn_fetch();

        Self {
            config,
            mode: AppMode::Normal,
            token: TokenState::Pending,
            connection: ConnectionStatus::Idle,
            status: None,
            quit: false,
            presenter,
            dispatcher,
            token_rx,
            push_rx: None,
            subscribe_on_token: true,
        }
    }

    /// Creates a shell from explicit parts, without background work.
    ///
    /// Tests feed token completions through `token_rx` and keep the
    /// notification gate closed.
    pub fn with_parts(
        config: Config,
        presenter: NotificationPresenter,
        dispatcher: Arc<ActionDispatcher>,
        token_rx: mpsc::Receiver<TokenEvent>,
    ) -> Self {
        Self {
            config,
            mode: AppMode::Normal,
            token: TokenState::Pending,
            connection: ConnectionStatus::Idle,
            status: None,
            quit: false,
            presenter,
            dispatcher,
            token_rx,
            push_rx: None,
            subscribe_on_token: false,
        }
    }

    /// Drains pending completions and expires the status line.
    ///
    /// Called once per event-loop iteration on the UI thread.
    pub fn tick(&mut self) {
        while let Ok(event) = self.token_rx.try_recv() {
            self.on_token_event(event);
        }

        // Drain outside the borrow so handlers can mutate the shell.
        let mut push_events = Vec::new();
        if let Some(rx) = &self.push_rx {
            while let Ok(event) = rx.try_recv() {
                push_events.push(event);
            }
        }
        for event in push_events {
            self.on_push_event(event);
        }

        if self.status.as_ref().is_some_and(StatusMessage::is_expired) {
            self.status = None;
        }
    }

    /// Applies a user input action.
    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::None => {}
            InputAction::Quit => self.quit = true,
            InputAction::CopyToken => self.copy_token(),
            InputAction::DemoNotification => self.demo_notification(),
            InputAction::OpenHelp => self.mode = AppMode::Help,
            InputAction::CloseModal => self.mode = AppMode::Normal,
        }
    }

    fn on_token_event(&mut self, event: TokenEvent) {
        if !self.token.complete(event) {
            return;
        }
        match &self.token {
            TokenState::Available(token) => {
                self.status = Some(StatusMessage::info("Registration token ready"));
                if self.subscribe_on_token {
                    self.push_rx = Some(push::subscribe(&self.config.server_url, token));
                }
            }
            TokenState::Failed(_) => {
                self.status = Some(StatusMessage::warn("Token fetch failed"));
            }
            TokenState::Pending => unreachable!("complete() never leaves Pending"),
        }
    }

    fn on_push_event(&mut self, event: PushEvent) {
        match event {
            PushEvent::Connected => {
                self.connection = ConnectionStatus::Listening {
                    since: Local::now(),
                };
            }
            PushEvent::Message(message) => {
                if let Some(from) = &message.from {
                    log::debug!("Push message from: {from}");
                }
                match NotificationPayload::from_data(&message.data) {
                    Some(payload) => {
                        self.presenter.show(&payload);
                        self.status = Some(StatusMessage::info("Message received"));
                    }
                    None => log::debug!("Push message missing title/body; display suppressed"),
                }
            }
            PushEvent::TokenRefreshed(token) => {
                // Session tokens are not rotated in place; log like any
                // other refresh and keep the displayed value.
                log::info!("Refreshed token: {} chars", token.len());
            }
            PushEvent::Disconnected(reason) => {
                self.connection = ConnectionStatus::Lost(reason);
                self.push_rx = None;
            }
        }
    }

    /// Copies the registration token, if one is available.
    fn copy_token(&mut self) {
        match self.token.token() {
            Some(token) if ClipboardRequest::is_copyable(token) => {
                let mut payload = EventPayload::new();
                payload.insert(KEY_TEXT_TO_COPY.to_string(), token.to_string());
                self.dispatcher.dispatch(ACTION_COPY_TEXT, &payload);
                self.status = Some(StatusMessage::info("Token copied to clipboard"));
            }
            _ => {
                self.status = Some(StatusMessage::warn("Token not available yet"));
            }
        }
    }

    /// Posts the canned local demo notification.
    fn demo_notification(&mut self) {
        let payload = NotificationPayload {
            title: DEMO_TITLE.to_string(),
            body: DEMO_BODY.to_string(),
        };
        if self.presenter.show_with_copy(&payload, DEMO_COPY_TEXT) {
            self.status = Some(StatusMessage::info("Demo notification posted"));
        } else {
            self.status = Some(StatusMessage::warn("Notifications not available"));
        }
    }
}

/// Runs the TUI event loop until quit.
///
/// # Errors
///
/// Returns an error if terminal drawing or input polling fails.
pub fn run_tui<B: Backend>(shell: &mut AppShell, terminal: &mut Terminal<B>) -> Result<()>
where
    <B as Backend>::Error: std::error::Error + Send + Sync + 'static,
{
    log::info!("Shell event loop starting (TUI mode)");

    while !shell.quit {
        shell.tick();
        terminal.draw(|frame| ui::render(frame, shell))?;

        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = input::handle_key(&shell.mode, key);
                    shell.handle_action(action);
                }
            }
        }
    }

    log::info!("Shell event loop exiting");
    Ok(())
}

/// Runs the shell without a terminal (daemon/CI mode).
///
/// Processes completions and push messages without rendering; exits when
/// `shutdown_flag` is set by a signal handler.
///
/// # Errors
///
/// Currently infallible; returns `Result` for parity with [`run_tui`].
pub fn run_headless_loop(shell: &mut AppShell, shutdown_flag: &AtomicBool) -> Result<()> {
    log::info!("Shell event loop starting (headless mode)");

    while !shell.quit && !shutdown_flag.load(Ordering::SeqCst) {
        shell.tick();
        thread::sleep(HEADLESS_TICK_INTERVAL);
    }

    log::info!("Shell headless event loop exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardSink, MemoryClipboard};

    fn test_shell() -> (AppShell, Arc<MemoryClipboard>, mpsc::Sender<TokenEvent>) {
        let sink = Arc::new(MemoryClipboard::new());
        let bridge = Arc::new(ClipboardBridge::with_sink(
            Arc::clone(&sink) as Arc<dyn ClipboardSink>
        ));
        let dispatcher = Arc::new(actions::copy_dispatcher(bridge));
        let presenter = NotificationPresenter::new(Arc::clone(&dispatcher), false);
        let (tx, rx) = mpsc::channel();
        let shell = AppShell::with_parts(Config::default(), presenter, dispatcher, rx);
        (shell, sink, tx)
    }

    #[test]
    fn test_copy_while_pending_shows_unavailable() {
        let (mut shell, sink, _tx) = test_shell();
        shell.handle_action(InputAction::CopyToken);

        assert_eq!(sink.contents(), None);
        let status = shell.status.expect("status message set");
        assert_eq!(status.level, StatusLevel::Warn);
        assert!(status.text.contains("not available"));
    }

    #[test]
    fn test_copy_after_available_writes_token() {
        let (mut shell, sink, tx) = test_shell();
        tx.send(TokenEvent::Received("device-token-xyz".to_string()))
            .unwrap();
        shell.tick();

        shell.handle_action(InputAction::CopyToken);
        assert_eq!(sink.contents().as_deref(), Some("device-token-xyz"));
        assert_eq!(
            shell.status.expect("status message set").level,
            StatusLevel::Info
        );
    }

    #[test]
    fn test_copy_after_failure_leaves_clipboard_unchanged() {
        let (mut shell, sink, tx) = test_shell();
        tx.send(TokenEvent::Failed("gateway offline".to_string()))
            .unwrap();
        shell.tick();

        shell.handle_action(InputAction::CopyToken);
        assert_eq!(sink.contents(), None);
        assert_eq!(
            shell.status.expect("status message set").level,
            StatusLevel::Warn
        );
    }

    #[test]
    fn test_token_transitions_once_even_with_late_events() {
        let (mut shell, _sink, tx) = test_shell();
        tx.send(TokenEvent::Received("first".to_string())).unwrap();
        tx.send(TokenEvent::Failed("late".to_string())).unwrap();
        shell.tick();

        assert_eq!(shell.token.token(), Some("first"));
    }

    #[test]
    fn test_help_toggle() {
        let (mut shell, _sink, _tx) = test_shell();
        shell.handle_action(InputAction::OpenHelp);
        assert_eq!(shell.mode, AppMode::Help);
        shell.handle_action(InputAction::CloseModal);
        assert_eq!(shell.mode, AppMode::Normal);
    }
}
