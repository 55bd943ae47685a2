//! Input handling for the TUI application.
//!
//! Translates keyboard input into [`InputAction`]s based on the current
//! application mode, keeping input logic separate from shell state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::AppMode;

/// Result of handling a key event.
///
/// Indicates what action the application should take after processing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// No action needed, input was consumed.
    None,
    /// Request application quit.
    Quit,
    /// Copy the registration token to the clipboard.
    CopyToken,
    /// Post the local demo notification.
    DemoNotification,
    /// Open the help overlay.
    OpenHelp,
    /// Close the active overlay and return to normal mode.
    CloseModal,
}

/// Maps a key event to an action for the current mode.
pub fn handle_key(mode: &AppMode, key: KeyEvent) -> InputAction {
    // Ctrl-C quits from any mode.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputAction::Quit;
    }

    match mode {
        AppMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
            KeyCode::Char('c') => InputAction::CopyToken,
            KeyCode::Char('n') => InputAction::DemoNotification,
            KeyCode::Char('?') | KeyCode::Char('h') => InputAction::OpenHelp,
            _ => InputAction::None,
        },
        AppMode::Help => match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => InputAction::CloseModal,
            _ => InputAction::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_bindings() {
        let mode = AppMode::Normal;
        assert_eq!(handle_key(&mode, key(KeyCode::Char('q'))), InputAction::Quit);
        assert_eq!(
            handle_key(&mode, key(KeyCode::Char('c'))),
            InputAction::CopyToken
        );
        assert_eq!(
            handle_key(&mode, key(KeyCode::Char('n'))),
            InputAction::DemoNotification
        );
        assert_eq!(
            handle_key(&mode, key(KeyCode::Char('?'))),
            InputAction::OpenHelp
        );
        assert_eq!(handle_key(&mode, key(KeyCode::Char('x'))), InputAction::None);
    }

    #[test]
    fn test_help_mode_only_closes() {
        let mode = AppMode::Help;
        assert_eq!(handle_key(&mode, key(KeyCode::Esc)), InputAction::CloseModal);
        assert_eq!(
            handle_key(&mode, key(KeyCode::Char('c'))),
            InputAction::None
        );
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&AppMode::Normal, ctrl_c), InputAction::Quit);
        assert_eq!(handle_key(&AppMode::Help, ctrl_c), InputAction::Quit);
    }
}
