//! Key bindings. Every button on screen also has a key.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    QuickFive,
    QuickTen,
    Buy,
    Reset,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Toggle the ball under the keyboard cursor.
    ToggleCursor,
    Quit,
    None,
}

/// Map key event to action. Arrows and hjkl both move the cursor.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('5') => Action::QuickFive,
        KeyCode::Char('0') | KeyCode::Char('t') => Action::QuickTen,
        KeyCode::Char('b') | KeyCode::Enter => Action::Buy,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Left | KeyCode::Char('h') => Action::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::CursorRight,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Char(' ') => Action::ToggleCursor,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_buttons_have_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('5'))), Action::QuickFive);
        assert_eq!(key_to_action(key(KeyCode::Char('0'))), Action::QuickTen);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Buy);
        assert_eq!(key_to_action(key(KeyCode::Char('r'))), Action::Reset);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_cursor_keys() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::CursorLeft);
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), Action::CursorDown);
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::ToggleCursor);
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT)),
            Action::None
        );
    }
}
