//! Key bindings for the interactive UI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append a character to the input
    Insert(char),
    /// Delete the last character of the input
    Backspace,
    /// Clear the input
    ClearInput,
    /// Translate the current input
    Translate,
    /// Select the next level (re-translates)
    NextLevel,
    /// Select the previous level (re-translates)
    PreviousLevel,
    /// Open or close the level panel
    TogglePanel,
    /// Move the panel cursor up
    PanelUp,
    /// Move the panel cursor down
    PanelDown,
    /// Select the level under the panel cursor
    PanelSelect,
    /// Copy the result to the clipboard
    Copy,
    /// Play the entrance animation again
    Replay,
    /// Leave the app
    Quit,
    /// Nothing bound
    Ignore,
}

/// Map a key press to an action. The level panel captures navigation keys.
pub fn map_key(key: KeyEvent, panel_open: bool) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('y') if ctrl => Action::Copy,
        KeyCode::Char('r') if ctrl => Action::Replay,
        KeyCode::Char('u') if ctrl => Action::ClearInput,
        KeyCode::Char('l') if ctrl => Action::TogglePanel,
        KeyCode::Char(_) if ctrl => Action::Ignore,
        KeyCode::F(2) => Action::TogglePanel,
        KeyCode::Esc if panel_open => Action::TogglePanel,
        KeyCode::Esc => Action::Quit,
        KeyCode::Up if panel_open => Action::PanelUp,
        KeyCode::Down if panel_open => Action::PanelDown,
        KeyCode::Enter if panel_open => Action::PanelSelect,
        KeyCode::Enter if alt => Action::Insert('\n'),
        KeyCode::Enter => Action::Translate,
        KeyCode::Tab => Action::NextLevel,
        KeyCode::BackTab => Action::PreviousLevel,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::Insert(c),
        _ => Action::Ignore,
    }
}

/// One-line key hint shown at the bottom of the screen.
pub fn hint(panel_open: bool) -> &'static str {
    if panel_open {
        " ↑/↓ choose | Enter select | Esc close"
    } else {
        " Enter translate | Tab level | F2 levels | ^Y copy | ^R replay | ^U clear | Esc quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_inserts() {
        assert_eq!(map_key(key(KeyCode::Char('a')), false), Action::Insert('a'));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT), false),
            Action::Insert('A')
        );
    }

    #[test]
    fn test_control_bindings() {
        assert_eq!(map_key(ctrl('y'), false), Action::Copy);
        assert_eq!(map_key(ctrl('r'), false), Action::Replay);
        assert_eq!(map_key(ctrl('c'), true), Action::Quit);
        assert_eq!(map_key(ctrl('x'), false), Action::Ignore);
    }

    #[test]
    fn test_enter_depends_on_panel() {
        assert_eq!(map_key(key(KeyCode::Enter), false), Action::Translate);
        assert_eq!(map_key(key(KeyCode::Enter), true), Action::PanelSelect);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT), false),
            Action::Insert('\n')
        );
    }

    #[test]
    fn test_escape_closes_panel_before_quitting() {
        assert_eq!(map_key(key(KeyCode::Esc), true), Action::TogglePanel);
        assert_eq!(map_key(key(KeyCode::Esc), false), Action::Quit);
    }

    #[test]
    fn test_level_navigation() {
        assert_eq!(map_key(key(KeyCode::Tab), false), Action::NextLevel);
        assert_eq!(map_key(key(KeyCode::BackTab), false), Action::PreviousLevel);
        assert_eq!(map_key(key(KeyCode::Up), true), Action::PanelUp);
        assert_eq!(map_key(key(KeyCode::Up), false), Action::Ignore);
    }
}
