use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::Result;

/// A logical key, as seen by the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
    Esc,
    Backspace,
    /// Ctrl-C, which raw mode delivers as a key instead of a signal.
    Interrupt,
    Char(char),
    /// Anything else, including terminal resizes.
    Unknown,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            _ => Key::Unknown,
        }
    }
}

/// Block until the next key press and return it.
///
/// A resize yields [`Key::Unknown`] so the caller repaints at the new size.
/// Key release and repeat events are ignored.
pub fn read_key() -> Result<Key> {
    loop {
        match event::read()? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => return Ok(key.into()),
            CrosstermEvent::Resize(_, _) => return Ok(Key::Unknown),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Key {
        KeyEvent::new(code, KeyModifiers::NONE).into()
    }

    #[test]
    fn arrows_map_to_directions() {
        assert_eq!(key(KeyCode::Up), Key::Up);
        assert_eq!(key(KeyCode::Down), Key::Down);
        assert_eq!(key(KeyCode::Left), Key::Left);
        assert_eq!(key(KeyCode::Right), Key::Right);
    }

    #[test]
    fn plain_chars_pass_through() {
        assert_eq!(key(KeyCode::Char('G')), Key::Char('G'));
        assert_eq!(key(KeyCode::Char('c')), Key::Char('c'));
    }

    #[test]
    fn ctrl_c_is_interrupt() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Key::from(ev), Key::Interrupt);
    }

    #[test]
    fn unrecognized_keys_are_unknown() {
        assert_eq!(key(KeyCode::F(5)), Key::Unknown);
        assert_eq!(key(KeyCode::PageDown), Key::Unknown);
    }
}
