use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::eq::PRESETS;

/// What a key press asks the player to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    CursorDown,
    CursorUp,
    SelectCursor,
    TogglePlay,
    Next,
    Prev,
    SeekForward,
    SeekBack,
    ToggleShuffle,
    ToggleRepeat,
    ToggleEq,
    /// Index into [`PRESETS`].
    Preset(usize),
    VolumeUp,
    VolumeDown,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
        KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
        KeyCode::Enter => Action::SelectCursor,
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePlay,
        KeyCode::Char('l') => Action::Next,
        KeyCode::Char('h') => Action::Prev,
        KeyCode::Char('L') | KeyCode::Right => Action::SeekForward,
        KeyCode::Char('H') | KeyCode::Left => Action::SeekBack,
        KeyCode::Char('s') => Action::ToggleShuffle,
        KeyCode::Char('r') => Action::ToggleRepeat,
        KeyCode::Char('e') => Action::ToggleEq,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::VolumeUp,
        KeyCode::Char('-') => Action::VolumeDown,
        KeyCode::Char(c) => {
            let idx = c.to_digit(10)? as usize;
            if idx >= PRESETS.len() {
                return None;
            }
            Action::Preset(idx)
        }
        _ => return None,
    };
    Some(action)
}
