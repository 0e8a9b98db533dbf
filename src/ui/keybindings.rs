// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Meter actions derived from key events. All of them only touch the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeterAction {
    SensitivityUp,
    SensitivityDown,
    NoiseReductionUp,
    NoiseReductionDown,
    CycleTheme,
    ToggleDebug,
    Quit,
    None,
}

/// Convert a key event to a meter action.
pub fn key_to_action(key: &KeyEvent) -> MeterAction {
    // Ignore key releases on terminals that report them
    if key.kind == KeyEventKind::Release {
        return MeterAction::None;
    }

    // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return MeterAction::Quit;
    }

    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => MeterAction::SensitivityUp,
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => MeterAction::SensitivityDown,
        KeyCode::Char(']') | KeyCode::Right => MeterAction::NoiseReductionUp,
        KeyCode::Char('[') | KeyCode::Left => MeterAction::NoiseReductionDown,
        KeyCode::Char('t') => MeterAction::CycleTheme,
        KeyCode::Char('d') => MeterAction::ToggleDebug,
        KeyCode::Char('q') | KeyCode::Esc => MeterAction::Quit,
        _ => MeterAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn mapped_keys() {
        assert_eq!(key_to_action(&key(KeyCode::Char('+'))), MeterAction::SensitivityUp);
        assert_eq!(key_to_action(&key(KeyCode::Down)), MeterAction::SensitivityDown);
        assert_eq!(key_to_action(&key(KeyCode::Char(']'))), MeterAction::NoiseReductionUp);
        assert_eq!(key_to_action(&key(KeyCode::Left)), MeterAction::NoiseReductionDown);
        assert_eq!(key_to_action(&key(KeyCode::Char('t'))), MeterAction::CycleTheme);
        assert_eq!(key_to_action(&key(KeyCode::Char('d'))), MeterAction::ToggleDebug);
        assert_eq!(key_to_action(&key(KeyCode::Esc)), MeterAction::Quit);
        assert_eq!(key_to_action(&key(KeyCode::Char('x'))), MeterAction::None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(&ev), MeterAction::Quit);
    }

    #[test]
    fn releases_are_ignored() {
        let mut ev = key(KeyCode::Char('q'));
        ev.kind = KeyEventKind::Release;
        assert_eq!(key_to_action(&ev), MeterAction::None);
    }
}
