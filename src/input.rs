//! Keyboard shortcuts
//!
//! The demos react to a single key: `e` exports the current frame. Anything
//! else, including held-key repeats, is ignored.

use winit::event::ElementState;
use winit::keyboard::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    ExportSnapshot,
}

/// Maps a logical key press to an action
pub fn action_for_key(key: &Key, state: ElementState, repeat: bool) -> Option<InputAction> {
    if state != ElementState::Pressed || repeat {
        return None;
    }
    match key {
        Key::Character(c) if c.as_str() == "e" => Some(InputAction::ExportSnapshot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NamedKey;

    fn character(c: &str) -> Key {
        Key::Character(c.into())
    }

    #[test]
    fn test_e_exports() {
        assert_eq!(
            action_for_key(&character("e"), ElementState::Pressed, false),
            Some(InputAction::ExportSnapshot)
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        for key in [
            character("E"),
            character("q"),
            Key::Named(NamedKey::Escape),
            Key::Named(NamedKey::Enter),
        ] {
            assert_eq!(action_for_key(&key, ElementState::Pressed, false), None);
        }
    }

    #[test]
    fn test_release_and_repeat_ignored() {
        assert_eq!(
            action_for_key(&character("e"), ElementState::Released, false),
            None
        );
        assert_eq!(
            action_for_key(&character("e"), ElementState::Pressed, true),
            None
        );
    }
}
