//! Keys and actions the scene reacts to, decoupled from the windowing layer.

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Num1,
    Num2,
    W,
    A,
    S,
    D,
    Q,
    E,
    F,
    Space,
    Up,
    Down,
    Left,
    Right,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

impl KeyAction {
    /// True for a press or an auto-repeat.
    pub fn is_held(self) -> bool {
        matches!(self, KeyAction::Press | KeyAction::Repeat)
    }
}

impl SceneKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        let key = match code {
            KeyCode::Digit1 | KeyCode::Numpad1 => SceneKey::Num1,
            KeyCode::Digit2 | KeyCode::Numpad2 => SceneKey::Num2,
            KeyCode::KeyW => SceneKey::W,
            KeyCode::KeyA => SceneKey::A,
            KeyCode::KeyS => SceneKey::S,
            KeyCode::KeyD => SceneKey::D,
            KeyCode::KeyQ => SceneKey::Q,
            KeyCode::KeyE => SceneKey::E,
            KeyCode::KeyF => SceneKey::F,
            KeyCode::Space => SceneKey::Space,
            KeyCode::ArrowUp => SceneKey::Up,
            KeyCode::ArrowDown => SceneKey::Down,
            KeyCode::ArrowLeft => SceneKey::Left,
            KeyCode::ArrowRight => SceneKey::Right,
            KeyCode::Escape => SceneKey::Escape,
            _ => return None,
        };
        Some(key)
    }

    /// Translates a winit keyboard event, ignoring keys the scene has no use for.
    pub fn from_event(event: &KeyEvent) -> Option<(Self, KeyAction)> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let action = match (event.state, event.repeat) {
            (ElementState::Released, _) => KeyAction::Release,
            (ElementState::Pressed, true) => KeyAction::Repeat,
            (ElementState::Pressed, false) => KeyAction::Press,
        };
        Self::from_key_code(code).map(|key| (key, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(SceneKey::from_key_code(KeyCode::Digit2), Some(SceneKey::Num2));
        assert_eq!(SceneKey::from_key_code(KeyCode::ArrowLeft), Some(SceneKey::Left));
        assert_eq!(SceneKey::from_key_code(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_held_actions() {
        assert!(KeyAction::Press.is_held());
        assert!(KeyAction::Repeat.is_held());
        assert!(!KeyAction::Release.is_held());
    }
}
