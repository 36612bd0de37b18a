// Logical input actions and their default key bindings

use winit::keyboard::KeyCode;

/// Logical actions driven by held keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Jump,
    Walk,
}

impl Action {
    /// All actions, in binding-resolution order
    pub const ALL: [Action; 6] = [
        Action::Up,
        Action::Down,
        Action::Right,
        Action::Left,
        Action::Jump,
        Action::Walk,
    ];

    /// Name used in configuration and logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Jump => "jump",
            Action::Walk => "walk",
        }
    }

    /// Key bound to this action when no override is given
    pub fn default_key(&self) -> KeyCode {
        match self {
            Action::Up => KeyCode::KeyW,
            Action::Down => KeyCode::KeyS,
            Action::Right => KeyCode::KeyD,
            Action::Left => KeyCode::KeyA,
            Action::Jump => KeyCode::Space,
            Action::Walk => KeyCode::ShiftLeft,
        }
    }
}

/// Pointer button, numbered the way pointer events number them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Button 0, usually left
    Primary,
    /// Button 1, usually middle/wheel
    Auxiliary,
    /// Button 2, usually right
    Secondary,
    Other(u16),
}

impl PointerButton {
    pub fn from_index(index: u16) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }

    pub fn index(&self) -> u16 {
        match self {
            Self::Primary => 0,
            Self::Auxiliary => 1,
            Self::Secondary => 2,
            Self::Other(n) => *n,
        }
    }
}

/// Default key bindings, one key per action
pub fn default_bindings() -> Vec<(Action, KeyCode)> {
    Action::ALL
        .iter()
        .map(|action| (*action, action.default_key()))
        .collect()
}
