// Device event vocabulary delivered by the host platform

use super::action::PointerButton;
use glam::Vec2;
use winit::keyboard::KeyCode;

/// Pointer id reported for the mouse. Touch ids are a separate space,
/// so pointers are told apart by [`PointerEvent::key`].
pub const MOUSE_POINTER_ID: u64 = 1;

/// Kinds of events handlers can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerUp,
    PointerMove,
    PointerCancel,
    Wheel,
    PointerLockChange,
    PointerLockError,
    ContextMenu,
}

/// Device class that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Payload shared by all pointer events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u64,
    pub kind: PointerKind,
    /// Button that changed state (down/up events only)
    pub button: Option<PointerButton>,
    /// Position in surface pixels
    pub position: Vec2,
    /// Raw relative motion since the last event, used while pointer-locked
    pub movement: Vec2,
}

impl PointerEvent {
    /// Mouse event with a button change
    pub fn mouse(button: PointerButton, position: Vec2) -> Self {
        Self {
            pointer_id: MOUSE_POINTER_ID,
            kind: PointerKind::Mouse,
            button: Some(button),
            position,
            movement: Vec2::ZERO,
        }
    }

    /// Mouse motion without a button change
    pub fn mouse_move(position: Vec2, movement: Vec2) -> Self {
        Self {
            pointer_id: MOUSE_POINTER_ID,
            kind: PointerKind::Mouse,
            button: None,
            position,
            movement,
        }
    }

    /// Touch contact
    pub fn touch(pointer_id: u64, position: Vec2) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            button: None,
            position,
            movement: Vec2::ZERO,
        }
    }

    pub fn is_touch(&self) -> bool {
        self.kind == PointerKind::Touch
    }

    /// Identity of the contact across down/move/up
    pub fn key(&self) -> (PointerKind, u64) {
        (self.kind, self.pointer_id)
    }
}

/// A single device event
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode, repeat: bool },
    KeyUp { key: KeyCode },
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    PointerMove(PointerEvent),
    PointerCancel(PointerEvent),
    /// Positive `delta_y` scrolls down, toward the user (zoom out)
    Wheel { delta_y: f32 },
    PointerLockChange { locked: bool },
    PointerLockError,
    ContextMenu,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::KeyDown { .. } => EventKind::KeyDown,
            InputEvent::KeyUp { .. } => EventKind::KeyUp,
            InputEvent::PointerDown(_) => EventKind::PointerDown,
            InputEvent::PointerUp(_) => EventKind::PointerUp,
            InputEvent::PointerMove(_) => EventKind::PointerMove,
            InputEvent::PointerCancel(_) => EventKind::PointerCancel,
            InputEvent::Wheel { .. } => EventKind::Wheel,
            InputEvent::PointerLockChange { .. } => EventKind::PointerLockChange,
            InputEvent::PointerLockError => EventKind::PointerLockError,
            InputEvent::ContextMenu => EventKind::ContextMenu,
        }
    }

    /// Pointer payload, if this is a pointer event
    pub fn pointer(&self) -> Option<&PointerEvent> {
        match self {
            InputEvent::PointerDown(p)
            | InputEvent::PointerUp(p)
            | InputEvent::PointerMove(p)
            | InputEvent::PointerCancel(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        assert_eq!(
            InputEvent::KeyDown {
                key: KeyCode::KeyW,
                repeat: false
            }
            .kind(),
            EventKind::KeyDown
        );
        assert_eq!(InputEvent::Wheel { delta_y: 1.0 }.kind(), EventKind::Wheel);
        assert_eq!(InputEvent::ContextMenu.kind(), EventKind::ContextMenu);
    }

    #[test]
    fn test_pointer_payload() {
        let down = InputEvent::PointerDown(PointerEvent::touch(7, Vec2::new(3.0, 4.0)));
        assert_eq!(down.pointer().map(|p| p.pointer_id), Some(7));
        assert!(InputEvent::PointerLockError.pointer().is_none());
    }

    #[test]
    fn test_mouse_constructor() {
        let p = PointerEvent::mouse(PointerButton::Secondary, Vec2::ZERO);
        assert_eq!(p.pointer_id, MOUSE_POINTER_ID);
        assert!(!p.is_touch());
    }

    #[test]
    fn test_touch_and_mouse_keys_differ_with_same_id() {
        let mouse = PointerEvent::mouse(PointerButton::Primary, Vec2::ZERO);
        let touch = PointerEvent::touch(MOUSE_POINTER_ID, Vec2::ZERO);
        assert_eq!(mouse.pointer_id, touch.pointer_id);
        assert_ne!(mouse.key(), touch.key());
    }
}
