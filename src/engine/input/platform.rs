// Translation from winit window/device events into controller input events

use super::action::PointerButton;
use super::event::{InputEvent, PointerEvent};
use glam::Vec2;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, Touch, TouchPhase,
    WindowEvent,
};
use winit::keyboard::PhysicalKey;

/// Stateful translator; remembers the cursor position so button events
/// carry coordinates the way pointer events do
#[derive(Debug, Default)]
pub struct WinitTranslator {
    cursor: Vec2,
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in surface pixels
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Translate a window event. Some events map to several input events
    /// (a secondary press also raises a context-menu request).
    pub fn translate_window_event(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => Self::translate_key(event)
                .into_iter()
                .collect(),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = Self::translate_button(*button);
                let pointer = PointerEvent::mouse(button, self.cursor);
                match state {
                    ElementState::Pressed if button == PointerButton::Secondary => {
                        vec![InputEvent::PointerDown(pointer), InputEvent::ContextMenu]
                    }
                    ElementState::Pressed => vec![InputEvent::PointerDown(pointer)],
                    ElementState::Released => vec![InputEvent::PointerUp(pointer)],
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                vec![InputEvent::PointerMove(PointerEvent::mouse_move(
                    self.cursor,
                    Vec2::ZERO,
                ))]
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports positive y for scrolling up; wheel events use positive for down
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                if delta_y == 0.0 {
                    Vec::new()
                } else {
                    vec![InputEvent::Wheel { delta_y }]
                }
            }
            WindowEvent::Touch(touch) => vec![Self::translate_touch(touch)],
            _ => Vec::new(),
        }
    }

    /// Translate a raw device event; only relative mouse motion is used
    pub fn translate_device_event(&self, event: &DeviceEvent) -> Option<InputEvent> {
        match event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(InputEvent::PointerMove(
                PointerEvent::mouse_move(self.cursor, Vec2::new(*dx as f32, *dy as f32)),
            )),
            _ => None,
        }
    }

    fn translate_key(event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(key) = event.physical_key else {
            return None;
        };

        Some(match event.state {
            ElementState::Pressed => InputEvent::KeyDown {
                key,
                repeat: event.repeat,
            },
            ElementState::Released => InputEvent::KeyUp { key },
        })
    }

    fn translate_button(button: MouseButton) -> PointerButton {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Middle => PointerButton::Auxiliary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Back => PointerButton::Other(3),
            MouseButton::Forward => PointerButton::Other(4),
            MouseButton::Other(n) => PointerButton::Other(n),
        }
    }

    fn translate_touch(touch: &Touch) -> InputEvent {
        let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        let pointer = PointerEvent::touch(touch.id, position);
        match touch.phase {
            TouchPhase::Started => InputEvent::PointerDown(pointer),
            TouchPhase::Moved => InputEvent::PointerMove(pointer),
            TouchPhase::Ended => InputEvent::PointerUp(pointer),
            TouchPhase::Cancelled => InputEvent::PointerCancel(pointer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mapping() {
        assert_eq!(
            WinitTranslator::translate_button(MouseButton::Right),
            PointerButton::Secondary
        );
        assert_eq!(
            WinitTranslator::translate_button(MouseButton::Left),
            PointerButton::Primary
        );
        assert_eq!(
            WinitTranslator::translate_button(MouseButton::Other(9)),
            PointerButton::Other(9)
        );
    }

    #[test]
    fn test_mouse_motion_uses_cached_cursor() {
        let translator = WinitTranslator::new();
        let event = translator
            .translate_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -2.0) })
            .and_then(|e| e.pointer().copied());

        let pointer = event.expect("mouse motion should translate");
        assert_eq!(pointer.movement, Vec2::new(3.0, -2.0));
        assert_eq!(pointer.position, Vec2::ZERO);
    }
}
