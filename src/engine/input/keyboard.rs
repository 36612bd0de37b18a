// Held-key tracking for character controls

use super::action::{Action, PointerButton};
use super::config::KeyBindings;
use super::event::{EventKind, InputEvent, PointerEvent};
use super::registry::EventRegistry;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Subscription key used by the keyboard/mouse tracker
pub const CHARACTER_CONTROLS_KEY: &str = "character-controls";

/// Snapshot of logical inputs for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub walk: bool,
    pub is_mouse_looking: bool,
}

impl InputState {
    /// Check if any directional key is held
    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        match action {
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Jump => self.jump,
            Action::Walk => self.walk,
        }
    }
}

/// Tracks which bound keys are held and whether the mouse-look button is down
#[derive(Debug, Clone)]
pub struct KeyboardMouseInput {
    bindings: KeyBindings,
    pressed: HashSet<Action>,
    mouse_look_button: PointerButton,
    is_mouse_looking: bool,
}

impl KeyboardMouseInput {
    pub fn new(bindings: KeyBindings, mouse_look_button: PointerButton) -> Self {
        Self {
            bindings,
            pressed: HashSet::new(),
            mouse_look_button,
            is_mouse_looking: false,
        }
    }

    /// Register a key press. Auto-repeat presses change nothing.
    pub fn key_down(&mut self, key: KeyCode) {
        if let Some(action) = self.bindings.action_for(key) {
            if self.pressed.insert(action) {
                log::trace!("Pressed {}", action.name());
            }
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        if let Some(action) = self.bindings.action_for(key) {
            self.pressed.remove(&action);
        }
    }

    pub fn pointer_down(&mut self, pointer: &PointerEvent) {
        if pointer.button == Some(self.mouse_look_button) {
            self.is_mouse_looking = true;
        }
    }

    pub fn pointer_up(&mut self, pointer: &PointerEvent) {
        if pointer.button == Some(self.mouse_look_button) {
            self.is_mouse_looking = false;
        }
    }

    /// Apply a single event to the tracker
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, .. } => self.key_down(*key),
            InputEvent::KeyUp { key } => self.key_up(*key),
            InputEvent::PointerDown(pointer) => self.pointer_down(pointer),
            InputEvent::PointerUp(pointer) => self.pointer_up(pointer),
            _ => {}
        }
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn is_mouse_looking(&self) -> bool {
        self.is_mouse_looking
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Build the per-tick input snapshot
    pub fn snapshot(&self) -> InputState {
        InputState {
            up: self.is_pressed(Action::Up),
            down: self.is_pressed(Action::Down),
            left: self.is_pressed(Action::Left),
            right: self.is_pressed(Action::Right),
            jump: self.is_pressed(Action::Jump),
            walk: self.is_pressed(Action::Walk),
            is_mouse_looking: self.is_mouse_looking,
        }
    }

    /// Release everything, e.g. after the window loses focus
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.is_mouse_looking = false;
    }

    /// Subscribe the tracker's handlers on `registry`
    pub fn register<S: AsMut<KeyboardMouseInput> + 'static>(registry: &mut EventRegistry<S>) {
        for kind in Self::EVENT_KINDS {
            registry.subscribe(kind, CHARACTER_CONTROLS_KEY, |target: &mut S, event| {
                target.as_mut().handle_event(event)
            });
        }
    }

    pub fn unregister<S>(registry: &mut EventRegistry<S>) {
        for kind in Self::EVENT_KINDS {
            registry.unsubscribe(kind, CHARACTER_CONTROLS_KEY);
        }
    }

    const EVENT_KINDS: [EventKind; 4] = [
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::PointerDown,
        EventKind::PointerUp,
    ];
}

impl Default for KeyboardMouseInput {
    fn default() -> Self {
        Self::new(KeyBindings::default(), PointerButton::Secondary)
    }
}

impl AsMut<KeyboardMouseInput> for KeyboardMouseInput {
    fn as_mut(&mut self) -> &mut KeyboardMouseInput {
        self
    }
}
