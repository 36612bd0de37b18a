// Input handling system
//
// Device events are delivered by the host and routed through an explicit
// subscription registry owned by the controller. Handlers only touch
// lightweight state (held keys, tracked pointers); the tick reads a snapshot.
//
// ## Architecture
//
// - `action`: Logical actions, pointer buttons and default key bindings
// - `config`: Key bindings with user overrides merged over defaults
// - `event`: Platform-neutral event vocabulary
// - `registry`: Keyed subscriptions per event kind
// - `keyboard`: Held-key tracker producing the per-tick `InputState`
// - `platform`: winit event translation
//
// ## Usage Example
//
// ```rust
// use third_person_controls::engine::input::{EventRegistry, KeyboardMouseInput};
//
// let mut registry = EventRegistry::<KeyboardMouseInput>::new();
// KeyboardMouseInput::register(&mut registry);
//
// // In your event loop, dispatch translated events
// let mut input = KeyboardMouseInput::default();
// for event in translator.translate_window_event(&window_event) {
//     registry.dispatch(&mut input, &event);
// }
//
// // Once per tick
// let state = input.snapshot();
// ```

pub mod action;
pub mod config;
pub mod event;
pub mod keyboard;
pub mod platform;
pub mod registry;

// Re-export commonly used types
pub use action::{Action, PointerButton};
pub use config::KeyBindings;
pub use event::{EventKind, InputEvent, PointerEvent, PointerKind, MOUSE_POINTER_ID};
pub use keyboard::{InputState, KeyboardMouseInput};
pub use platform::WinitTranslator;
pub use registry::{EventClock, EventRegistry};
