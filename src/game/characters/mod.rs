// Character system
//
// This module contains everything that drives the controlled character:
// - Props used to build its body and pick its speed
// - Movement resolution from held keys
// - State machine choosing the animation
// - Animation blending between loaded clips
// - Physics sync with the dynamics engine

pub mod animation;
pub mod movement;
pub mod state;
pub mod stats;
pub mod sync;

// Re-export commonly used types
pub use animation::{AnimationBlender, ClipAction, LoopMode, CROSSFADE_SECONDS};
pub use movement::{resolve as resolve_movement, MovementResolution};
pub use state::{AnimationName, CharacterState, CharacterStateMachine, JUMP_TO_AIR_DELAY};
pub use stats::{CharacterProps, BASE_PROPS};
pub use sync::{resolve_velocity, PhysicsSyncBridge, JUMP_IMPULSE};
