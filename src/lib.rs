//! Third-person character controller.
//!
//! Turns keyboard, mouse and touch input into character locomotion, a
//! blended animation state and a collision-aware orbit camera, kept in
//! step with a physics body once per tick.

pub mod core;
pub mod engine;
pub mod game;

pub use game::{ControllerConfig, ControllerError, FrameOutput, ThirdPersonController};
