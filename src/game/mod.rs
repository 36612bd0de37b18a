// Game logic: the controlled character and the controller that drives it

pub mod characters;
pub mod controller;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{
    CharacterProxy, ControllerConfig, ControllerError, EventTargets, FrameOutput, LoadCallback,
    ThirdPersonController,
};
