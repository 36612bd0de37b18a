// Engine modules: input, physics, camera, timing, assets

pub mod assets;
pub mod camera;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod scene;
pub mod timer;
