// Third-person controller: wires input, state, animation, camera and physics
// into one per-tick update

use super::characters::{
    movement, resolve_velocity, AnimationBlender, AnimationName, CharacterProps, CharacterState,
    CharacterStateMachine, PhysicsSyncBridge,
};
use crate::engine::assets::{load_clips, ClipLoadReport, ClipPaths, ClipSource};
use crate::engine::camera::{CameraOptions, CameraPose, OrbitCamera, PlatformRequest};
use crate::engine::game_loop::Tick;
use crate::engine::input::{
    Action, EventClock, EventRegistry, InputEvent, InputState, KeyBindings, KeyboardMouseInput,
    PointerButton,
};
use crate::engine::physics::{PhysicsEngine, RayFilter, RayHit, RayProbe};
use crate::engine::scene::Transform;
use glam::{Quat, Vec2, Vec3};
use log::info;
use std::f32::consts::PI;
use std::time::Instant;
use thiserror::Error;
use winit::keyboard::KeyCode;

/// Model yaw rate while a discrete turn key is held, in rad/s
pub const TURN_RATE: f32 = 3.0;

/// Per-tick slerp factor of the character mesh toward its target yaw
pub const MESH_TURN_FACTOR: f32 = 0.1;

/// Called once with the clip loading outcome
pub type LoadCallback = Box<dyn FnOnce(&ClipLoadReport)>;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("No character proxy was supplied")]
    MissingCharacterProxy,

    #[error("Controller is already detached")]
    AlreadyDetached,
}

/// The scene node the controller animates and turns
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterProxy {
    pub name: String,
    /// Transform relative to the model group
    pub transform: Transform,
}

impl CharacterProxy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
        }
    }
}

pub struct ControllerConfig {
    pub camera: CameraOptions,
    pub character: Option<CharacterProxy>,
    pub props: CharacterProps,
    /// World position of the model group at attach time
    pub spawn: Vec3,
    pub clip_paths: ClipPaths,
    pub key_overrides: Vec<(Action, KeyCode)>,
    pub mouse_look_button: PointerButton,
    /// Surface size in pixels
    pub viewport: Vec2,
    pub on_load: Option<LoadCallback>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            camera: CameraOptions::default(),
            character: None,
            props: CharacterProps::default(),
            spawn: Vec3::ZERO,
            clip_paths: ClipPaths::new(),
            key_overrides: Vec::new(),
            mouse_look_button: PointerButton::Secondary,
            viewport: Vec2::new(1280.0, 720.0),
            on_load: None,
        }
    }
}

/// State the event handlers are allowed to touch
#[derive(Debug)]
pub struct EventTargets {
    now: Instant,
    input: KeyboardMouseInput,
    camera: OrbitCamera,
}

impl EventTargets {
    pub fn input(&self) -> &KeyboardMouseInput {
        &self.input
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }
}

impl AsMut<KeyboardMouseInput> for EventTargets {
    fn as_mut(&mut self) -> &mut KeyboardMouseInput {
        &mut self.input
    }
}

impl AsMut<OrbitCamera> for EventTargets {
    fn as_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }
}

impl EventClock for EventTargets {
    fn now(&self) -> Instant {
        self.now
    }
}

/// Everything the host needs to draw and apply after one tick
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// World transform of the model group
    pub model: Transform,
    /// Character mesh transform relative to the model group
    pub character: Transform,
    pub camera: CameraPose,
    pub state: CharacterState,
    /// New animation when it changed this tick
    pub animation_changed: Option<AnimationName>,
    pub weights: Vec<(AnimationName, f32)>,
    pub requests: Vec<PlatformRequest>,
    pub grounded: bool,
}

/// Drives one character through a [`PhysicsEngine`].
///
/// The host forwards device events to `handle_event`, steps its physics
/// engine, then calls `update` once per tick.
pub struct ThirdPersonController<P: PhysicsEngine> {
    registry: EventRegistry<EventTargets>,
    targets: EventTargets,
    state_machine: CharacterStateMachine,
    blender: AnimationBlender,
    bridge: Option<PhysicsSyncBridge<P::BodyId>>,
    camera_probe: RayProbe,
    props: CharacterProps,
    model: Transform,
    character: CharacterProxy,
}

impl<P: PhysicsEngine> ThirdPersonController<P> {
    /// Build the controller, create the character body and load clips
    pub fn attach(
        mut config: ControllerConfig,
        physics: &mut P,
        clips: &mut dyn ClipSource,
    ) -> Result<Self, ControllerError> {
        let character = config
            .character
            .take()
            .ok_or(ControllerError::MissingCharacterProxy)?;

        let bindings = KeyBindings::with_overrides(&config.key_overrides);
        let mut registry = EventRegistry::new();
        KeyboardMouseInput::register(&mut registry);
        OrbitCamera::register(&mut registry);

        let targets = EventTargets {
            now: Instant::now(),
            input: KeyboardMouseInput::new(bindings, config.mouse_look_button),
            camera: OrbitCamera::new(config.camera, config.viewport),
        };

        let report = load_clips(clips, config.clip_paths.iter());
        let mut blender = AnimationBlender::with_clips(report.loaded.clone());
        blender.transition(AnimationName::Idle);
        if let Some(on_load) = config.on_load.take() {
            on_load(&report);
        }

        let model = Transform::from_yaw(config.spawn, PI);
        let bridge = PhysicsSyncBridge::attach(physics, &config.props, model);

        info!(
            "Attached controller to '{}' ({} clips)",
            character.name,
            blender.clip_count()
        );

        Ok(Self {
            registry,
            targets,
            state_machine: CharacterStateMachine::new(),
            blender,
            bridge: Some(bridge),
            camera_probe: RayProbe::new(),
            props: config.props,
            model,
            character,
        })
    }

    /// Route a device event to the subscribed handlers.
    /// Returns how many handlers ran.
    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) -> usize {
        self.targets.now = now;
        self.registry.dispatch(&mut self.targets, event)
    }

    /// Advance one tick
    pub fn update(&mut self, physics: &mut P, tick: Tick) -> Result<FrameOutput, ControllerError> {
        let bridge = self.bridge.as_mut().ok_or(ControllerError::AlreadyDetached)?;

        let feedback = bridge.pull(physics);
        self.model.position = feedback.position;

        let input = self.targets.input.snapshot();
        let resolution = movement::resolve(&input);
        let grounded = bridge.probe_ground(physics);

        let finished = self.blender.take_finished();
        let animation_changed = self.state_machine.update(&input, grounded, finished, tick.now);
        if let Some(animation) = animation_changed {
            self.blender.transition(animation);
        }
        self.blender.update(tick.dt);

        let state = self.state_machine.state();
        let mesh_target = if state.is_moving {
            self.model
                .rotate_y(f32::from(resolution.rotation_direction) * -TURN_RATE * tick.dt);
            Quat::from_rotation_y(resolution.model_yaw)
        } else {
            Quat::IDENTITY
        };
        let mesh = &mut self.character.transform;
        mesh.rotation = mesh.rotation.slerp(mesh_target, MESH_TURN_FACTOR).normalize();

        let speed = self.props.speed(input.down);
        let velocity = resolve_velocity(
            resolution.movement_direction,
            self.model.rotation,
            speed,
            feedback.velocity,
            state.animation,
        );
        bridge.push(physics, velocity, self.model.rotation);

        let camera = &mut self.targets.camera;
        let hit = if camera.options().collision_enabled {
            let filter = RayFilter::new(camera.options().collision_layer);
            physics.cast_closest(camera.anchor(&self.model), camera.desired_position(&self.model), filter)
        } else {
            RayHit::MISS
        };
        self.camera_probe.record(hit, tick.now);
        let pose = camera.update(&mut self.model, self.camera_probe.current(tick.now), tick.now);

        Ok(FrameOutput {
            model: self.model,
            character: self.character.transform,
            camera: pose,
            state,
            animation_changed,
            weights: self.blender.weights(),
            requests: camera.drain_requests(),
            grounded,
        })
    }

    /// Replace the clip set; cached actions are rebuilt on demand
    pub fn reload_clips(&mut self, clips: &mut dyn ClipSource, paths: &ClipPaths) -> ClipLoadReport {
        let report = load_clips(clips, paths.iter());
        self.blender.set_clips(report.loaded.clone());
        report
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.targets.camera.set_viewport(width, height);
    }

    /// Unsubscribe handlers, cancel timers and remove the body.
    /// Returns the cursor requests the host should still apply.
    pub fn detach(&mut self, physics: &mut P) -> Result<Vec<PlatformRequest>, ControllerError> {
        let bridge = self.bridge.take().ok_or(ControllerError::AlreadyDetached)?;

        self.registry.clear();
        self.state_machine.reset();
        self.blender.clear();
        self.camera_probe.clear();
        self.targets.input.reset();
        self.targets.camera.teardown();
        bridge.detach(physics);

        info!("Detached controller from '{}'", self.character.name);
        Ok(self.targets.camera.drain_requests())
    }

    pub fn is_attached(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn body(&self) -> Option<P::BodyId> {
        self.bridge.as_ref().map(|b| b.body())
    }

    pub fn state(&self) -> CharacterState {
        self.state_machine.state()
    }

    pub fn input_state(&self) -> InputState {
        self.targets.input.snapshot()
    }

    pub fn model(&self) -> &Transform {
        &self.model
    }

    pub fn character(&self) -> &CharacterProxy {
        &self.character
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.targets.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.targets.camera
    }

    pub fn blender(&self) -> &AnimationBlender {
        &self.blender
    }

    /// Host handlers share the registry with the controller's own
    pub fn registry_mut(&mut self) -> &mut EventRegistry<EventTargets> {
        &mut self.registry
    }
}
