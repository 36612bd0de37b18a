use anyhow::Result;
use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use std::time::Instant;
use third_person_controls::engine::assets::{ClipData, ClipLoadReport, ClipPaths, InMemoryClipSource};
use third_person_controls::engine::camera::PlatformRequest;
use third_person_controls::engine::game_loop::GameLoop;
use third_person_controls::engine::input::{InputEvent, WinitTranslator};
use third_person_controls::engine::physics::PhysicsWorld;
use third_person_controls::game::characters::AnimationName;
use third_person_controls::game::{CharacterProxy, ControllerConfig, ThirdPersonController};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{CursorGrabMode, Window, WindowBuilder},
};

const ARENA_HALF_SIZE: f32 = 20.0;
const WALL_HEIGHT: f32 = 2.0;

/// Floor and four walls, all level geometry
fn build_arena() -> PhysicsWorld {
    let mut physics = PhysicsWorld::with_gravity(Vec3::new(0.0, -35.0, 0.0));
    physics.add_environment_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(ARENA_HALF_SIZE, 0.5, ARENA_HALF_SIZE),
    );

    let half = ARENA_HALF_SIZE;
    for (center, extents) in [
        (Vec3::new(half, WALL_HEIGHT, 0.0), Vec3::new(0.5, WALL_HEIGHT, half)),
        (Vec3::new(-half, WALL_HEIGHT, 0.0), Vec3::new(0.5, WALL_HEIGHT, half)),
        (Vec3::new(0.0, WALL_HEIGHT, half), Vec3::new(half, WALL_HEIGHT, 0.5)),
        (Vec3::new(0.0, WALL_HEIGHT, -half), Vec3::new(half, WALL_HEIGHT, 0.5)),
    ] {
        physics.add_environment_box(center, extents);
    }
    physics
}

/// Stand-in clips so the blender has something to play
fn demo_clips() -> (InMemoryClipSource, ClipPaths) {
    let mut source = InMemoryClipSource::new();
    let mut paths = ClipPaths::new();
    for name in AnimationName::ALL {
        let path = format!("anims/{}.glb", name.as_str());
        let duration = if name.is_one_shot() { 0.6 } else { 1.2 };
        source.insert(&path, vec![ClipData::new("Take 001", duration)]);
        paths.insert(name.as_str(), path);
    }
    (source, paths)
}

/// Apply a controller side effect to the window.
/// Returns the lock outcome the controller should hear about, if any.
fn apply_request(window: &Window, request: PlatformRequest) -> Option<InputEvent> {
    match request {
        PlatformRequest::RequestPointerLock => {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            match grabbed {
                Ok(()) => Some(InputEvent::PointerLockChange { locked: true }),
                Err(e) => {
                    warn!("Pointer lock unavailable: {}", e);
                    Some(InputEvent::PointerLockError)
                }
            }
        }
        PlatformRequest::ExitPointerLock => {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Failed to release cursor: {}", e);
            }
            Some(InputEvent::PointerLockChange { locked: false })
        }
        PlatformRequest::HideCursor => {
            window.set_cursor_visible(false);
            None
        }
        PlatformRequest::RestoreCursor => {
            window.set_cursor_visible(true);
            None
        }
        // winit already routes pointer events to the focused window
        PlatformRequest::CapturePointer(_)
        | PlatformRequest::ReleasePointer(_)
        | PlatformRequest::SuppressContextMenu => None,
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting third-person demo...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Third-Person Controls")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut physics = build_arena();
    let (mut clips, clip_paths) = demo_clips();
    let size = window.inner_size();
    let config = ControllerConfig {
        character: Some(CharacterProxy::new("hero")),
        spawn: Vec3::new(0.0, 1.0, 0.0),
        clip_paths,
        viewport: Vec2::new(size.width as f32, size.height as f32),
        on_load: Some(Box::new(|report: &ClipLoadReport| {
            for (name, error) in &report.failures {
                warn!("Clip '{}' unavailable: {}", name, error);
            }
        })),
        ..Default::default()
    };
    let mut controller = ThirdPersonController::attach(config, &mut physics, &mut clips)?;

    let mut translator = WinitTranslator::new();
    let mut game_loop = GameLoop::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                match controller.detach(&mut physics) {
                    Ok(requests) => {
                        for request in requests {
                            apply_request(&window, request);
                        }
                    }
                    Err(e) => warn!("{}", e),
                }
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(physical_size),
                ..
            } => {
                info!("Window resized to {:?}", physical_size);
                controller.resize(physical_size.width as f32, physical_size.height as f32);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                let unlocked = InputEvent::PointerLockChange { locked: false };
                controller.handle_event(&unlocked, Instant::now());
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                for tick in game_loop.begin_frame() {
                    physics.step();
                    let frame = match controller.update(&mut physics, tick) {
                        Ok(frame) => frame,
                        Err(e) => {
                            debug!("Skipping tick: {}", e);
                            continue;
                        }
                    };

                    if let Some(animation) = frame.animation_changed {
                        info!("Animation: {}", animation.as_str());
                    }
                    for request in frame.requests {
                        if let Some(reply) = apply_request(&window, request) {
                            controller.handle_event(&reply, tick.now);
                        }
                    }
                }
            }
            Event::WindowEvent { event, .. } => {
                let now = Instant::now();
                for input in translator.translate_window_event(&event) {
                    controller.handle_event(&input, now);
                }
            }
            Event::DeviceEvent { event, .. } => {
                if let Some(input) = translator.translate_device_event(&event) {
                    controller.handle_event(&input, Instant::now());
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
