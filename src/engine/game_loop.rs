/// Tick timing for the controller
///
/// Implements a fixed timestep loop: each rendered frame yields zero or more
/// simulation ticks of `FIXED_TIMESTEP` seconds, stamped with the wall-clock
/// instant of the frame that produced them.
use std::time::{Duration, Instant};

/// Target simulation rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// One simulation step handed to every per-tick update
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Wall-clock time of the frame this tick belongs to
    pub now: Instant,
    /// Elapsed simulation time in seconds
    pub dt: f32,
    /// Monotonic tick counter
    pub index: u64,
}

impl Tick {
    /// Build a tick by hand (hosts with their own loop, tests)
    pub fn new(now: Instant, dt: f32, index: u64) -> Self {
        Self { now, dt, index }
    }
}

/// Fixed timestep loop state
pub struct GameLoop {
    /// Accumulated time not yet consumed by ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether simulation is paused
    paused: bool,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    frame_count: u64,
    tick_count: u64,
    current_fps: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a loop whose first frame is measured from `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: start,
            paused: false,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            tick_count: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame now, returning the ticks to run
    pub fn begin_frame(&mut self) -> Vec<Tick> {
        self.begin_frame_at(Instant::now())
    }

    /// Begin a new frame at an explicit instant
    pub fn begin_frame_at(&mut self, now: Instant) -> Vec<Tick> {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        if self.paused {
            return Vec::new();
        }

        self.accumulator += frame_time;

        let mut ticks = Vec::new();
        while self.accumulator >= FIXED_TIMESTEP_DURATION
            && (ticks.len() as u32) < MAX_TICKS_PER_FRAME
        {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks.push(Tick::new(now, FIXED_TIMESTEP, self.tick_count));
            self.tick_count += 1;
        }

        // Drop the backlog instead of replaying it next frame
        if self.accumulator >= FIXED_TIMESTEP_DURATION {
            self.accumulator = Duration::ZERO;
        }

        ticks
    }

    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
