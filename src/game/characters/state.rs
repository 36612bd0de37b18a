// Character state machine

use crate::engine::input::InputState;
use crate::engine::timer::Timers;
use log::{debug, trace};
use std::time::{Duration, Instant};

/// Time spent in the jump animation before the character counts as airborne
pub const JUMP_TO_AIR_DELAY: Duration = Duration::from_millis(200);

/// Animation a character can be in. Each name maps to one loaded clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationName {
    #[default]
    Idle,
    Walk,
    Run,
    Jump,
    Landing,
    InAir,
    Backpedal,
    TurnLeft,
    TurnRight,
    StrafeLeft,
    StrafeRight,
}

impl AnimationName {
    pub const ALL: [Self; 11] = [
        Self::Idle,
        Self::Walk,
        Self::Run,
        Self::Jump,
        Self::Landing,
        Self::InAir,
        Self::Backpedal,
        Self::TurnLeft,
        Self::TurnRight,
        Self::StrafeLeft,
        Self::StrafeRight,
    ];

    /// Clip name used by asset files and hosts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Landing => "landing",
            Self::InAir => "inAir",
            Self::Backpedal => "backpedal",
            Self::TurnLeft => "turnLeft",
            Self::TurnRight => "turnRight",
            Self::StrafeLeft => "strafeLeft",
            Self::StrafeRight => "strafeRight",
        }
    }

    /// Exact match against the clip vocabulary
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == name)
    }

    /// Parse a clip name; unknown names fall back to idle
    pub fn from_name(name: &str) -> Self {
        match Self::parse(name) {
            Some(animation) => animation,
            None => {
                debug!("Unknown animation '{}', using idle", name);
                Self::Idle
            }
        }
    }

    /// Plays once and holds its last frame
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Self::Jump | Self::Landing)
    }

    /// Animation picked from held direction keys alone
    pub fn locomotion(input: &InputState) -> Self {
        if input.up && !input.down {
            Self::Run
        } else if input.down && !input.up {
            Self::Backpedal
        } else if input.left && !input.right {
            if input.is_mouse_looking {
                Self::StrafeLeft
            } else {
                Self::TurnLeft
            }
        } else if input.right && !input.left {
            if input.is_mouse_looking {
                Self::StrafeRight
            } else {
                Self::TurnRight
            }
        } else {
            Self::Idle
        }
    }
}

/// Snapshot of the character's animation state. At most one of the
/// jump, air and landing flags is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterState {
    pub animation: AnimationName,
    pub is_jumping: bool,
    pub in_air: bool,
    pub is_landing: bool,
    pub is_moving: bool,
}

impl CharacterState {
    /// Locomotion selection only runs while this holds
    pub fn accepts_locomotion(&self) -> bool {
        !self.is_jumping && !self.in_air
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateTimer {
    JumpToAir,
}

/// State machine that turns input and ground probes into animation state
#[derive(Debug)]
pub struct CharacterStateMachine {
    state: CharacterState,
    previous_jump: bool,
    landed: bool,
    timers: Timers<StateTimer>,
}

impl Default for CharacterStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterStateMachine {
    pub fn new() -> Self {
        Self {
            state: CharacterState::default(),
            previous_jump: false,
            landed: false,
            timers: Timers::new(),
        }
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn animation(&self) -> AnimationName {
        self.state.animation
    }

    /// Ground contact seen since the last jump press
    pub fn has_landed(&self) -> bool {
        self.landed
    }

    /// Advance one tick.
    ///
    /// `ground_hit` is the result of the short downward probe under the
    /// character. `animation_finished` reports that the current one-shot
    /// clip completed since the previous tick. Returns the new animation
    /// when it changed.
    pub fn update(
        &mut self,
        input: &InputState,
        ground_hit: bool,
        animation_finished: bool,
        now: Instant,
    ) -> Option<AnimationName> {
        let before = self.state.animation;

        for timer in self.timers.poll(now) {
            match timer {
                StateTimer::JumpToAir if self.state.is_jumping => {
                    trace!("Jump became airborne");
                    self.state.is_jumping = false;
                    self.state.in_air = true;
                    self.state.animation = AnimationName::InAir;
                }
                StateTimer::JumpToAir => {}
            }
        }

        if animation_finished {
            self.timers.cancel(StateTimer::JumpToAir);
            self.state.animation = AnimationName::Idle;
            self.state.is_jumping = false;
            self.state.in_air = false;
            self.state.is_landing = false;
        }

        let jump_edge = input.jump && !self.previous_jump;
        if jump_edge {
            self.landed = false;
        }
        if ground_hit {
            self.landed = true;
        }

        if self.state.in_air && self.landed {
            self.state.in_air = false;
            self.state.is_landing = true;
            self.state.animation = AnimationName::Landing;
        }

        if self.state.accepts_locomotion() {
            self.select(input, jump_edge, now);
        }

        self.state.is_moving = input.any_direction();
        self.previous_jump = input.jump;

        let after = self.state.animation;
        if after != before {
            debug!("Animation {} -> {}", before.as_str(), after.as_str());
            Some(after)
        } else {
            None
        }
    }

    fn select(&mut self, input: &InputState, jump_edge: bool, now: Instant) {
        let (animation, is_jumping) = if jump_edge {
            (AnimationName::Jump, true)
        } else {
            (AnimationName::locomotion(input), false)
        };

        // Landing plays out unless the player asks for something else
        if self.state.is_landing && animation == AnimationName::Idle {
            return;
        }

        self.state.is_landing = false;
        self.state.animation = animation;
        if is_jumping {
            self.state.is_jumping = true;
            self.timers.schedule(StateTimer::JumpToAir, now, JUMP_TO_AIR_DELAY);
        }
    }

    /// Drop pending timers and return to idle
    pub fn reset(&mut self) {
        self.timers.clear();
        self.state = CharacterState::default();
        self.previous_jump = false;
        self.landed = false;
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}
