// Character animation blending

use super::state::AnimationName;
use crate::engine::assets::ClipData;
use std::collections::HashMap;

/// Cross-fade length between two animations, in seconds
pub const CROSSFADE_SECONDS: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Repeat,
    /// Play once; with clamping the last frame is held
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Fade {
    fn weight(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: ClipData,
    loop_mode: LoopMode,
    clamp_when_finished: bool,
    time: f32,
    weight: f32,
    fade: Option<Fade>,
    playing: bool,
    finished: bool,
}

impl ClipAction {
    fn new(clip: ClipData) -> Self {
        let one_shot = AnimationName::from_name(&clip.name).is_one_shot();
        Self {
            clip,
            loop_mode: if one_shot { LoopMode::Once } else { LoopMode::Repeat },
            clamp_when_finished: one_shot,
            time: 0.0,
            weight: 0.0,
            fade: None,
            playing: false,
            finished: false,
        }
    }

    /// Rewind to the first frame
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.finished = false;
        self.fade = None;
        self
    }

    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            duration,
            elapsed: 0.0,
        });
        self.weight = 0.0;
        self
    }

    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Fade {
            from: self.weight,
            to: 0.0,
            duration,
            elapsed: 0.0,
        });
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.playing = true;
        self
    }

    /// Advance playback; returns true on the tick a one-shot completes
    fn advance(&mut self, dt: f32) -> bool {
        if !self.playing {
            return false;
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            self.weight = fade.weight();
            if fade.is_done() {
                let faded_out = fade.to == 0.0;
                self.fade = None;
                if faded_out {
                    self.playing = false;
                    return false;
                }
            }
        }

        if self.finished {
            return false;
        }

        self.time += dt;
        let duration = self.clip.duration;
        match self.loop_mode {
            LoopMode::Repeat => {
                if duration > 0.0 {
                    self.time %= duration;
                } else {
                    self.time = 0.0;
                }
                false
            }
            LoopMode::Once => {
                if self.time < duration {
                    return false;
                }
                self.time = duration;
                self.finished = true;
                if !self.clamp_when_finished {
                    self.playing = false;
                    self.weight = 0.0;
                }
                true
            }
        }
    }

    pub fn clip(&self) -> &ClipData {
        &self.clip
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn clamps_when_finished(&self) -> bool {
        self.clamp_when_finished
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Cross-fades between named clips.
///
/// Actions are built lazily from the clip set the first time a name is
/// played, then cached until the clip set changes. Names without a clip
/// are no-ops.
#[derive(Debug, Default)]
pub struct AnimationBlender {
    clips: HashMap<AnimationName, ClipData>,
    actions: HashMap<AnimationName, ClipAction>,
    current: Option<AnimationName>,
    finished: bool,
}

impl AnimationBlender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clips(clips: Vec<ClipData>) -> Self {
        let mut blender = Self::new();
        blender.set_clips(clips);
        blender
    }

    /// Replace the clip set. Cached actions are dropped and the current
    /// animation restarts on the new clips.
    pub fn set_clips(&mut self, clips: Vec<ClipData>) {
        self.clips = clips
            .into_iter()
            .filter_map(|clip| match AnimationName::parse(&clip.name) {
                Some(name) => Some((name, clip)),
                None => {
                    log::warn!("Ignoring clip '{}' outside the animation set", clip.name);
                    None
                }
            })
            .collect();
        if !self.actions.is_empty() {
            log::debug!("Clip set changed, dropping {} cached actions", self.actions.len());
        }
        self.actions.clear();
        self.finished = false;

        if let Some(current) = self.current {
            self.start(current);
        }
    }

    pub fn has_clip(&self, name: AnimationName) -> bool {
        self.clips.contains_key(&name)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn cached_action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn current(&self) -> Option<AnimationName> {
        self.current
    }

    pub fn action(&self, name: AnimationName) -> Option<&ClipAction> {
        self.actions.get(&name)
    }

    fn action_mut(&mut self, name: AnimationName) -> Option<&mut ClipAction> {
        if !self.actions.contains_key(&name) {
            let clip = self.clips.get(&name)?.clone();
            self.actions.insert(name, ClipAction::new(clip));
        }
        self.actions.get_mut(&name)
    }

    fn start(&mut self, name: AnimationName) {
        if let Some(action) = self.action_mut(name) {
            action.reset().fade_in(CROSSFADE_SECONDS).play();
        }
    }

    /// Fade from the current animation to `to`. Same name is a no-op.
    pub fn transition(&mut self, to: AnimationName) {
        if self.current == Some(to) {
            return;
        }

        if let Some(previous) = self.current {
            if let Some(action) = self.action_mut(previous) {
                action.fade_out(CROSSFADE_SECONDS);
            }
        }

        self.current = Some(to);
        self.finished = false;
        self.start(to);
    }

    /// Advance every active action
    pub fn update(&mut self, dt: f32) {
        let current = self.current;
        for (name, action) in self.actions.iter_mut() {
            if action.advance(dt) && Some(*name) == current {
                self.finished = true;
            }
        }
    }

    /// Whether the current one-shot completed since the last call
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }

    /// Non-zero weights, in name order
    pub fn weights(&self) -> Vec<(AnimationName, f32)> {
        AnimationName::ALL
            .iter()
            .filter_map(|name| {
                self.actions
                    .get(name)
                    .filter(|action| action.is_playing() && action.weight() > 0.0)
                    .map(|action| (*name, action.weight()))
            })
            .collect()
    }

    /// Drop cached actions and playback state; clips are kept
    pub fn clear(&mut self) {
        self.actions.clear();
        self.current = None;
        self.finished = false;
    }
}
