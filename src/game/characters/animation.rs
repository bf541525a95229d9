// Clip playback for actors
//
// A headless stand-in for the animation engine: clips are plain durations,
// and the player reports an unwrapped progress fraction plus the logical
// state it is in.

use std::collections::HashMap;

use crate::game::combat::context::{AnimationDriver, PlaybackSample, PlaybackState};
use crate::game::combat::moves::ClipRef;

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Name of the clip (e.g., "idle", "punch_left", "hit_high")
    pub name: String,
    /// Length in seconds
    pub length: f32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(name: &str, length: f32, looping: bool) -> Self {
        Self {
            name: name.to_string(),
            length,
            looping,
        }
    }

    pub fn looping(name: &str, length: f32) -> Self {
        Self::new(name, length, true)
    }

    pub fn one_shot(name: &str, length: f32) -> Self {
        Self::new(name, length, false)
    }
}

/// Manages clip playback for one actor
#[derive(Debug)]
pub struct ClipPlayer {
    clips: HashMap<String, AnimationClip>,
    current: String,
    state: PlaybackState,
    /// Seconds since the current clip started
    elapsed: f32,
    playback_speed: f32,
    /// Clip to return to when a one-shot non-attack clip ends
    locomotion_clip: String,
}

impl Default for ClipPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipPlayer {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
            current: String::new(),
            state: PlaybackState::Locomotion,
            elapsed: 0.0,
            playback_speed: 1.0,
            locomotion_clip: "idle".to_string(),
        }
    }

    /// Player with the standard reaction clips every fighter carries
    pub fn with_standard_clips() -> Self {
        let mut player = Self::new();
        player.add_clip(AnimationClip::looping("idle", 1.0));
        player.add_clip(AnimationClip::looping("run", 0.8));
        player.add_clip(AnimationClip::one_shot("hit_high", 0.4));
        player.add_clip(AnimationClip::one_shot("hit_low", 0.4));
        player.add_clip(AnimationClip::one_shot("knockback", 0.9));
        player.add_clip(AnimationClip::one_shot("parry", 0.5));
        player.add_clip(AnimationClip::one_shot("death", 1.5));
        player.play("idle", PlaybackState::Locomotion);
        player
    }

    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Play `name` from the start in the given logical state
    pub fn play(&mut self, name: &str, state: PlaybackState) {
        self.current = name.to_string();
        self.state = state;
        self.elapsed = 0.0;
    }

    /// Return to locomotion unless dead
    pub fn play_locomotion(&mut self) {
        if self.state == PlaybackState::Dead {
            return;
        }
        let clip = self.locomotion_clip.clone();
        self.play(&clip, PlaybackState::Locomotion);
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed.max(0.0);
    }

    pub fn current_clip(&self) -> &str {
        &self.current
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Progress through the current clip. Non-looping clips hold at 1.0;
    /// looping clips report only the fractional part, so they wrap.
    pub fn progress(&self) -> f32 {
        let Some(clip) = self.clips.get(&self.current) else {
            return 0.0;
        };
        if clip.length <= 0.0 {
            return 1.0;
        }
        let raw = self.elapsed / clip.length;
        if clip.looping {
            raw.fract()
        } else {
            raw.min(1.0)
        }
    }

    /// Advance playback (called every fixed step)
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt * self.playback_speed;

        let finished = self
            .clips
            .get(&self.current)
            .is_some_and(|clip| !clip.looping && self.elapsed >= clip.length);

        // Reactions and parries hand back to locomotion. Attack clips stay at
        // 1.0 for the controller to see; it returns to locomotion afterwards.
        if finished && matches!(self.state, PlaybackState::HitReaction | PlaybackState::Parry) {
            self.play_locomotion();
        }
    }
}

impl AnimationDriver for ClipPlayer {
    fn sample(&self) -> PlaybackSample {
        PlaybackSample::new(self.progress(), self.state)
    }

    fn play_attack(&mut self, clip: &ClipRef) {
        if !self.has_clip(&clip.name) {
            self.add_clip(AnimationClip::one_shot(&clip.name, clip.length));
        }
        self.play(&clip.name, PlaybackState::Attacking);
    }
}
