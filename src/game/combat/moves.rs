// Move definitions - immutable authored data for one attack

use serde::Deserialize;

use crate::core::math::{clamp, clamp01, in_window};
use crate::engine::assets::SoundHandle;

use super::curve::MotionCurve;
use super::extractor::{extract_forward_motion, ClipChannels, SampleMode};

/// Which physical hitbox a move switches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum HitboxType {
    /// Punches
    #[default]
    Fist,
    /// Kicks
    Foot,
    Katana,
    Nunchaku,
    /// Long reach bo staff
    Staff,
    Shuriken,
    /// Smoke bombs and other special items
    Utility,
}

/// How a struck target should flinch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum HitReaction {
    #[default]
    LightHigh,
    LightLow,
    HeavyBack,
}

/// Reference to a clip owned by the animation engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipRef {
    pub name: String,
    /// Clip length in seconds
    pub length: f32,
    /// Authored sample rate (frames per second)
    #[serde(default = "ClipRef::default_frame_rate")]
    pub frame_rate: f32,
}

impl ClipRef {
    pub fn new(name: &str, length: f32, frame_rate: f32) -> Self {
        Self {
            name: name.to_string(),
            length,
            frame_rate,
        }
    }

    fn default_frame_rate() -> f32 {
        30.0
    }
}

/// Sound fired once when playback passes `trigger`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AudioCue {
    /// Progress fraction in [0, 1]
    pub trigger: f32,
    pub sound: SoundHandle,
}

impl AudioCue {
    pub fn new(trigger: f32, sound: SoundHandle) -> Self {
        Self { trigger, sound }
    }
}

/// One authored attack.
///
/// Windows are progress fractions of the bound clip. The motion curve is in
/// absolute clip seconds. All bounds are corrected by [`MoveDefinition::validate`]
/// at authoring time; the controller trusts them afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MoveDefinition {
    /// Display name (auto-filled from the clip when empty)
    pub name: String,
    /// Clip to play; a move without one never activates
    pub clip: Option<ClipRef>,

    // Combat stats
    pub damage: f32,
    /// Heavy attacks slow the actor instead of rooting it
    pub is_heavy: bool,
    pub hitbox_type: HitboxType,
    pub reaction: HitReaction,

    // Hitbox window
    pub hit_start: f32,
    pub hit_end: f32,

    // Combo window
    pub can_combo: bool,
    pub combo_start: f32,
    pub combo_end: f32,

    /// Rotation is allowed while progress is below this fraction
    pub rotation_allowance_end: f32,

    // Root motion
    pub motion: MotionCurve,
    pub motion_scale: f32,

    pub audio_cues: Vec<AudioCue>,
}

impl Default for MoveDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            clip: None,
            damage: 10.0,
            is_heavy: false,
            hitbox_type: HitboxType::Fist,
            reaction: HitReaction::LightHigh,
            hit_start: 0.25,
            hit_end: 0.45,
            can_combo: true,
            combo_start: 0.55,
            combo_end: 0.85,
            rotation_allowance_end: 0.0,
            motion: MotionCurve::empty(),
            motion_scale: 1.0,
            audio_cues: Vec::new(),
        }
    }
}

impl MoveDefinition {
    /// Create a move bound to `clip` with default windows
    pub fn new(name: &str, clip: ClipRef) -> Self {
        Self {
            name: name.to_string(),
            clip: Some(clip),
            ..Self::default()
        }
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn heavy(mut self) -> Self {
        self.is_heavy = true;
        self
    }

    pub fn with_hitbox(mut self, hitbox_type: HitboxType, reaction: HitReaction) -> Self {
        self.hitbox_type = hitbox_type;
        self.reaction = reaction;
        self
    }

    pub fn with_hit_window(mut self, start: f32, end: f32) -> Self {
        self.hit_start = start;
        self.hit_end = end;
        self
    }

    pub fn with_combo_window(mut self, start: f32, end: f32) -> Self {
        self.can_combo = true;
        self.combo_start = start;
        self.combo_end = end;
        self
    }

    pub fn without_combo(mut self) -> Self {
        self.can_combo = false;
        self.combo_start = 1.0;
        self.combo_end = 1.0;
        self
    }

    pub fn with_rotation_until(mut self, progress: f32) -> Self {
        self.rotation_allowance_end = progress;
        self
    }

    pub fn with_motion(mut self, motion: MotionCurve, scale: f32) -> Self {
        self.motion = motion;
        self.motion_scale = scale;
        self
    }

    pub fn with_audio_cue(mut self, trigger: f32, sound: SoundHandle) -> Self {
        self.audio_cues.push(AudioCue::new(trigger, sound));
        self
    }

    /// Clip length in seconds, 0 without a clip
    pub fn duration(&self) -> f32 {
        self.clip.as_ref().map_or(0.0, |clip| clip.length)
    }

    /// Absolute time (seconds) the hitbox opens
    pub fn hit_start_time(&self) -> f32 {
        self.hit_start * self.duration()
    }

    /// Absolute time (seconds) the hitbox closes
    pub fn hit_end_time(&self) -> f32 {
        self.hit_end * self.duration()
    }

    /// Absolute time (seconds) the combo window opens
    pub fn combo_start_time(&self) -> f32 {
        self.combo_start * self.duration()
    }

    /// Absolute time (seconds) the combo window closes
    pub fn combo_end_time(&self) -> f32 {
        self.combo_end * self.duration()
    }

    pub fn is_in_hit_window(&self, progress: f32) -> bool {
        in_window(progress, self.hit_start, self.hit_end)
    }

    pub fn is_in_combo_window(&self, progress: f32) -> bool {
        self.can_combo && in_window(progress, self.combo_start, self.combo_end)
    }

    pub fn can_rotate(&self, progress: f32) -> bool {
        progress < self.rotation_allowance_end
    }

    /// Scaled planar distance covered between two progress fractions
    pub fn motion_delta(&self, from_progress: f32, to_progress: f32) -> f32 {
        self.motion.delta(from_progress, to_progress, self.duration()) * self.motion_scale
    }

    /// Authoring-time correction of names, windows and cues.
    ///
    /// Returns `true` if anything was changed.
    pub fn validate(&mut self) -> bool {
        let before = self.clone();

        if self.name.is_empty() {
            if let Some(clip) = &self.clip {
                self.name = clip.name.clone();
            }
        }

        self.hit_start = clamp01(self.hit_start);
        self.hit_end = clamp(self.hit_end, self.hit_start, 1.0);

        self.combo_start = clamp01(self.combo_start);
        self.combo_end = clamp(self.combo_end, self.combo_start, 1.0);

        // (1, 1) is the one disabled form; (0, 0) is an authoring shorthand for it
        let zero_window = self.combo_start == 0.0 && self.combo_end == 0.0;
        if !self.can_combo || zero_window {
            self.combo_start = 1.0;
            self.combo_end = 1.0;
        }

        self.rotation_allowance_end = clamp01(self.rotation_allowance_end);
        if self.motion_scale < 0.0 {
            self.motion_scale = 0.0;
        }
        if self.motion.make_nondecreasing() {
            log::warn!("Move '{}' has a decreasing motion curve, flattened", self.name);
        }

        for cue in &mut self.audio_cues {
            cue.trigger = clamp01(cue.trigger);
        }
        self.audio_cues
            .sort_by(|a, b| a.trigger.total_cmp(&b.trigger));

        let changed = *self != before;
        if changed {
            log::debug!("Move '{}' corrected during validation", self.name);
        }
        changed
    }

    /// Bake the root-motion curve from a clip's channel data
    pub fn bake_motion(&mut self, channels: &ClipChannels, mode: SampleMode) {
        self.motion = extract_forward_motion(channels, mode);
        if self.clip.is_none() {
            self.clip = Some(ClipRef::new(
                &channels.name,
                channels.length,
                channels.frame_rate,
            ));
        }
    }
}
