// Collaborators the combat core drives but does not own
//
// Everything here is an interface. The arena wires concrete implementations
// (clip player, locomotion, physics world, cue recorder, health) and hands them
// to the controller explicitly on every call.

use glam::Vec2;

pub use crate::engine::audio::AudioSink;

use super::hitbox::HitboxVolume;
use super::moves::{ClipRef, HitReaction};

/// Which logical state the animation engine is currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    /// Idle / run blend, no combat clip
    #[default]
    Locomotion,
    /// The swappable attack slot
    Attacking,
    /// Flinch after taking a hit
    HitReaction,
    /// Ki parry pose
    Parry,
    Dead,
}

/// One tick's view of the animation engine, sampled exactly once
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackSample {
    /// Unwrapped normalized playback position (0 at start, 1 at end)
    pub progress: f32,
    pub state: PlaybackState,
}

impl PlaybackSample {
    pub fn new(progress: f32, state: PlaybackState) -> Self {
        Self { progress, state }
    }

    /// Sample of the attack slot at `progress`
    pub fn attacking(progress: f32) -> Self {
        Self::new(progress, PlaybackState::Attacking)
    }

    pub fn in_attack_state(&self) -> bool {
        self.state == PlaybackState::Attacking
    }
}

/// Animation playback engine
pub trait AnimationDriver {
    /// Current progress and logical state
    fn sample(&self) -> PlaybackSample;

    /// Swap `clip` into the attack slot and play it from progress 0
    fn play_attack(&mut self, clip: &ClipRef);
}

/// Movement collaborator that owns the actor's transform
pub trait MovementSink {
    fn set_speed_multiplier(&mut self, multiplier: f32);

    fn set_rotation_allowed(&mut self, allowed: bool);

    /// Translate the actor by `delta` on the ground plane
    fn apply_move(&mut self, delta: Vec2);

    /// Unit facing direction on the ground plane
    fn facing(&self) -> Vec2;
}

/// Collision engine switch for hitbox volumes
pub trait HitboxColliders {
    fn set_hitbox_enabled(&mut self, volume: &HitboxVolume, enabled: bool);
}

/// Anything that can be struck
pub trait Damageable {
    fn apply_damage(&mut self, amount: f32, reaction: HitReaction);

    fn is_dead(&self) -> bool;
}

/// Collaborators for one actor's controller call
pub struct CombatContext<'a> {
    pub animation: &'a mut dyn AnimationDriver,
    pub movement: &'a mut dyn MovementSink,
    pub audio: &'a mut dyn AudioSink,
    pub colliders: &'a mut dyn HitboxColliders,
}

/// Collision switch for actors without physical hitbox geometry
#[derive(Debug, Default)]
pub struct NoColliders;

impl HitboxColliders for NoColliders {
    fn set_hitbox_enabled(&mut self, _volume: &HitboxVolume, _enabled: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_helpers() {
        let sample = PlaybackSample::attacking(0.3);
        assert!(sample.in_attack_state());
        assert_eq!(sample.progress, 0.3);

        let other = PlaybackSample::new(0.3, PlaybackState::HitReaction);
        assert!(!other.in_attack_state());
    }

    #[test]
    fn test_default_state_is_locomotion() {
        assert_eq!(PlaybackState::default(), PlaybackState::Locomotion);
    }
}
