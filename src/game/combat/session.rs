// Active session - runtime record of the one attack currently playing

use std::sync::Arc;

use super::context::AudioSink;
use super::hitbox::HitRegistry;
use super::moves::MoveDefinition;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Playback reached the end of the clip
    Completed,
    /// Animation engine left the attack state (hit reaction, state swap, loop exit)
    Interrupted,
    /// Replaced by a chained attack inside the combo window
    Chained,
    /// Owning actor died
    OwnerDied,
}

/// Mutable per-activation state for one move
#[derive(Debug)]
pub struct ActiveSession {
    definition: Arc<MoveDefinition>,
    /// Last progress displacement was computed up to
    last_progress: f32,
    pub(crate) hitbox_open: bool,
    pub(crate) combo_accept: bool,
    pub(crate) rotation_allowed: bool,
    /// Speed multiplier already handed back ahead of completion
    pub(crate) movement_released: bool,
    pub(crate) registry: HitRegistry,
    /// Cue indices sorted by trigger fraction
    cue_order: Vec<usize>,
    cue_fired: Vec<bool>,
}

impl ActiveSession {
    pub fn new(definition: Arc<MoveDefinition>, seed_progress: f32) -> Self {
        let cues = &definition.audio_cues;
        let mut cue_order: Vec<usize> = (0..cues.len()).collect();
        cue_order.sort_by(|a, b| cues[*a].trigger.total_cmp(&cues[*b].trigger));
        let cue_fired = vec![false; cues.len()];
        let rotation_allowed = definition.can_rotate(0.0);

        Self {
            definition,
            last_progress: seed_progress,
            hitbox_open: false,
            combo_accept: false,
            rotation_allowed,
            movement_released: false,
            registry: HitRegistry::new(),
            cue_order,
            cue_fired,
        }
    }

    pub fn definition(&self) -> &Arc<MoveDefinition> {
        &self.definition
    }

    pub fn last_progress(&self) -> f32 {
        self.last_progress
    }

    pub fn is_hitbox_open(&self) -> bool {
        self.hitbox_open
    }

    pub fn accepts_combo(&self) -> bool {
        self.combo_accept
    }

    pub fn rotation_allowed(&self) -> bool {
        self.rotation_allowed
    }

    pub fn registry(&self) -> &HitRegistry {
        &self.registry
    }

    /// Bound move together with the registry its overlaps resolve against
    pub(crate) fn hit_context(&mut self) -> (&MoveDefinition, &mut HitRegistry) {
        (&self.definition, &mut self.registry)
    }

    /// Distance covered since the last forward tick.
    ///
    /// Held or regressed progress yields 0 and leaves the reference point
    /// untouched, so a loop wrap never produces a negative or repeated delta.
    pub fn advance_motion(&mut self, progress: f32) -> f32 {
        if progress <= self.last_progress {
            return 0.0;
        }
        let delta = self.definition.motion_delta(self.last_progress, progress);
        self.last_progress = progress;
        delta
    }

    /// Fire every unfired cue with `trigger <= progress`, earliest first
    pub fn fire_due_cues(&mut self, progress: f32, audio: &mut dyn AudioSink) -> usize {
        let mut fired = 0;
        for &index in &self.cue_order {
            let cue = self.definition.audio_cues[index];
            if cue.trigger > progress {
                break;
            }
            if !self.cue_fired[index] {
                audio.play(cue.sound);
                self.cue_fired[index] = true;
                fired += 1;
            }
        }
        fired
    }
}
