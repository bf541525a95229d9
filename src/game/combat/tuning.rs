// Combat tuning - shared timing constants for every actor
//
// These values are gameplay feel, not per-move data. Per-move timing lives on
// the move definitions themselves.

use serde::Deserialize;

/// Timing and meter constants used by the combat controller
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    // Combo chain
    /// Seconds since the last light attack after which the chain restarts
    pub combo_reset_time: f32,
    /// Seconds an attack button must be held for a release to count as medium
    pub medium_hold_time: f32,

    // Movement during attacks
    /// Speed multiplier while a light attack plays
    pub light_attack_speed: f32,
    /// Speed multiplier while a heavy attack plays
    pub heavy_attack_speed: f32,
    /// Progress at which movement speed is handed back ahead of completion
    pub movement_release_progress: f32,
    /// Last-observed progress a fresh session starts from (below 0 so 0 counts as forward)
    pub session_seed_progress: f32,

    // Ki
    /// Seconds after raising the block in which a ki parry succeeds
    pub parry_window: f32,
    /// Duration of the power-up buff in seconds
    pub power_up_duration: f32,
    /// Ki units an actor starts with
    pub starting_ki: u32,
    /// Ki capacity
    pub max_ki: u32,
}

/// The one combat tuning used by all actors
pub const BASE_TUNING: CombatTuning = CombatTuning {
    combo_reset_time: 1.2,
    medium_hold_time: 1.0,

    light_attack_speed: 0.0,
    heavy_attack_speed: 0.5,
    movement_release_progress: 0.95,
    session_seed_progress: -0.01,

    parry_window: 0.2,
    power_up_duration: 1.5,
    starting_ki: 3,
    max_ki: 3,
};

impl Default for CombatTuning {
    fn default() -> Self {
        BASE_TUNING
    }
}

impl CombatTuning {
    /// Speed multiplier applied for the lifetime of an attack
    pub fn attack_speed(&self, is_heavy: bool) -> f32 {
        if is_heavy {
            self.heavy_attack_speed
        } else {
            self.light_attack_speed
        }
    }
}
