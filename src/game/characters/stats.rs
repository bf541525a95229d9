// Actor stats - every fighter moves the same
// Differentiation comes from FIGHTING STYLES, not base stats

use serde::Deserialize;

/// Fixed actor stats shared by players, companions and enemies
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActorStats {
    // Movement
    /// Ground movement speed (units/second) at multiplier 1.0
    pub move_speed: f32,
    /// Turn rate toward the desired direction (radians/second)
    pub rotation_speed: f32,

    // Combat
    pub max_health: f32,

    // Dimensions (for physics collider)
    /// Footprint radius in world units
    pub radius: f32,
}

/// The ONE actor stats table
pub const BASE_STATS: ActorStats = ActorStats {
    move_speed: 5.0,
    rotation_speed: 12.0,

    max_health: 100.0,

    radius: 0.4,
};

impl Default for ActorStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl ActorStats {
    pub fn standard() -> Self {
        BASE_STATS
    }
}
