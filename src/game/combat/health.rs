// Health - the standard Damageable implementation for actors

use serde::Deserialize;

use super::context::Damageable;
use super::moves::HitReaction;

/// Team alignment, used by targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Faction {
    Player,
    Companion,
    #[default]
    Enemy,
}

/// What happened to a health pool as a result of damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthEvent {
    /// Survived the hit and should flinch
    Hit { remaining: f32, reaction: HitReaction },
    /// Health reached zero
    Died,
}

/// Health pool of one actor
#[derive(Debug, Clone)]
pub struct Health {
    max: f32,
    current: f32,
    pub faction: Faction,
    /// Ignores all damage while set (cutscenes, i-frames)
    pub invulnerable: bool,
    events: Vec<HealthEvent>,
}

impl Health {
    pub fn new(max: f32, faction: Faction) -> Self {
        Self {
            max,
            current: max,
            faction,
            invulnerable: false,
            events: Vec::new(),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Whether this actor may be picked as a target
    pub fn is_valid_target(&self) -> bool {
        !self.is_dead()
    }

    /// Restore to full health
    pub fn revive(&mut self) {
        self.current = self.max;
        self.events.clear();
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<HealthEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Damageable for Health {
    fn apply_damage(&mut self, amount: f32, reaction: HitReaction) {
        if self.is_dead() || self.invulnerable {
            return;
        }

        self.current = (self.current - amount.max(0.0)).max(0.0);

        if self.is_dead() {
            self.events.push(HealthEvent::Died);
        } else {
            self.events.push(HealthEvent::Hit {
                remaining: self.current,
                reaction,
            });
        }
    }

    fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}
