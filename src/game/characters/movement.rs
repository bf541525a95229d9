// Locomotion - ground-plane movement for one actor
//
// Two modes: free movement turns the actor toward where it is going,
// targeted movement strafes while always facing a target.

use glam::Vec2;

use crate::core::math::rotate_towards;
use crate::game::combat::context::MovementSink;

use super::stats::ActorStats;

/// Below this multiplier the actor is rooted
const STOP_THRESHOLD: f32 = 0.01;

/// Velocity, facing and attack-driven restrictions for one actor
#[derive(Debug, Clone)]
pub struct Locomotion {
    move_speed: f32,
    rotation_speed: f32,
    speed_multiplier: f32,
    rotation_allowed: bool,
    facing: Vec2,
    velocity: Vec2,
    /// Root-motion translation pushed by combat since the last integrate
    pending: Vec2,
}

impl Locomotion {
    pub fn new(stats: &ActorStats) -> Self {
        Self {
            move_speed: stats.move_speed,
            rotation_speed: stats.rotation_speed,
            speed_multiplier: 1.0,
            rotation_allowed: true,
            facing: Vec2::X,
            velocity: Vec2::ZERO,
            pending: Vec2::ZERO,
        }
    }

    pub fn with_facing(mut self, facing: Vec2) -> Self {
        self.facing = facing.try_normalize().unwrap_or(Vec2::X);
        self
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn rotation_allowed(&self) -> bool {
        self.rotation_allowed
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Movement is suspended (attacks root the actor)
    pub fn is_rooted(&self) -> bool {
        self.speed_multiplier <= STOP_THRESHOLD
    }

    /// Free movement toward `dir`, turning to face it
    pub fn process_movement(&mut self, dir: Vec2, dt: f32) {
        if self.is_rooted() || dir.length() <= STOP_THRESHOLD {
            self.stop();
            return;
        }
        self.velocity = dir * self.move_speed * self.speed_multiplier;
        self.turn_towards(dir, dt);
    }

    /// Strafe along `dir` while facing `to_target`
    pub fn process_targeted(&mut self, dir: Vec2, to_target: Vec2, dt: f32) {
        if self.is_rooted() {
            self.stop();
            return;
        }
        self.velocity = dir * self.move_speed * self.speed_multiplier;
        self.turn_towards(to_target, dt);
    }

    pub fn turn_towards(&mut self, dir: Vec2, dt: f32) {
        if !self.rotation_allowed || dir.length_squared() < STOP_THRESHOLD {
            return;
        }
        self.facing = rotate_towards(self.facing, dir, self.rotation_speed * dt);
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Translation for this step: velocity plus any root motion, consumed
    pub fn integrate(&mut self, dt: f32) -> Vec2 {
        let translation = self.velocity * dt + self.pending;
        self.pending = Vec2::ZERO;
        translation
    }
}

impl MovementSink for Locomotion {
    fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(0.0);
        if self.is_rooted() {
            self.stop();
        }
    }

    fn set_rotation_allowed(&mut self, allowed: bool) {
        self.rotation_allowed = allowed;
    }

    fn apply_move(&mut self, delta: Vec2) {
        self.pending += delta;
    }

    fn facing(&self) -> Vec2 {
        self.facing
    }
}
