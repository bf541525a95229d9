// Pursuit brain - distance-based Idle / Chasing / Stalking machine
//
// Enemies and companions pick the first valid target of the opposing faction,
// run it down, then circle at striking distance while weaving sideways.

use glam::Vec2;
use serde::Deserialize;

use crate::game::characters::ActorId;
use crate::game::combat::health::Faction;

/// Ranges and weave shape for pursuit
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PursuitTuning {
    /// Targets beyond this are ignored
    pub detection_range: f32,
    /// Chasing turns into stalking within this distance
    pub engage_distance: f32,
    /// Stalking keeps the target between these distances
    pub stalk_min: f32,
    pub stalk_max: f32,
    /// Stalking falls back to chasing beyond this distance
    pub disengage_distance: f32,
    pub weave_amplitude: f32,
    /// Weave angular frequency (radians per second)
    pub weave_frequency: f32,
}

pub const BASE_PURSUIT: PursuitTuning = PursuitTuning {
    detection_range: 15.0,
    engage_distance: 5.0,
    stalk_min: 2.5,
    stalk_max: 3.5,
    disengage_distance: 7.0,
    weave_amplitude: 0.6,
    weave_frequency: 2.0,
};

impl Default for PursuitTuning {
    fn default() -> Self {
        BASE_PURSUIT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PursuitState {
    #[default]
    Idle,
    /// Running straight at the target
    Chasing,
    /// Circling at striking distance, always facing the target
    Stalking,
}

/// Another actor as seen by the brain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ActorId,
    pub faction: Faction,
    pub position: Vec2,
    /// Alive and targetable
    pub valid: bool,
}

/// The brain's own situation this step
#[derive(Debug, Clone, Copy)]
pub struct SelfView {
    pub position: Vec2,
    pub facing: Vec2,
    pub dead: bool,
    /// Speed multiplier at or below the stop threshold
    pub rooted: bool,
    /// Simulated seconds, drives the weave
    pub time: f32,
}

/// What locomotion should do this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steering {
    /// Leave locomotion alone
    Suspended,
    Stop,
    /// Move along `dir`, turning toward it
    Free(Vec2),
    /// Strafe along `dir` while facing `look`
    Targeted { dir: Vec2, look: Vec2 },
}

/// Distance-based pursuit for one AI actor
#[derive(Debug, Clone)]
pub struct PursuitBrain {
    tuning: PursuitTuning,
    target_faction: Faction,
    state: PursuitState,
    target: Option<ActorId>,
}

impl PursuitBrain {
    pub fn new(target_faction: Faction, tuning: PursuitTuning) -> Self {
        Self {
            tuning,
            target_faction,
            state: PursuitState::Idle,
            target: None,
        }
    }

    pub fn state(&self) -> PursuitState {
        self.state
    }

    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    pub fn target_faction(&self) -> Faction {
        self.target_faction
    }

    /// Decide this step's steering
    pub fn think(&mut self, me: &SelfView, others: &[Candidate]) -> Steering {
        if me.dead || me.rooted {
            return Steering::Suspended;
        }

        let current = self
            .target
            .and_then(|id| others.iter().find(|c| c.id == id && c.valid));
        let target = match current {
            Some(target) => *target,
            None => match self.acquire(me.position, others) {
                Some(target) => target,
                None => {
                    self.target = None;
                    return Steering::Stop;
                }
            },
        };

        let offset = target.position - me.position;
        let distance = offset.length();
        let to_target = offset.normalize_or_zero();

        match self.state {
            PursuitState::Idle => {
                if distance < self.tuning.detection_range {
                    self.set_state(PursuitState::Chasing);
                }
                Steering::Suspended
            }
            PursuitState::Chasing => {
                if distance <= self.tuning.engage_distance {
                    self.set_state(PursuitState::Stalking);
                }
                Steering::Free(to_target)
            }
            PursuitState::Stalking => {
                let mut dir = Vec2::ZERO;
                if distance > self.tuning.stalk_max {
                    dir += to_target;
                } else if distance < self.tuning.stalk_min {
                    dir -= to_target;
                }

                let right = -me.facing.perp();
                let weave = self.tuning.weave_amplitude
                    * (me.time * self.tuning.weave_frequency).sin();
                dir += right * weave;

                if distance > self.tuning.disengage_distance {
                    self.set_state(PursuitState::Chasing);
                }
                Steering::Targeted {
                    dir: dir.normalize_or_zero(),
                    look: offset,
                }
            }
        }
    }

    /// First valid candidate of the target faction within detection range
    fn acquire(&mut self, position: Vec2, others: &[Candidate]) -> Option<Candidate> {
        let found = others
            .iter()
            .find(|c| {
                c.valid
                    && c.faction == self.target_faction
                    && c.position.distance(position) <= self.tuning.detection_range
            })
            .copied();
        if let Some(candidate) = found {
            log::debug!("Pursuit acquired actor {}", candidate.id);
            self.target = Some(candidate.id);
        }
        found
    }

    fn set_state(&mut self, state: PursuitState) {
        if self.state != state {
            log::debug!("Pursuit {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
