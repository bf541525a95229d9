// Arena - headless simulation wiring actors, physics and combat
//
// One fixed step runs, in order:
// 1. Brains (or player input) steer locomotion
// 2. Clip players advance and controllers tick their timelines
// 3. Locomotion is written back to the kinematic bodies
// 4. Physics steps; sensor overlap-begin events are routed to the owning controller
// 5. Targets react to damage (flinch or die)

use std::time::Duration;

use glam::Vec2;

use crate::engine::audio::CueRecorder;
use crate::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use crate::engine::physics::{presets, ColliderHandle, CollisionEvent, PhysicsWorld};
use crate::game::ai::{Candidate, PursuitBrain, SelfView};
use crate::game::characters::{Actor, ActorId, ActorManager, ActorStats};
use crate::game::combat::{
    AttackKind, AttackOutcome, CombatTuning, Damageable, Faction, FightingStyle, HealthEvent,
    HitResult, HitboxColliders, HitboxId, HitboxVolume, KiOutcome, MovementSink,
};

impl HitboxColliders for PhysicsWorld {
    fn set_hitbox_enabled(&mut self, volume: &HitboxVolume, enabled: bool) {
        if let Some(handle) = volume.collider {
            self.set_collider_enabled(handle, enabled);
        }
    }
}

/// A landed hit, as seen from the arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandedHit {
    pub attacker: ActorId,
    pub target: ActorId,
    pub damage: f32,
}

/// What happened during one fixed step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub hits: Vec<LandedHit>,
    pub deaths: Vec<ActorId>,
}

/// The simulation: every actor, the physics world and the audio sink
pub struct Arena {
    physics: PhysicsWorld,
    actors: ActorManager,
    audio: CueRecorder,
    clock: GameLoop,
    tuning: CombatTuning,
}

impl Arena {
    pub fn new(tuning: CombatTuning) -> Self {
        Self {
            physics: PhysicsWorld::new(),
            actors: ActorManager::new(),
            audio: CueRecorder::new(),
            clock: GameLoop::new(),
            tuning,
        }
    }

    /// Spawn an actor with standard stats
    pub fn spawn(
        &mut self,
        name: &str,
        faction: Faction,
        style: FightingStyle,
        position: Vec2,
        facing: Vec2,
    ) -> ActorId {
        self.spawn_with_stats(name, faction, style, ActorStats::standard(), position, facing)
    }

    pub fn spawn_with_stats(
        &mut self,
        name: &str,
        faction: Faction,
        style: FightingStyle,
        stats: ActorStats,
        position: Vec2,
        facing: Vec2,
    ) -> ActorId {
        let id = self.actors.next_id();
        let actor = Actor::new(
            id,
            name,
            faction,
            style,
            stats,
            self.tuning.clone(),
            &mut self.physics,
            position,
            facing,
        );
        log::info!("Spawned {} ({:?}) as actor {} at {}", name, faction, id, position);
        self.actors.insert(actor)
    }

    /// Hand an actor over to a pursuit brain
    pub fn set_brain(&mut self, id: ActorId, brain: PursuitBrain) -> bool {
        match self.actors.get_mut(id) {
            Some(actor) => {
                actor.brain = Some(brain);
                true
            }
            None => false,
        }
    }

    /// Add a static wall
    pub fn add_wall(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let body = self.physics.add_rigid_body(presets::wall_body(x, y));
        self.physics
            .add_collider(presets::wall_collider(width, height), body);
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn actors(&self) -> &ActorManager {
        &self.actors
    }

    pub fn position(&self, id: ActorId) -> Option<Vec2> {
        self.actors.get(id)?.position(&self.physics)
    }

    pub fn audio(&self) -> &CueRecorder {
        &self.audio
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn clock(&self) -> &GameLoop {
        &self.clock
    }

    /// Simulated seconds
    pub fn now(&self) -> f32 {
        self.clock.now_secs()
    }

    // Commands

    pub fn request_attack(&mut self, id: ActorId, kind: AttackKind) -> Option<AttackOutcome> {
        let now = self.clock.now_secs();
        let actor = self.actors.get_mut(id)?;
        Some(actor.request_attack(kind, now, &mut self.audio, &mut self.physics))
    }

    pub fn press_attack(&mut self, id: ActorId) {
        if let Some(actor) = self.actors.get_mut(id) {
            actor.combat.press_attack();
        }
    }

    /// Release a held attack; the hold length picks light or medium
    pub fn release_attack(&mut self, id: ActorId) -> Option<AttackOutcome> {
        let now = self.clock.now_secs();
        let actor = self.actors.get_mut(id)?;
        actor.with_combat(&mut self.audio, &mut self.physics, |combat, ctx| {
            combat.release_attack(now, ctx)
        })
    }

    pub fn set_blocking(&mut self, id: ActorId, blocking: bool) {
        let now = self.clock.now_secs();
        if let Some(actor) = self.actors.get_mut(id) {
            actor.combat.set_blocking(blocking, now);
        }
    }

    pub fn spend_ki(&mut self, id: ActorId) -> Option<KiOutcome> {
        let now = self.clock.now_secs();
        Some(self.actors.get_mut(id)?.spend_ki(now))
    }

    /// Movement input for player-driven actors
    pub fn set_move_input(&mut self, id: ActorId, dir: Vec2) {
        if let Some(actor) = self.actors.get_mut(id) {
            actor.input_move = dir;
        }
    }

    // Simulation

    /// Feed one wall-clock frame; runs however many fixed steps it covers
    pub fn run_frame(&mut self, frame: Duration) -> Vec<StepReport> {
        let steps = self.clock.advance(frame);
        (0..steps).map(|_| self.step()).collect()
    }

    /// Run exactly one fixed step
    pub fn step(&mut self) -> StepReport {
        let dt = FIXED_TIMESTEP;
        let now = self.clock.now_secs();

        self.think(now, dt);

        for actor in self.actors.all_mut() {
            actor.update_combat(dt, &mut self.audio, &mut self.physics);
        }

        for actor in self.actors.all_mut() {
            actor.sync_body(&mut self.physics, dt);
        }

        self.physics.step();

        let mut report = StepReport::default();
        for event in self.physics.get_collision_events() {
            if let CollisionEvent::Started {
                collider1,
                collider2,
            } = event
            {
                if let Some((attacker, hitbox, target)) = self.classify(collider1, collider2) {
                    if let Some(hit) = self.route_overlap(attacker, hitbox, target) {
                        report.hits.push(hit);
                    }
                }
            }
        }

        for actor in self.actors.all_mut() {
            let events = actor.process_health_events(&mut self.audio, &mut self.physics);
            if events.contains(&HealthEvent::Died) {
                report.deaths.push(actor.id);
            }
        }

        self.clock.record_step();
        report
    }

    /// Let every actor pick its steering for this step
    fn think(&mut self, now: f32, dt: f32) {
        let candidates: Vec<Candidate> = self
            .actors
            .all()
            .iter()
            .filter_map(|actor| {
                Some(Candidate {
                    id: actor.id,
                    faction: actor.faction(),
                    position: actor.position(&self.physics)?,
                    valid: actor.health.is_valid_target(),
                })
            })
            .collect();

        for actor in self.actors.all_mut() {
            let Some(position) = actor.position(&self.physics) else {
                continue;
            };
            let me = SelfView {
                position,
                facing: actor.locomotion.facing(),
                dead: actor.health.is_dead(),
                rooted: actor.locomotion.is_rooted(),
                time: now,
            };
            let others: Vec<Candidate> = candidates
                .iter()
                .filter(|c| c.id != actor.id)
                .copied()
                .collect();
            actor.update_movement(me, &others, dt);
        }
    }

    /// Sort an overlap pair into (attacker, hitbox, target root)
    fn classify(
        &self,
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    ) -> Option<(ActorId, HitboxId, ActorId)> {
        let tag1 = self.physics.collider_tag(collider1)?;
        let tag2 = self.physics.collider_tag(collider2)?;
        match (tag1.part, tag2.part) {
            (Some(hitbox), None) => Some((tag1.entity, hitbox, tag2.entity)),
            (None, Some(hitbox)) => Some((tag2.entity, hitbox, tag1.entity)),
            _ => None,
        }
    }

    fn route_overlap(
        &mut self,
        attacker: ActorId,
        hitbox: HitboxId,
        target: ActorId,
    ) -> Option<LandedHit> {
        let result = if attacker == target {
            let actor = self.actors.get_mut(attacker)?;
            actor
                .combat
                .on_hitbox_overlap(hitbox, target, &mut actor.health)
        } else {
            let (source, victim) = self.actors.pair_mut(attacker, target)?;
            source
                .combat
                .on_hitbox_overlap(hitbox, target, &mut victim.health)
        };

        match result {
            HitResult::Landed { target, damage } => Some(LandedHit {
                attacker,
                target,
                damage,
            }),
            other => {
                log::trace!("Overlap {} -> {} ignored: {:?}", attacker, target, other);
                None
            }
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(CombatTuning::default())
    }
}
