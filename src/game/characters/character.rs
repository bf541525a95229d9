// Actor entity and management

use glam::Vec2;

use crate::engine::physics::{presets, ColliderHandle, ColliderTag, PhysicsWorld, RigidBodyHandle};
use crate::game::ai::{Candidate, PursuitBrain, SelfView, Steering};
use crate::game::combat::{
    AnimationDriver, AttackKind, AttackOutcome, AudioSink, CombatContext, CombatController,
    CombatTuning, Damageable, Faction, FightingStyle, Health, HealthEvent, HitReaction,
    HitboxColliders, HitboxId, HitboxType, KiOutcome, MovementSink, PlaybackSample, PlaybackState,
    TickReport,
};

use super::animation::ClipPlayer;
use super::movement::Locomotion;
use super::stats::ActorStats;

/// Unique identifier for an actor
pub type ActorId = u32;

/// Sensor radius and forward reach for each hitbox type
fn hitbox_shape(kind: HitboxType) -> (f32, f32) {
    match kind {
        HitboxType::Fist => (0.25, 0.6),
        HitboxType::Foot => (0.3, 0.75),
        HitboxType::Katana => (0.35, 1.1),
        HitboxType::Nunchaku => (0.3, 0.9),
        HitboxType::Staff => (0.35, 1.4),
        HitboxType::Shuriken => (0.2, 2.5),
        HitboxType::Utility => (1.2, 0.0),
    }
}

/// Clip played for each flinch
fn reaction_clip(reaction: HitReaction) -> &'static str {
    match reaction {
        HitReaction::LightHigh => "hit_high",
        HitReaction::LightLow => "hit_low",
        HitReaction::HeavyBack => "knockback",
    }
}

/// A fighter in the arena: player, companion or enemy
#[derive(Debug)]
pub struct Actor {
    pub id: ActorId,
    /// Display name
    pub name: String,

    // Physics
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,

    pub stats: ActorStats,
    pub health: Health,
    pub locomotion: Locomotion,
    pub animation: ClipPlayer,
    pub combat: CombatController,
    /// Present for AI-driven actors
    pub brain: Option<PursuitBrain>,

    /// Free-movement input for player-driven actors
    pub input_move: Vec2,
}

impl Actor {
    /// Create an actor, add its body and one hitbox per type its style uses
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ActorId,
        name: &str,
        faction: Faction,
        style: FightingStyle,
        stats: ActorStats,
        tuning: CombatTuning,
        physics: &mut PhysicsWorld,
        spawn: Vec2,
        facing: Vec2,
    ) -> Self {
        let locomotion = Locomotion::new(&stats).with_facing(facing);
        let facing = locomotion.facing();

        let body = presets::actor_body(spawn.x, spawn.y, facing.y.atan2(facing.x));
        let body_handle = physics.add_rigid_body(body);
        let collider_handle = physics.add_tagged_collider(
            presets::actor_collider(stats.radius),
            body_handle,
            ColliderTag {
                entity: id,
                part: None,
            },
        );

        let mut kinds: Vec<HitboxType> = Vec::new();
        for mv in style
            .light_attacks
            .iter()
            .chain(style.medium_attack.iter())
            .chain(style.heavy_attack.iter())
            .chain(style.special_attack.iter())
            .chain(style.acrobatic_flip.iter())
        {
            if !kinds.contains(&mv.hitbox_type) {
                kinds.push(mv.hitbox_type);
            }
        }

        let mut actor = Self {
            id,
            name: name.to_string(),
            body_handle,
            collider_handle,
            health: Health::new(stats.max_health, faction),
            locomotion,
            animation: ClipPlayer::with_standard_clips(),
            combat: CombatController::new(id, style, tuning),
            brain: None,
            stats,
            input_move: Vec2::ZERO,
        };
        for kind in kinds {
            actor.add_hitbox(kind, physics);
        }
        actor
    }

    pub fn with_brain(mut self, brain: PursuitBrain) -> Self {
        self.brain = Some(brain);
        self
    }

    /// Add a hitbox volume with sensor geometry in front of the body
    pub fn add_hitbox(&mut self, kind: HitboxType, physics: &mut PhysicsWorld) -> HitboxId {
        let id = self.combat.add_hitbox(kind);
        let (radius, reach) = hitbox_shape(kind);
        let collider = physics.add_tagged_collider(
            presets::hitbox_collider(radius, reach),
            self.body_handle,
            ColliderTag {
                entity: self.id,
                part: Some(id),
            },
        );
        self.combat.attach_collider(id, collider);
        id
    }

    pub fn faction(&self) -> Faction {
        self.health.faction
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.body_position(self.body_handle)
    }

    /// Run `f` with the controller and a context built from this actor's collaborators
    pub fn with_combat<R>(
        &mut self,
        audio: &mut dyn AudioSink,
        colliders: &mut dyn HitboxColliders,
        f: impl FnOnce(&mut CombatController, &mut CombatContext) -> R,
    ) -> R {
        let mut ctx = CombatContext {
            animation: &mut self.animation,
            movement: &mut self.locomotion,
            audio,
            colliders,
        };
        f(&mut self.combat, &mut ctx)
    }

    pub fn request_attack(
        &mut self,
        kind: AttackKind,
        now: f32,
        audio: &mut dyn AudioSink,
        colliders: &mut dyn HitboxColliders,
    ) -> AttackOutcome {
        self.with_combat(audio, colliders, |combat, ctx| {
            combat.request_attack(kind, now, ctx)
        })
    }

    /// Spend ki; a successful parry plays the parry pose
    pub fn spend_ki(&mut self, now: f32) -> KiOutcome {
        let outcome = self.combat.spend_ki(now);
        if outcome == (KiOutcome::Parry { success: true }) {
            self.animation.play("parry", PlaybackState::Parry);
        }
        outcome
    }

    /// Advance playback and the attack timeline by one fixed step
    pub fn update_combat(
        &mut self,
        dt: f32,
        audio: &mut dyn AudioSink,
        colliders: &mut dyn HitboxColliders,
    ) -> TickReport {
        self.animation.update(dt);
        self.combat.advance_input(dt);

        let report = self.with_combat(audio, colliders, |combat, ctx| combat.update(ctx));

        // A finished attack clip holds at 1.0 until the controller lets go
        if !self.combat.is_attacking() && self.animation.state() == PlaybackState::Attacking {
            self.animation.play_locomotion();
        }
        report
    }

    /// Let the brain (if any) steer, otherwise follow `input_move`
    pub fn update_movement(&mut self, me: SelfView, others: &[Candidate], dt: f32) {
        let alive = self.is_alive();
        let steering = match self.brain.as_mut() {
            Some(brain) => brain.think(&me, others),
            None if alive => Steering::Free(self.input_move),
            None => Steering::Stop,
        };

        match steering {
            Steering::Suspended => {}
            Steering::Stop => self.locomotion.stop(),
            Steering::Free(dir) => self.locomotion.process_movement(dir, dt),
            Steering::Targeted { dir, look } => self.locomotion.process_targeted(dir, look, dt),
        }
    }

    /// Write this step's translation and facing back to the body
    pub fn sync_body(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let delta = self.locomotion.integrate(dt);
        physics.move_body(self.body_handle, delta, self.locomotion.facing());
    }

    /// React to damage taken since the last step
    pub fn process_health_events(
        &mut self,
        audio: &mut dyn AudioSink,
        colliders: &mut dyn HitboxColliders,
    ) -> Vec<HealthEvent> {
        let events = self.health.drain_events();
        for event in &events {
            match *event {
                HealthEvent::Hit { remaining, reaction } => {
                    log::info!("{} hit, {} health left", self.name, remaining);
                    // The controller sees the state change next tick and rolls back
                    self.animation.play(reaction_clip(reaction), PlaybackState::HitReaction);
                }
                HealthEvent::Died => {
                    log::info!("{} died", self.name);
                    self.animation.play("death", PlaybackState::Dead);
                    self.locomotion.stop();
                    self.with_combat(audio, colliders, |combat, ctx| combat.on_owner_death(ctx));
                }
            }
        }
        events
    }

    /// Bring a dead actor back at full health
    pub fn revive(&mut self) {
        self.health.revive();
        self.combat.revive();
        self.animation.play("idle", PlaybackState::Locomotion);
        self.locomotion.set_speed_multiplier(1.0);
        self.locomotion.set_rotation_allowed(true);
    }

    /// Current animation sample, for diagnostics
    pub fn playback(&self) -> PlaybackSample {
        self.animation.sample()
    }
}

/// Manages all actors in the arena
#[derive(Debug)]
pub struct ActorManager {
    actors: Vec<Actor>,
    next_id: ActorId,
}

impl ActorManager {
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            next_id: 1,
        }
    }

    /// Reserve the id the next spawned actor will get
    pub fn next_id(&mut self) -> ActorId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an already constructed actor
    pub fn insert(&mut self, actor: Actor) -> ActorId {
        let id = actor.id;
        self.actors.push(actor);
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// Two distinct actors at once
    pub fn pair_mut(&mut self, a: ActorId, b: ActorId) -> Option<(&mut Actor, &mut Actor)> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.actors.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.actors.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    fn index_of(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id)
    }

    pub fn all(&self) -> &[Actor] {
        &self.actors
    }

    pub fn all_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    /// Remove an actor and its physics body
    pub fn remove(&mut self, id: ActorId, physics: &mut PhysicsWorld) -> Option<Actor> {
        let index = self.index_of(id)?;
        let actor = self.actors.remove(index);
        physics.remove_rigid_body(actor.body_handle);
        Some(actor)
    }

    pub fn count(&self) -> usize {
        self.actors.len()
    }

    pub fn alive_count(&self) -> usize {
        self.actors.iter().filter(|a| a.is_alive()).count()
    }
}

impl Default for ActorManager {
    fn default() -> Self {
        Self::new()
    }
}
