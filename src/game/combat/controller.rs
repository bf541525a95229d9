// Combat timeline controller - one actor's Idle/Active attack state machine
//
// Every tick the controller takes a single playback sample and derives all of
// its outputs (displacement, hitbox edges, combo gate, rotation, cues, early
// movement release) from that one snapshot.

use std::sync::Arc;

use crate::engine::physics::ColliderHandle;
use crate::game::characters::ActorId;

use super::context::{CombatContext, Damageable, PlaybackSample};
use super::hitbox::{resolve_overlap, HitResult, HitboxId, HitboxSet};
use super::intent::AttackIntent;
use super::ki::{KiActions, KiOutcome};
use super::moves::{HitboxType, MoveDefinition};
use super::session::{ActiveSession, SessionEnd};
use super::style::{AttackKind, FightingStyle};
use super::tuning::CombatTuning;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Active,
}

/// Why an attack request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    OwnerDead,
    /// A session is playing and its combo window is closed
    OutsideComboWindow,
    /// Acrobatic moves only start from neutral
    Busy,
    /// The style has no move for this kind
    NoMove,
    /// The move has no clip bound
    NoClip,
}

/// Result of an attack request
#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    Started { name: String, chained: bool },
    Rejected(RejectReason),
}

impl AttackOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }
}

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Distance moved along the facing this tick
    pub displacement: f32,
    pub hitbox_opened: bool,
    pub hitbox_closed: bool,
    pub cues_fired: usize,
    pub ended: Option<SessionEnd>,
}

/// Attack timeline for one actor
#[derive(Debug)]
pub struct CombatController {
    owner: ActorId,
    style: FightingStyle,
    tuning: CombatTuning,
    session: Option<ActiveSession>,
    hitboxes: HitboxSet,
    intent: AttackIntent,
    ki: KiActions,
    combo_index: usize,
    last_attack_time: Option<f32>,
    owner_dead: bool,
}

impl CombatController {
    pub fn new(owner: ActorId, style: FightingStyle, tuning: CombatTuning) -> Self {
        Self {
            owner,
            intent: AttackIntent::new(tuning.medium_hold_time),
            ki: KiActions::new(&tuning),
            style,
            tuning,
            session: None,
            hitboxes: HitboxSet::new(),
            combo_index: 0,
            last_attack_time: None,
            owner_dead: false,
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn state(&self) -> ControllerState {
        if self.session.is_some() {
            ControllerState::Active
        } else {
            ControllerState::Idle
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    /// Move currently playing, if any
    pub fn active_move(&self) -> Option<&Arc<MoveDefinition>> {
        self.session.as_ref().map(|s| s.definition())
    }

    pub fn style(&self) -> &FightingStyle {
        &self.style
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn combo_index(&self) -> usize {
        self.combo_index
    }

    pub fn hitboxes(&self) -> &HitboxSet {
        &self.hitboxes
    }

    /// Bind collision geometry to a volume; `false` if the id is unknown
    pub fn attach_collider(&mut self, id: HitboxId, collider: ColliderHandle) -> bool {
        match self.hitboxes.get_mut(id) {
            Some(volume) => {
                volume.collider = Some(collider);
                true
            }
            None => false,
        }
    }

    /// Register a hitbox volume owned by this actor
    pub fn add_hitbox(&mut self, kind: HitboxType) -> HitboxId {
        self.hitboxes.add(kind, self.owner)
    }

    pub fn ki(&self) -> &KiActions {
        &self.ki
    }

    pub fn ki_mut(&mut self) -> &mut KiActions {
        &mut self.ki
    }

    pub fn is_owner_dead(&self) -> bool {
        self.owner_dead
    }

    /// Request an attack. Accepted from Idle, or from Active while the
    /// current session's combo window is open.
    pub fn request_attack(
        &mut self,
        kind: AttackKind,
        now: f32,
        ctx: &mut CombatContext,
    ) -> AttackOutcome {
        if self.owner_dead {
            return AttackOutcome::Rejected(RejectReason::OwnerDead);
        }
        if let Some(session) = &self.session {
            if kind == AttackKind::Acrobatic {
                return AttackOutcome::Rejected(RejectReason::Busy);
            }
            if !session.accepts_combo() {
                log::debug!(
                    "Actor {} {:?} rejected: '{}' outside combo window",
                    self.owner,
                    kind,
                    session.definition().name
                );
                return AttackOutcome::Rejected(RejectReason::OutsideComboWindow);
            }
        }

        if kind.resets_chain() {
            self.combo_index = 0;
        } else if self
            .last_attack_time
            .is_some_and(|last| now - last > self.tuning.combo_reset_time)
        {
            self.combo_index = 0;
        }

        let definition = match kind {
            AttackKind::Light => self.style.light(self.combo_index),
            other => self.style.single(other),
        };
        let Some(definition) = definition.cloned() else {
            return AttackOutcome::Rejected(RejectReason::NoMove);
        };
        let Some(clip) = definition.clip.clone() else {
            log::warn!("Move '{}' has no clip bound; ignoring", definition.name);
            return AttackOutcome::Rejected(RejectReason::NoClip);
        };

        let chained = self.session.is_some();
        if chained {
            self.end_session(SessionEnd::Chained, ctx);
        }

        let session =
            ActiveSession::new(Arc::clone(&definition), self.tuning.session_seed_progress);
        ctx.movement
            .set_speed_multiplier(self.tuning.attack_speed(definition.is_heavy));
        ctx.movement.set_rotation_allowed(session.rotation_allowed());
        ctx.animation.play_attack(&clip);
        self.session = Some(session);

        if kind == AttackKind::Light && !self.style.light_attacks.is_empty() {
            self.combo_index = (self.combo_index + 1) % self.style.light_attacks.len();
        }
        self.last_attack_time = Some(now);

        log::info!(
            "Actor {} started '{}'{}",
            self.owner,
            definition.name,
            if chained { " (chained)" } else { "" }
        );
        AttackOutcome::Started {
            name: definition.name.clone(),
            chained,
        }
    }

    /// Sample the animation engine once and advance the timeline
    pub fn update(&mut self, ctx: &mut CombatContext) -> TickReport {
        let sample = ctx.animation.sample();
        self.tick(sample, ctx)
    }

    /// Advance the active session to `sample`
    pub fn tick(&mut self, sample: PlaybackSample, ctx: &mut CombatContext) -> TickReport {
        let mut report = TickReport::default();
        let Some(session) = self.session.as_mut() else {
            return report;
        };

        if !sample.in_attack_state() {
            self.end_session(SessionEnd::Interrupted, ctx);
            report.ended = Some(SessionEnd::Interrupted);
            return report;
        }

        let progress = sample.progress;
        if progress >= 1.0 {
            let delta = session.advance_motion(1.0);
            if delta > 0.0 {
                let step = ctx.movement.facing() * delta;
                ctx.movement.apply_move(step);
                report.displacement = delta;
            }
            self.end_session(SessionEnd::Completed, ctx);
            report.ended = Some(SessionEnd::Completed);
            return report;
        }

        let delta = session.advance_motion(progress);
        if delta > 0.0 {
            let step = ctx.movement.facing() * delta;
            ctx.movement.apply_move(step);
            report.displacement = delta;
        }

        let definition = Arc::clone(session.definition());

        let should_open = definition.is_in_hit_window(progress);
        if should_open != session.hitbox_open {
            session.hitbox_open = should_open;
            if should_open {
                self.hitboxes
                    .open(definition.hitbox_type, &mut session.registry, ctx.colliders);
                report.hitbox_opened = true;
                log::debug!("'{}' hitbox open at {:.3}", definition.name, progress);
            } else {
                self.hitboxes.close(definition.hitbox_type, ctx.colliders);
                report.hitbox_closed = true;
                log::debug!("'{}' hitbox closed at {:.3}", definition.name, progress);
            }
        }

        session.combo_accept = definition.is_in_combo_window(progress);

        session.rotation_allowed = definition.can_rotate(progress);
        ctx.movement.set_rotation_allowed(session.rotation_allowed);

        report.cues_fired = session.fire_due_cues(progress, ctx.audio);

        if progress >= self.tuning.movement_release_progress && !session.movement_released {
            session.movement_released = true;
            ctx.movement.set_speed_multiplier(1.0);
        }

        report
    }

    /// Tear the session down and roll back every side effect it holds
    pub fn end_session(&mut self, reason: SessionEnd, ctx: &mut CombatContext) {
        let Some(session) = self.session.take() else {
            return;
        };

        let definition = session.definition();
        if session.is_hitbox_open() {
            self.hitboxes.close(definition.hitbox_type, ctx.colliders);
        }
        ctx.movement.set_speed_multiplier(1.0);
        ctx.movement.set_rotation_allowed(true);

        log::info!(
            "Actor {} '{}' ended: {:?} ({} hit)",
            self.owner,
            definition.name,
            reason,
            session.registry().len()
        );
    }

    /// Overlap-begin from the collision engine on one of this actor's volumes
    pub fn on_hitbox_overlap(
        &mut self,
        hitbox: HitboxId,
        target_root: ActorId,
        target: &mut dyn Damageable,
    ) -> HitResult {
        let Some(volume) = self.hitboxes.get(hitbox) else {
            return HitResult::Inactive;
        };
        let Some(session) = self.session.as_mut() else {
            return HitResult::Inactive;
        };

        let (definition, registry) = session.hit_context();
        let result = resolve_overlap(volume, Some(definition), registry, target_root, target);
        if let HitResult::Landed { target, damage } = result {
            log::info!(
                "Actor {} '{}' hit actor {} for {}",
                self.owner,
                definition.name,
                target,
                damage
            );
        }
        result
    }

    /// Owner died: cancel any attack and refuse new ones
    pub fn on_owner_death(&mut self, ctx: &mut CombatContext) {
        self.end_session(SessionEnd::OwnerDied, ctx);
        self.owner_dead = true;
        self.intent = AttackIntent::new(self.tuning.medium_hold_time);
        self.ki.set_blocking(false, 0.0);
    }

    pub fn revive(&mut self) {
        self.owner_dead = false;
        self.combo_index = 0;
        self.last_attack_time = None;
    }

    // Input intent

    pub fn press_attack(&mut self) {
        self.intent.press();
    }

    /// Release the attack button and request whatever the hold produced
    pub fn release_attack(&mut self, now: f32, ctx: &mut CombatContext) -> Option<AttackOutcome> {
        let kind = self.intent.release()?;
        Some(self.request_attack(kind, now, ctx))
    }

    /// Advance input timers by one fixed step
    pub fn advance_input(&mut self, dt: f32) {
        self.intent.update(dt);
    }

    // Ki

    pub fn set_blocking(&mut self, blocking: bool, now: f32) {
        if self.owner_dead {
            return;
        }
        self.ki.set_blocking(blocking, now);
    }

    /// Spend one ki unit on the action the current context calls for
    pub fn spend_ki(&mut self, now: f32) -> KiOutcome {
        if self.owner_dead {
            return KiOutcome::Insufficient;
        }
        self.ki.spend(now, self.session.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::SoundHandle;
    use crate::engine::audio::CueRecorder;
    use crate::game::combat::context::{AnimationDriver, MovementSink, PlaybackState};
    use crate::game::combat::curve::{Curve, MotionCurve};
    use crate::game::combat::health::{Faction, Health};
    use crate::game::combat::hitbox::test_support::RecordingColliders;
    use crate::game::combat::moves::{ClipRef, HitReaction};
    use approx::assert_abs_diff_eq;
    use glam::Vec2;

    #[derive(Debug, Default)]
    struct FakeAnimation {
        current: PlaybackSample,
        played: Vec<String>,
    }

    impl AnimationDriver for FakeAnimation {
        fn sample(&self) -> PlaybackSample {
            self.current
        }

        fn play_attack(&mut self, clip: &ClipRef) {
            self.played.push(clip.name.clone());
            self.current = PlaybackSample::attacking(0.0);
        }
    }

    #[derive(Debug)]
    struct FakeMovement {
        speed: f32,
        rotation: bool,
        moves: Vec<Vec2>,
        facing: Vec2,
    }

    impl Default for FakeMovement {
        fn default() -> Self {
            Self {
                speed: 1.0,
                rotation: true,
                moves: Vec::new(),
                facing: Vec2::X,
            }
        }
    }

    impl FakeMovement {
        fn travelled(&self) -> Vec2 {
            self.moves.iter().copied().sum()
        }
    }

    impl MovementSink for FakeMovement {
        fn set_speed_multiplier(&mut self, multiplier: f32) {
            self.speed = multiplier;
        }

        fn set_rotation_allowed(&mut self, allowed: bool) {
            self.rotation = allowed;
        }

        fn apply_move(&mut self, delta: Vec2) {
            self.moves.push(delta);
        }

        fn facing(&self) -> Vec2 {
            self.facing
        }
    }

    #[derive(Default)]
    struct Rig {
        animation: FakeAnimation,
        movement: FakeMovement,
        audio: CueRecorder,
        colliders: RecordingColliders,
    }

    impl Rig {
        fn ctx(&mut self) -> CombatContext<'_> {
            CombatContext {
                animation: &mut self.animation,
                movement: &mut self.movement,
                audio: &mut self.audio,
                colliders: &mut self.colliders,
            }
        }
    }

    const OWNER: ActorId = 1;
    const VICTIM: ActorId = 2;

    fn clip(name: &str) -> ClipRef {
        ClipRef::new(name, 1.0, 30.0)
    }

    fn lunge_curve() -> MotionCurve {
        MotionCurve::new(Curve::from_pairs(&[(0.0, 0.0), (0.5, 2.0), (1.0, 5.0)]))
    }

    fn style() -> FightingStyle {
        FightingStyle::new("ninja")
            .with_light(MoveDefinition::new("jab", clip("jab")).with_motion(lunge_curve(), 1.0))
            .with_light(MoveDefinition::new("cross", clip("cross")))
            .with_light(MoveDefinition::new("hook", clip("hook")).without_combo())
            .with_heavy(
                MoveDefinition::new("sweep", clip("sweep"))
                    .heavy()
                    .with_damage(30.0)
                    .with_hitbox(HitboxType::Foot, HitReaction::HeavyBack),
            )
    }

    fn controller() -> CombatController {
        let mut controller = CombatController::new(OWNER, style(), CombatTuning::default());
        controller.add_hitbox(HitboxType::Fist);
        controller.add_hitbox(HitboxType::Foot);
        controller
    }

    fn run(controller: &mut CombatController, rig: &mut Rig, progress: &[f32]) -> Vec<TickReport> {
        progress
            .iter()
            .map(|p| controller.tick(PlaybackSample::attacking(*p), &mut rig.ctx()))
            .collect()
    }

    #[test]
    fn test_starts_idle() {
        let controller = controller();
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.active_move().is_none());
    }

    #[test]
    fn test_accepted_request_sets_up_session() {
        let mut controller = controller();
        let mut rig = Rig::default();

        let outcome = controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        assert_eq!(
            outcome,
            AttackOutcome::Started {
                name: "jab".to_string(),
                chained: false
            }
        );
        assert_eq!(controller.state(), ControllerState::Active);
        assert_eq!(rig.animation.played, vec!["jab"]);
        assert_eq!(rig.movement.speed, 0.0);
        assert!(!rig.movement.rotation);
        assert_eq!(controller.combo_index(), 1);
    }

    #[test]
    fn test_heavy_attack_halves_speed() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Heavy, 0.0, &mut rig.ctx());
        assert_eq!(rig.movement.speed, 0.5);
    }

    #[test]
    fn test_hitbox_edges_fire_once_per_crossing() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

        let reports = run(
            &mut controller,
            &mut rig,
            &[0.0, 0.1, 0.25, 0.3, 0.45, 0.46, 1.0],
        );

        let opened: Vec<bool> = reports.iter().map(|r| r.hitbox_opened).collect();
        let closed: Vec<bool> = reports.iter().map(|r| r.hitbox_closed).collect();
        assert_eq!(opened, vec![false, false, true, false, false, false, false]);
        assert_eq!(closed, vec![false, false, false, false, false, true, false]);
        assert_eq!(reports[6].ended, Some(SessionEnd::Completed));

        // Only the fist volume (id 0) is touched
        assert_eq!(rig.colliders.calls, vec![(0, true), (0, false)]);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn test_motion_deltas_follow_curve() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

        let reports = run(&mut controller, &mut rig, &[0.0, 0.5, 1.0]);
        assert_eq!(reports[0].displacement, 0.0);
        assert_abs_diff_eq!(reports[1].displacement, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(reports[2].displacement, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(rig.movement.travelled().x, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(rig.movement.travelled().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_displacement_total_is_granularity_independent() {
        for steps in [2, 3, 7, 60, 997] {
            let mut controller = controller();
            let mut rig = Rig::default();
            controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

            let progress: Vec<f32> = (0..=steps).map(|i| i as f32 / steps as f32).collect();
            let total: f32 = run(&mut controller, &mut rig, &progress)
                .iter()
                .map(|r| r.displacement)
                .sum();
            assert_abs_diff_eq!(total, 5.0, epsilon = 1e-3);
        }
    }

    fn backstep_controller(validated: bool) -> CombatController {
        let curve = Curve::from_pairs(&[(0.0, 0.0), (0.5, 2.0), (1.0, 1.0)]);
        let mut backstep = MoveDefinition::new("backstep", clip("backstep"))
            .with_motion(MotionCurve::new(curve), 1.0);
        if validated {
            backstep.validate();
        }
        let style = FightingStyle::new("ninja").with_light(backstep);
        CombatController::new(OWNER, style, CombatTuning::default())
    }

    #[test]
    fn test_completion_never_reports_backward_motion() {
        let mut controller = backstep_controller(false);
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

        let reports = run(&mut controller, &mut rig, &[0.0, 0.5, 0.75, 1.0]);
        assert_eq!(reports[3].ended, Some(SessionEnd::Completed));
        assert!(reports.iter().all(|r| r.displacement >= 0.0));
        let reported: f32 = reports.iter().map(|r| r.displacement).sum();
        assert_abs_diff_eq!(reported, rig.movement.travelled().x, epsilon = 1e-5);
    }

    #[test]
    fn test_repaired_curve_total_matches_endpoints() {
        let mut controller = backstep_controller(true);
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

        let reports = run(&mut controller, &mut rig, &[0.0, 0.5, 0.75, 1.0]);
        let reported: f32 = reports.iter().map(|r| r.displacement).sum();
        assert_abs_diff_eq!(reported, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(rig.movement.travelled().x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_attach_collider_binds_known_volume() {
        let mut controller = controller();
        let handle = ColliderHandle::from_raw_parts(3, 0);

        assert!(controller.attach_collider(1, handle));
        assert_eq!(controller.hitboxes().get(1).unwrap().collider, Some(handle));
        assert!(controller.hitboxes().get(0).unwrap().collider.is_none());
        assert!(!controller.attach_collider(9, handle));
    }

    #[test]
    fn test_displacement_follows_facing() {
        let mut controller = controller();
        let mut rig = Rig::default();
        rig.movement.facing = Vec2::NEG_Y;
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.0, 0.5]);
        assert_abs_diff_eq!(rig.movement.travelled().y, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_loop_wrap_skips_displacement() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

        let reports = run(&mut controller, &mut rig, &[0.0, 0.6, 0.2, 0.6, 0.8]);
        assert_abs_diff_eq!(reports[1].displacement, 2.6, epsilon = 1e-5);
        assert_eq!(reports[2].displacement, 0.0);
        assert_eq!(reports[3].displacement, 0.0);
        assert_abs_diff_eq!(reports[4].displacement, 1.2, epsilon = 1e-5);
        assert!(rig.movement.moves.iter().all(|m| m.x > 0.0));
    }

    #[test]
    fn test_request_outside_combo_window_is_rejected() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.0, 0.3]);

        let outcome = controller.request_attack(AttackKind::Light, 0.3, &mut rig.ctx());
        assert_eq!(
            outcome,
            AttackOutcome::Rejected(RejectReason::OutsideComboWindow)
        );
        assert_eq!(controller.active_move().unwrap().name, "jab");
        assert_eq!(controller.combo_index(), 1);
        assert_eq!(rig.animation.played.len(), 1);
        assert_eq!(controller.session().unwrap().last_progress(), 0.3);
    }

    #[test]
    fn test_request_inside_combo_window_replaces_session() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.0, 0.3, 0.6]);
        assert!(controller.session().unwrap().accepts_combo());

        let outcome = controller.request_attack(AttackKind::Light, 0.6, &mut rig.ctx());
        assert_eq!(
            outcome,
            AttackOutcome::Started {
                name: "cross".to_string(),
                chained: true
            }
        );
        let session = controller.session().unwrap();
        assert!(session.registry().is_empty());
        assert!(!session.is_hitbox_open());
        assert!(session.last_progress() < 0.0);
        assert_eq!(rig.animation.played, vec!["jab", "cross"]);
    }

    #[test]
    fn test_combo_chain_wraps_and_times_out() {
        let mut controller = controller();
        let mut rig = Rig::default();
        let mut names = Vec::new();

        for now in [0.0, 0.5, 1.0, 1.5] {
            if let AttackOutcome::Started { name, .. } =
                controller.request_attack(AttackKind::Light, now, &mut rig.ctx())
            {
                names.push(name);
            }
            run(&mut controller, &mut rig, &[1.0]);
        }
        assert_eq!(names, vec!["jab", "cross", "hook", "jab"]);

        // Too long since the last attack
        controller.request_attack(AttackKind::Light, 5.0, &mut rig.ctx());
        assert_eq!(controller.active_move().unwrap().name, "jab");
    }

    #[test]
    fn test_heavy_resets_chain() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[1.0]);
        controller.request_attack(AttackKind::Heavy, 0.2, &mut rig.ctx());
        run(&mut controller, &mut rig, &[1.0]);
        assert_eq!(controller.combo_index(), 0);

        controller.request_attack(AttackKind::Light, 0.4, &mut rig.ctx());
        assert_eq!(controller.active_move().unwrap().name, "jab");
    }

    #[test]
    fn test_disabled_combo_never_accepts() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.combo_index = 2;
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.0, 0.6, 0.9, 0.99]);
        assert!(!controller.session().unwrap().accepts_combo());
    }

    #[test]
    fn test_move_without_clip_is_noop() {
        let mut style = FightingStyle::new("broken");
        style.heavy_attack = Some(Arc::new(MoveDefinition::default()));
        let mut controller = CombatController::new(OWNER, style, CombatTuning::default());
        let mut rig = Rig::default();

        assert_eq!(
            controller.request_attack(AttackKind::Heavy, 0.0, &mut rig.ctx()),
            AttackOutcome::Rejected(RejectReason::NoClip)
        );
        assert_eq!(
            controller.request_attack(AttackKind::Special, 0.0, &mut rig.ctx()),
            AttackOutcome::Rejected(RejectReason::NoMove)
        );
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(rig.animation.played.is_empty());
        assert_eq!(rig.movement.speed, 1.0);
    }

    #[test]
    fn test_acrobatic_only_from_neutral() {
        let style = style().with_acrobatic(MoveDefinition::new("flip", clip("flip")));
        let mut controller = CombatController::new(OWNER, style, CombatTuning::default());
        let mut rig = Rig::default();

        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.6]);
        assert_eq!(
            controller.request_attack(AttackKind::Acrobatic, 0.5, &mut rig.ctx()),
            AttackOutcome::Rejected(RejectReason::Busy)
        );

        run(&mut controller, &mut rig, &[1.0]);
        assert!(controller
            .request_attack(AttackKind::Acrobatic, 0.6, &mut rig.ctx())
            .is_started());
    }

    #[test]
    fn test_state_mismatch_rolls_back_everything() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Heavy, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.0, 0.3]);
        assert_eq!(rig.colliders.opens(), 1);

        let report = controller.tick(
            PlaybackSample::new(0.35, PlaybackState::HitReaction),
            &mut rig.ctx(),
        );
        assert_eq!(report.ended, Some(SessionEnd::Interrupted));
        assert_eq!(report.displacement, 0.0);
        assert_eq!(rig.colliders.closes(), 1);
        assert!(controller.hitboxes().iter().all(|v| !v.is_enabled()));
        assert_eq!(rig.movement.speed, 1.0);
        assert!(rig.movement.rotation);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn test_rotation_follows_move_rule() {
        let style = FightingStyle::new("spin")
            .with_light(MoveDefinition::new("spin", clip("spin")).with_rotation_until(0.3));
        let mut controller = CombatController::new(OWNER, style, CombatTuning::default());
        let mut rig = Rig::default();

        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        assert!(rig.movement.rotation);
        run(&mut controller, &mut rig, &[0.1]);
        assert!(rig.movement.rotation);
        run(&mut controller, &mut rig, &[0.3]);
        assert!(!rig.movement.rotation);
        assert!(!controller.session().unwrap().rotation_allowed());
    }

    #[test]
    fn test_movement_released_before_completion() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

        run(&mut controller, &mut rig, &[0.5, 0.94]);
        assert_eq!(rig.movement.speed, 0.0);
        run(&mut controller, &mut rig, &[0.95]);
        assert_eq!(rig.movement.speed, 1.0);
        assert_eq!(controller.state(), ControllerState::Active);
    }

    #[test]
    fn test_audio_cues_fire_once() {
        let whoosh = SoundHandle::from_path("sounds/whoosh.ogg");
        let style = FightingStyle::new("ninja").with_light(
            MoveDefinition::new("jab", clip("jab")).with_audio_cue(0.2, whoosh),
        );
        let mut controller = CombatController::new(OWNER, style, CombatTuning::default());
        let mut rig = Rig::default();

        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        let reports = run(&mut controller, &mut rig, &[0.1, 0.2, 0.3, 0.1, 0.5]);
        assert_eq!(
            reports.iter().map(|r| r.cues_fired).collect::<Vec<_>>(),
            vec![0, 1, 0, 0, 0]
        );
        assert_eq!(rig.audio.count(whoosh), 1);
    }

    #[test]
    fn test_one_damage_per_activation() {
        let mut controller = controller();
        let mut rig = Rig::default();
        let mut victim = Health::new(100.0, Faction::Enemy);

        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.0, 0.3]);

        let results: Vec<HitResult> = (0..5)
            .map(|_| controller.on_hitbox_overlap(0, VICTIM, &mut victim))
            .collect();
        assert!(results[0].landed());
        assert!(results[1..].iter().all(|r| *r == HitResult::AlreadyHit));
        assert_eq!(victim.current(), 90.0);

        // Same window, still open on the next tick
        run(&mut controller, &mut rig, &[0.35]);
        controller.on_hitbox_overlap(0, VICTIM, &mut victim);
        assert_eq!(victim.current(), 90.0);
    }

    #[test]
    fn test_new_activation_can_hit_again() {
        let mut controller = controller();
        let mut rig = Rig::default();
        let mut victim = Health::new(100.0, Faction::Enemy);

        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.3]);
        controller.on_hitbox_overlap(0, VICTIM, &mut victim);
        run(&mut controller, &mut rig, &[0.6]);

        controller.request_attack(AttackKind::Light, 0.6, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.3]);
        assert!(controller.on_hitbox_overlap(0, VICTIM, &mut victim).landed());
        assert_eq!(victim.current(), 80.0);
    }

    #[test]
    fn test_overlap_rules() {
        let mut controller = controller();
        let mut rig = Rig::default();
        let mut victim = Health::new(100.0, Faction::Enemy);

        // Idle
        assert_eq!(
            controller.on_hitbox_overlap(0, VICTIM, &mut victim),
            HitResult::Inactive
        );

        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.1]);
        // Window not open yet
        assert_eq!(
            controller.on_hitbox_overlap(0, VICTIM, &mut victim),
            HitResult::Inactive
        );

        run(&mut controller, &mut rig, &[0.3]);
        let mut me = Health::new(100.0, Faction::Player);
        assert_eq!(
            controller.on_hitbox_overlap(0, OWNER, &mut me),
            HitResult::SelfHit
        );
        // Foot volume is closed during a fist move
        assert_eq!(
            controller.on_hitbox_overlap(1, VICTIM, &mut victim),
            HitResult::Inactive
        );
        assert_eq!(
            controller.on_hitbox_overlap(7, VICTIM, &mut victim),
            HitResult::Inactive
        );
        assert_eq!(victim.current(), 100.0);
    }

    #[test]
    fn test_owner_death_cancels_and_blocks() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());
        run(&mut controller, &mut rig, &[0.3]);

        controller.on_owner_death(&mut rig.ctx());
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(rig.colliders.closes(), 1);
        assert_eq!(
            controller.request_attack(AttackKind::Light, 0.5, &mut rig.ctx()),
            AttackOutcome::Rejected(RejectReason::OwnerDead)
        );

        controller.revive();
        assert!(controller
            .request_attack(AttackKind::Light, 0.6, &mut rig.ctx())
            .is_started());
    }

    #[test]
    fn test_update_samples_driver() {
        let mut controller = controller();
        let mut rig = Rig::default();
        controller.request_attack(AttackKind::Light, 0.0, &mut rig.ctx());

        rig.animation.current = PlaybackSample::attacking(0.5);
        let report = controller.update(&mut rig.ctx());
        assert_abs_diff_eq!(report.displacement, 2.0, epsilon = 1e-5);

        rig.animation.current = PlaybackSample::new(0.0, PlaybackState::Locomotion);
        assert_eq!(
            controller.update(&mut rig.ctx()).ended,
            Some(SessionEnd::Interrupted)
        );
    }

    #[test]
    fn test_hold_release_requests_medium() {
        let style = style().with_medium(MoveDefinition::new("palm", clip("palm")));
        let mut controller = CombatController::new(OWNER, style, CombatTuning::default());
        let mut rig = Rig::default();

        controller.press_attack();
        for _ in 0..61 {
            controller.advance_input(1.0 / 60.0);
        }
        let outcome = controller.release_attack(1.0, &mut rig.ctx());
        assert_eq!(
            outcome,
            Some(AttackOutcome::Started {
                name: "palm".to_string(),
                chained: false
            })
        );
        assert!(controller.release_attack(1.1, &mut rig.ctx()).is_none());
    }

    #[test]
    fn test_ki_dispatch_reads_session() {
        let mut controller = controller();
        let mut rig = Rig::default();

        assert_eq!(controller.spend_ki(0.0), KiOutcome::PowerUp);
        controller.request_attack(AttackKind::Light, 0.1, &mut rig.ctx());
        assert_eq!(controller.spend_ki(0.2), KiOutcome::Reserved);
        assert_eq!(controller.ki().meter().units(), 2);

        controller.set_blocking(true, 0.3);
        assert_eq!(controller.spend_ki(0.4), KiOutcome::Parry { success: true });
        assert_eq!(controller.ki().meter().units(), 1);
    }
}
