// Hitbox volumes and the per-activation hit registry
//
// A volume is a collision proxy tied to a body part or weapon. The collision
// engine owns its geometry; the controller only switches it on and off and
// resolves the overlaps it reports.

use std::collections::HashSet;

use crate::engine::physics::ColliderHandle;
use crate::game::characters::ActorId;

use super::context::{Damageable, HitboxColliders};
use super::moves::{HitboxType, MoveDefinition};

/// Index of a volume within its owner's hitbox set
pub type HitboxId = usize;

/// Collision proxy for one body part or weapon
#[derive(Debug, Clone)]
pub struct HitboxVolume {
    pub id: HitboxId,
    pub kind: HitboxType,
    /// Actor this volume belongs to (non-owning)
    pub owner: ActorId,
    /// Geometry in the collision engine, if any
    pub collider: Option<ColliderHandle>,
    enabled: bool,
}

impl HitboxVolume {
    pub fn new(id: HitboxId, kind: HitboxType, owner: ActorId) -> Self {
        Self {
            id,
            kind,
            owner,
            collider: None,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start detecting overlaps
    pub fn activate(&mut self, colliders: &mut dyn HitboxColliders) {
        self.enabled = true;
        colliders.set_hitbox_enabled(self, true);
    }

    /// Stop detecting overlaps. The registry is left alone so a late overlap
    /// from the same window still finds its target already struck.
    pub fn deactivate(&mut self, colliders: &mut dyn HitboxColliders) {
        self.enabled = false;
        colliders.set_hitbox_enabled(self, false);
    }
}

/// Targets already damaged during the current activation
#[derive(Debug, Default)]
pub struct HitRegistry {
    struck: HashSet<ActorId>,
}

impl HitRegistry {
    pub fn new() -> Self {
        Self {
            struck: HashSet::new(),
        }
    }

    pub fn clear(&mut self) {
        self.struck.clear();
    }

    pub fn contains(&self, target: ActorId) -> bool {
        self.struck.contains(&target)
    }

    /// Record a hit; `false` if the target was already registered
    pub fn register(&mut self, target: ActorId) -> bool {
        self.struck.insert(target)
    }

    pub fn len(&self) -> usize {
        self.struck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.struck.is_empty()
    }
}

/// Outcome of one overlap-begin callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResult {
    /// Damage applied and target registered
    Landed { target: ActorId, damage: f32 },
    /// Volume closed or no attack playing
    Inactive,
    TargetDead,
    /// Overlap with the owner's own body
    SelfHit,
    /// Target already struck during this activation
    AlreadyHit,
}

impl HitResult {
    pub fn landed(&self) -> bool {
        matches!(self, Self::Landed { .. })
    }
}

/// Resolve one overlap between an open volume and a candidate target
pub fn resolve_overlap(
    volume: &HitboxVolume,
    active_move: Option<&MoveDefinition>,
    registry: &mut HitRegistry,
    target_root: ActorId,
    target: &mut dyn Damageable,
) -> HitResult {
    let Some(mv) = active_move.filter(|_| volume.is_enabled()) else {
        return HitResult::Inactive;
    };

    if target.is_dead() {
        return HitResult::TargetDead;
    }
    if target_root == volume.owner {
        return HitResult::SelfHit;
    }
    if registry.contains(target_root) {
        return HitResult::AlreadyHit;
    }

    target.apply_damage(mv.damage, mv.reaction);
    registry.register(target_root);
    HitResult::Landed {
        target: target_root,
        damage: mv.damage,
    }
}

/// All hitbox volumes of one actor
#[derive(Debug, Default)]
pub struct HitboxSet {
    volumes: Vec<HitboxVolume>,
}

impl HitboxSet {
    pub fn new() -> Self {
        Self {
            volumes: Vec::new(),
        }
    }

    /// Add a volume and return its id
    pub fn add(&mut self, kind: HitboxType, owner: ActorId) -> HitboxId {
        let id = self.volumes.len();
        self.volumes.push(HitboxVolume::new(id, kind, owner));
        id
    }

    pub fn get(&self, id: HitboxId) -> Option<&HitboxVolume> {
        self.volumes.get(id)
    }

    pub fn get_mut(&mut self, id: HitboxId) -> Option<&mut HitboxVolume> {
        self.volumes.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitboxVolume> {
        self.volumes.iter()
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Clear the hit registry once for the new activation, then enable every
    /// volume of `kind`. Returns how many opened.
    pub fn open(
        &mut self,
        kind: HitboxType,
        registry: &mut HitRegistry,
        colliders: &mut dyn HitboxColliders,
    ) -> usize {
        registry.clear();
        let mut opened = 0;
        for volume in self.volumes.iter_mut().filter(|v| v.kind == kind) {
            volume.activate(colliders);
            opened += 1;
        }
        opened
    }

    /// Deactivate every volume of `kind`, returning how many closed
    pub fn close(&mut self, kind: HitboxType, colliders: &mut dyn HitboxColliders) -> usize {
        let mut closed = 0;
        for volume in self.volumes.iter_mut().filter(|v| v.kind == kind) {
            volume.deactivate(colliders);
            closed += 1;
        }
        closed
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::game::combat::moves::HitReaction;

    /// Collider switch that records every call
    #[derive(Debug, Default)]
    pub struct RecordingColliders {
        pub calls: Vec<(HitboxId, bool)>,
    }

    impl RecordingColliders {
        pub fn opens(&self) -> usize {
            self.calls.iter().filter(|(_, on)| *on).count()
        }

        pub fn closes(&self) -> usize {
            self.calls.iter().filter(|(_, on)| !*on).count()
        }
    }

    impl HitboxColliders for RecordingColliders {
        fn set_hitbox_enabled(&mut self, volume: &HitboxVolume, enabled: bool) {
            self.calls.push((volume.id, enabled));
        }
    }

    /// Damageable that counts applications
    #[derive(Debug, Default)]
    pub struct Dummy {
        pub hits: Vec<(f32, HitReaction)>,
        pub dead: bool,
    }

    impl Damageable for Dummy {
        fn apply_damage(&mut self, amount: f32, reaction: HitReaction) {
            self.hits.push((amount, reaction));
        }

        fn is_dead(&self) -> bool {
            self.dead
        }
    }
}
