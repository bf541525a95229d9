// Combat system
//
// This module contains the attack timeline and everything it reads:
// - Move definitions, curves and the root-motion extractor (authoring data)
// - The combat controller and its active session (runtime state machine)
// - Hitbox volumes, the hit registry and health
// - Ki meter and attack input intent

pub mod context;
pub mod controller;
pub mod curve;
pub mod extractor;
pub mod health;
pub mod hitbox;
pub mod intent;
pub mod ki;
pub mod moves;
pub mod session;
pub mod style;
pub mod tuning;

// Re-export commonly used types
pub use context::{
    AnimationDriver, AudioSink, CombatContext, Damageable, HitboxColliders, MovementSink,
    NoColliders, PlaybackSample, PlaybackState,
};
pub use controller::{AttackOutcome, CombatController, ControllerState, RejectReason, TickReport};
pub use curve::{Curve, Keyframe, MotionCurve};
pub use extractor::{extract_forward_motion, ChannelBinding, ClipChannels, SampleMode};
pub use health::{Faction, Health, HealthEvent};
pub use hitbox::{HitRegistry, HitResult, HitboxId, HitboxSet, HitboxVolume};
pub use intent::AttackIntent;
pub use ki::{KiActions, KiOutcome, ResourceMeter};
pub use moves::{AudioCue, ClipRef, HitReaction, HitboxType, MoveDefinition};
pub use session::{ActiveSession, SessionEnd};
pub use style::{AttackKind, FightingStyle};
pub use tuning::CombatTuning;
