// Actor system
//
// This module contains everything an actor needs besides combat itself:
// - Actor data structure and management
// - Actor stats and properties
// - Locomotion with speed and rotation gates
// - Clip playback that combat samples each step

pub mod animation;
pub mod character;
pub mod movement;
pub mod stats;

// Re-export commonly used types
pub use animation::{AnimationClip, ClipPlayer};
pub use character::{Actor, ActorId, ActorManager};
pub use movement::Locomotion;
pub use stats::ActorStats;
