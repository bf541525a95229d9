// Game layer: combat rules, actors, AI and the arena that runs them

pub mod ai;
pub mod arena;
pub mod characters;
pub mod combat;

pub use arena::{Arena, LandedHit, StepReport};
