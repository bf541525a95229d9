// Combat timeline engine
//
// Animation-synchronized melee combat: hit, combo, rotation, root-motion and
// audio windows driven by normalized clip progress on a fixed step.

pub mod core;
pub mod engine;
pub mod game;
