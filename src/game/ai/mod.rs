// AI for enemies and companions

pub mod pursuit;

pub use pursuit::{Candidate, PursuitBrain, PursuitState, PursuitTuning, SelfView, Steering};
