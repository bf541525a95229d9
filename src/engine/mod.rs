// Engine modules: assets, audio, physics, simulation clock

pub mod assets;
pub mod audio;
pub mod game_loop;
pub mod physics;
