//! Simulation engine for SORTIE.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the outer layers.

pub mod armament;
pub mod combat;
pub mod combo;
pub mod economy;
pub mod engine;
pub mod handles;
pub mod systems;
pub mod world_setup;

pub use sortie_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
