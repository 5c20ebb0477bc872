//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only). They do not own state: entity state lives in components and
//! match-wide state is passed in by the engine.

pub mod behavior;
pub mod burn;
pub mod cleanup;
pub mod impacts;
pub mod movement;
pub mod reinforcements;
pub mod snapshot;
pub mod targeting;
pub mod weapons;
