//! Enemy behavior and targeting for SORTIE.
//!
//! Implements the target selector used by auto-aim and lock-on, and the
//! per-archetype behavior state machines. Everything here is a pure function
//! over plain data; the simulation crate owns the world and applies results.

pub mod drone;
pub mod infantry;
pub mod profiles;
pub mod targeting;
pub mod turret;

pub use sortie_core as core;
