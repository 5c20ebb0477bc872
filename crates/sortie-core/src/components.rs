//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems and in the behavior crate, not components.
//! `Position` and `Velocity` from `types.rs` are used as components too.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Current and maximum hit points. `current` may dip below zero for the
/// frame an entity dies; anything at or below zero is dead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Facing of the hull (radians).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Heading(pub f64);

/// Archetype tag stored on every enemy at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArchetypeTag(pub Archetype);

/// Marks the player aircraft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Game time of the first hit this entity took. Set once, never reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FirstDamage {
    pub at_ms: f64,
}

/// Marks an entity as inactive. Set the moment it dies; the entity is
/// despawned by cleanup at the end of the tick and never comes back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Destroyed;

/// Drone behavior state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneBrain {
    pub state: DroneState,
    /// Rounds left before the drone commits to a kamikaze run.
    pub ammo: u32,
    /// Earliest game time the next round may leave the gun.
    pub next_fire_ms: f64,
    /// Accumulated weave phase (radians) while skirmishing.
    pub weave_phase: f64,
    /// Spawn cruise speed.
    pub base_speed: f64,
    /// Current cruise speed (raised on kamikaze).
    pub speed: f64,
}

/// Infantry behavior state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfantryBrain {
    pub state: InfantryState,
    /// Game time the current Idle/Roam spell began.
    pub state_since_ms: f64,
    /// Rounds remaining in the current burst.
    pub burst_left: u32,
    /// Earliest game time for the next round in the burst.
    pub next_shot_ms: f64,
    /// Game time the last burst finished.
    pub last_burst_ms: f64,
    pub base_speed: f64,
    /// Gun angle; tracks the player while in combat.
    pub aim: f64,
}

/// Periodic-fire brain for towers, tanks and flak cannons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretBrain {
    pub state: TurretState,
    /// Gun angle.
    pub aim: f64,
    /// Earliest game time for the next shot.
    pub next_fire_ms: f64,
    /// Alternating barrel for twin-barrel mounts.
    pub barrel_index: u8,
    /// Top lateral patrol speed; zero for fixed emplacements.
    pub drift_speed: f64,
}

/// Drone hangar launch timer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HangarBrain {
    pub next_spawn_ms: f64,
}

/// Burn status applied by flame contact. Refreshed, never stacked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Burning {
    pub until_ms: f64,
}

/// A patch of burning ground left by flame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroundFire {
    pub until_ms: f64,
}
