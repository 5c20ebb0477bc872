//! Game state snapshot: the complete visible state after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{CombatEvent, EntityId};
use crate::types::{Position, SimTime};

/// Complete game state handed to the outer layers after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Current level (1-based), 0 before the first `StartLevel`.
    pub level: u32,
    pub score: u64,
    pub coins: u64,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub objectives: Vec<ObjectiveView>,
    pub armament: Vec<AmmoView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<CombatEvent>,
}

/// The aircraft as the HUD sees it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub alive: bool,
    pub position: Position,
    /// Hull rotation (radians).
    pub rotation: f64,
    pub hp: f64,
    pub max_hp: f64,
    /// Gun angle relative to the hull.
    pub gun_rotation: f64,
    /// Current auto-aim target.
    pub aim_target: Option<EntityId>,
    pub locking: bool,
    /// Current multi-missile locks, nearest first.
    pub locks: Vec<EntityId>,
    pub bomb_bay_armed: bool,
    pub powered_up: bool,
}

/// One live enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub archetype: Archetype,
    pub position: Position,
    pub hp: f64,
    pub max_hp: f64,
    /// Behavior state label for debugging overlays.
    pub behavior: String,
    pub burning: bool,
}

/// Progress toward one level objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub archetype: Archetype,
    pub label: String,
    pub destroyed: u32,
    pub target: u32,
}

/// One weapon slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmoView {
    pub weapon: PlayerWeapon,
    pub unlocked: bool,
    /// Rounds left; `None` is unlimited.
    pub ammo: Option<u32>,
    /// True when the weapon could fire right now.
    pub ready: bool,
}
