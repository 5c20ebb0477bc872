//! Events emitted by the simulation for effects, HUD and persistence.
//!
//! The engine queues these during a tick and drains them into the snapshot,
//! so a subscriber sees every event exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Correlates the victims of one explosive event for combo scoring.
/// Not an entity; two hits sharing an id were caused by the same shot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable, serializable entity handle. Looked up, never dereferenced blindly:
/// an id whose entity is gone simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Everything the outer layers can react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// An enemy died. Emitted once per entity.
    Destroyed {
        id: EntityId,
        archetype: Archetype,
        position: Position,
        damage_type: DamageType,
        source: Option<SourceId>,
    },
    /// Score applied to the running total.
    ScoreAwarded { amount: u64, total: u64 },
    /// Coins applied to the wallet.
    CoinsAwarded {
        amount: u64,
        total: u64,
        position: Position,
    },
    FloatingText {
        position: Position,
        text: String,
        color: TextColor,
    },
    /// Player hp changed. `hp` is floored at zero for display.
    PlayerHealth { hp: f64, max_hp: f64 },
    GameOver { level: u32, score: u64 },
    LevelComplete { level: u32, score: u64, coins: u64 },
    /// Final level cleared.
    Victory { score: u64, coins: u64 },
    EnemyFired {
        id: EntityId,
        archetype: Archetype,
        weapon: EnemyWeapon,
        position: Position,
        rotation: f64,
    },
    PlayerFired {
        weapon: PlayerWeapon,
        source: Option<SourceId>,
        position: Position,
        rotation: f64,
        target: Option<EntityId>,
    },
    DroneLaunched {
        hangar: EntityId,
        drone: EntityId,
        position: Position,
    },
    /// A blast worth drawing.
    ExplosionFx { position: Position, radius: f64 },
    WeaponNotice {
        weapon: PlayerWeapon,
        notice: WeaponNotice,
    },
    UpgradePurchased {
        weapon: PlayerWeapon,
        kind: UpgradeKind,
        cost: u64,
        coins_left: u64,
    },
}
