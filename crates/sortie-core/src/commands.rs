//! Commands fed to the simulation.
//!
//! Gameplay commands come from the input layer. The collision layer, which
//! lives outside the simulation, reports overlaps through the physics
//! notifications. All commands are queued and applied at the next tick
//! boundary in arrival order.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{EntityId, SourceId};
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Flow ---
    /// Begin a level (1-based). Score, coins and upgrades carry over.
    StartLevel { level: u32 },
    Pause,
    Resume,

    // --- Flight and weapons ---
    /// Current aircraft pose from the flight model.
    SetPlayerPose {
        position: Position,
        rotation: f64,
    },
    /// Pull or release the trigger of a held weapon.
    PressTrigger { weapon: PlayerWeapon, held: bool },
    /// Arm or safe the bomb bay.
    ToggleBombBay,
    /// Start sweeping for multi-missile locks.
    BeginLock,
    /// Fire multi-missiles at whatever is locked.
    ReleaseLock,
    CollectPowerUp,
    PurchaseUpgrade {
        weapon: PlayerWeapon,
        kind: UpgradeKind,
    },

    // --- Physics notifications ---
    /// A player projectile touched an enemy. Sawblade and flame hits are
    /// per-frame contacts and deal damage-per-second over `dt_ms`.
    WeaponHit {
        weapon: PlayerWeapon,
        target: EntityId,
        source: Option<SourceId>,
        position: Position,
        dt_ms: f64,
    },
    /// A bomb or cluster missile went off at `position` without a direct
    /// hit (ground impact).
    Explosion {
        weapon: PlayerWeapon,
        position: Position,
        source: Option<SourceId>,
    },
    /// An enemy projectile hit the aircraft.
    PlayerStruck { weapon: EnemyWeapon },
    /// A flak shell detonated. A direct hit deals full damage; otherwise the
    /// burst splashes the aircraft if it is close enough.
    FlakBurst { position: Position, direct: bool },
    /// A drone collided with the aircraft.
    DroneRam { drone: EntityId },
    /// The aircraft is touching terrain this frame.
    TerrainScrape { dt_ms: f64 },
    /// A flame blob touched an enemy: refresh its burn.
    FlameContact { target: EntityId },
    /// A flame blob hit the ground and left a fire.
    IgniteGround { position: Position },
}
