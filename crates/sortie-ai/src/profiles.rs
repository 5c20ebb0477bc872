//! Archetype-specific behavior profiles.
//!
//! Maps each archetype to the machine that drives it and the weapon it fires.

use sortie_core::enums::{Archetype, EnemyWeapon};

/// Which state machine drives an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    Drone,
    Infantry,
    /// Periodic fire from a fixed or drifting mount.
    Turret,
    /// Launches drones, never shoots.
    Hangar,
}

/// Behavioral profile for an archetype.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorProfile {
    pub kind: BehaviorKind,
    pub weapon: Option<EnemyWeapon>,
    /// Gun slews toward the player instead of snapping.
    pub slewing_turret: bool,
    /// Patrols sideways along the ground.
    pub drifts: bool,
    /// Fires only through the configured flak arc.
    pub arc_limited: bool,
    /// Alternates between two barrels.
    pub twin_barrel: bool,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: Archetype) -> BehaviorProfile {
    let turret = BehaviorProfile {
        kind: BehaviorKind::Turret,
        weapon: None,
        slewing_turret: false,
        drifts: false,
        arc_limited: false,
        twin_barrel: false,
    };
    match archetype {
        Archetype::Tank => BehaviorProfile {
            weapon: Some(EnemyWeapon::TankShell),
            slewing_turret: true,
            drifts: true,
            ..turret
        },
        Archetype::T95 => BehaviorProfile {
            weapon: Some(EnemyWeapon::T95Shell),
            slewing_turret: true,
            drifts: true,
            ..turret
        },
        Archetype::Tower => BehaviorProfile {
            weapon: Some(EnemyWeapon::HomingMissile),
            ..turret
        },
        Archetype::FlakCannon => BehaviorProfile {
            weapon: Some(EnemyWeapon::FlakShell),
            arc_limited: true,
            twin_barrel: true,
            ..turret
        },
        Archetype::Drone => BehaviorProfile {
            kind: BehaviorKind::Drone,
            weapon: Some(EnemyWeapon::DroneBullet),
            ..turret
        },
        Archetype::Infantry => BehaviorProfile {
            kind: BehaviorKind::Infantry,
            weapon: Some(EnemyWeapon::InfantryBullet),
            ..turret
        },
        Archetype::Hangar => BehaviorProfile {
            kind: BehaviorKind::Hangar,
            ..turret
        },
    }
}
