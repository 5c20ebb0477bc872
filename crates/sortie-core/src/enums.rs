//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype. Stored on every enemy at spawn and doubles as the
/// entity pool id for world queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Tank,
    T95,
    Tower,
    Hangar,
    Drone,
    Infantry,
    FlakCannon,
}

impl Archetype {
    /// Every archetype, in pool iteration order.
    pub const ALL: [Archetype; 7] = [
        Archetype::Tank,
        Archetype::T95,
        Archetype::Tower,
        Archetype::Infantry,
        Archetype::Drone,
        Archetype::Hangar,
        Archetype::FlakCannon,
    ];

    /// Pools the multi-missile radar can lock onto.
    pub const LOCKABLE: [Archetype; 5] = [
        Archetype::Tank,
        Archetype::T95,
        Archetype::Tower,
        Archetype::Drone,
        Archetype::Hangar,
    ];

    /// Pools a ground fire scorches.
    pub const GROUND_FIRE_VICTIMS: [Archetype; 3] =
        [Archetype::Tank, Archetype::T95, Archetype::Infantry];

    /// Units that sit on the ground line.
    pub fn is_ground_unit(&self) -> bool {
        !matches!(self, Archetype::Drone)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Archetype::Tank => "Tanks",
            Archetype::T95 => "T95",
            Archetype::Tower => "Towers",
            Archetype::Hangar => "Hangars",
            Archetype::Drone => "Drones",
            Archetype::Infantry => "Infantry",
            Archetype::FlakCannon => "Flak",
        }
    }
}

/// What dealt a piece of damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    MachineGun,
    Bomb,
    ClusterMissile,
    Sawblade,
    MultiMissile,
    Flame,
    FlameGround,
    Burn,
    ExplosionSplash,
    EnemyShell,
    EnemyMissile,
    DroneBullet,
    InfantryBullet,
    FlakDirect,
    FlakSplash,
    Kamikaze,
    Collision,
    SelfDestruct,
    Terrain,
}

/// Weapons carried by the player aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerWeapon {
    MachineGun,
    Bomb,
    Sawblade,
    ClusterMissile,
    MultiMissile,
    Flamethrower,
}

impl PlayerWeapon {
    pub const ALL: [PlayerWeapon; 6] = [
        PlayerWeapon::MachineGun,
        PlayerWeapon::Bomb,
        PlayerWeapon::Sawblade,
        PlayerWeapon::ClusterMissile,
        PlayerWeapon::MultiMissile,
        PlayerWeapon::Flamethrower,
    ];

    /// Damage type recorded when this weapon's projectile hits directly.
    pub fn damage_type(&self) -> DamageType {
        match self {
            PlayerWeapon::MachineGun => DamageType::MachineGun,
            PlayerWeapon::Bomb => DamageType::Bomb,
            PlayerWeapon::Sawblade => DamageType::Sawblade,
            PlayerWeapon::ClusterMissile => DamageType::ClusterMissile,
            PlayerWeapon::MultiMissile => DamageType::MultiMissile,
            PlayerWeapon::Flamethrower => DamageType::Flame,
        }
    }

    /// Prefix for source ids minted when this weapon fires.
    pub fn source_prefix(&self) -> &'static str {
        match self {
            PlayerWeapon::MachineGun => "mg",
            PlayerWeapon::Bomb => "bomb",
            PlayerWeapon::Sawblade => "sawblade",
            PlayerWeapon::ClusterMissile => "cluster",
            PlayerWeapon::MultiMissile => "multiMissile",
            PlayerWeapon::Flamethrower => "flame",
        }
    }
}

/// Weapons fired by enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyWeapon {
    TankShell,
    T95Shell,
    HomingMissile,
    DroneBullet,
    InfantryBullet,
    FlakShell,
}

impl EnemyWeapon {
    pub const ALL: [EnemyWeapon; 6] = [
        EnemyWeapon::TankShell,
        EnemyWeapon::T95Shell,
        EnemyWeapon::HomingMissile,
        EnemyWeapon::DroneBullet,
        EnemyWeapon::InfantryBullet,
        EnemyWeapon::FlakShell,
    ];

    /// Damage type recorded when this weapon strikes the player.
    pub fn damage_type(&self) -> DamageType {
        match self {
            EnemyWeapon::TankShell | EnemyWeapon::T95Shell => DamageType::EnemyShell,
            EnemyWeapon::HomingMissile => DamageType::EnemyMissile,
            EnemyWeapon::DroneBullet => DamageType::DroneBullet,
            EnemyWeapon::InfantryBullet => DamageType::InfantryBullet,
            EnemyWeapon::FlakShell => DamageType::FlakDirect,
        }
    }
}

/// Drone behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneState {
    /// Closing on the player.
    #[default]
    Approach,
    /// Weaving within firing range and shooting in bursts.
    Skirmish,
    /// Out of ammo; diving at the player. Terminal.
    Kamikaze,
}

/// Infantry behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfantryState {
    #[default]
    Idle,
    Roam,
    Combat,
}

/// Fixed emplacement and tank gun state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretState {
    #[default]
    Idle,
    Firing,
}

/// Upgrade categories sold in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    Cooldown,
    Ammo,
}

/// Why a trigger pull did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponNotice {
    Locked,
    OutOfAmmo,
    Recharging,
}

/// Floating text palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextColor {
    White,
    Yellow,
    Gold,
    Magenta,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Briefing,
    Active,
    Paused,
    LevelComplete,
    Victory,
    GameOver,
}
