//! Static configuration tables.
//!
//! Everything here is read-only content: weapon, enemy and level data.
//! `Default` reproduces the shipped tuning; `GameConfig::from_json` loads an
//! override and refuses tables with gaps, so a missing reward entry fails at
//! startup instead of silently scoring zero mid-match.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::{Archetype, EnemyWeapon, PlayerWeapon};

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no stats for enemy archetype {0:?}")]
    MissingEnemy(Archetype),
    #[error("no stats for player weapon {0:?}")]
    MissingWeapon(PlayerWeapon),
    #[error("no stats for enemy weapon {0:?}")]
    MissingEnemyWeapon(EnemyWeapon),
    #[error("expected {expected} level definitions, found {found}")]
    LevelCount { expected: usize, found: usize },
    #[error("level {level}: {reason}")]
    InvalidLevel { level: u32, reason: &'static str },
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Per-archetype combat and reward stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: f64,
    /// Cruise or patrol speed before the level multiplier (units/s).
    pub speed: f64,
    /// Base score for a kill.
    pub score: f64,
    /// Coins for a kill.
    pub coins: u64,
    /// Detection or firing range. Zero for units that never shoot.
    pub range: f64,
}

/// Drone behavior tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneTuning {
    pub ammo: u32,
    /// Switch from approach to skirmish at or inside this distance.
    pub approach_range: f64,
    /// Back away when closer than this.
    pub back_off_distance: f64,
    /// Reverse speed while backing off (units/s).
    pub back_off_speed: f64,
    /// Speed up when farther than this.
    pub catch_up_distance: f64,
    pub skirmish_speed_factor: f64,
    pub catch_up_speed_factor: f64,
    pub kamikaze_speed_multiplier: f64,
    /// Turn rate per reference frame (radians).
    pub turn_rate: f64,
    pub kamikaze_turn_rate: f64,
    /// Weave phase advance per millisecond (radians).
    pub weave_rate: f64,
    /// Weave amplitude (radians).
    pub weave_amplitude: f64,
    /// Fire only while facing within this many degrees of the player.
    pub fire_cone_deg: f64,
    /// Damage to the player when a kamikaze drone rams.
    pub kamikaze_damage: f64,
    /// Damage to the player when any other drone rams.
    pub collision_damage: f64,
}

/// Infantry behavior tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfantryTuning {
    pub burst_count: u32,
    pub burst_delay_ms: f64,
    /// Pause between bursts (ms).
    pub cooldown_ms: f64,
    /// Combat ends when the player is beyond detection range times this.
    pub leash_factor: f64,
    pub idle_ms: f64,
    pub roam_ms: f64,
}

/// Player weapon stats. Mutated only by the upgrade shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Direct-hit damage.
    pub damage: f64,
    /// Splash damage dealt around the impact point.
    pub secondary_damage: f64,
    pub explosion_radius: f64,
    /// Minimum time between shots (ms).
    pub fire_rate_ms: f64,
    /// Rounds carried; `None` is unlimited.
    pub ammo: Option<u32>,
    /// Contact damage per second for sawblades and flame.
    pub damage_per_second: f64,
    pub range: f64,
}

/// Enemy weapon stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyWeaponStats {
    pub damage: f64,
    pub fire_rate_ms: f64,
    pub range: f64,
    pub splash_damage: f64,
    pub splash_radius: f64,
}

/// Angular window a flak cannon may fire through (degrees, screen bearing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiringArc {
    pub min_deg: f64,
    pub max_deg: f64,
}

/// One level definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Kills required per archetype. Absent archetypes have no objective.
    pub targets: BTreeMap<Archetype, u32>,
    pub enemy_speed_multiplier: f64,
    pub spawn_interval_multiplier: f64,
    pub unlocked_weapons: Vec<PlayerWeapon>,
}

/// Score bonuses and the combo window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub quick_kill_window_ms: f64,
    pub quick_kill_multiplier: f64,
    pub multi_kill_threshold: u32,
    pub multi_kill_multiplier: f64,
    pub combo_debounce_ms: f64,
}

/// Auto-aim and lock-on parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingConfig {
    pub auto_aim_range: f64,
    pub auto_aim_cone_deg: f64,
    pub tie_epsilon: f64,
    pub gun_lerp: f64,
    pub lock_range: f64,
    pub lock_max_targets: usize,
}

/// Reinforcement cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub reinforcement_interval_ms: f64,
    pub infantry_spawn_interval_ms: f64,
    pub hangar_spawn_interval_ms: f64,
    pub infantry_active_cap: usize,
    pub squad_min: u32,
    pub squad_max: u32,
    pub squad_spread: f64,
}

/// Flamethrower after-effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlameConfig {
    pub burn_duration_ms: f64,
    pub ground_fire_duration_ms: f64,
    pub ground_fire_radius: f64,
    pub ground_fire_dps_factor: f64,
}

/// Bomb power-up buff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpConfig {
    pub bomb_fire_rate_ms: f64,
    pub duration_ms: f64,
}

/// Upgrade shop prices and effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub damage_cost: u64,
    pub cooldown_cost: u64,
    pub ammo_cost: u64,
    pub damage_factor: f64,
    pub cooldown_factor: f64,
    pub cooldown_floor_ms: f64,
    pub ammo_factor: f64,
}

/// Player airframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_hp: f64,
    pub terrain_scrape_fraction_per_sec: f64,
}

/// Every static table the simulation reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerStats,
    pub enemies: BTreeMap<Archetype, EnemyStats>,
    pub drone: DroneTuning,
    pub infantry: InfantryTuning,
    pub weapons: BTreeMap<PlayerWeapon, WeaponStats>,
    pub enemy_weapons: BTreeMap<EnemyWeapon, EnemyWeaponStats>,
    pub flak_arc: FiringArc,
    pub levels: Vec<LevelSpec>,
    pub scoring: ScoringConfig,
    pub targeting: TargetingConfig,
    pub spawning: SpawnConfig,
    pub flame: FlameConfig,
    pub power_up: PowerUpConfig,
    pub shop: ShopConfig,
}

impl GameConfig {
    /// Parse a JSON override and validate it. Omitted top-level sections keep
    /// their defaults; a section that is present replaces the default whole.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every table is complete and every tunable is sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for archetype in Archetype::ALL {
            let stats = self
                .enemies
                .get(&archetype)
                .ok_or(ConfigError::MissingEnemy(archetype))?;
            positive("enemy hp", stats.hp)?;
            non_negative("enemy score", stats.score)?;
        }
        for weapon in PlayerWeapon::ALL {
            let stats = self
                .weapons
                .get(&weapon)
                .ok_or(ConfigError::MissingWeapon(weapon))?;
            non_negative("weapon fire rate", stats.fire_rate_ms)?;
        }
        for weapon in EnemyWeapon::ALL {
            let stats = self
                .enemy_weapons
                .get(&weapon)
                .ok_or(ConfigError::MissingEnemyWeapon(weapon))?;
            positive("enemy weapon fire rate", stats.fire_rate_ms)?;
        }

        if self.levels.len() != LEVEL_COUNT as usize {
            return Err(ConfigError::LevelCount {
                expected: LEVEL_COUNT as usize,
                found: self.levels.len(),
            });
        }
        for (i, level) in self.levels.iter().enumerate() {
            let number = i as u32 + 1;
            if level.enemy_speed_multiplier <= 0.0 {
                return Err(ConfigError::InvalidLevel {
                    level: number,
                    reason: "speed multiplier must be positive",
                });
            }
            if level.spawn_interval_multiplier <= 0.0 {
                return Err(ConfigError::InvalidLevel {
                    level: number,
                    reason: "spawn interval multiplier must be positive",
                });
            }
            if level.targets.values().all(|&t| t == 0) {
                return Err(ConfigError::InvalidLevel {
                    level: number,
                    reason: "no objectives",
                });
            }
        }

        let s = &self.scoring;
        non_negative("quick kill window", s.quick_kill_window_ms)?;
        non_negative("quick kill multiplier", s.quick_kill_multiplier)?;
        non_negative("multi kill multiplier", s.multi_kill_multiplier)?;
        positive("combo debounce", s.combo_debounce_ms)?;
        if s.multi_kill_threshold == 0 {
            return Err(ConfigError::OutOfRange {
                field: "multi kill threshold",
                value: 0.0,
            });
        }

        let t = &self.targeting;
        positive("auto aim range", t.auto_aim_range)?;
        positive("auto aim cone", t.auto_aim_cone_deg)?;
        non_negative("tie epsilon", t.tie_epsilon)?;
        positive("lock range", t.lock_range)?;
        if !(0.0..=1.0).contains(&t.gun_lerp) {
            return Err(ConfigError::OutOfRange {
                field: "gun lerp",
                value: t.gun_lerp,
            });
        }
        if t.lock_max_targets == 0 {
            return Err(ConfigError::OutOfRange {
                field: "lock max targets",
                value: 0.0,
            });
        }

        if self.spawning.squad_min > self.spawning.squad_max {
            return Err(ConfigError::OutOfRange {
                field: "squad size",
                value: self.spawning.squad_min as f64,
            });
        }
        positive("reinforcement interval", self.spawning.reinforcement_interval_ms)?;
        positive("infantry spawn interval", self.spawning.infantry_spawn_interval_ms)?;
        positive("hangar spawn interval", self.spawning.hangar_spawn_interval_ms)?;
        positive("player hp", self.player.max_hp)?;
        positive("cooldown floor", self.shop.cooldown_floor_ms)?;
        Ok(())
    }

    pub fn enemy(&self, archetype: Archetype) -> Option<&EnemyStats> {
        self.enemies.get(&archetype)
    }

    pub fn weapon(&self, weapon: PlayerWeapon) -> Option<&WeaponStats> {
        self.weapons.get(&weapon)
    }

    pub fn enemy_weapon(&self, weapon: EnemyWeapon) -> Option<&EnemyWeaponStats> {
        self.enemy_weapons.get(&weapon)
    }

    /// Level definition by 1-based number.
    pub fn level(&self, number: u32) -> Option<&LevelSpec> {
        number
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

// --- Defaults ---

fn default_enemies() -> BTreeMap<Archetype, EnemyStats> {
    let row = |hp, speed, score, coins, range| EnemyStats {
        hp,
        speed,
        score,
        coins,
        range,
    };
    BTreeMap::from([
        (Archetype::Tank, row(100.0, 150.0, 100.0, 1000, 300.0)),
        (Archetype::T95, row(300.0, 150.0, 500.0, 1500, 800.0)),
        (Archetype::Tower, row(150.0, 0.0, 120.0, 120, 300.0)),
        (Archetype::Hangar, row(200.0, 0.0, 200.0, 200, 0.0)),
        (Archetype::Drone, row(100.0, 200.0, 100.0, 100, 300.0)),
        (Archetype::Infantry, row(15.0, 50.0, 20.0, 5, 200.0)),
        (Archetype::FlakCannon, row(200.0, 0.0, 150.0, 150, 600.0)),
    ])
}

fn default_weapons() -> BTreeMap<PlayerWeapon, WeaponStats> {
    let zero = WeaponStats {
        damage: 0.0,
        secondary_damage: 0.0,
        explosion_radius: 0.0,
        fire_rate_ms: 0.0,
        ammo: None,
        damage_per_second: 0.0,
        range: 0.0,
    };
    BTreeMap::from([
        (
            PlayerWeapon::MachineGun,
            WeaponStats {
                damage: 15.0,
                fire_rate_ms: 200.0,
                ..zero.clone()
            },
        ),
        (
            PlayerWeapon::Bomb,
            WeaponStats {
                damage: 40.0,
                secondary_damage: 20.0,
                explosion_radius: 80.0,
                fire_rate_ms: 1000.0,
                ..zero.clone()
            },
        ),
        (
            PlayerWeapon::Sawblade,
            WeaponStats {
                fire_rate_ms: 5000.0,
                ammo: Some(3),
                damage_per_second: 30.0,
                range: 1000.0,
                ..zero.clone()
            },
        ),
        (
            PlayerWeapon::ClusterMissile,
            WeaponStats {
                damage: 100.0,
                secondary_damage: 20.0,
                explosion_radius: 80.0,
                fire_rate_ms: 1000.0,
                ammo: Some(10),
                ..zero.clone()
            },
        ),
        (
            PlayerWeapon::MultiMissile,
            WeaponStats {
                damage: 100.0,
                explosion_radius: MULTI_MISSILE_BLAST_RADIUS,
                fire_rate_ms: 1000.0,
                ammo: Some(10),
                range: 200.0,
                ..zero.clone()
            },
        ),
        (
            PlayerWeapon::Flamethrower,
            WeaponStats {
                fire_rate_ms: 40.0,
                damage_per_second: 20.0,
                range: 400.0,
                ..zero
            },
        ),
    ])
}

fn default_enemy_weapons() -> BTreeMap<EnemyWeapon, EnemyWeaponStats> {
    let row = |damage, fire_rate_ms, range, splash_damage, splash_radius| EnemyWeaponStats {
        damage,
        fire_rate_ms,
        range,
        splash_damage,
        splash_radius,
    };
    BTreeMap::from([
        (EnemyWeapon::TankShell, row(50.0, 2000.0, 600.0, 0.0, 0.0)),
        (EnemyWeapon::T95Shell, row(80.0, 1500.0, 800.0, 0.0, 0.0)),
        (EnemyWeapon::HomingMissile, row(80.0, 10_000.0, 300.0, 0.0, 0.0)),
        (EnemyWeapon::DroneBullet, row(10.0, 250.0, 300.0, 0.0, 0.0)),
        (EnemyWeapon::InfantryBullet, row(5.0, 200.0, 200.0, 0.0, 0.0)),
        (EnemyWeapon::FlakShell, row(120.0, 500.0, 600.0, 50.0, 15.0)),
    ])
}

/// Kill targets, speed and spawn multipliers, and unlocked weapon count per
/// level: (tanks, t95, towers, infantry, hangars, flak, speed, spawn, unlocks).
const LEVEL_TABLE: [(u32, u32, u32, u32, u32, u32, f64, f64, usize); 20] = [
    (0, 0, 0, 10, 0, 0, 1.0, 1.0, 2),
    (2, 0, 0, 20, 0, 0, 1.1, 0.9, 2),
    (4, 0, 2, 30, 0, 0, 1.2, 0.8, 3),
    (7, 0, 3, 30, 0, 1, 1.3, 0.8, 4),
    (12, 1, 3, 30, 1, 2, 1.4, 0.7, 5),
    (15, 2, 4, 35, 1, 3, 1.5, 0.7, 6),
    (18, 3, 4, 40, 2, 3, 1.6, 0.6, 6),
    (20, 5, 5, 50, 2, 4, 1.7, 0.6, 6),
    (25, 7, 5, 60, 3, 5, 1.8, 0.5, 6),
    (30, 10, 6, 80, 4, 6, 2.0, 0.4, 6),
    (35, 12, 6, 90, 4, 7, 2.1, 0.4, 6),
    (40, 14, 7, 100, 5, 8, 2.2, 0.35, 6),
    (45, 16, 7, 110, 5, 9, 2.3, 0.35, 6),
    (50, 18, 8, 120, 6, 10, 2.4, 0.3, 6),
    (55, 20, 8, 130, 6, 11, 2.5, 0.3, 6),
    (60, 22, 9, 140, 7, 12, 2.6, 0.25, 6),
    (65, 24, 9, 150, 7, 13, 2.7, 0.25, 6),
    (70, 26, 10, 160, 8, 14, 2.8, 0.2, 6),
    (75, 28, 10, 180, 8, 15, 2.9, 0.2, 6),
    (80, 25, 12, 200, 10, 16, 3.0, 0.15, 6),
];

fn default_levels() -> Vec<LevelSpec> {
    LEVEL_TABLE
        .iter()
        .map(
            |&(tanks, t95, towers, infantry, hangars, flak, speed, spawn, unlocks)| {
                let targets = [
                    (Archetype::Tank, tanks),
                    (Archetype::T95, t95),
                    (Archetype::Tower, towers),
                    (Archetype::Infantry, infantry),
                    (Archetype::Hangar, hangars),
                    (Archetype::FlakCannon, flak),
                ]
                .into_iter()
                .filter(|&(_, n)| n > 0)
                .collect();
                LevelSpec {
                    targets,
                    enemy_speed_multiplier: speed,
                    spawn_interval_multiplier: spawn,
                    unlocked_weapons: PlayerWeapon::ALL[..unlocks].to_vec(),
                }
            },
        )
        .collect()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerStats {
                max_hp: PLAYER_MAX_HP,
                terrain_scrape_fraction_per_sec: TERRAIN_SCRAPE_FRACTION_PER_SEC,
            },
            enemies: default_enemies(),
            drone: DroneTuning {
                ammo: 30,
                approach_range: 300.0,
                back_off_distance: 150.0,
                back_off_speed: 100.0,
                catch_up_distance: 400.0,
                skirmish_speed_factor: 0.8,
                catch_up_speed_factor: 1.2,
                kamikaze_speed_multiplier: 2.5,
                turn_rate: 0.05,
                kamikaze_turn_rate: 0.1,
                weave_rate: 0.003,
                weave_amplitude: 1.5,
                fire_cone_deg: 45.0,
                kamikaze_damage: 150.0,
                collision_damage: 500.0,
            },
            infantry: InfantryTuning {
                burst_count: 5,
                burst_delay_ms: 200.0,
                cooldown_ms: 2000.0,
                leash_factor: 1.5,
                idle_ms: 3000.0,
                roam_ms: 2000.0,
            },
            weapons: default_weapons(),
            enemy_weapons: default_enemy_weapons(),
            flak_arc: FiringArc {
                min_deg: -140.0,
                max_deg: -40.0,
            },
            levels: default_levels(),
            scoring: ScoringConfig {
                quick_kill_window_ms: QUICK_KILL_WINDOW_MS,
                quick_kill_multiplier: QUICK_KILL_MULTIPLIER,
                multi_kill_threshold: MULTI_KILL_THRESHOLD,
                multi_kill_multiplier: MULTI_KILL_MULTIPLIER,
                combo_debounce_ms: COMBO_DEBOUNCE_MS,
            },
            targeting: TargetingConfig {
                auto_aim_range: AUTO_AIM_RANGE,
                auto_aim_cone_deg: AUTO_AIM_CONE_DEG,
                tie_epsilon: TARGET_TIE_EPSILON,
                gun_lerp: GUN_LERP,
                lock_range: LOCK_RANGE,
                lock_max_targets: LOCK_MAX_TARGETS,
            },
            spawning: SpawnConfig {
                reinforcement_interval_ms: REINFORCEMENT_INTERVAL_MS,
                infantry_spawn_interval_ms: INFANTRY_SPAWN_INTERVAL_MS,
                hangar_spawn_interval_ms: HANGAR_SPAWN_INTERVAL_MS,
                infantry_active_cap: INFANTRY_ACTIVE_CAP,
                squad_min: INFANTRY_SQUAD_MIN,
                squad_max: INFANTRY_SQUAD_MAX,
                squad_spread: INFANTRY_SQUAD_SPREAD,
            },
            flame: FlameConfig {
                burn_duration_ms: BURN_DURATION_MS,
                ground_fire_duration_ms: GROUND_FIRE_DURATION_MS,
                ground_fire_radius: GROUND_FIRE_RADIUS,
                ground_fire_dps_factor: GROUND_FIRE_DPS_FACTOR,
            },
            power_up: PowerUpConfig {
                bomb_fire_rate_ms: POWERUP_BOMB_FIRE_RATE_MS,
                duration_ms: POWERUP_DURATION_MS,
            },
            shop: ShopConfig {
                damage_cost: UPGRADE_DAMAGE_COST,
                cooldown_cost: UPGRADE_COOLDOWN_COST,
                ammo_cost: UPGRADE_AMMO_COST,
                damage_factor: UPGRADE_DAMAGE_FACTOR,
                cooldown_factor: UPGRADE_COOLDOWN_FACTOR,
                cooldown_floor_ms: UPGRADE_COOLDOWN_FLOOR_MS,
                ammo_factor: UPGRADE_AMMO_FACTOR,
            },
        }
    }
}
