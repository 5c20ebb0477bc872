//! Simulation constants and tuning defaults.
//!
//! Values that content designers tune live in [`crate::config::GameConfig`];
//! the constants here seed its `Default` and fix the simulation clock.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick.
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

/// Frame length the per-frame turn rates were tuned against (ms).
pub const REFERENCE_FRAME_MS: f64 = 16.0;

// --- World bounds ---

/// Playfield width in world units.
pub const WORLD_WIDTH: f64 = 3200.0;

/// Playfield height in world units.
pub const WORLD_HEIGHT: f64 = 1800.0;

/// Ground line used for ground-unit placement (terrain itself is external).
pub const GROUND_Y: f64 = 1500.0;

/// Slack beyond the playfield before an entity is culled.
pub const WORLD_CULL_MARGIN: f64 = 100.0;

// --- Player ---

/// Player maximum hit points.
pub const PLAYER_MAX_HP: f64 = 100.0;

/// Fraction of max hp lost per second while scraping terrain.
pub const TERRAIN_SCRAPE_FRACTION_PER_SEC: f64 = 0.2;

// --- Scoring ---

/// Window after first damage in which a kill earns the quick-kill bonus (ms).
pub const QUICK_KILL_WINDOW_MS: f64 = 10_000.0;

/// Quick-kill bonus as a fraction of the base score.
pub const QUICK_KILL_MULTIPLIER: f64 = 0.2;

/// Minimum kills sharing a source for the multi-kill bonus.
pub const MULTI_KILL_THRESHOLD: u32 = 3;

/// Multi-kill bonus as a fraction of the accumulated combo score.
pub const MULTI_KILL_MULTIPLIER: f64 = 0.5;

/// Quiet period after the last contribution before a combo is finalized (ms).
pub const COMBO_DEBOUNCE_MS: f64 = 150.0;

// --- Targeting ---

/// Auto-aim search radius.
pub const AUTO_AIM_RANGE: f64 = 500.0;

/// Auto-aim cone half-angle (degrees).
pub const AUTO_AIM_CONE_DEG: f64 = 20.0;

/// Distances closer than this are treated as equal; health breaks the tie.
pub const TARGET_TIE_EPSILON: f64 = 10.0;

/// Per-tick lerp factor of the gun toward its aim angle.
pub const GUN_LERP: f64 = 0.1;

/// Multi-missile lock-on radius.
pub const LOCK_RANGE: f64 = 200.0;

/// Maximum simultaneous multi-missile locks.
pub const LOCK_MAX_TARGETS: usize = 2;

// --- Spawning ---

/// Interval between reinforcement checks (ms).
pub const REINFORCEMENT_INTERVAL_MS: f64 = 5_000.0;

/// Base interval between infantry squad drops, scaled per level (ms).
pub const INFANTRY_SPAWN_INTERVAL_MS: f64 = 5_000.0;

/// Active infantry cap; no squads drop above it.
pub const INFANTRY_ACTIVE_CAP: usize = 15;

/// Smallest and largest infantry squad.
pub const INFANTRY_SQUAD_MIN: u32 = 3;
pub const INFANTRY_SQUAD_MAX: u32 = 5;

/// Lateral scatter of squad members around the drop point.
pub const INFANTRY_SQUAD_SPREAD: f64 = 60.0;

/// Horizontal margin kept clear at both world edges when spawning.
pub const SPAWN_EDGE_MARGIN: f64 = 100.0;

/// Minimum horizontal gap between a new ground emplacement and existing ones.
pub const SPAWN_MIN_SPACING: f64 = 80.0;

/// Hangar launch interval before the level's spawn multiplier (ms).
pub const HANGAR_SPAWN_INTERVAL_MS: f64 = 12_000.0;

/// Drones leave the hangar this far above it.
pub const HANGAR_LAUNCH_OFFSET: f64 = 20.0;

// --- Ground units ---

/// Per-tick chance that a tank picks a new patrol speed.
pub const TANK_DRIFT_CHANCE: f64 = 0.01;

/// Per-frame turret slew toward the player (radians).
pub const TURRET_TURN_RATE: f64 = 0.1;

/// Extra reach of a flak burst to account for the aircraft's body.
pub const FLAK_BODY_ALLOWANCE: f64 = 20.0;

// --- Flame ---

/// How long a flame contact keeps an enemy burning (ms).
pub const BURN_DURATION_MS: f64 = 2_000.0;

/// Ground fire lifetime (ms).
pub const GROUND_FIRE_DURATION_MS: f64 = 3_000.0;

/// Ground fire contact radius.
pub const GROUND_FIRE_RADIUS: f64 = 35.0;

/// Ground fire damage as a fraction of flamethrower dps.
pub const GROUND_FIRE_DPS_FACTOR: f64 = 0.5;

// --- Power-up ---

/// Bomb fire rate while powered up (ms).
pub const POWERUP_BOMB_FIRE_RATE_MS: f64 = 333.0;

/// Power-up duration (ms).
pub const POWERUP_DURATION_MS: f64 = 10_000.0;

// --- Effects ---

/// Radius of the blast shown when a kamikaze drone detonates.
pub const KAMIKAZE_BLAST_RADIUS: f64 = 40.0;

/// Radius of the blast shown when a multi-missile strikes.
pub const MULTI_MISSILE_BLAST_RADIUS: f64 = 60.0;

// --- Levels ---

/// Number of levels in a campaign.
pub const LEVEL_COUNT: u32 = 20;

// --- Shop ---

/// Cost of a damage upgrade.
pub const UPGRADE_DAMAGE_COST: u64 = 300;

/// Cost of a cooldown upgrade.
pub const UPGRADE_COOLDOWN_COST: u64 = 300;

/// Cost of an ammo upgrade.
pub const UPGRADE_AMMO_COST: u64 = 500;

/// Damage upgrade factor.
pub const UPGRADE_DAMAGE_FACTOR: f64 = 1.2;

/// Cooldown upgrade factor.
pub const UPGRADE_COOLDOWN_FACTOR: f64 = 0.85;

/// Cooldown can never drop below this (ms).
pub const UPGRADE_COOLDOWN_FLOOR_MS: f64 = 50.0;

/// Ammo upgrade factor.
pub const UPGRADE_AMMO_FACTOR: f64 = 1.2;
