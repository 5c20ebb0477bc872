//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player aircraft and enemy entities with the component bundle
//! each archetype needs. Terrain is external, so ground units sit on a flat
//! ground line.

use std::f64::consts::FRAC_PI_2;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use sortie_core::components::*;
use sortie_core::config::{GameConfig, LevelSpec};
use sortie_core::constants::*;
use sortie_core::enums::*;
use sortie_core::types::{Position, Velocity};

/// Where the aircraft starts each level.
const PLAYER_START: Position = Position { x: 200.0, y: 400.0 };

/// Attempts made to find clear ground before a placement gives up.
const PLACEMENT_ATTEMPTS: u32 = 100;

/// Level-wide inputs shared by every spawn.
pub struct SpawnContext<'a> {
    pub config: &'a GameConfig,
    pub level: &'a LevelSpec,
    pub now_ms: f64,
}

/// Populate a fresh level: the aircraft plus the opening garrison. Every
/// objective gets a head start so the first reinforcement sweep has slack.
pub fn setup_level(world: &mut World, rng: &mut ChaCha8Rng, ctx: &SpawnContext) -> Entity {
    let player = spawn_player(world, ctx.config);

    let opening = [
        (Archetype::Hangar, 1),
        (Archetype::FlakCannon, 2),
        (Archetype::Tower, 1),
        (Archetype::Tank, 2),
        (Archetype::T95, 0),
    ];
    for (archetype, extra) in opening {
        let target = ctx.level.targets.get(&archetype).copied().unwrap_or(0);
        if target == 0 {
            continue;
        }
        let mut placed = 0;
        let mut attempts = 0;
        while placed < target + extra && attempts < PLACEMENT_ATTEMPTS {
            attempts += 1;
            let Some(x) = clear_ground(world, rng, archetype) else {
                continue;
            };
            spawn_enemy(world, archetype, ground_position(x), ctx);
            if archetype == Archetype::Hangar {
                let squad_x = x + rng.gen_range(-150.0..=150.0);
                spawn_squad(world, rng, squad_x, ctx);
            }
            placed += 1;
        }
    }

    let infantry = ctx
        .level
        .targets
        .get(&Archetype::Infantry)
        .copied()
        .unwrap_or(0);
    let mut placed = 0;
    let mut attempts = 0;
    while placed < infantry && attempts < PLACEMENT_ATTEMPTS {
        attempts += 1;
        if let Some(x) = clear_ground(world, rng, Archetype::Infantry) {
            placed += spawn_squad(world, rng, x, ctx);
        }
    }

    player
}

/// Spawn the player aircraft with full health.
pub fn spawn_player(world: &mut World, config: &GameConfig) -> Entity {
    world.spawn((
        Player,
        PLAYER_START,
        Velocity::default(),
        Heading(0.0),
        Health {
            current: config.player.max_hp,
            max: config.player.max_hp,
        },
    ))
}

/// Spawn one enemy of `archetype` at `position` with its behavior state.
pub fn spawn_enemy(
    world: &mut World,
    archetype: Archetype,
    position: Position,
    ctx: &SpawnContext,
) -> Entity {
    let (hp, speed) = ctx
        .config
        .enemy(archetype)
        .map_or((1.0, 0.0), |stats| (stats.hp, stats.speed));
    let speed = speed * ctx.level.enemy_speed_multiplier;
    let entity = world.spawn((
        ArchetypeTag(archetype),
        position,
        Velocity::default(),
        Heading(0.0),
        Health {
            current: hp,
            max: hp,
        },
    ));

    let inserted = match archetype {
        Archetype::Tank | Archetype::T95 | Archetype::Tower | Archetype::FlakCannon => {
            let drifts = matches!(archetype, Archetype::Tank | Archetype::T95);
            world.insert_one(
                entity,
                TurretBrain {
                    state: TurretState::Idle,
                    aim: -FRAC_PI_2,
                    next_fire_ms: ctx.now_ms,
                    barrel_index: 0,
                    drift_speed: if drifts { speed } else { 0.0 },
                },
            )
        }
        Archetype::Hangar => world.insert_one(
            entity,
            HangarBrain {
                next_spawn_ms: ctx.now_ms + hangar_interval(ctx),
            },
        ),
        Archetype::Drone => world.insert_one(
            entity,
            DroneBrain {
                state: DroneState::Approach,
                ammo: ctx.config.drone.ammo,
                next_fire_ms: ctx.now_ms,
                weave_phase: 0.0,
                base_speed: speed,
                speed,
            },
        ),
        Archetype::Infantry => world.insert_one(
            entity,
            InfantryBrain {
                state: InfantryState::Idle,
                state_since_ms: ctx.now_ms,
                burst_left: 0,
                next_shot_ms: ctx.now_ms,
                last_burst_ms: ctx.now_ms,
                base_speed: speed,
                aim: -FRAC_PI_2,
            },
        ),
    };
    debug_assert!(inserted.is_ok());
    entity
}

/// Drop a squad of infantry scattered around `center_x`. Members that would
/// land outside the playfield margin are skipped. Returns how many landed.
pub fn spawn_squad(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    center_x: f64,
    ctx: &SpawnContext,
) -> u32 {
    let spawning = &ctx.config.spawning;
    let size = rng.gen_range(spawning.squad_min..=spawning.squad_max);
    let mut landed = 0;
    for _ in 0..size {
        let x = center_x + rng.gen_range(-spawning.squad_spread..=spawning.squad_spread);
        if !(SPAWN_EDGE_MARGIN..=WORLD_WIDTH - SPAWN_EDGE_MARGIN).contains(&x) {
            continue;
        }
        spawn_enemy(world, Archetype::Infantry, ground_position(x), ctx);
        landed += 1;
    }
    landed
}

/// Pick a random x on clear ground for `archetype`, or `None` if the spot
/// rolled is crowded.
pub fn clear_ground(world: &World, rng: &mut ChaCha8Rng, archetype: Archetype) -> Option<f64> {
    let (margin, spacing) = placement(archetype);
    let x = rng.gen_range(margin..=WORLD_WIDTH - margin);
    is_space_empty(world, x, spacing).then_some(x)
}

/// No active ground unit stands within `spacing` of `x`.
pub fn is_space_empty(world: &World, x: f64, spacing: f64) -> bool {
    !world
        .query::<(&ArchetypeTag, &Position, Option<&Destroyed>)>()
        .iter()
        .any(|(_, (tag, pos, destroyed))| {
            destroyed.is_none() && tag.0.is_ground_unit() && (pos.x - x).abs() < spacing
        })
}

pub fn ground_position(x: f64) -> Position {
    Position::new(x, GROUND_Y)
}

/// Drone launch interval of a hangar on this level.
pub fn hangar_interval(ctx: &SpawnContext) -> f64 {
    ctx.config.spawning.hangar_spawn_interval_ms * ctx.level.spawn_interval_multiplier
}

/// Edge margin and minimum spacing per archetype.
fn placement(archetype: Archetype) -> (f64, f64) {
    match archetype {
        Archetype::Tank | Archetype::Drone => (SPAWN_EDGE_MARGIN, SPAWN_MIN_SPACING),
        Archetype::T95 => (SPAWN_EDGE_MARGIN, 100.0),
        Archetype::Tower => (150.0, 100.0),
        Archetype::Hangar => (200.0, 150.0),
        Archetype::FlakCannon => (200.0, 120.0),
        Archetype::Infantry => (SPAWN_EDGE_MARGIN, 40.0),
    }
}
