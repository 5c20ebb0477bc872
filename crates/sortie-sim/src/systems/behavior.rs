//! Enemy behavior system: runs every archetype's state machine each tick.
//!
//! Calls the FSMs from sortie-ai against one player snapshot taken at the
//! start of the pass, then writes the results back. Evaluation and
//! application are split so no entity sees another's update mid-tick.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use sortie_ai::drone::{self, DroneContext};
use sortie_ai::infantry::{self, InfantryContext};
use sortie_ai::profiles::get_profile;
use sortie_ai::turret::{self, TurretContext};
use sortie_core::components::*;
use sortie_core::constants::{DT_MS, HANGAR_LAUNCH_OFFSET};
use sortie_core::enums::{Archetype, EnemyWeapon};
use sortie_core::events::CombatEvent;
use sortie_core::types::{Position, Velocity};

use crate::handles::{entity_id, player_pose};
use crate::world_setup::{self, hangar_interval, SpawnContext};

/// Run drones, infantry, turrets and hangars for one tick.
pub fn run(
    world: &mut World,
    ctx: &SpawnContext,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<CombatEvent>,
) {
    let player = player_pose(world).map(|(pos, _)| pos);
    run_drones(world, ctx, player, events);
    run_infantry(world, ctx, player, rng, events);
    run_turrets(world, ctx, player, rng, events);
    run_hangars(world, ctx, events);
}

fn run_drones(
    world: &mut World,
    ctx: &SpawnContext,
    player: Option<Position>,
    events: &mut Vec<CombatEvent>,
) {
    let fire_rate_ms = enemy_fire_rate(ctx, EnemyWeapon::DroneBullet);
    let mut updates = Vec::new();
    {
        let mut query =
            world.query::<(&DroneBrain, &Position, &Heading, &Velocity, Option<&Destroyed>)>();
        for (entity, (brain, pos, heading, vel, destroyed)) in query.iter() {
            if destroyed.is_some() {
                continue;
            }
            let dctx = DroneContext {
                tuning: &ctx.config.drone,
                position: *pos,
                rotation: heading.0,
                player,
                now_ms: ctx.now_ms,
                elapsed_ms: DT_MS,
                fire_rate_ms,
            };
            updates.push((entity, drone::evaluate(brain, *vel, &dctx)));
        }
    }

    for (entity, update) in updates {
        if update.state_changed {
            log::trace!("drone {entity:?} -> {:?}", update.brain.state);
        }
        if update.fired {
            events.push(CombatEvent::EnemyFired {
                id: entity_id(entity),
                archetype: Archetype::Drone,
                weapon: EnemyWeapon::DroneBullet,
                position: update.position,
                rotation: update.rotation,
            });
        }
        if let Ok((brain, pos, heading, vel)) =
            world.query_one_mut::<(&mut DroneBrain, &mut Position, &mut Heading, &mut Velocity)>(
                entity,
            )
        {
            *brain = update.brain;
            *pos = update.position;
            heading.0 = update.rotation;
            *vel = update.velocity;
        }
    }
}

fn run_infantry(
    world: &mut World,
    ctx: &SpawnContext,
    player: Option<Position>,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<CombatEvent>,
) {
    let detection_range = ctx
        .config
        .enemy(Archetype::Infantry)
        .map_or(0.0, |stats| stats.range);
    let mut updates = Vec::new();
    {
        let mut query =
            world.query::<(&InfantryBrain, &Position, &Velocity, Option<&Destroyed>)>();
        for (entity, (brain, pos, vel, destroyed)) in query.iter() {
            if destroyed.is_some() {
                continue;
            }
            let ictx = InfantryContext {
                tuning: &ctx.config.infantry,
                detection_range,
                position: *pos,
                player,
                now_ms: ctx.now_ms,
                velocity_x: vel.x,
            };
            updates.push((entity, *pos, infantry::evaluate(brain, &ictx, rng)));
        }
    }

    for (entity, position, update) in updates {
        if update.fired {
            events.push(CombatEvent::EnemyFired {
                id: entity_id(entity),
                archetype: Archetype::Infantry,
                weapon: EnemyWeapon::InfantryBullet,
                position,
                rotation: update.brain.aim,
            });
        }
        if let Ok((brain, vel)) =
            world.query_one_mut::<(&mut InfantryBrain, &mut Velocity)>(entity)
        {
            *brain = update.brain;
            vel.x = update.velocity_x;
        }
    }
}

fn run_turrets(
    world: &mut World,
    ctx: &SpawnContext,
    player: Option<Position>,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<CombatEvent>,
) {
    let arc = (
        ctx.config.flak_arc.min_deg.to_radians(),
        ctx.config.flak_arc.max_deg.to_radians(),
    );
    let mut updates = Vec::new();
    {
        let mut query = world.query::<(
            &TurretBrain,
            &ArchetypeTag,
            &Position,
            &Velocity,
            Option<&Destroyed>,
        )>();
        for (entity, (brain, tag, pos, vel, destroyed)) in query.iter() {
            if destroyed.is_some() {
                continue;
            }
            let profile = get_profile(tag.0);
            let Some(weapon) = profile.weapon else {
                continue;
            };
            let range = ctx.config.enemy(tag.0).map_or(0.0, |stats| stats.range);
            let tctx = TurretContext {
                profile: &profile,
                position: *pos,
                player,
                now_ms: ctx.now_ms,
                elapsed_ms: DT_MS,
                range,
                fire_rate_ms: enemy_fire_rate(ctx, weapon),
                arc: profile.arc_limited.then_some(arc),
            };
            let update = turret::evaluate(brain, &tctx);
            let speed = if profile.drifts {
                turret::patrol_speed(vel.x, brain.drift_speed, rng)
            } else {
                0.0
            };
            updates.push((entity, tag.0, weapon, update, speed));
        }
    }

    for (entity, archetype, weapon, update, speed) in updates {
        if let Some(muzzle) = update.muzzle {
            events.push(CombatEvent::EnemyFired {
                id: entity_id(entity),
                archetype,
                weapon,
                position: muzzle,
                rotation: update.brain.aim,
            });
        }
        if let Ok((brain, vel)) = world.query_one_mut::<(&mut TurretBrain, &mut Velocity)>(entity)
        {
            *brain = update.brain;
            vel.x = speed;
        }
    }
}

/// Launch a drone from every hangar whose timer is up.
fn run_hangars(world: &mut World, ctx: &SpawnContext, events: &mut Vec<CombatEvent>) {
    let due: Vec<(Entity, Position)> = world
        .query::<(&HangarBrain, &Position, Option<&Destroyed>)>()
        .iter()
        .filter(|(_, (brain, _, destroyed))| {
            destroyed.is_none() && ctx.now_ms >= brain.next_spawn_ms
        })
        .map(|(entity, (_, pos, _))| (entity, *pos))
        .collect();

    for (hangar, pos) in due {
        if let Ok(mut brain) = world.get::<&mut HangarBrain>(hangar) {
            brain.next_spawn_ms = ctx.now_ms + hangar_interval(ctx);
        }
        let launch = Position::new(pos.x, pos.y - HANGAR_LAUNCH_OFFSET);
        let drone = world_setup::spawn_enemy(world, Archetype::Drone, launch, ctx);
        events.push(CombatEvent::DroneLaunched {
            hangar: entity_id(hangar),
            drone: entity_id(drone),
            position: launch,
        });
    }
}

/// Enemy fire interval on this level. Faster levels shoot faster.
fn enemy_fire_rate(ctx: &SpawnContext, weapon: EnemyWeapon) -> f64 {
    let base = ctx
        .config
        .enemy_weapon(weapon)
        .map_or(f64::INFINITY, |stats| stats.fire_rate_ms);
    base / ctx.level.enemy_speed_multiplier
}
