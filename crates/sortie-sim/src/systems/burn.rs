//! Burn damage-over-time and ground fires.
//!
//! Both are time-stamped records checked against the game clock every tick.
//! All burn damage carries the player source, so a string of burn kills
//! settles as one combo.

use hecs::{Entity, World};

use sortie_core::components::{ArchetypeTag, Burning, Destroyed, GroundFire};
use sortie_core::config::FlameConfig;
use sortie_core::enums::{Archetype, DamageType};
use sortie_core::geometry::distance;
use sortie_core::types::Position;

use crate::combat::{apply_damage, player_source, CombatContext};
use crate::handles::is_active;

/// Set or refresh the burn on `target`. Burns never stack.
pub fn ignite(world: &mut World, target: Entity, now_ms: f64, flame: &FlameConfig) -> bool {
    if !is_active(world, target) {
        return false;
    }
    world
        .insert_one(
            target,
            Burning {
                until_ms: now_ms + flame.burn_duration_ms,
            },
        )
        .is_ok()
}

/// Leave a patch of burning ground at `position`.
pub fn spawn_ground_fire(world: &mut World, position: Position, now_ms: f64, flame: &FlameConfig) {
    world.spawn((
        position,
        GroundFire {
            until_ms: now_ms + flame.ground_fire_duration_ms,
        },
    ));
}

/// Tick burns and ground fires. `flame_dps` is the flamethrower's current
/// damage per second.
pub fn run(world: &mut World, ctx: &mut CombatContext, flame_dps: f64, dt_ms: f64) {
    let source = player_source();
    let config = ctx.config;
    let flame = &config.flame;
    let now = ctx.now_ms;

    let burning: Vec<(Entity, f64)> = world
        .query::<(&Burning, Option<&Destroyed>)>()
        .iter()
        .filter(|(_, (_, destroyed))| destroyed.is_none())
        .map(|(entity, (burn, _))| (entity, burn.until_ms))
        .collect();
    for (entity, until_ms) in burning {
        if now > until_ms {
            let _ = world.remove_one::<Burning>(entity);
            continue;
        }
        let amount = flame_dps * dt_ms / 1000.0;
        apply_damage(world, ctx, entity, amount, Some(&source), DamageType::Burn);
    }

    let fires: Vec<Position> = world
        .query::<(&GroundFire, &Position)>()
        .iter()
        .filter(|(_, (fire, _))| now <= fire.until_ms)
        .map(|(_, (_, pos))| *pos)
        .collect();
    if fires.is_empty() {
        return;
    }

    let amount = flame_dps * flame.ground_fire_dps_factor * dt_ms / 1000.0;
    for fire in fires {
        let victims: Vec<Entity> = world
            .query::<(&ArchetypeTag, &Position, Option<&Destroyed>)>()
            .iter()
            .filter(|(_, (tag, pos, destroyed))| {
                destroyed.is_none()
                    && Archetype::GROUND_FIRE_VICTIMS.contains(&tag.0)
                    && distance(fire, **pos) < flame.ground_fire_radius
            })
            .map(|(entity, _)| entity)
            .collect();
        for victim in victims {
            apply_damage(world, ctx, victim, amount, Some(&source), DamageType::FlameGround);
            ignite(world, victim, now, flame);
        }
    }
}
