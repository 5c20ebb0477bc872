//! Physics notifications: what happens when something touches something.
//!
//! Collision detection is external. The collision layer reports contacts as
//! commands and these handlers turn them into damage through the resolver.

use hecs::{Entity, World};

use sortie_ai::drone::ram_damage;
use sortie_core::components::{DroneBrain, Health};
use sortie_core::constants::{
    FLAK_BODY_ALLOWANCE, MULTI_MISSILE_BLAST_RADIUS,
};
use sortie_core::enums::{Archetype, DamageType, DroneState, EnemyWeapon, PlayerWeapon};
use sortie_core::events::{CombatEvent, SourceId};
use sortie_core::geometry::distance;
use sortie_core::types::Position;

use crate::combat::{
    apply_area_damage, apply_damage, self_destruct, CombatContext, DamageOutcome,
};
use crate::handles::{is_active, player_entity, player_pose};
use crate::systems::burn;

/// A player projectile touched `target`.
pub fn weapon_hit(
    world: &mut World,
    ctx: &mut CombatContext,
    weapon: PlayerWeapon,
    target: Entity,
    source: Option<&SourceId>,
    position: Position,
    dt_ms: f64,
) -> DamageOutcome {
    let config = ctx.config;
    let Some(stats) = config.weapon(weapon) else {
        return DamageOutcome::default();
    };
    if !is_active(world, target) {
        return DamageOutcome::default();
    }
    let damage_type = weapon.damage_type();

    match weapon {
        PlayerWeapon::MachineGun => {
            apply_damage(world, ctx, target, stats.damage, source, damage_type)
        }
        PlayerWeapon::Bomb | PlayerWeapon::ClusterMissile => {
            let outcome = apply_damage(world, ctx, target, stats.damage, source, damage_type);
            detonate(
                world,
                ctx,
                position,
                stats.explosion_radius,
                stats.secondary_damage,
                source,
                Some(target),
            );
            outcome
        }
        PlayerWeapon::MultiMissile => {
            let outcome = apply_damage(world, ctx, target, stats.damage, source, damage_type);
            ctx.events.push(CombatEvent::ExplosionFx {
                position,
                radius: MULTI_MISSILE_BLAST_RADIUS,
            });
            outcome
        }
        PlayerWeapon::Sawblade => {
            let amount = stats.damage_per_second * dt_ms / 1000.0;
            apply_damage(world, ctx, target, amount, source, damage_type)
        }
        PlayerWeapon::Flamethrower => {
            let amount = stats.damage_per_second * dt_ms / 1000.0;
            let outcome = apply_damage(world, ctx, target, amount, source, damage_type);
            burn::ignite(world, target, ctx.now_ms, &config.flame);
            outcome
        }
    }
}

/// A bomb or missile went off without a direct hit.
pub fn ground_explosion(
    world: &mut World,
    ctx: &mut CombatContext,
    weapon: PlayerWeapon,
    position: Position,
    source: Option<&SourceId>,
) {
    let config = ctx.config;
    let Some(stats) = config.weapon(weapon) else {
        return;
    };
    match weapon {
        PlayerWeapon::Bomb | PlayerWeapon::ClusterMissile => detonate(
            world,
            ctx,
            position,
            stats.explosion_radius,
            stats.secondary_damage,
            source,
            None,
        ),
        PlayerWeapon::MultiMissile => ctx.events.push(CombatEvent::ExplosionFx {
            position,
            radius: MULTI_MISSILE_BLAST_RADIUS,
        }),
        _ => log::warn!("{weapon:?} does not explode"),
    }
}

fn detonate(
    world: &mut World,
    ctx: &mut CombatContext,
    position: Position,
    radius: f64,
    damage: f64,
    source: Option<&SourceId>,
    exclude: Option<Entity>,
) {
    ctx.events.push(CombatEvent::ExplosionFx { position, radius });
    apply_area_damage(
        world,
        ctx,
        position,
        radius,
        damage,
        source,
        exclude,
        &Archetype::ALL,
    );
}

/// An enemy round struck the aircraft.
pub fn player_struck(world: &mut World, ctx: &mut CombatContext, weapon: EnemyWeapon) {
    let Some(player) = player_entity(world) else {
        return;
    };
    let Some(stats) = ctx.config.enemy_weapon(weapon) else {
        return;
    };
    let damage = stats.damage;
    apply_damage(world, ctx, player, damage, None, weapon.damage_type());
}

/// A flak shell burst at `position`. Direct hits deal full damage; near
/// misses splash the aircraft when the burst reaches its body.
pub fn flak_burst(world: &mut World, ctx: &mut CombatContext, position: Position, direct: bool) {
    let Some(stats) = ctx.config.enemy_weapon(EnemyWeapon::FlakShell) else {
        return;
    };
    let (damage, splash, radius) = (stats.damage, stats.splash_damage, stats.splash_radius);
    ctx.events.push(CombatEvent::ExplosionFx { position, radius });

    let Some(player) = player_entity(world) else {
        return;
    };
    if direct {
        apply_damage(world, ctx, player, damage, None, DamageType::FlakDirect);
        return;
    }
    let Some((aircraft, _)) = player_pose(world) else {
        return;
    };
    if distance(position, aircraft) <= radius + FLAK_BODY_ALLOWANCE {
        apply_damage(world, ctx, player, splash, None, DamageType::FlakSplash);
    }
}

/// A drone flew into the aircraft. The drone self-destructs first, unpaid,
/// then the player takes ram damage; a kamikaze drone goes up with a bigger
/// bang.
pub fn drone_ram(world: &mut World, ctx: &mut CombatContext, drone: Entity) {
    if !is_active(world, drone) {
        return;
    }
    let Ok(brain) = world.get::<&DroneBrain>(drone).map(|b| (*b).clone()) else {
        return;
    };
    let kamikaze = brain.state == DroneState::Kamikaze;

    let (ram_type, drone_type) = if kamikaze {
        (DamageType::Kamikaze, DamageType::Kamikaze)
    } else {
        (DamageType::Collision, DamageType::SelfDestruct)
    };
    self_destruct(world, ctx, drone, drone_type);

    if let Some(player) = player_entity(world) {
        let damage = ram_damage(&brain, &ctx.config.drone);
        apply_damage(world, ctx, player, damage, None, ram_type);
    }
}

/// The aircraft is dragging along the terrain for `dt_ms`.
pub fn terrain_scrape(world: &mut World, ctx: &mut CombatContext, dt_ms: f64) {
    let Some(player) = player_entity(world) else {
        return;
    };
    let Ok(max_hp) = world.get::<&Health>(player).map(|h| h.max) else {
        return;
    };
    let amount = max_hp * ctx.config.player.terrain_scrape_fraction_per_sec * dt_ms / 1000.0;
    apply_damage(world, ctx, player, amount, None, DamageType::Terrain);
}
