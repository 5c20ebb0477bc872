//! Cleanup system: removes entities that are destroyed, out of bounds or
//! expired.

use hecs::{Entity, World};

use sortie_core::components::{Destroyed, GroundFire, Player};
use sortie_core::constants::{WORLD_CULL_MARGIN, WORLD_HEIGHT, WORLD_WIDTH};
use sortie_core::types::Position;

/// Despawn dead enemies, strays beyond the cull margin and burnt-out ground
/// fires. The aircraft is never despawned so the snapshot can still show it
/// after a crash. Uses a pre-allocated buffer to avoid per-tick allocation.
/// Each entity is queued at most once. Returns how many were despawned.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, now_ms: f64) -> usize {
    despawn_buffer.clear();

    for (entity, (_destroyed, player)) in world.query_mut::<(&Destroyed, Option<&Player>)>() {
        if player.is_none() {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (pos, player, destroyed)) in
        world.query_mut::<(&Position, Option<&Player>, Option<&Destroyed>)>()
    {
        if player.is_none() && destroyed.is_none() && out_of_bounds(pos) {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (fire, pos)) in world.query_mut::<(&GroundFire, &Position)>() {
        if now_ms > fire.until_ms && !out_of_bounds(pos) {
            despawn_buffer.push(entity);
        }
    }

    despawn_buffer
        .drain(..)
        .filter(|&entity| world.despawn(entity).is_ok())
        .count()
}

fn out_of_bounds(pos: &Position) -> bool {
    pos.x < -WORLD_CULL_MARGIN
        || pos.x > WORLD_WIDTH + WORLD_CULL_MARGIN
        || pos.y < -WORLD_CULL_MARGIN
        || pos.y > WORLD_HEIGHT + WORLD_CULL_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortie_core::components::{ArchetypeTag, Health};
    use sortie_core::enums::Archetype;

    fn enemy(world: &mut World, x: f64) -> Entity {
        world.spawn((
            ArchetypeTag(Archetype::Drone),
            Position::new(x, 100.0),
            Health {
                current: 0.0,
                max: 100.0,
            },
        ))
    }

    #[test]
    fn destroyed_stray_is_queued_once() {
        let mut world = World::new();
        let stray = enemy(&mut world, WORLD_WIDTH + WORLD_CULL_MARGIN + 50.0);
        world.insert_one(stray, Destroyed).unwrap();
        let kept = enemy(&mut world, 500.0);

        let mut buffer = Vec::new();
        assert_eq!(run(&mut world, &mut buffer, 0.0), 1);
        assert!(!world.contains(stray));
        assert!(world.contains(kept));
    }

    #[test]
    fn expired_fire_outside_bounds_is_queued_once() {
        let mut world = World::new();
        world.spawn((
            Position::new(-WORLD_CULL_MARGIN - 10.0, 100.0),
            GroundFire { until_ms: 0.0 },
        ));
        let mut buffer = Vec::new();
        assert_eq!(run(&mut world, &mut buffer, 10.0), 1);
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn destroyed_player_stays() {
        let mut world = World::new();
        let player = world.spawn((Player, Position::new(-5000.0, 0.0), Destroyed));
        let mut buffer = Vec::new();
        assert_eq!(run(&mut world, &mut buffer, 0.0), 0);
        assert!(world.contains(player));
    }
}
