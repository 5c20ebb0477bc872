//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick: position += velocity * dt.
//! The aircraft is flown externally and skipped. Ground units turn back at
//! the edges of the playfield.

use glam::DVec2;
use hecs::World;

use sortie_core::components::{ArchetypeTag, Destroyed, Player};
use sortie_core::constants::WORLD_WIDTH;
use sortie_core::types::{Position, Velocity};

/// Run kinematic integration for every live entity with Position + Velocity.
pub fn run(world: &mut World, dt_ms: f64) {
    let dt = dt_ms / 1000.0;
    for (_entity, (pos, vel, tag, player, destroyed)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        Option<&ArchetypeTag>,
        Option<&Player>,
        Option<&Destroyed>,
    )>() {
        if player.is_some() || destroyed.is_some() {
            continue;
        }
        let next = pos.as_dvec2() + DVec2::new(vel.x, vel.y) * dt;
        *pos = Position::from_dvec2(next);

        let grounded = tag.is_some_and(|t| t.0.is_ground_unit());
        if grounded && (pos.x <= 0.0 && vel.x < 0.0 || pos.x >= WORLD_WIDTH && vel.x > 0.0) {
            vel.x = -vel.x;
            pos.x = pos.x.clamp(0.0, WORLD_WIDTH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortie_core::enums::Archetype;

    #[test]
    fn integrates_velocity_over_dt() {
        let mut world = World::new();
        let e = world.spawn((
            ArchetypeTag(Archetype::Drone),
            Position::new(0.0, 0.0),
            Velocity::new(100.0, -50.0),
        ));
        run(&mut world, 500.0);
        let pos = *world.get::<&Position>(e).unwrap();
        assert!((pos.x - 50.0).abs() < 1e-9);
        assert!((pos.y + 25.0).abs() < 1e-9);
    }

    #[test]
    fn ground_units_turn_at_the_edge() {
        let mut world = World::new();
        let e = world.spawn((
            ArchetypeTag(Archetype::Tank),
            Position::new(5.0, 1500.0),
            Velocity::new(-150.0, 0.0),
        ));
        run(&mut world, 100.0);
        assert!(world.get::<&Velocity>(e).unwrap().x > 0.0);
        assert_eq!(world.get::<&Position>(e).unwrap().x, 0.0);
    }

    #[test]
    fn player_is_not_integrated() {
        let mut world = World::new();
        let e = world.spawn((Player, Position::new(1.0, 1.0), Velocity::new(100.0, 0.0)));
        run(&mut world, 1000.0);
        assert_eq!(world.get::<&Position>(e).unwrap().x, 1.0);
    }
}
