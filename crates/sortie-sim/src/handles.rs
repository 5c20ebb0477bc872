//! Weak entity handles.
//!
//! Anything that outlives a single system pass (locks, combo positions,
//! ids from the collision layer) holds an id and re-checks it on use.

use hecs::{Entity, World};

use sortie_core::components::{Destroyed, Heading, Player};
use sortie_core::events::EntityId;
use sortie_core::types::Position;

pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Resolve an id to a live entity. Ids of despawned entities resolve to `None`.
pub fn resolve(world: &World, id: EntityId) -> Option<Entity> {
    let entity = Entity::from_bits(id.0)?;
    world.contains(entity).then_some(entity)
}

/// Exists and has not been marked destroyed.
pub fn is_active(world: &World, entity: Entity) -> bool {
    world.contains(entity) && world.get::<&Destroyed>(entity).is_err()
}

/// The player entity, alive or not.
pub fn player_entity(world: &World) -> Option<Entity> {
    world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity)
}

/// Pose of the living player. `None` once the aircraft is down.
pub fn player_pose(world: &World) -> Option<(Position, f64)> {
    world
        .query::<(&Player, &Position, &Heading, Option<&Destroyed>)>()
        .iter()
        .find(|(_, (_, _, _, destroyed))| destroyed.is_none())
        .map(|(_, (_, pos, heading, _))| (*pos, heading.0))
}
