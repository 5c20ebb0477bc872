//! Auto-aim and lock-on system.
//!
//! Rebuilds the candidate list from the world every tick and feeds it to
//! the selector. Nothing is cached between ticks except the gun angle.

use hecs::{Entity, World};

use sortie_ai::targeting::{lock_targets, select_best_target, track_gun, AimQuery, Candidate};
use sortie_core::components::{ArchetypeTag, Destroyed, Health};
use sortie_core::config::TargetingConfig;
use sortie_core::enums::Archetype;
use sortie_core::types::Position;

use crate::armament::Armament;
use crate::handles::player_pose;

/// Update the gun angle, aim target and (while sweeping) the lock set.
pub fn run(world: &World, armament: &mut Armament, targeting: &TargetingConfig) {
    let Some((origin, facing)) = player_pose(world) else {
        armament.aim_target = None;
        armament.locks.clear();
        return;
    };

    let candidates = collect_candidates(world, |_| true);
    let half_cone = targeting.auto_aim_cone_deg.to_radians();
    let query = AimQuery {
        origin,
        facing,
        max_range: targeting.auto_aim_range,
        half_cone,
        tie_epsilon: targeting.tie_epsilon,
    };
    let target = select_best_target(&query, &candidates);
    let target_pos = target.and_then(|entity| {
        candidates
            .iter()
            .find(|c| c.key == entity)
            .map(|c| c.position)
    });

    armament.gun_rotation = track_gun(
        armament.gun_rotation,
        origin,
        facing,
        target_pos,
        half_cone,
        targeting.gun_lerp,
    );
    armament.aim_target = target;

    if armament.locking {
        let lockable = collect_candidates(world, |a| Archetype::LOCKABLE.contains(&a));
        armament.locks = lock_targets(
            origin,
            &lockable,
            targeting.lock_range,
            targeting.lock_max_targets,
        );
    }
}

/// Active enemies passing `filter`, in stable entity order.
fn collect_candidates(world: &World, filter: impl Fn(Archetype) -> bool) -> Vec<Candidate<Entity>> {
    let mut candidates: Vec<Candidate<Entity>> = world
        .query::<(&ArchetypeTag, &Position, &Health, Option<&Destroyed>)>()
        .iter()
        .filter(|(_, (tag, _, _, destroyed))| destroyed.is_none() && filter(tag.0))
        .map(|(entity, (_, pos, health, _))| Candidate {
            key: entity,
            position: *pos,
            health: health.current,
            active: true,
        })
        .collect();
    candidates.sort_by_key(|c| c.key.to_bits());
    candidates
}
