//! Reinforcement system: keeps each level objective supplied.
//!
//! Every reinforcement interval, each archetype whose objective is not yet
//! covered by live plus destroyed units gets one more. Infantry arrive in
//! squads on their own timer, capped by how many are already on the ground.

use std::collections::BTreeMap;

use hecs::World;
use rand_chacha::ChaCha8Rng;

use sortie_core::components::{ArchetypeTag, Destroyed};
use sortie_core::enums::Archetype;

use crate::combat::ScoreState;
use crate::world_setup::{self, ground_position, SpawnContext};

/// Archetypes topped up one at a time. Drones come from hangars and
/// infantry in squads.
const SINGLE_SPAWNS: [Archetype; 5] = [
    Archetype::Tank,
    Archetype::T95,
    Archetype::Tower,
    Archetype::FlakCannon,
    Archetype::Hangar,
];

/// Reinforcement timers for the current level.
#[derive(Debug, Clone, Default)]
pub struct ReinforcementSchedule {
    pub next_reinforcement_ms: f64,
    pub next_squad_ms: f64,
}

impl ReinforcementSchedule {
    pub fn for_level(ctx: &SpawnContext) -> Self {
        Self {
            next_reinforcement_ms: ctx.now_ms + ctx.config.spawning.reinforcement_interval_ms,
            next_squad_ms: ctx.now_ms + squad_interval(ctx),
        }
    }
}

/// Run the reinforcement system. Returns how many enemies were spawned.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut ReinforcementSchedule,
    score: &ScoreState,
    ctx: &SpawnContext,
) -> u32 {
    let mut spawned = 0;

    if ctx.now_ms >= schedule.next_reinforcement_ms {
        schedule.next_reinforcement_ms = ctx.now_ms + ctx.config.spawning.reinforcement_interval_ms;
        let active = active_counts(world);
        for archetype in SINGLE_SPAWNS {
            let target = ctx.level.targets.get(&archetype).copied().unwrap_or(0);
            let live = active.get(&archetype).copied().unwrap_or(0);
            if live + score.destroyed(archetype) >= target {
                continue;
            }
            if let Some(x) = world_setup::clear_ground(world, rng, archetype) {
                world_setup::spawn_enemy(world, archetype, ground_position(x), ctx);
                log::debug!("reinforcement: {archetype:?} at x={x:.0}");
                spawned += 1;
            }
        }
    }

    if ctx.now_ms >= schedule.next_squad_ms {
        schedule.next_squad_ms = ctx.now_ms + squad_interval(ctx);
        let target = ctx
            .level
            .targets
            .get(&Archetype::Infantry)
            .copied()
            .unwrap_or(0);
        let live = active_counts(world)
            .get(&Archetype::Infantry)
            .copied()
            .unwrap_or(0);
        let cap = ctx.config.spawning.infantry_active_cap as u32;
        if score.destroyed(Archetype::Infantry) < target && live < cap {
            if let Some(x) = world_setup::clear_ground(world, rng, Archetype::Infantry) {
                let landed = world_setup::spawn_squad(world, rng, x, ctx);
                log::debug!("reinforcement: squad of {landed} at x={x:.0}");
                spawned += landed;
            }
        }
    }

    spawned
}

/// Live (not destroyed) enemies per archetype.
pub fn active_counts(world: &World) -> BTreeMap<Archetype, u32> {
    let mut counts = BTreeMap::new();
    for (_, (tag, destroyed)) in world
        .query::<(&ArchetypeTag, Option<&Destroyed>)>()
        .iter()
    {
        if destroyed.is_none() {
            *counts.entry(tag.0).or_insert(0) += 1;
        }
    }
    counts
}

fn squad_interval(ctx: &SpawnContext) -> f64 {
    ctx.config.spawning.infantry_spawn_interval_ms * ctx.level.spawn_interval_multiplier
}
