//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::{Entity, World};

use sortie_core::components::*;
use sortie_core::config::{GameConfig, LevelSpec};
use sortie_core::enums::*;
use sortie_core::events::CombatEvent;
use sortie_core::state::*;
use sortie_core::types::{Position, SimTime};

use crate::armament::Armament;
use crate::combat::ScoreState;
use crate::handles::{entity_id, is_active};

/// Everything the snapshot reads besides the world.
pub struct SnapshotInputs<'a> {
    pub time: &'a SimTime,
    pub phase: GamePhase,
    pub score: &'a ScoreState,
    pub level: Option<&'a LevelSpec>,
    pub armament: &'a Armament,
    pub config: &'a GameConfig,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    inputs: &SnapshotInputs,
    events: Vec<CombatEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *inputs.time,
        phase: inputs.phase,
        level: inputs.score.level,
        score: inputs.score.score,
        coins: inputs.score.coins,
        player: build_player(world, inputs),
        enemies: build_enemies(world),
        objectives: build_objectives(inputs.level, inputs.score),
        armament: inputs.armament.view(inputs.config, inputs.time.now_ms),
        events,
    }
}

fn build_player(world: &World, inputs: &SnapshotInputs) -> PlayerView {
    let armament = inputs.armament;
    let mut view = PlayerView {
        gun_rotation: armament.gun_rotation,
        aim_target: armament
            .aim_target
            .filter(|&e| is_active(world, e))
            .map(entity_id),
        locking: armament.locking,
        locks: armament
            .locks
            .iter()
            .filter(|&&e| is_active(world, e))
            .map(|&e| entity_id(e))
            .collect(),
        bomb_bay_armed: armament.bomb_bay_armed,
        powered_up: armament.powered_up(inputs.time.now_ms),
        ..Default::default()
    };

    if let Some((_, (_, pos, heading, health, destroyed))) = world
        .query::<(&Player, &Position, &Heading, &Health, Option<&Destroyed>)>()
        .iter()
        .next()
    {
        view.alive = destroyed.is_none();
        view.position = *pos;
        view.rotation = heading.0;
        view.hp = health.current.max(0.0);
        view.max_hp = health.max;
    }
    view
}

/// Build EnemyView list from all live enemies, ordered by id.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&ArchetypeTag, &Position, &Health, Option<&Destroyed>)>()
        .iter()
        .filter(|(_, (_, _, _, destroyed))| destroyed.is_none())
        .map(|(entity, (tag, pos, health, _))| EnemyView {
            id: entity_id(entity),
            archetype: tag.0,
            position: *pos,
            hp: health.current,
            max_hp: health.max,
            behavior: behavior_label(world, entity),
            burning: world.get::<&Burning>(entity).is_ok(),
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

fn behavior_label(world: &World, entity: Entity) -> String {
    if let Ok(brain) = world.get::<&DroneBrain>(entity) {
        return format!("{:?}", brain.state);
    }
    if let Ok(brain) = world.get::<&InfantryBrain>(entity) {
        return format!("{:?}", brain.state);
    }
    if let Ok(brain) = world.get::<&TurretBrain>(entity) {
        return format!("{:?}", brain.state);
    }
    if world.get::<&HangarBrain>(entity).is_ok() {
        return "Launching".to_string();
    }
    String::new()
}

fn build_objectives(level: Option<&LevelSpec>, score: &ScoreState) -> Vec<ObjectiveView> {
    let Some(level) = level else {
        return Vec::new();
    };
    level
        .targets
        .iter()
        .map(|(&archetype, &target)| ObjectiveView {
            archetype,
            label: archetype.label().to_string(),
            destroyed: score.destroyed(archetype).min(target),
            target,
        })
        .collect()
}
