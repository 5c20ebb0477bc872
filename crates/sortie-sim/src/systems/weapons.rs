//! Player weapon release.
//!
//! Projectiles are flown by the external physics layer; this system only
//! decides when a round leaves the aircraft and announces it with a
//! `PlayerFired` event carrying the source id later hits will report.

use hecs::{Entity, World};

use sortie_ai::targeting::assign_missiles;
use sortie_core::config::GameConfig;
use sortie_core::enums::{PlayerWeapon, WeaponNotice};
use sortie_core::events::CombatEvent;
use sortie_core::types::Position;

use crate::armament::Armament;
use crate::handles::{entity_id, is_active, player_pose};

/// Missiles launched per lock release.
pub const MISSILES_PER_SALVO: usize = 2;

/// Fire every held trigger that is ready, then let the bomb bay drop.
pub fn run(
    world: &World,
    armament: &mut Armament,
    config: &GameConfig,
    now_ms: f64,
    events: &mut Vec<CombatEvent>,
) {
    let Some((position, facing)) = player_pose(world) else {
        return;
    };

    let held: Vec<PlayerWeapon> = armament
        .held()
        .filter(|&w| w != PlayerWeapon::MultiMissile)
        .collect();
    for weapon in held {
        if armament.check(weapon, config, now_ms).is_ok() {
            fire(world, armament, weapon, position, facing, now_ms, events);
        }
    }

    if armament.bomb_bay_armed {
        if armament.check(PlayerWeapon::Bomb, config, now_ms).is_ok() {
            fire(world, armament, PlayerWeapon::Bomb, position, facing, now_ms, events);
        }
        if !armament.has_ammo(PlayerWeapon::Bomb) {
            armament.bomb_bay_armed = false;
        }
    }
}

/// Launch the multi-missile salvo at whatever is still locked. Returns the
/// notice when the launcher cannot fire; the sweep and its locks survive.
pub fn release_lock(
    world: &World,
    armament: &mut Armament,
    config: &GameConfig,
    now_ms: f64,
    events: &mut Vec<CombatEvent>,
) -> Option<WeaponNotice> {
    if let Err(notice) = armament.check(PlayerWeapon::MultiMissile, config, now_ms) {
        return Some(notice);
    }
    let locks = armament.take_locks();
    let (position, facing) = player_pose(world)?;

    armament.consume(PlayerWeapon::MultiMissile, now_ms);
    let live: Vec<Entity> = locks
        .into_iter()
        .filter(|&e| is_active(world, e))
        .collect();
    for target in assign_missiles(&live, MISSILES_PER_SALVO) {
        events.push(CombatEvent::PlayerFired {
            weapon: PlayerWeapon::MultiMissile,
            source: armament.source_for(PlayerWeapon::MultiMissile),
            position,
            rotation: facing,
            target: target.map(entity_id),
        });
    }
    None
}

fn fire(
    world: &World,
    armament: &mut Armament,
    weapon: PlayerWeapon,
    position: Position,
    facing: f64,
    now_ms: f64,
    events: &mut Vec<CombatEvent>,
) {
    armament.consume(weapon, now_ms);
    let (rotation, target) = if weapon == PlayerWeapon::MachineGun {
        let target = armament
            .aim_target
            .filter(|&e| is_active(world, e))
            .map(entity_id);
        (facing + armament.gun_rotation, target)
    } else {
        (facing, None)
    };
    events.push(CombatEvent::PlayerFired {
        weapon,
        source: armament.source_for(weapon),
        position,
        rotation,
        target,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_while_recharging_keeps_the_sweep() {
        let config = GameConfig::default();
        let mut armament = Armament::default();
        armament.arm_for_level(config.level(5).expect("level"), &config);
        let mut world = World::new();
        let target = world.spawn((Position::new(10.0, 0.0),));
        armament.consume(PlayerWeapon::MultiMissile, 0.0);
        armament.locking = true;
        armament.locks = vec![target];

        let mut events = Vec::new();
        let notice = release_lock(&world, &mut armament, &config, 10.0, &mut events);

        assert_eq!(notice, Some(WeaponNotice::Recharging));
        assert!(armament.locking);
        assert_eq!(armament.locks, vec![target]);
        assert!(events.is_empty());
    }
}
