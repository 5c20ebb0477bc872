//! Player armament: ammo, fire-rate gating, unlocks and trigger state.
//!
//! Holds no entities directly except the current aim target and lock set,
//! both of which are re-checked by the systems that read them.

use std::collections::{BTreeMap, BTreeSet};

use hecs::Entity;

use sortie_core::config::{GameConfig, LevelSpec};
use sortie_core::enums::{PlayerWeapon, WeaponNotice};
use sortie_core::events::SourceId;
use sortie_core::state::AmmoView;

use crate::combat::player_source;

#[derive(Debug, Clone, Default)]
pub struct Armament {
    /// Rounds left per weapon; `None` is unlimited.
    ammo: BTreeMap<PlayerWeapon, Option<u32>>,
    last_fired_ms: BTreeMap<PlayerWeapon, f64>,
    unlocked: Vec<PlayerWeapon>,
    /// Triggers currently held down.
    held: BTreeSet<PlayerWeapon>,
    pub bomb_bay_armed: bool,
    pub locking: bool,
    /// Multi-missile locks, nearest first.
    pub locks: Vec<Entity>,
    pub power_up_until_ms: f64,
    /// Gun angle relative to the hull.
    pub gun_rotation: f64,
    pub aim_target: Option<Entity>,
    /// Counter behind minted source ids. Never reset, so ids stay unique
    /// for the life of the engine.
    shots_minted: u64,
}

impl Armament {
    /// Reload and reset for a new level. Ammo comes from the (possibly
    /// upgraded) weapon table.
    pub fn arm_for_level(&mut self, level: &LevelSpec, config: &GameConfig) {
        self.ammo = config
            .weapons
            .iter()
            .map(|(&weapon, stats)| (weapon, stats.ammo))
            .collect();
        self.last_fired_ms.clear();
        self.unlocked = level.unlocked_weapons.clone();
        self.held.clear();
        self.bomb_bay_armed = false;
        self.locking = false;
        self.locks.clear();
        self.power_up_until_ms = 0.0;
        self.gun_rotation = 0.0;
        self.aim_target = None;
    }

    pub fn is_unlocked(&self, weapon: PlayerWeapon) -> bool {
        self.unlocked.contains(&weapon)
    }

    /// Rounds left; `None` is unlimited.
    pub fn ammo(&self, weapon: PlayerWeapon) -> Option<u32> {
        self.ammo.get(&weapon).copied().flatten()
    }

    pub fn has_ammo(&self, weapon: PlayerWeapon) -> bool {
        !matches!(self.ammo.get(&weapon), Some(Some(0)))
    }

    pub fn powered_up(&self, now_ms: f64) -> bool {
        now_ms < self.power_up_until_ms
    }

    pub fn fire_rate_ms(&self, weapon: PlayerWeapon, config: &GameConfig, now_ms: f64) -> f64 {
        if weapon == PlayerWeapon::Bomb && self.powered_up(now_ms) {
            return config.power_up.bomb_fire_rate_ms;
        }
        config.weapon(weapon).map_or(0.0, |stats| stats.fire_rate_ms)
    }

    pub fn is_ready(&self, weapon: PlayerWeapon, config: &GameConfig, now_ms: f64) -> bool {
        match self.last_fired_ms.get(&weapon) {
            Some(&last) => now_ms >= last + self.fire_rate_ms(weapon, config, now_ms),
            None => true,
        }
    }

    /// Why `weapon` cannot fire right now, if it cannot.
    pub fn check(
        &self,
        weapon: PlayerWeapon,
        config: &GameConfig,
        now_ms: f64,
    ) -> Result<(), WeaponNotice> {
        if !self.is_unlocked(weapon) {
            Err(WeaponNotice::Locked)
        } else if !self.has_ammo(weapon) {
            Err(WeaponNotice::OutOfAmmo)
        } else if !self.is_ready(weapon, config, now_ms) {
            Err(WeaponNotice::Recharging)
        } else {
            Ok(())
        }
    }

    /// Spend one round and start the cooldown.
    pub fn consume(&mut self, weapon: PlayerWeapon, now_ms: f64) {
        self.last_fired_ms.insert(weapon, now_ms);
        if let Some(Some(rounds)) = self.ammo.get_mut(&weapon) {
            *rounds = rounds.saturating_sub(1);
        }
    }

    /// Source id for a projectile of `weapon`. Machine-gun rounds carry none
    /// and pay out immediately; flame shares the player source with burns.
    pub fn source_for(&mut self, weapon: PlayerWeapon) -> Option<SourceId> {
        match weapon {
            PlayerWeapon::MachineGun => None,
            PlayerWeapon::Flamethrower => Some(player_source()),
            _ => {
                self.shots_minted += 1;
                Some(SourceId::new(format!(
                    "{}_{}",
                    weapon.source_prefix(),
                    self.shots_minted
                )))
            }
        }
    }

    /// Press or release a held trigger. A press returns the notice for a
    /// weapon that cannot fire yet; a locked weapon is not held at all.
    pub fn press(
        &mut self,
        weapon: PlayerWeapon,
        held: bool,
        config: &GameConfig,
        now_ms: f64,
    ) -> Option<WeaponNotice> {
        if !held {
            self.held.remove(&weapon);
            return None;
        }
        let notice = self.check(weapon, config, now_ms).err();
        if notice != Some(WeaponNotice::Locked) {
            self.held.insert(weapon);
        }
        notice
    }

    pub fn held(&self) -> impl Iterator<Item = PlayerWeapon> + '_ {
        self.held.iter().copied()
    }

    /// Arm or safe the bomb bay.
    pub fn toggle_bomb_bay(&mut self) -> Option<WeaponNotice> {
        if !self.is_unlocked(PlayerWeapon::Bomb) {
            return Some(WeaponNotice::Locked);
        }
        if self.bomb_bay_armed {
            self.bomb_bay_armed = false;
            return None;
        }
        if !self.has_ammo(PlayerWeapon::Bomb) {
            return Some(WeaponNotice::OutOfAmmo);
        }
        self.bomb_bay_armed = true;
        None
    }

    /// Start the lock-on sweep if the launcher can fire.
    pub fn begin_lock(&mut self, config: &GameConfig, now_ms: f64) -> Option<WeaponNotice> {
        if let Err(notice) = self.check(PlayerWeapon::MultiMissile, config, now_ms) {
            return Some(notice);
        }
        self.locking = true;
        None
    }

    /// Stop sweeping and hand back the locks gathered so far.
    pub fn take_locks(&mut self) -> Vec<Entity> {
        self.locking = false;
        std::mem::take(&mut self.locks)
    }

    pub fn collect_power_up(&mut self, now_ms: f64, config: &GameConfig) {
        self.power_up_until_ms = now_ms + config.power_up.duration_ms;
    }

    /// Weapon slots for the HUD.
    pub fn view(&self, config: &GameConfig, now_ms: f64) -> Vec<AmmoView> {
        PlayerWeapon::ALL
            .iter()
            .map(|&weapon| AmmoView {
                weapon,
                unlocked: self.is_unlocked(weapon),
                ammo: self.ammo(weapon),
                ready: self.check(weapon, config, now_ms).is_ok(),
            })
            .collect()
    }
}
