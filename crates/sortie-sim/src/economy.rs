//! Upgrade shop.
//!
//! Upgrades rewrite the engine's weapon table in place, so they persist for
//! every later level of the same engine.

use std::collections::BTreeMap;

use thiserror::Error;

use sortie_core::config::{ShopConfig, WeaponStats};
use sortie_core::enums::{PlayerWeapon, UpgradeKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("the shop is closed while a level is in play")]
    Closed,
    #[error("no stats for weapon {0:?}")]
    UnknownWeapon(PlayerWeapon),
    #[error("{0:?} already has unlimited ammo")]
    UnlimitedAmmo(PlayerWeapon),
    #[error("upgrade costs {cost} coins but only {coins} are available")]
    InsufficientCoins { cost: u64, coins: u64 },
}

pub fn price(shop: &ShopConfig, kind: UpgradeKind) -> u64 {
    match kind {
        UpgradeKind::Damage => shop.damage_cost,
        UpgradeKind::Cooldown => shop.cooldown_cost,
        UpgradeKind::Ammo => shop.ammo_cost,
    }
}

/// Buy one upgrade. Charges `coins` only when the upgrade applies.
/// Returns the price paid.
pub fn purchase(
    weapons: &mut BTreeMap<PlayerWeapon, WeaponStats>,
    weapon: PlayerWeapon,
    kind: UpgradeKind,
    coins: &mut u64,
    shop: &ShopConfig,
) -> Result<u64, ShopError> {
    let stats = weapons
        .get_mut(&weapon)
        .ok_or(ShopError::UnknownWeapon(weapon))?;
    if kind == UpgradeKind::Ammo && stats.ammo.is_none() {
        return Err(ShopError::UnlimitedAmmo(weapon));
    }
    let cost = price(shop, kind);
    if *coins < cost {
        return Err(ShopError::InsufficientCoins {
            cost,
            coins: *coins,
        });
    }

    upgrade(stats, kind, shop);
    *coins -= cost;
    Ok(cost)
}

/// Apply one upgrade to a weapon's stats.
pub fn upgrade(stats: &mut WeaponStats, kind: UpgradeKind, shop: &ShopConfig) {
    match kind {
        UpgradeKind::Damage => {
            let f = shop.damage_factor;
            for stat in [
                &mut stats.damage,
                &mut stats.secondary_damage,
                &mut stats.damage_per_second,
            ] {
                if *stat > 0.0 {
                    *stat = (*stat * f).floor();
                }
            }
        }
        UpgradeKind::Cooldown => {
            stats.fire_rate_ms =
                (stats.fire_rate_ms * shop.cooldown_factor).floor().max(shop.cooldown_floor_ms);
        }
        UpgradeKind::Ammo => {
            if let Some(rounds) = stats.ammo.as_mut() {
                // Small magazines would otherwise round back down to the same size.
                let scaled = (*rounds as f64 * shop.ammo_factor).floor() as u32;
                *rounds = scaled.max(*rounds + 1);
            }
        }
    }
}
