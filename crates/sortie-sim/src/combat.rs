//! Damage resolution, splash damage and reward bookkeeping.
//!
//! Every source of damage in the simulation funnels through [`apply_damage`].
//! It and [`self_destruct`] are the only places that mark entities
//! destroyed, so a kill is reported and rewarded at most once no matter how
//! many hits land in the same tick.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use sortie_core::components::{ArchetypeTag, Destroyed, FirstDamage, Health, Player};
use sortie_core::config::{GameConfig, LevelSpec};
use sortie_core::constants::KAMIKAZE_BLAST_RADIUS;
use sortie_core::enums::{Archetype, DamageType, TextColor};
use sortie_core::events::{CombatEvent, SourceId};
use sortie_core::geometry::distance;
use sortie_core::types::Position;

use crate::combo::{Award, ComboAggregator};
use crate::handles::{entity_id, is_active, player_entity};

/// Source shared by damage the aircraft deals over time (burns, ground fire),
/// so those kills combo together.
pub fn player_source() -> SourceId {
    SourceId::new("player")
}

/// Running score, wallet and per-level kill tally.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    /// Current level (1-based), 0 before the first start.
    pub level: u32,
    pub score: u64,
    pub coins: u64,
    /// Kills per archetype this level.
    pub destroyed: BTreeMap<Archetype, u32>,
}

impl ScoreState {
    /// Reset the tally for a new level. Score and coins carry over.
    pub fn begin_level(&mut self, level: u32) {
        self.level = level;
        self.destroyed.clear();
    }

    pub fn destroyed(&self, archetype: Archetype) -> u32 {
        self.destroyed.get(&archetype).copied().unwrap_or(0)
    }

    /// Every objective of `spec` has been met.
    pub fn objectives_met(&self, spec: &LevelSpec) -> bool {
        spec.targets
            .iter()
            .all(|(&archetype, &target)| self.destroyed(archetype) >= target)
    }
}

/// Everything the resolver touches besides the world.
pub struct CombatContext<'a> {
    pub config: &'a GameConfig,
    pub now_ms: f64,
    pub score: &'a mut ScoreState,
    pub combos: &'a mut ComboAggregator,
    pub events: &'a mut Vec<CombatEvent>,
}

/// Result of a single damage application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    pub killed: bool,
}

/// Apply `amount` damage to `target`.
///
/// Inactive or missing targets are left untouched. The first hit stamps
/// [`FirstDamage`]. A lethal hit on an enemy marks it [`Destroyed`], emits
/// the destruction event, adds the quick-kill bonus when earned and hands
/// the reward to the combo aggregator. A lethal hit on the player ends the
/// match instead: no reward, no combo. Kills after the match ended pay
/// nothing.
pub fn apply_damage(
    world: &mut World,
    ctx: &mut CombatContext,
    target: Entity,
    amount: f64,
    source: Option<&SourceId>,
    damage_type: DamageType,
) -> DamageOutcome {
    if !is_active(world, target) {
        return DamageOutcome::default();
    }

    let (remaining, max) = match world.get::<&mut Health>(target) {
        Ok(mut health) => {
            health.current -= amount;
            (health.current, health.max)
        }
        Err(_) => return DamageOutcome::default(),
    };
    if world.get::<&FirstDamage>(target).is_err() {
        let _ = world.insert_one(target, FirstDamage { at_ms: ctx.now_ms });
    }

    if world.get::<&Player>(target).is_ok() {
        ctx.events.push(CombatEvent::PlayerHealth {
            hp: remaining.max(0.0),
            max_hp: max,
        });
        if remaining > 0.0 {
            return DamageOutcome::default();
        }
        let _ = world.insert_one(target, Destroyed);
        end_match(ctx);
        return DamageOutcome { killed: true };
    }

    if remaining > 0.0 {
        return DamageOutcome::default();
    }

    let first_hit_ms = world
        .get::<&FirstDamage>(target)
        .map(|first| first.at_ms)
        .unwrap_or(ctx.now_ms);
    let Some((archetype, position)) = mark_destroyed(world, ctx, target, source, damage_type)
    else {
        log::warn!("destroyed entity {target:?} carries no archetype tag");
        return DamageOutcome { killed: true };
    };
    if match_over(world) {
        return DamageOutcome { killed: true };
    }
    *ctx.score.destroyed.entry(archetype).or_insert(0) += 1;

    let Some(stats) = ctx.config.enemy(archetype) else {
        log::warn!("no reward entry for {archetype:?}");
        return DamageOutcome { killed: true };
    };
    let scoring = &ctx.config.scoring;
    let mut earned = stats.score;
    if ctx.now_ms - first_hit_ms <= scoring.quick_kill_window_ms {
        let bonus = stats.score * scoring.quick_kill_multiplier;
        earned += bonus;
        ctx.events.push(CombatEvent::FloatingText {
            position,
            text: format!("+{} QUICK KILL!", bonus.floor()),
            color: TextColor::Yellow,
        });
    }

    if let Some(award) =
        ctx.combos
            .register_kill(source, earned, stats.coins, position, ctx.now_ms, scoring)
    {
        apply_award(ctx.score, ctx.events, &award);
    }
    DamageOutcome { killed: true }
}

/// Blow up `target` without paying for it: a drone that rams the aircraft
/// destroys itself. No reward, no objective credit. Returns false when the
/// target was already gone.
pub fn self_destruct(
    world: &mut World,
    ctx: &mut CombatContext,
    target: Entity,
    damage_type: DamageType,
) -> bool {
    if !is_active(world, target) {
        return false;
    }
    mark_destroyed(world, ctx, target, None, damage_type);
    true
}

/// Mark `target` destroyed and announce it. A drone killed by its own dive
/// goes up with a bigger blast.
fn mark_destroyed(
    world: &mut World,
    ctx: &mut CombatContext,
    target: Entity,
    source: Option<&SourceId>,
    damage_type: DamageType,
) -> Option<(Archetype, Position)> {
    let _ = world.insert_one(target, Destroyed);
    let archetype = world.get::<&ArchetypeTag>(target).ok().map(|tag| tag.0)?;
    let position = world
        .get::<&Position>(target)
        .map(|pos| *pos)
        .unwrap_or_default();

    ctx.events.push(CombatEvent::Destroyed {
        id: entity_id(target),
        archetype,
        position,
        damage_type,
        source: source.cloned(),
    });
    if archetype == Archetype::Drone && damage_type == DamageType::Kamikaze {
        ctx.events.push(CombatEvent::ExplosionFx {
            position,
            radius: KAMIKAZE_BLAST_RADIUS,
        });
    }
    Some((archetype, position))
}

/// The aircraft is down; the score was reported with `GameOver`.
pub fn match_over(world: &World) -> bool {
    player_entity(world).is_some_and(|player| !is_active(world, player))
}

/// Damage every active enemy of `pools` within `radius` of `origin`
/// (inclusive), except `exclude`. All victims share `source`, so a single
/// blast combos. Returns the number of kills.
#[allow(clippy::too_many_arguments)]
pub fn apply_area_damage(
    world: &mut World,
    ctx: &mut CombatContext,
    origin: Position,
    radius: f64,
    damage: f64,
    source: Option<&SourceId>,
    exclude: Option<Entity>,
    pools: &[Archetype],
) -> u32 {
    let mut victims: Vec<(usize, u64, Entity)> = world
        .query::<(&ArchetypeTag, &Position, Option<&Destroyed>)>()
        .iter()
        .filter(|(entity, (_, _, destroyed))| destroyed.is_none() && Some(*entity) != exclude)
        .filter(|(_, (_, pos, _))| distance(origin, **pos) <= radius)
        .filter_map(|(entity, (tag, _, _))| {
            let pool = pools.iter().position(|&p| p == tag.0)?;
            Some((pool, entity.to_bits().get(), entity))
        })
        .collect();
    victims.sort_by_key(|&(pool, bits, _)| (pool, bits));

    let mut kills = 0;
    for (_, _, victim) in victims {
        let outcome = apply_damage(
            world,
            ctx,
            victim,
            damage,
            source,
            DamageType::ExplosionSplash,
        );
        if outcome.killed {
            kills += 1;
        }
    }
    kills
}

/// Apply a finalized reward: floor the score, credit coins, show the text.
pub fn apply_award(score: &mut ScoreState, events: &mut Vec<CombatEvent>, award: &Award) {
    let amount = award.score.max(0.0).floor() as u64;
    if amount > 0 {
        score.score += amount;
        events.push(CombatEvent::ScoreAwarded {
            amount,
            total: score.score,
        });
        let (text, color) = if award.bonus > 0.0 {
            (format!("MULTI-KILL! +{amount}"), TextColor::Magenta)
        } else {
            (format!("+{amount}"), TextColor::White)
        };
        events.push(CombatEvent::FloatingText {
            position: award.position,
            text,
            color,
        });
    }
    if award.coins > 0 {
        score.coins += award.coins;
        events.push(CombatEvent::CoinsAwarded {
            amount: award.coins,
            total: score.coins,
            position: award.position,
        });
        events.push(CombatEvent::FloatingText {
            position: award.position,
            text: format!("+{}$", award.coins),
            color: TextColor::Gold,
        });
    }
}

/// Finalize every pending combo and apply it.
pub fn settle_combos(ctx: &mut CombatContext) {
    for (source, award) in ctx.combos.flush_all(&ctx.config.scoring) {
        log::debug!("combo {source} settled early: {} kills", award.kills);
        apply_award(ctx.score, ctx.events, &award);
    }
}

fn end_match(ctx: &mut CombatContext) {
    settle_combos(ctx);
    ctx.events.push(CombatEvent::GameOver {
        level: ctx.score.level,
        score: ctx.score.score,
    });
}
