//! Tests for the damage resolver, combo scoring, splash damage and the engine.

use hecs::{Entity, World};

use sortie_core::commands::PlayerCommand;
use sortie_core::components::{Burning, Health};
use sortie_core::config::GameConfig;
use sortie_core::enums::*;
use sortie_core::events::{CombatEvent, SourceId};
use sortie_core::state::GameStateSnapshot;
use sortie_core::types::Position;

use crate::combat::{apply_area_damage, apply_award, apply_damage, CombatContext, DamageOutcome, ScoreState};
use crate::combo::ComboAggregator;
use crate::engine::{SimConfig, SimulationEngine};
use crate::handles::{entity_id, is_active};
use crate::systems::burn;
use crate::world_setup::{self, SpawnContext};

// ---- Harness ----

/// A bare world plus the state the resolver needs, without the engine loop.
struct Harness {
    world: World,
    config: GameConfig,
    score: ScoreState,
    combos: ComboAggregator,
    events: Vec<CombatEvent>,
}

impl Harness {
    fn new() -> Self {
        let mut score = ScoreState::default();
        score.begin_level(1);
        Self {
            world: World::new(),
            config: GameConfig::default(),
            score,
            combos: ComboAggregator::new(),
            events: Vec::new(),
        }
    }

    fn spawn(&mut self, archetype: Archetype, position: Position) -> Entity {
        let ctx = SpawnContext {
            config: &self.config,
            level: &self.config.levels[0],
            now_ms: 0.0,
        };
        world_setup::spawn_enemy(&mut self.world, archetype, position, &ctx)
    }

    fn spawn_player(&mut self) -> Entity {
        world_setup::spawn_player(&mut self.world, &self.config)
    }

    fn damage(
        &mut self,
        target: Entity,
        amount: f64,
        source: Option<&SourceId>,
        damage_type: DamageType,
        now_ms: f64,
    ) -> DamageOutcome {
        let mut ctx = CombatContext {
            config: &self.config,
            now_ms,
            score: &mut self.score,
            combos: &mut self.combos,
            events: &mut self.events,
        };
        apply_damage(&mut self.world, &mut ctx, target, amount, source, damage_type)
    }

    fn splash(
        &mut self,
        origin: Position,
        radius: f64,
        amount: f64,
        source: Option<&SourceId>,
        exclude: Option<Entity>,
    ) -> u32 {
        let mut ctx = CombatContext {
            config: &self.config,
            now_ms: 0.0,
            score: &mut self.score,
            combos: &mut self.combos,
            events: &mut self.events,
        };
        apply_area_damage(
            &mut self.world,
            &mut ctx,
            origin,
            radius,
            amount,
            source,
            exclude,
            &Archetype::ALL,
        )
    }

    /// Settle combos whose window has closed by `now_ms`.
    fn expire(&mut self, now_ms: f64) {
        for (_, award) in self.combos.expire(now_ms, &self.config.scoring) {
            apply_award(&mut self.score, &mut self.events, &award);
        }
    }

    fn hp(&self, entity: Entity) -> f64 {
        self.world.get::<&Health>(entity).unwrap().current
    }

    fn score_awards(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::ScoreAwarded { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect()
    }
}

fn count_destroyed(events: &[CombatEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CombatEvent::Destroyed { .. }))
        .count()
}

// ---- Resolver ----

#[test]
fn test_quick_kill_inside_window_pays_bonus() {
    let mut h = Harness::new();
    let tank = h.spawn(Archetype::Tank, Position::new(0.0, 0.0));
    h.damage(tank, 50.0, None, DamageType::MachineGun, 0.0);
    let out = h.damage(tank, 50.0, None, DamageType::MachineGun, 9_999.0);
    assert!(out.killed);
    assert_eq!(h.score.score, 120, "base 100 plus 20% quick kill");
    assert_eq!(h.score.coins, 1000);
}

#[test]
fn test_quick_kill_outside_window_pays_base() {
    let mut h = Harness::new();
    let tank = h.spawn(Archetype::Tank, Position::new(0.0, 0.0));
    h.damage(tank, 50.0, None, DamageType::MachineGun, 0.0);
    let out = h.damage(tank, 50.0, None, DamageType::MachineGun, 10_001.0);
    assert!(out.killed);
    assert_eq!(h.score.score, 100);
}

#[test]
fn test_first_damage_is_never_reset() {
    let mut h = Harness::new();
    let tank = h.spawn(Archetype::Tank, Position::new(0.0, 0.0));
    h.damage(tank, 10.0, None, DamageType::MachineGun, 0.0);
    h.damage(tank, 10.0, None, DamageType::MachineGun, 8_000.0);
    h.damage(tank, 80.0, None, DamageType::MachineGun, 12_000.0);
    assert_eq!(h.score.score, 100, "window counts from the very first hit");
}

#[test]
fn test_double_damage_reports_one_kill() {
    let mut h = Harness::new();
    let soldier = h.spawn(Archetype::Infantry, Position::new(0.0, 0.0));
    h.world.get::<&mut Health>(soldier).unwrap().current = 10.0;

    let first = h.damage(soldier, 15.0, None, DamageType::MachineGun, 0.0);
    let score_after_first = h.score.score;
    let second = h.damage(soldier, 15.0, None, DamageType::MachineGun, 0.0);

    assert!(first.killed);
    assert!(!second.killed);
    assert_eq!(h.hp(soldier), -5.0, "second call must not touch health");
    assert_eq!(h.score.score, score_after_first);
    assert_eq!(count_destroyed(&h.events), 1);
    assert_eq!(h.score.destroyed(Archetype::Infantry), 1);
}

#[test]
fn test_damage_on_missing_entity_is_noop() {
    let mut h = Harness::new();
    let soldier = h.spawn(Archetype::Infantry, Position::new(0.0, 0.0));
    h.world.despawn(soldier).unwrap();
    let out = h.damage(soldier, 100.0, None, DamageType::Bomb, 0.0);
    assert!(!out.killed);
    assert!(h.events.is_empty());
}

#[test]
fn test_player_death_ends_match_without_reward() {
    let mut h = Harness::new();
    let player = h.spawn_player();
    let out = h.damage(player, 150.0, None, DamageType::EnemyShell, 0.0);

    assert!(out.killed);
    assert!(!is_active(&h.world, player));
    assert_eq!(h.score.score, 0);
    assert!(h
        .events
        .contains(&CombatEvent::PlayerHealth { hp: 0.0, max_hp: 100.0 }));
    assert!(h
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::GameOver { level: 1, .. })));
    assert_eq!(count_destroyed(&h.events), 0);
    assert_eq!(h.combos.pending(), 0);
}

#[test]
fn test_player_death_settles_pending_combos() {
    let mut h = Harness::new();
    let player = h.spawn_player();
    let soldier = h.spawn(Archetype::Infantry, Position::new(0.0, 0.0));
    let src = SourceId::new("bomb_1");
    h.damage(soldier, 40.0, Some(&src), DamageType::Bomb, 0.0);
    assert_eq!(h.combos.pending(), 1);

    h.damage(player, 500.0, None, DamageType::Collision, 10.0);
    assert_eq!(h.combos.pending(), 0);
    let over_at = h
        .events
        .iter()
        .position(|e| matches!(e, CombatEvent::GameOver { .. }))
        .unwrap();
    let award_at = h
        .events
        .iter()
        .position(|e| matches!(e, CombatEvent::ScoreAwarded { .. }))
        .unwrap();
    assert!(award_at < over_at, "score is final when the match ends");
}

#[test]
fn test_kills_after_player_death_pay_nothing() {
    let mut h = Harness::new();
    let player = h.spawn_player();
    let tank = h.spawn(Archetype::Tank, Position::new(0.0, 0.0));
    h.damage(player, 500.0, None, DamageType::Collision, 0.0);

    let out = h.damage(tank, 9_999.0, None, DamageType::MachineGun, 10.0);
    assert!(out.killed);
    assert_eq!(count_destroyed(&h.events), 1);
    assert!(h.score_awards().is_empty());
    assert_eq!(h.score.score, 0);
    assert_eq!(h.score.coins, 0);
    assert_eq!(h.combos.pending(), 0);
}

#[test]
fn test_kamikaze_drone_kill_shows_big_explosion() {
    let mut h = Harness::new();
    let drone = h.spawn(Archetype::Drone, Position::new(10.0, 20.0));
    h.damage(drone, 9_999.0, None, DamageType::Kamikaze, 0.0);
    assert!(h.events.contains(&CombatEvent::ExplosionFx {
        position: Position::new(10.0, 20.0),
        radius: 40.0,
    }));
}

// ---- Combo aggregation ----

#[test]
fn test_three_sourced_kills_settle_once_with_bonus() {
    let mut h = Harness::new();
    let src = SourceId::new("bomb_7");
    let soldiers: Vec<Entity> = (0..3)
        .map(|i| h.spawn(Archetype::Infantry, Position::new(i as f64 * 500.0, 0.0)))
        .collect();
    for (i, &s) in soldiers.iter().enumerate() {
        h.damage(s, 40.0, Some(&src), DamageType::Bomb, i as f64 * 50.0);
    }
    assert!(h.score_awards().is_empty(), "nothing paid inside the window");

    h.expire(249.0);
    assert!(h.score_awards().is_empty());
    h.expire(250.0);

    // Each kill: 20 base + 4 quick kill = 24. Three of them: 72 * 1.5.
    assert_eq!(h.score_awards(), vec![108]);
    assert_eq!(h.score.coins, 15);
    assert!(h.events.iter().any(|e| matches!(
        e,
        CombatEvent::FloatingText { color: TextColor::Magenta, .. }
    )));
}

#[test]
fn test_two_sourced_kills_settle_without_bonus() {
    let mut h = Harness::new();
    let src = SourceId::new("cluster_3");
    for i in 0..2 {
        let s = h.spawn(Archetype::Infantry, Position::new(i as f64 * 500.0, 0.0));
        h.damage(s, 100.0, Some(&src), DamageType::ClusterMissile, 0.0);
    }
    h.expire(1_000.0);
    assert_eq!(h.score_awards(), vec![48]);
}

#[test]
fn test_distinct_sources_settle_separately() {
    let mut h = Harness::new();
    for i in 0..3 {
        let src = SourceId::new(format!("bomb_{i}"));
        let s = h.spawn(Archetype::Infantry, Position::new(i as f64 * 500.0, 0.0));
        h.damage(s, 40.0, Some(&src), DamageType::Bomb, 0.0);
    }
    h.expire(1_000.0);
    assert_eq!(h.score_awards(), vec![24, 24, 24]);
}

// ---- Splash ----

#[test]
fn test_splash_radius_is_inclusive_and_respects_exclusion() {
    let mut h = Harness::new();
    let near = h.spawn(Archetype::Tank, Position::new(79.0, 0.0));
    let far = h.spawn(Archetype::Tank, Position::new(81.0, 0.0));
    let edge = h.spawn(Archetype::Tank, Position::new(0.0, 80.0));
    let excluded = h.spawn(Archetype::Tank, Position::new(0.0, 0.0));

    h.splash(Position::new(0.0, 0.0), 80.0, 20.0, None, Some(excluded));

    assert_eq!(h.hp(near), 80.0);
    assert_eq!(h.hp(edge), 80.0);
    assert_eq!(h.hp(far), 100.0);
    assert_eq!(h.hp(excluded), 100.0);
}

#[test]
fn test_splash_kills_share_one_combo() {
    let mut h = Harness::new();
    let src = SourceId::new("bomb_1");
    for i in 0..4 {
        h.spawn(Archetype::Infantry, Position::new(i as f64 * 10.0, 0.0));
    }
    let kills = h.splash(Position::new(0.0, 0.0), 80.0, 20.0, Some(&src), None);
    assert_eq!(kills, 4);
    assert_eq!(h.combos.pending(), 1);
    h.expire(500.0);
    // 4 * 24 = 96, * 1.5 = 144.
    assert_eq!(h.score_awards(), vec![144]);
}

#[test]
fn test_splash_skips_already_destroyed() {
    let mut h = Harness::new();
    let a = h.spawn(Archetype::Infantry, Position::new(0.0, 0.0));
    h.damage(a, 100.0, None, DamageType::MachineGun, 0.0);
    let kills = h.splash(Position::new(0.0, 0.0), 80.0, 100.0, None, None);
    assert_eq!(kills, 0);
    assert_eq!(count_destroyed(&h.events), 1);
}

// ---- Burn ----

#[test]
fn test_burn_ticks_then_expires() {
    let mut h = Harness::new();
    let tank = h.spawn(Archetype::Tank, Position::new(0.0, 0.0));
    assert!(burn::ignite(&mut h.world, tank, 0.0, &h.config.flame));

    let mut ctx = CombatContext {
        config: &h.config,
        now_ms: 1_000.0,
        score: &mut h.score,
        combos: &mut h.combos,
        events: &mut h.events,
    };
    burn::run(&mut h.world, &mut ctx, 20.0, 1_000.0);
    assert_eq!(h.hp(tank), 80.0);

    let mut ctx = CombatContext {
        config: &h.config,
        now_ms: 2_500.0,
        score: &mut h.score,
        combos: &mut h.combos,
        events: &mut h.events,
    };
    burn::run(&mut h.world, &mut ctx, 20.0, 1_000.0);
    assert_eq!(h.hp(tank), 80.0, "expired burn deals nothing");
    assert!(h.world.get::<&Burning>(tank).is_err());
}

#[test]
fn test_ground_fire_scorches_ground_units_only() {
    let mut h = Harness::new();
    let soldier = h.spawn(Archetype::Infantry, Position::new(10.0, 0.0));
    let tower = h.spawn(Archetype::Tower, Position::new(-10.0, 0.0));
    burn::spawn_ground_fire(&mut h.world, Position::new(0.0, 0.0), 0.0, &h.config.flame);

    let mut ctx = CombatContext {
        config: &h.config,
        now_ms: 100.0,
        score: &mut h.score,
        combos: &mut h.combos,
        events: &mut h.events,
    };
    burn::run(&mut h.world, &mut ctx, 20.0, 1_000.0);

    assert_eq!(h.hp(soldier), 5.0, "half of 20 dps for one second");
    assert!(h.world.get::<&Burning>(soldier).is_ok());
    assert_eq!(h.hp(tower), 150.0);
}

// ---- Engine ----

fn engine(seed: u64) -> SimulationEngine {
    SimulationEngine::try_new(SimConfig {
        seed,
        ..Default::default()
    })
    .unwrap()
}

/// Start `level` with an empty field and the aircraft parked at `at`.
fn started(level: u32, at: Position) -> SimulationEngine {
    let mut engine = engine(7);
    engine.queue_command(PlayerCommand::StartLevel { level });
    engine.tick();
    engine.clear_enemies();
    engine.queue_command(PlayerCommand::SetPlayerPose {
        position: at,
        rotation: 0.0,
    });
    engine.tick();
    engine
}

fn events_of(snaps: &[GameStateSnapshot]) -> Vec<CombatEvent> {
    snaps.iter().flat_map(|s| s.events.clone()).collect()
}

fn mg_hit(target: Entity) -> PlayerCommand {
    PlayerCommand::WeaponHit {
        weapon: PlayerWeapon::MachineGun,
        target: entity_id(target),
        source: None,
        position: Position::default(),
        dt_ms: 0.0,
    }
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine(12345);
    let mut engine_b = engine(12345);

    engine_a.queue_command(PlayerCommand::StartLevel { level: 5 });
    engine_b.queue_command(PlayerCommand::StartLevel { level: 5 });

    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine(111);
    let mut engine_b = engine(222);
    engine_a.queue_command(PlayerCommand::StartLevel { level: 3 });
    engine_b.queue_command(PlayerCommand::StartLevel { level: 3 });

    let a = serde_json::to_string(&engine_a.tick().enemies).unwrap();
    let b = serde_json::to_string(&engine_b.tick().enemies).unwrap();
    assert_ne!(a, b, "different seeds should lay out different fields");
}

#[test]
fn test_invalid_config_is_refused() {
    let mut game = GameConfig::default();
    game.levels.pop();
    let result = SimulationEngine::try_new(SimConfig { seed: 1, game });
    assert!(result.is_err());
}

#[test]
fn test_start_level_populates_field() {
    let mut engine = engine(9);
    assert_eq!(engine.phase(), GamePhase::Briefing);
    engine.queue_command(PlayerCommand::StartLevel { level: 1 });
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.level, 1);
    assert!(snap.player.alive);
    assert!(snap
        .enemies
        .iter()
        .all(|e| e.archetype == Archetype::Infantry));
    assert!(!snap.enemies.is_empty());
    assert_eq!(snap.objectives.len(), 1);
    assert_eq!(snap.objectives[0].target, 10);
    assert_eq!(snap.objectives[0].destroyed, 0);
}

#[test]
fn test_unknown_level_is_ignored() {
    let mut engine = engine(9);
    engine.queue_command(PlayerCommand::StartLevel { level: 21 });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Briefing);
}

#[test]
fn test_pause_freezes_time() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let before = engine.time().tick;
    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, before);
    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.time().tick, before + 1);
}

#[test]
fn test_gun_hit_pays_immediately() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let soldier = engine.spawn_test_enemy(Archetype::Infantry, Position::new(2000.0, 1500.0));
    engine.queue_command(mg_hit(soldier));
    let snap = engine.tick();

    assert_eq!(snap.score, 24);
    assert_eq!(snap.coins, 5);
    assert_eq!(snap.objectives[0].destroyed, 1);
    assert!(snap.enemies.iter().all(|e| e.id != entity_id(soldier)));
}

#[test]
fn test_hit_on_stale_id_is_ignored() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let soldier = engine.spawn_test_enemy(Archetype::Infantry, Position::new(2000.0, 1500.0));
    engine.queue_command(mg_hit(soldier));
    engine.tick();
    engine.queue_command(mg_hit(soldier));
    let snap = engine.tick();
    assert_eq!(snap.score, 24);
    assert_eq!(count_destroyed(&snap.events), 0);
}

#[test]
fn test_bomb_combo_settles_after_window() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let src = SourceId::new("bomb_test");
    let soldiers: Vec<Entity> = (0..3)
        .map(|i| {
            engine.spawn_test_enemy(
                Archetype::Infantry,
                Position::new(400.0 + i as f64 * 600.0, 1500.0),
            )
        })
        .collect();
    engine.queue_commands(soldiers.iter().map(|&s| PlayerCommand::WeaponHit {
        weapon: PlayerWeapon::Bomb,
        target: entity_id(s),
        source: Some(src.clone()),
        position: Position::new(0.0, 0.0),
        dt_ms: 0.0,
    }));

    let first = engine.tick();
    assert_eq!(first.score, 0, "combo still open");
    assert!(engine.combos().is_pending(&src));

    let mut snaps = vec![first];
    for _ in 0..20 {
        snaps.push(engine.tick());
    }
    let awards: Vec<u64> = events_of(&snaps)
        .iter()
        .filter_map(|e| match e {
            CombatEvent::ScoreAwarded { amount, .. } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(awards, vec![108]);
}

#[test]
fn test_clearing_objectives_completes_level() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let soldiers: Vec<Entity> = (0..10)
        .map(|i| {
            engine.spawn_test_enemy(
                Archetype::Infantry,
                Position::new(200.0 + i as f64 * 250.0, 1500.0),
            )
        })
        .collect();
    engine.queue_commands(soldiers.into_iter().map(mg_hit));
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::LevelComplete);
    assert!(snap.events.contains(&CombatEvent::LevelComplete {
        level: 1,
        score: 240,
        coins: 50,
    }));

    // Frozen until the next level starts.
    let t = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, t);
}

#[test]
fn test_shop_opens_between_levels_and_upgrades_persist() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    assert_eq!(
        engine.purchase_upgrade(PlayerWeapon::MachineGun, UpgradeKind::Damage),
        Err(crate::economy::ShopError::Closed)
    );

    let tank = engine.spawn_test_enemy(Archetype::Tank, Position::new(3000.0, 1500.0));
    for _ in 0..7 {
        engine.queue_command(mg_hit(tank));
    }
    let soldiers: Vec<Entity> = (0..10)
        .map(|i| {
            engine.spawn_test_enemy(
                Archetype::Infantry,
                Position::new(200.0 + i as f64 * 250.0, 1500.0),
            )
        })
        .collect();
    engine.queue_commands(soldiers.into_iter().map(mg_hit));
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::LevelComplete);
    assert_eq!(snap.coins, 1050);

    assert_eq!(
        engine.purchase_upgrade(PlayerWeapon::MachineGun, UpgradeKind::Damage),
        Ok(300)
    );
    assert_eq!(engine.score().coins, 750);
    assert_eq!(engine.config().weapon(PlayerWeapon::MachineGun).unwrap().damage, 18.0);

    engine.queue_command(PlayerCommand::StartLevel { level: 2 });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.coins, 750);
    assert_eq!(engine.config().weapon(PlayerWeapon::MachineGun).unwrap().damage, 18.0);
}

#[test]
fn test_enemy_fire_can_end_the_match() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    engine.queue_command(PlayerCommand::PlayerStruck {
        weapon: EnemyWeapon::TankShell,
    });
    let snap = engine.tick();
    assert_eq!(snap.player.hp, 50.0);
    assert_eq!(snap.phase, GamePhase::Active);

    engine.queue_command(PlayerCommand::PlayerStruck {
        weapon: EnemyWeapon::TankShell,
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(!snap.player.alive);
    assert_eq!(snap.player.hp, 0.0);
}

#[test]
fn test_drone_ram_hurts_player_and_destroys_drone() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let drone = engine.spawn_test_enemy(Archetype::Drone, Position::new(1010.0, 400.0));
    engine.queue_command(PlayerCommand::DroneRam {
        drone: entity_id(drone),
    });
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::GameOver, "500 collision damage");
    assert!(snap.events.iter().any(|e| matches!(
        e,
        CombatEvent::Destroyed {
            archetype: Archetype::Drone,
            damage_type: DamageType::SelfDestruct,
            ..
        }
    )));
}

#[test]
fn test_drone_ram_pays_nothing_and_score_is_final() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let drone = engine.spawn_test_enemy(Archetype::Drone, Position::new(1010.0, 400.0));
    engine.queue_command(PlayerCommand::DroneRam {
        drone: entity_id(drone),
    });
    let snap = engine.tick();

    let over_at = snap
        .events
        .iter()
        .position(|e| matches!(e, CombatEvent::GameOver { .. }))
        .unwrap();
    assert_eq!(
        snap.events[over_at],
        CombatEvent::GameOver {
            level: 1,
            score: snap.score
        }
    );
    assert!(!snap.events[over_at..].iter().any(|e| matches!(
        e,
        CombatEvent::ScoreAwarded { .. } | CombatEvent::CoinsAwarded { .. }
    )));
    assert_eq!(snap.score, 0);
    assert_eq!(snap.coins, 0);
    assert_eq!(engine.score().destroyed.get(&Archetype::Drone), None);
}

#[test]
fn test_terrain_scrape_and_flak_splash() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    engine.queue_command(PlayerCommand::TerrainScrape { dt_ms: 1_000.0 });
    assert_eq!(engine.tick().player.hp, 80.0);

    engine.queue_command(PlayerCommand::FlakBurst {
        position: Position::new(1000.0, 440.0),
        direct: false,
    });
    assert_eq!(engine.tick().player.hp, 80.0, "40 away is outside 15 + 20");

    engine.queue_command(PlayerCommand::FlakBurst {
        position: Position::new(1000.0, 430.0),
        direct: false,
    });
    assert_eq!(engine.tick().player.hp, 30.0);
}

#[test]
fn test_auto_aim_tracks_target_in_cone() {
    let mut engine = started(1, Position::new(1000.0, 1000.0));
    let ahead = engine.spawn_test_enemy(Archetype::Infantry, Position::new(1300.0, 1040.0));
    engine.spawn_test_enemy(Archetype::Infantry, Position::new(1000.0, 1200.0));
    let snap = engine.tick();

    assert_eq!(snap.player.aim_target, Some(entity_id(ahead)));
    assert!(snap.player.gun_rotation > 0.0);
}

#[test]
fn test_lock_on_fires_two_missiles_at_nearest() {
    let mut engine = started(5, Position::new(1000.0, 1000.0));
    let tank = engine.spawn_test_enemy(Archetype::Tank, Position::new(1100.0, 1000.0));
    let tower = engine.spawn_test_enemy(Archetype::Tower, Position::new(1000.0, 1150.0));
    engine.spawn_test_enemy(Archetype::T95, Position::new(1500.0, 1000.0));

    engine.queue_command(PlayerCommand::BeginLock);
    let snap = engine.tick();
    assert!(snap.player.locking);
    assert_eq!(snap.player.locks, vec![entity_id(tank), entity_id(tower)]);

    engine.queue_command(PlayerCommand::ReleaseLock);
    let snap = engine.tick();
    let fired: Vec<(Option<SourceId>, Option<sortie_core::events::EntityId>)> = snap
        .events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::PlayerFired {
                weapon: PlayerWeapon::MultiMissile,
                source,
                target,
                ..
            } => Some((source.clone(), *target)),
            _ => None,
        })
        .collect();
    assert_eq!(fired.len(), 2);
    assert_eq!(fired[0].1, Some(entity_id(tank)));
    assert_eq!(fired[1].1, Some(entity_id(tower)));
    assert_ne!(fired[0].0, fired[1].0);
    assert!(!snap.player.locking);

    let launcher = snap
        .armament
        .iter()
        .find(|a| a.weapon == PlayerWeapon::MultiMissile)
        .unwrap();
    assert_eq!(launcher.ammo, Some(9));
}

#[test]
fn test_locked_weapon_raises_notice() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    engine.queue_command(PlayerCommand::PressTrigger {
        weapon: PlayerWeapon::Sawblade,
        held: true,
    });
    let snap = engine.tick();
    assert!(snap.events.contains(&CombatEvent::WeaponNotice {
        weapon: PlayerWeapon::Sawblade,
        notice: WeaponNotice::Locked,
    }));
}

#[test]
fn test_bomb_bay_drops_on_cooldown() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    engine.queue_command(PlayerCommand::ToggleBombBay);
    let mut snaps = Vec::new();
    for _ in 0..70 {
        snaps.push(engine.tick());
    }
    let bombs = events_of(&snaps)
        .iter()
        .filter(|e| matches!(e, CombatEvent::PlayerFired { weapon: PlayerWeapon::Bomb, .. }))
        .count();
    assert_eq!(bombs, 2, "one at arming, one a second later");
    assert!(snaps.last().unwrap().player.bomb_bay_armed);
}

#[test]
fn test_flame_contact_sets_enemies_burning() {
    let mut engine = started(1, Position::new(1000.0, 400.0));
    let tank = engine.spawn_test_enemy(Archetype::Tank, Position::new(3000.0, 1500.0));
    engine.queue_command(PlayerCommand::FlameContact {
        target: entity_id(tank),
    });
    engine.tick();
    let snap = engine.tick();
    let view = snap
        .enemies
        .iter()
        .find(|e| e.id == entity_id(tank))
        .unwrap();
    assert!(view.burning);
    assert!(view.hp < view.max_hp);
}
