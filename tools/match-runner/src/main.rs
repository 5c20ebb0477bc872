//! match-runner: headless scripted matches for balancing and regression runs.
//!
//! Usage:
//!   match-runner run --level 3 --seed 7 --ticks 3600 --config tables.json
//!   match-runner defaults > tables.json

use std::collections::BTreeMap;
use std::process;

use serde::Serialize;

use sortie_core::commands::PlayerCommand;
use sortie_core::config::GameConfig;
use sortie_core::constants::{GROUND_Y, WORLD_WIDTH};
use sortie_core::enums::{Archetype, GamePhase, PlayerWeapon};
use sortie_core::events::CombatEvent;
use sortie_core::state::GameStateSnapshot;
use sortie_core::types::Position;
use sortie_sim::{SimConfig, SimulationEngine};

/// Cruise altitude of the scripted pilot above the ground line.
const CRUISE_ALTITUDE: f64 = 600.0;

/// World units the scripted pilot advances per tick.
const CRUISE_STEP: f64 = 4.0;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "defaults" => cmd_defaults(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "match-runner: SORTIE headless match tool\n\
         \n\
         Commands:\n\
         \n\
         run       Fly a scripted sortie and print a JSON summary\n\
         \n\
           --level <N>     Level to fly (default: 1)\n\
           --seed <N>      RNG seed (default: 42)\n\
           --ticks <N>     Tick limit (default: 3600)\n\
           --config <path> JSON table overrides (optional)\n\
         \n\
         defaults  Print the default tables as JSON\n\
         \n\
         Set RUST_LOG=debug to trace reinforcements and combos.\n"
    );
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn cmd_defaults() {
    match serde_json::to_string_pretty(&GameConfig::default()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn load_config(args: &[String]) -> GameConfig {
    let Some(path) = parse_flag::<String>(args, "--config") else {
        return GameConfig::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            process::exit(1);
        }
    };
    match GameConfig::from_json(&json) {
        Ok(config) => {
            log::info!("loaded tables from {path}");
            config
        }
        Err(e) => {
            eprintln!("Error in {path}: {e}");
            process::exit(1);
        }
    }
}

/// What the scripted sortie achieved.
#[derive(Debug, Default, Serialize)]
struct MatchSummary {
    level: u32,
    seed: u64,
    ticks: u64,
    outcome: String,
    score: u64,
    coins: u64,
    kills: BTreeMap<Archetype, u32>,
    shots: BTreeMap<PlayerWeapon, u32>,
    enemy_shots: u32,
}

impl MatchSummary {
    fn record(&mut self, snap: &GameStateSnapshot) {
        for event in &snap.events {
            match event {
                CombatEvent::Destroyed { archetype, .. } => {
                    *self.kills.entry(*archetype).or_insert(0) += 1;
                }
                CombatEvent::PlayerFired { weapon, .. } => {
                    *self.shots.entry(*weapon).or_insert(0) += 1;
                }
                CombatEvent::EnemyFired { .. } => self.enemy_shots += 1,
                _ => {}
            }
        }
    }
}

fn cmd_run(args: &[String]) {
    let level = parse_flag(args, "--level").unwrap_or(1u32);
    let seed = parse_flag(args, "--seed").unwrap_or(42u64);
    let tick_limit = parse_flag(args, "--ticks").unwrap_or(3600u64);
    let game = load_config(args);

    let mut engine = match SimulationEngine::try_new(SimConfig { seed, game }) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let summary = fly_sortie(&mut engine, level, seed, tick_limit);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Sweep back and forth above the ground line with the gun held and the
/// bomb bay open. The runner stands in for the collision layer: every gun
/// round hits its tracked target and every bomb bursts on the ground below
/// its release point.
fn fly_sortie(
    engine: &mut SimulationEngine,
    level: u32,
    seed: u64,
    tick_limit: u64,
) -> MatchSummary {
    let mut summary = MatchSummary {
        level,
        seed,
        ..Default::default()
    };

    engine.queue_command(PlayerCommand::StartLevel { level });
    engine.queue_command(PlayerCommand::PressTrigger {
        weapon: PlayerWeapon::MachineGun,
        held: true,
    });
    engine.queue_command(PlayerCommand::ToggleBombBay);

    let mut x = WORLD_WIDTH / 2.0;
    let mut heading = 0.0;
    let mut snap = engine.tick();
    if snap.phase != GamePhase::Active {
        log::warn!("level {level} did not start");
    }

    while snap.phase == GamePhase::Active && snap.time.tick < tick_limit {
        let step = if heading == 0.0 { CRUISE_STEP } else { -CRUISE_STEP };
        x += step;
        if !(100.0..=WORLD_WIDTH - 100.0).contains(&x) {
            heading = if heading == 0.0 { std::f64::consts::PI } else { 0.0 };
        }
        let position = Position::new(x, GROUND_Y - CRUISE_ALTITUDE);
        engine.queue_command(PlayerCommand::SetPlayerPose {
            position,
            rotation: heading,
        });

        for event in &snap.events {
            match event {
                CombatEvent::PlayerFired {
                    weapon: PlayerWeapon::MachineGun,
                    source,
                    target: Some(target),
                    ..
                } => engine.queue_command(PlayerCommand::WeaponHit {
                    weapon: PlayerWeapon::MachineGun,
                    target: *target,
                    source: source.clone(),
                    position,
                    dt_ms: 0.0,
                }),
                CombatEvent::PlayerFired {
                    weapon: PlayerWeapon::Bomb,
                    source,
                    position: drop,
                    ..
                } => engine.queue_command(PlayerCommand::Explosion {
                    weapon: PlayerWeapon::Bomb,
                    position: Position::new(drop.x, GROUND_Y),
                    source: source.clone(),
                }),
                _ => {}
            }
        }

        snap = engine.tick();
        summary.record(&snap);
    }

    summary.ticks = snap.time.tick;
    summary.outcome = format!("{:?}", snap.phase);
    summary.score = snap.score;
    summary.coins = snap.coins;
    log::info!(
        "level {level} seed {seed}: {} after {} ticks",
        summary.outcome,
        summary.ticks
    );
    summary
}
