//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands and
//! physics notifications, runs all systems, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use sortie_core::commands::PlayerCommand;
use sortie_core::components::Heading;
use sortie_core::config::{ConfigError, GameConfig};
use sortie_core::enums::{GamePhase, PlayerWeapon, UpgradeKind, WeaponNotice};
use sortie_core::events::CombatEvent;
use sortie_core::state::GameStateSnapshot;
use sortie_core::types::{Position, SimTime};

use crate::armament::Armament;
use crate::combat::{self, CombatContext, ScoreState};
use crate::combo::ComboAggregator;
use crate::economy::{self, ShopError};
use crate::handles::{player_entity, resolve};
use crate::systems;
use crate::systems::reinforcements::ReinforcementSchedule;
use crate::systems::snapshot::SnapshotInputs;
use crate::world_setup::{self, SpawnContext};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and commands = same simulation.
    pub seed: u64,
    /// Static tables. Validated by [`SimulationEngine::try_new`].
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    /// Working copy of the tables; the shop upgrades weapons in place.
    config: GameConfig,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    /// Events raised since the last snapshot.
    events: Vec<CombatEvent>,
    score: ScoreState,
    combos: ComboAggregator,
    armament: Armament,
    schedule: ReinforcementSchedule,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::build(SimConfig::default())
    }
}

impl SimulationEngine {
    /// Create an engine after validating its tables. A table with gaps is
    /// refused here rather than discovered mid-match.
    pub fn try_new(config: SimConfig) -> Result<Self, ConfigError> {
        config.game.validate()?;
        log::info!(
            "simulation ready: seed {}, {} levels",
            config.seed,
            config.game.levels.len()
        );
        Ok(Self::build(config))
    }

    fn build(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config: config.game,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            score: ScoreState::default(),
            combos: ComboAggregator::new(),
            armament: Armament::default(),
            schedule: ReinforcementSchedule::default(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            // A contact this tick may already have ended the match.
            if !combat::match_over(&self.world) {
                self.run_systems();
            }
            self.check_outcome();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        let inputs = SnapshotInputs {
            time: &self.time,
            phase: self.phase,
            score: &self.score,
            level: self.config.level(self.score.level),
            armament: &self.armament,
            config: &self.config,
        };
        systems::snapshot::build_snapshot(&self.world, &inputs, events)
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Score, wallet and the current level's kill tally.
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// The engine's tables, including any upgrades bought so far.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn armament(&self) -> &Armament {
        &self.armament
    }

    /// Buy a weapon upgrade. Only open between levels.
    pub fn purchase_upgrade(
        &mut self,
        weapon: PlayerWeapon,
        kind: UpgradeKind,
    ) -> Result<u64, ShopError> {
        if matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
            return Err(ShopError::Closed);
        }
        let cost = economy::purchase(
            &mut self.config.weapons,
            weapon,
            kind,
            &mut self.score.coins,
            &self.config.shop,
        )?;
        log::info!("upgraded {weapon:?} {kind:?} for {cost}");
        self.events.push(CombatEvent::UpgradePurchased {
            weapon,
            kind,
            cost,
            coins_left: self.score.coins,
        });
        Ok(cost)
    }

    /// Spawn an enemy directly (for tests).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        archetype: sortie_core::enums::Archetype,
        position: Position,
    ) -> Entity {
        let level = self.score.level.max(1);
        let Some(spec) = self.config.level(level) else {
            panic!("level {level} missing from test config");
        };
        let ctx = SpawnContext {
            config: &self.config,
            level: spec,
            now_ms: self.time.now_ms,
        };
        world_setup::spawn_enemy(&mut self.world, archetype, position, &ctx)
    }

    /// Remove every enemy so tests start from a known field.
    #[cfg(test)]
    pub fn clear_enemies(&mut self) {
        let enemies: Vec<Entity> = self
            .world
            .query::<&sortie_core::components::ArchetypeTag>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        for e in enemies {
            let _ = self.world.despawn(e);
        }
    }

    #[cfg(test)]
    pub fn combos(&self) -> &ComboAggregator {
        &self.combos
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartLevel { level } => self.start_level(level),
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetPlayerPose { position, rotation } => {
                let Some(player) = player_entity(&self.world) else {
                    return;
                };
                if let Ok((pos, heading)) = self
                    .world
                    .query_one_mut::<(&mut Position, &mut Heading)>(player)
                {
                    *pos = position;
                    heading.0 = rotation;
                }
            }
            PlayerCommand::PurchaseUpgrade { weapon, kind } => {
                if let Err(err) = self.purchase_upgrade(weapon, kind) {
                    log::warn!("upgrade {weapon:?} {kind:?} rejected: {err}");
                }
            }
            other if self.phase != GamePhase::Active => {
                log::debug!("ignoring {other:?} while {:?}", self.phase);
            }
            PlayerCommand::PressTrigger { weapon, held } => {
                let notice = if weapon == PlayerWeapon::MultiMissile {
                    if held {
                        self.armament.begin_lock(&self.config, self.time.now_ms)
                    } else {
                        self.release_lock()
                    }
                } else {
                    self.armament
                        .press(weapon, held, &self.config, self.time.now_ms)
                };
                self.notify(weapon, notice);
            }
            PlayerCommand::ToggleBombBay => {
                let notice = self.armament.toggle_bomb_bay();
                self.notify(PlayerWeapon::Bomb, notice);
            }
            PlayerCommand::BeginLock => {
                let notice = self.armament.begin_lock(&self.config, self.time.now_ms);
                self.notify(PlayerWeapon::MultiMissile, notice);
            }
            PlayerCommand::ReleaseLock => {
                let notice = self.release_lock();
                self.notify(PlayerWeapon::MultiMissile, notice);
            }
            PlayerCommand::CollectPowerUp => {
                self.armament
                    .collect_power_up(self.time.now_ms, &self.config);
            }
            notification => self.handle_notification(notification),
        }
    }

    /// Apply a physics notification from the collision layer.
    fn handle_notification(&mut self, command: PlayerCommand) {
        let mut ctx = CombatContext {
            config: &self.config,
            now_ms: self.time.now_ms,
            score: &mut self.score,
            combos: &mut self.combos,
            events: &mut self.events,
        };
        let world = &mut self.world;

        match command {
            PlayerCommand::WeaponHit {
                weapon,
                target,
                source,
                position,
                dt_ms,
            } => {
                let Some(target) = resolve(world, target) else {
                    log::debug!("{weapon:?} hit on a gone entity {target:?}");
                    return;
                };
                systems::impacts::weapon_hit(
                    world,
                    &mut ctx,
                    weapon,
                    target,
                    source.as_ref(),
                    position,
                    dt_ms,
                );
            }
            PlayerCommand::Explosion {
                weapon,
                position,
                source,
            } => {
                systems::impacts::ground_explosion(
                    world,
                    &mut ctx,
                    weapon,
                    position,
                    source.as_ref(),
                );
            }
            PlayerCommand::PlayerStruck { weapon } => {
                systems::impacts::player_struck(world, &mut ctx, weapon);
            }
            PlayerCommand::FlakBurst { position, direct } => {
                systems::impacts::flak_burst(world, &mut ctx, position, direct);
            }
            PlayerCommand::DroneRam { drone } => {
                if let Some(drone) = resolve(world, drone) {
                    systems::impacts::drone_ram(world, &mut ctx, drone);
                }
            }
            PlayerCommand::TerrainScrape { dt_ms } => {
                systems::impacts::terrain_scrape(world, &mut ctx, dt_ms);
            }
            PlayerCommand::FlameContact { target } => {
                if let Some(target) = resolve(world, target) {
                    systems::burn::ignite(world, target, ctx.now_ms, &ctx.config.flame);
                }
            }
            PlayerCommand::IgniteGround { position } => {
                systems::burn::spawn_ground_fire(world, position, ctx.now_ms, &ctx.config.flame);
            }
            other => log::warn!("unexpected command {other:?}"),
        }
    }

    fn start_level(&mut self, level: u32) {
        if matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
            log::warn!("level {level} requested while {:?}", self.phase);
            return;
        }
        let Some(spec) = self.config.level(level) else {
            log::warn!("no level {level}");
            return;
        };

        self.world.clear();
        self.time = SimTime::default();
        self.score.begin_level(level);
        self.armament.arm_for_level(spec, &self.config);
        let ctx = SpawnContext {
            config: &self.config,
            level: spec,
            now_ms: self.time.now_ms,
        };
        world_setup::setup_level(&mut self.world, &mut self.rng, &ctx);
        self.schedule = ReinforcementSchedule::for_level(&ctx);
        self.phase = GamePhase::Active;
        log::info!(
            "level {level} started with {} enemies on the field",
            self.world.len().saturating_sub(1)
        );
    }

    fn release_lock(&mut self) -> Option<WeaponNotice> {
        if !self.armament.locking {
            log::warn!("lock released without a lock sweep");
            return None;
        }
        systems::weapons::release_lock(
            &self.world,
            &mut self.armament,
            &self.config,
            self.time.now_ms,
            &mut self.events,
        )
    }

    fn notify(&mut self, weapon: PlayerWeapon, notice: Option<WeaponNotice>) {
        if let Some(notice) = notice {
            self.events
                .push(CombatEvent::WeaponNotice { weapon, notice });
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let Some(level) = self.config.level(self.score.level) else {
            return;
        };
        let now_ms = self.time.now_ms;
        let dt_ms = self.time.dt_ms();
        let spawn = SpawnContext {
            config: &self.config,
            level,
            now_ms,
        };

        // 1. Auto-aim and lock-on sweep
        systems::targeting::run(&self.world, &mut self.armament, &self.config.targeting);
        // 2. Player weapon release
        systems::weapons::run(
            &self.world,
            &mut self.armament,
            &self.config,
            now_ms,
            &mut self.events,
        );
        // 3. Enemy behavior and hangar launches
        systems::behavior::run(&mut self.world, &spawn, &mut self.rng, &mut self.events);
        // 4. Burns and ground fires
        let flame_dps = self
            .config
            .weapon(PlayerWeapon::Flamethrower)
            .map_or(0.0, |stats| stats.damage_per_second);
        let mut ctx = CombatContext {
            config: &self.config,
            now_ms,
            score: &mut self.score,
            combos: &mut self.combos,
            events: &mut self.events,
        };
        systems::burn::run(&mut self.world, &mut ctx, flame_dps, dt_ms);
        // 5. Reinforcements
        systems::reinforcements::run(
            &mut self.world,
            &mut self.rng,
            &mut self.schedule,
            &self.score,
            &spawn,
        );
        // 6. Movement integration
        systems::movement::run(&mut self.world, dt_ms);
        // 7. Combo settlement
        for (source, award) in self.combos.expire(now_ms, &self.config.scoring) {
            log::debug!(
                "combo {source}: {} kills for {:.0} (+{:.0} bonus)",
                award.kills,
                award.score,
                award.bonus
            );
            combat::apply_award(&mut self.score, &mut self.events, &award);
        }
        // 8. Cleanup (destroyed, out of bounds, expired)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, now_ms);
    }

    /// Move to game over, level complete or victory when the tick decided it.
    fn check_outcome(&mut self) {
        if combat::match_over(&self.world) {
            self.phase = GamePhase::GameOver;
            log::info!(
                "game over on level {} with {} points",
                self.score.level,
                self.score.score
            );
            return;
        }

        let Some(level) = self.config.level(self.score.level) else {
            return;
        };
        if !self.score.objectives_met(level) {
            return;
        }

        let mut ctx = CombatContext {
            config: &self.config,
            now_ms: self.time.now_ms,
            score: &mut self.score,
            combos: &mut self.combos,
            events: &mut self.events,
        };
        combat::settle_combos(&mut ctx);

        let number = self.score.level;
        if number as usize >= self.config.levels.len() {
            self.phase = GamePhase::Victory;
            self.events.push(CombatEvent::Victory {
                score: self.score.score,
                coins: self.score.coins,
            });
            log::info!("victory with {} points", self.score.score);
        } else {
            self.phase = GamePhase::LevelComplete;
            self.events.push(CombatEvent::LevelComplete {
                level: number,
                score: self.score.score,
                coins: self.score.coins,
            });
            log::info!(
                "level {number} complete: {} points, {} coins",
                self.score.score,
                self.score.coins
            );
        }
    }
}
