#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::config::{ConfigError, GameConfig};
    use crate::enums::*;
    use crate::events::{CombatEvent, EntityId, SourceId};
    use crate::state::GameStateSnapshot;
    use crate::types::{Position, SimTime, Velocity};

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.levels.len(), 20);
        for archetype in Archetype::ALL {
            assert!(config.enemy(archetype).is_some(), "{archetype:?}");
        }
    }

    #[test]
    fn test_default_rewards_match_tuning() {
        let config = GameConfig::default();
        let tank = config.enemy(Archetype::Tank).unwrap();
        assert_eq!(tank.score, 100.0);
        assert_eq!(tank.coins, 1000);
        let t95 = config.enemy(Archetype::T95).unwrap();
        assert_eq!(t95.score, 500.0);
        assert_eq!(t95.coins, 1500);
        let infantry = config.enemy(Archetype::Infantry).unwrap();
        assert_eq!(infantry.score, 20.0);
        assert_eq!(infantry.coins, 5);
    }

    #[test]
    fn test_level_table_unlocks_and_targets() {
        let config = GameConfig::default();
        let first = config.level(1).unwrap();
        assert_eq!(
            first.unlocked_weapons,
            vec![PlayerWeapon::MachineGun, PlayerWeapon::Bomb]
        );
        assert_eq!(first.targets.get(&Archetype::Infantry), Some(&10));
        assert!(!first.targets.contains_key(&Archetype::Tank));

        let last = config.level(20).unwrap();
        assert_eq!(last.unlocked_weapons.len(), 6);
        assert_eq!(last.targets.get(&Archetype::Tank), Some(&80));
        assert_eq!(last.enemy_speed_multiplier, 3.0);

        assert!(config.level(0).is_none());
        assert!(config.level(21).is_none());
    }

    #[test]
    fn test_from_json_overrides_one_section() {
        let json = r#"{
            "scoring": {
                "quick_kill_window_ms": 5000.0,
                "quick_kill_multiplier": 0.2,
                "multi_kill_threshold": 3,
                "multi_kill_multiplier": 0.5,
                "combo_debounce_ms": 200.0
            }
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.scoring.quick_kill_window_ms, 5000.0);
        assert_eq!(config.scoring.combo_debounce_ms, 200.0);
        // Untouched sections keep their defaults
        assert_eq!(config.targeting.tie_epsilon, 10.0);
    }

    #[test]
    fn test_missing_enemy_entry_fails_loudly() {
        let mut config = GameConfig::default();
        config.enemies.remove(&Archetype::FlakCannon);
        match config.validate() {
            Err(ConfigError::MissingEnemy(Archetype::FlakCannon)) => {}
            other => panic!("expected MissingEnemy, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_weapon_entry_fails_loudly() {
        let mut config = GameConfig::default();
        config.weapons.remove(&PlayerWeapon::Sawblade);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingWeapon(PlayerWeapon::Sawblade))
        ));
    }

    #[test]
    fn test_truncated_level_table_rejected() {
        let mut config = GameConfig::default();
        config.levels.truncate(19);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LevelCount {
                expected: 20,
                found: 19
            })
        ));
    }

    #[test]
    fn test_bad_tunables_rejected() {
        let mut config = GameConfig::default();
        config.scoring.combo_debounce_ms = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));

        let mut config = GameConfig::default();
        config.scoring.quick_kill_window_ms = -1.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.scoring.multi_kill_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_json_round_trip_keeps_archetype_keys() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"FlakCannon\""));
        let back = GameConfig::from_json(&json).unwrap();
        assert_eq!(back.enemies.len(), 7);
        assert_eq!(back.levels[4].targets.get(&Archetype::T95), Some(&1));
    }

    #[test]
    fn test_command_serde_is_tagged() {
        let cmd = PlayerCommand::WeaponHit {
            weapon: PlayerWeapon::Bomb,
            target: EntityId(42),
            source: Some(SourceId::new("bomb_1")),
            position: Position::new(10.0, 20.0),
            dt_ms: 16.0,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"WeaponHit\""));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);

        let json = serde_json::to_string(&PlayerCommand::ToggleBombBay).unwrap();
        assert_eq!(json, r#"{"type":"ToggleBombBay"}"#);
    }

    #[test]
    fn test_event_serde_is_tagged() {
        let event = CombatEvent::ScoreAwarded {
            amount: 450,
            total: 1000,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"ScoreAwarded\""));
        let back: CombatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_source_ids_order_lexically() {
        let a = SourceId::new("bomb_100");
        let b = SourceId::new("bomb_200");
        assert!(a < b);
        assert_eq!(a.to_string(), "bomb_100");
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = GameStateSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Briefing);
        assert_eq!(back.level, 0);
        assert!(back.events.is_empty());
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        t.advance();
        t.advance();
        assert_eq!(t.tick, 2);
        assert!((t.now_ms - 2.0 * 1000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_from_rotation() {
        let v = Velocity::from_rotation(std::f64::consts::FRAC_PI_2, 100.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 100.0).abs() < 1e-9);
        assert!((v.speed() - 100.0).abs() < 1e-9);

        let back = Velocity::from_rotation(0.0, -50.0);
        assert!((back.x + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_offset_and_range() {
        let p = Position::new(0.0, 0.0);
        let q = p.offset(0.0, 30.0);
        assert!((q.x - 30.0).abs() < 1e-9);
        assert!((p.range_to(&q) - 30.0).abs() < 1e-9);
        assert!(p.bearing_to(&Position::new(0.0, -10.0)) < 0.0);
    }
}
