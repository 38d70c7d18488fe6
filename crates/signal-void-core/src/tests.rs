#[cfg(test)]
mod tests {
    use glam::DVec2;

    use crate::commands::PlayerCommand;
    use crate::components::*;
    use crate::enums::*;
    use crate::events::{FeedbackEvent, SimEvent};
    use crate::state::SimSnapshot;
    use crate::types::{rotate, Position, SimTime, Velocity};

    #[test]
    fn test_command_json_shape() {
        let cmd = PlayerCommand::Attack {
            direction: CardinalDir::Right,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"Attack\""), "got {json}");
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_wave_trigger_json_shape() {
        let t: WaveTrigger =
            serde_json::from_str(r#"{"type":"on_kill_percent","value":0.6}"#).unwrap();
        assert_eq!(t, WaveTrigger::OnKillPercent(0.6));
        let t: WaveTrigger = serde_json::from_str(r#"{"type":"on_start"}"#).unwrap();
        assert_eq!(t, WaveTrigger::OnStart);
    }

    #[test]
    fn test_event_tags() {
        let ev = SimEvent::EnemyKilled {
            kind: EnemyKind::BufferLeak,
            x: 1.0,
            y: 2.0,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"enemy_killed\""));
        assert!(json.contains("\"buffer_leak\""));

        let fb = FeedbackEvent::HitStop { frames: 4 };
        let json = serde_json::to_string(&fb).unwrap();
        assert!(json.contains("hit_stop"));
    }

    #[test]
    fn test_verb_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Verb::Recursive).unwrap(), "\"RECURSIVE\"");
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = SimSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
    }

    #[test]
    fn test_unknown_ids_fall_back() {
        assert_eq!(WeaponKind::parse("bfg"), WeaponKind::Slash);
        assert_eq!(WeaponKind::parse("kernel_panic"), WeaponKind::KernelPanic);
        assert_eq!(ModKind::parse("nope"), ModKind::Recursive);
        assert_eq!(ModKind::parse("grep_mod"), ModKind::Grep);
    }

    #[test]
    fn test_spawnable_kinds() {
        assert!(EnemyKind::Sniper.is_spawnable());
        assert!(!EnemyKind::Worm.is_spawnable());
        assert!(!EnemyKind::Trojan.is_spawnable());
    }

    #[test]
    fn test_position_direction() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
        let d = a.direction_to(&b);
        assert!((d.length() - 1.0).abs() < 1e-9);
        assert_eq!(a.direction_to(&a), DVec2::ZERO);
    }

    #[test]
    fn test_velocity_helpers() {
        let mut v = Velocity::new(3.0, 4.0);
        assert!((v.speed() - 5.0).abs() < 1e-9);
        v.scale(0.5);
        assert_eq!(v, Velocity::new(1.5, 2.0));
        v.add(DVec2::new(0.5, 0.0));
        assert_eq!(v.x, 2.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(DVec2::X, std::f64::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-9);
        assert!((r.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..60 {
            t.advance();
        }
        assert_eq!(t.tick, 60);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_health_heal_clamps() {
        let mut h = Health::new(10);
        h.current = 4;
        h.heal(100);
        assert_eq!(h.current, 10);
        assert!(!h.is_depleted());
    }

    #[test]
    fn test_armor_floor() {
        let stats = PlayerStats {
            damage_reduction: 0.99,
            ..Default::default()
        };
        assert_eq!(stats.mitigate(10), 1);
        assert_eq!(PlayerStats::default().mitigate(10), 10);
    }

    #[test]
    fn test_weapon_inventory_active_clamps() {
        let inv = WeaponInventory {
            weapons: vec![Weapon::new(WeaponKind::Ping)],
            active_index: 5,
        };
        assert_eq!(inv.active().map(|w| w.kind), Some(WeaponKind::Ping));
        let empty = WeaponInventory {
            weapons: vec![],
            active_index: 0,
        };
        assert!(empty.active().is_none());
    }

    #[test]
    fn test_ai_behavior_enter_resets_timer() {
        let mut ai = AiBehavior::new(Archetype::Chase, 0.5, 1.5);
        ai.state_timer = 40;
        ai.enter(AiState::Attack);
        assert_eq!(ai.state, AiState::Attack);
        assert_eq!(ai.state_timer, 0);
    }
}
