#[cfg(test)]
mod tests {
    use glam::DVec2;
    use signal_void_core::components::{AiBehavior, Archetype};
    use signal_void_core::enums::{AiState, DashOutcome, EnemyKind, SniperPhase};
    use signal_void_core::types::{Position, Velocity};

    use crate::fsm::{evaluate, stunned_velocity, AiAction, AiContext};
    use crate::profiles::{build_behavior, get_profile};
    use crate::ranged::beam_hits;

    fn behavior(kind: EnemyKind, initial_timer: f64) -> AiBehavior {
        let profile = get_profile(kind).expect("spawnable kind");
        build_behavior(kind, &profile, initial_timer)
    }

    fn context(from: (f64, f64), to: (f64, f64)) -> AiContext {
        AiContext {
            position: Position::new(from.0, from.1),
            velocity: Velocity::default(),
            target: Position::new(to.0, to.1),
            target_velocity: Velocity::default(),
        }
    }

    // ---- Shared ----

    #[test]
    fn test_unspawnable_kinds_have_no_profile() {
        assert!(get_profile(EnemyKind::Worm).is_none());
        assert!(get_profile(EnemyKind::Daemon).is_none());
        assert!(get_profile(EnemyKind::BufferLeak).is_some());
    }

    #[test]
    fn test_firewall_profile_has_shield_and_turn_rate() {
        let p = get_profile(EnemyKind::Firewall).unwrap();
        assert_eq!(p.shield_knockback, Some(1.5));
        let ai = build_behavior(EnemyKind::Firewall, &p, 0.0);
        assert!(matches!(ai.archetype, Archetype::Guard));
        assert!((ai.turn_speed - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_stun_halves_velocity() {
        let v = stunned_velocity(Velocity::new(1.0, -0.5));
        assert_eq!(v, Velocity::new(0.5, -0.25));
    }

    #[test]
    fn test_idle_becomes_chase() {
        let mut ai = behavior(EnemyKind::BufferLeak, 0.0);
        ai.state = AiState::Idle;
        evaluate(&mut ai, &context((0.0, 0.0), (10.0, 0.0)));
        assert_eq!(ai.state, AiState::Chase);
    }

    #[test]
    fn test_bounded_turn_rate() {
        let mut ai = behavior(EnemyKind::Firewall, 0.0);
        ai.set_facing(DVec2::X);
        evaluate(&mut ai, &context((0.0, 0.0), (0.0, 5.0)));
        let angle = ai.facing_y.atan2(ai.facing_x);
        assert!((angle - 0.05).abs() < 1e-9, "turned {angle} rad");
    }

    #[test]
    fn test_shield_stagger_freezes_facing() {
        let mut ai = behavior(EnemyKind::Firewall, 0.0);
        ai.set_facing(DVec2::X);
        ai.shield_stagger = 5;
        evaluate(&mut ai, &context((0.0, 0.0), (-5.0, 0.0)));
        assert_eq!(ai.facing(), DVec2::X);
        assert_eq!(ai.shield_stagger, 4);
    }

    // ---- Chase ----

    #[test]
    fn test_chase_accelerates_toward_target() {
        let mut ai = behavior(EnemyKind::BufferLeak, 0.0);
        let out = evaluate(&mut ai, &context((0.0, 0.0), (10.0, 0.0)));
        assert!((out.velocity.x - 0.15).abs() < 1e-9);
        assert_eq!(out.velocity.y, 0.0);
    }

    #[test]
    fn test_chase_lunges_then_recovers() {
        let mut ai = behavior(EnemyKind::BufferLeak, 0.0);
        ai.state_timer = 31;
        let ctx = context((0.0, 0.0), (3.0, 0.0));
        evaluate(&mut ai, &ctx);
        assert_eq!(ai.state, AiState::Attack);

        for _ in 0..10 {
            evaluate(&mut ai, &ctx);
        }
        assert_eq!(ai.state, AiState::Recover);
    }

    // ---- Guard ----

    #[test]
    fn test_guard_bashes_target_in_front() {
        let mut ai = behavior(EnemyKind::Firewall, 0.0);
        ai.set_facing(DVec2::X);
        ai.state_timer = 181;
        evaluate(&mut ai, &context((0.0, 0.0), (2.0, 0.0)));
        assert_eq!(ai.state, AiState::Attack);

        let out = evaluate(&mut ai, &context((0.0, 0.0), (2.0, 0.0)));
        assert!((out.velocity.x - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_guard_leads_moving_target() {
        let mut ai = behavior(EnemyKind::Firewall, 0.0);
        let mut ctx = context((0.0, 0.0), (10.0, 0.0));
        ctx.target_velocity = Velocity::new(0.0, 0.5);
        let out = evaluate(&mut ai, &ctx);
        assert!(out.velocity.y > 0.0, "should lead the target downward");
    }

    // ---- Charge ----

    fn overclocker_mid_windup() -> AiBehavior {
        let mut ai = behavior(EnemyKind::Overclocker, 0.0);
        ai.enter(AiState::Charge);
        if let Archetype::Charge(c) = &mut ai.archetype {
            c.charging = true;
            c.charge_timer = 47;
            c.target = Position::new(10.0, 0.0);
        }
        ai
    }

    #[test]
    fn test_charge_dash_without_contact_is_dodged() {
        let mut ai = overclocker_mid_windup();
        // Past the tracking window the locked point stays put.
        evaluate(&mut ai, &context((0.0, 0.0), (0.0, 10.0)));
        assert_eq!(ai.state, AiState::Attack);
        assert_eq!(ai.facing(), DVec2::X);

        let mut sparks = 0;
        for _ in 0..20 {
            let out = evaluate(&mut ai, &context((0.0, 0.0), (-10.0, 0.0)));
            if ai.state == AiState::Attack {
                assert_eq!(ai.facing(), DVec2::X, "facing is frozen mid-dash");
                assert!((out.velocity.x - 2.0).abs() < 1e-9);
            }
            sparks += out.actions.iter().filter(|a| **a == AiAction::DashSpark).count();
        }
        assert_eq!(ai.state, AiState::Recover);
        assert!(sparks > 0);
        match ai.archetype {
            Archetype::Charge(c) => assert_eq!(c.last_dash, DashOutcome::Dodged),
            _ => panic!("archetype changed"),
        }
    }

    #[test]
    fn test_charge_dash_with_contact_is_connected() {
        let mut ai = overclocker_mid_windup();
        let ctx = context((0.0, 0.0), (10.0, 0.0));
        evaluate(&mut ai, &ctx);
        if let Archetype::Charge(c) = &mut ai.archetype {
            c.contact_this_dash = true;
        }
        for _ in 0..20 {
            evaluate(&mut ai, &ctx);
        }
        match ai.archetype {
            Archetype::Charge(c) => assert_eq!(c.last_dash, DashOutcome::Connected),
            _ => panic!("archetype changed"),
        }
    }

    #[test]
    fn test_charge_windup_telegraphs() {
        let mut ai = behavior(EnemyKind::Overclocker, 0.0);
        ai.state_timer = 181;
        let ctx = context((0.0, 0.0), (7.0, 0.0));
        evaluate(&mut ai, &ctx);
        assert_eq!(ai.state, AiState::Charge);
        let out = evaluate(&mut ai, &ctx);
        assert!(out.telegraphing);
        assert!(out.tint.is_some());
    }

    // ---- Spammer ----

    #[test]
    fn test_spammer_fires_once_per_cooldown() {
        let mut ai = behavior(EnemyKind::Spammer, 0.0);
        let ctx = context((0.0, 0.0), (12.0, 0.0));
        let mut shots = 0;
        for _ in 0..60 {
            let out = evaluate(&mut ai, &ctx);
            for a in &out.actions {
                if let AiAction::FireProjectile { direction, .. } = a {
                    assert!((direction.x - 1.0).abs() < 1e-9);
                    shots += 1;
                }
            }
        }
        assert_eq!(shots, 1);
    }

    #[test]
    fn test_spammer_flees_when_rushed() {
        let mut ai = behavior(EnemyKind::Spammer, 0.0);
        let out = evaluate(&mut ai, &context((0.0, 0.0), (3.0, 0.0)));
        assert_eq!(ai.state, AiState::Flee);
        assert!(out.actions.is_empty());

        let out = evaluate(&mut ai, &context((0.0, 0.0), (3.0, 0.0)));
        assert!(out.velocity.x < 0.0, "flees away from the target");
    }

    // ---- Sniper ----

    #[test]
    fn test_sniper_fires_exactly_once() {
        let mut ai = behavior(EnemyKind::Sniper, 0.0);
        let ctx = context((0.0, 0.0), (15.0, 0.0));
        let mut shots = Vec::new();
        for tick in 0..200 {
            let out = evaluate(&mut ai, &ctx);
            for a in out.actions {
                if let AiAction::SniperHitscan { aim, .. } = a {
                    shots.push((tick, aim));
                }
            }
        }
        assert_eq!(shots.len(), 1, "one hitscan per charge cycle");
        let (tick, aim) = shots[0];
        assert!(tick >= 89, "fires after the full charge, got tick {tick}");
        assert!(beam_hits(Position::new(0.0, 0.0), aim, ctx.target, 1.5));
    }

    #[test]
    fn test_sniper_aim_locks_before_fire() {
        let mut ai = behavior(EnemyKind::Sniper, 0.0);
        let mut ctx = context((0.0, 0.0), (15.0, 0.0));
        for _ in 0..70 {
            evaluate(&mut ai, &ctx);
        }
        let Archetype::Sniper(s) = ai.archetype else {
            panic!("not a sniper");
        };
        assert_eq!(s.phase, SniperPhase::Locked);
        let locked = s.aim();

        ctx.target = Position::new(0.0, 15.0);
        evaluate(&mut ai, &ctx);
        let Archetype::Sniper(s) = ai.archetype else {
            panic!("not a sniper");
        };
        assert_eq!(s.aim(), locked);
    }

    #[test]
    fn test_beam_geometry() {
        let origin = Position::new(0.0, 0.0);
        assert!(beam_hits(origin, DVec2::X, Position::new(8.0, 1.0), 1.5));
        assert!(!beam_hits(origin, DVec2::X, Position::new(8.0, 2.0), 1.5));
        assert!(!beam_hits(origin, DVec2::X, Position::new(-3.0, 0.0), 1.5));
    }
}
