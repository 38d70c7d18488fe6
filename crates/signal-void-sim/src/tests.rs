//! Tests for the simulation engine, tick pipeline and progression API.

use signal_void_core::commands::PlayerCommand;
use signal_void_core::enums::*;
use signal_void_core::events::SimEvent;
use signal_void_core::types::Position;

use crate::config::{ArenaBounds, SimConfig};
use crate::engine::SimulationEngine;
use crate::waves::TemplateSet;

fn sandbox() -> SimulationEngine {
    SimulationEngine::sandbox(SimConfig::default())
}

/// Scripted input: circle around and swing every half second.
fn scripted(tick: u64) -> Vec<PlayerCommand> {
    let angle = tick as f64 * 0.05;
    let mut commands = vec![PlayerCommand::Move {
        x: angle.cos(),
        y: angle.sin(),
    }];
    if tick % 30 == 0 {
        commands.push(PlayerCommand::Attack {
            direction: CardinalDir::Right,
        });
    }
    if tick % 90 == 45 {
        commands.push(PlayerCommand::Dash);
    }
    commands
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config.clone());
    let mut engine_b = SimulationEngine::new(config);

    for tick in 0..300 {
        engine_a.queue_commands(scripted(tick));
        engine_b.queue_commands(scripted(tick));
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed at tick {tick}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });

    let mut diverged = false;
    for _ in 0..200 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce different spawn layouts");
}

// ---- Engine basics ----

#[test]
fn test_new_engine_starts_first_room() {
    let engine = SimulationEngine::new(SimConfig::default());
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.depth(), 1);
    let snap = engine.snapshot();
    assert!(snap.waves.template.starts_with("tutorial"), "got {}", snap.waves.template);
    let player = snap.player.expect("player spawned");
    assert_eq!(player.health, 100);
    assert_eq!(player.weapon, Some(WeaponKind::Slash));
}

#[test]
fn test_sandbox_has_no_room() {
    let mut engine = sandbox();
    for _ in 0..120 {
        let snap = engine.tick();
        assert!(snap.enemies.is_empty());
        assert_eq!(snap.telegraph_count, 0);
        assert!(!snap.waves.room_cleared, "An empty sandbox never counts as cleared");
    }
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_time_advances_per_tick() {
    let mut engine = sandbox();
    for _ in 0..60 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 60);
    assert!((engine.time().elapsed_secs - 1.0).abs() < 1e-9);
}

#[test]
fn test_first_wave_telegraphs_then_materializes() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let first = engine.tick();
    assert!(first.telegraph_count > 0, "On-start wave should telegraph on the first tick");
    assert!(first
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::WaveTriggered { index: 0, .. })));
    assert!(first.enemies.is_empty());

    let mut materialized = false;
    for _ in 0..60 {
        if !engine.tick().enemies.is_empty() {
            materialized = true;
            break;
        }
    }
    assert!(materialized, "Telegraphs should become enemies");
}

#[test]
fn test_tick_in_reads_arena_each_tick() {
    let mut engine = sandbox();
    let shrunk = ArenaBounds::new(20, 12);
    let snap = engine.tick_in(&shrunk);
    let pos = snap.player.unwrap().position;
    assert_eq!((pos.x, pos.y), (18.0, 10.0), "Player clamped into the supplied bounds");

    for _ in 0..3 {
        engine.queue_command(PlayerCommand::Move { x: 1.0, y: 0.0 });
        engine.tick();
    }
    let pos = engine.snapshot().player.unwrap().position;
    assert!(pos.x > 18.0, "The configured arena applies again once bounds are not supplied");
}

// ---- Commands ----

#[test]
fn test_move_command_moves_player() {
    let mut engine = sandbox();
    let start = engine.snapshot().player.unwrap().position;
    for _ in 0..10 {
        engine.queue_command(PlayerCommand::Move { x: 1.0, y: 0.0 });
        engine.tick();
    }
    let end = engine.snapshot().player.unwrap().position;
    assert!(end.x > start.x + 1.0, "Player should move right: {start:?} -> {end:?}");
    assert!((end.y - start.y).abs() < 1e-9);
}

#[test]
fn test_commands_are_edge_triggered() {
    let mut engine = sandbox();
    engine.queue_command(PlayerCommand::Move { x: 1.0, y: 0.0 });
    engine.tick();
    let after_one = engine.snapshot().player.unwrap().position;
    for _ in 0..60 {
        engine.tick();
    }
    let settled = engine.snapshot().player.unwrap().position;
    // Friction brings the player to rest without repeated input.
    assert!(settled.x - after_one.x < 2.0);
    let vel = engine.world().velocities.get(engine.player().unwrap()).unwrap();
    assert_eq!(vel.speed(), 0.0);
}

#[test]
fn test_dash_command() {
    let mut engine = sandbox();
    engine.queue_commands([PlayerCommand::Move { x: 0.0, y: 1.0 }, PlayerCommand::Dash]);
    let snap = engine.tick();
    let player = snap.player.unwrap();
    assert!(player.dashing);
    assert!(player.dash_cooldown > 0);
}

#[test]
fn test_swap_needs_two_weapons() {
    let mut engine = sandbox();
    engine.queue_command(PlayerCommand::SwapWeapon);
    assert_eq!(engine.tick().player.unwrap().weapon, Some(WeaponKind::Slash));

    engine.equip_weapon(1, WeaponKind::Ping);
    engine.queue_command(PlayerCommand::SwapWeapon);
    assert_eq!(engine.tick().player.unwrap().weapon, Some(WeaponKind::Ping));
    engine.queue_command(PlayerCommand::SwapWeapon);
    assert_eq!(engine.tick().player.unwrap().weapon, Some(WeaponKind::Slash));
}

#[test]
fn test_projectile_weapon_spawns_projectile() {
    let mut engine = sandbox();
    engine.equip_weapon(0, WeaponKind::Ping);
    engine.queue_command(PlayerCommand::Attack {
        direction: CardinalDir::Up,
    });
    let snap = engine.tick();
    assert_eq!(snap.projectile_count, 1);
}

// ---- Phases ----

#[test]
fn test_player_death_ends_run() {
    let mut engine = sandbox();
    let player = engine.player().unwrap();
    engine.world_mut().healths.get_mut(player).unwrap().current = 0;

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.events.contains(&SimEvent::PlayerDied));

    // Commands are ignored once the run is over.
    engine.queue_command(PlayerCommand::Move { x: 1.0, y: 0.0 });
    let before = engine.world().positions.get(player).copied();
    engine.tick();
    assert_eq!(engine.world().positions.get(player).copied(), before);
    assert!(!engine.advance_room());
}

#[test]
fn test_residual_pipeline_lets_particles_expire() {
    let mut engine = sandbox();
    let player = engine.player().unwrap();
    engine.world_mut().healths.get_mut(player).unwrap().current = 0;
    let snap = engine.tick();
    assert!(snap.particle_count > 0, "Death burst should leave particles");
    let mut remaining = snap.particle_count;
    for _ in 0..200 {
        remaining = engine.tick().particle_count;
    }
    assert_eq!(remaining, 0);
}

// ---- Progression ----

#[test]
fn test_advance_room_heals_and_recenters() {
    let mut engine = sandbox();
    let player = engine.player().unwrap();
    engine.world_mut().healths.get_mut(player).unwrap().current = 50;
    *engine.world_mut().positions.get_mut(player).unwrap() = Position::new(5.0, 5.0);
    engine.spawn_enemy_at(EnemyKind::Spammer, Position::new(60.0, 10.0));

    assert!(engine.advance_room());
    assert_eq!(engine.depth(), 2);
    let snap = engine.snapshot();
    let view = snap.player.unwrap();
    assert_eq!(view.health, 75, "A quarter of max health is restored");
    let (cx, cy) = engine.config().arena.center();
    assert_eq!(view.position, Position::new(cx, cy));
    assert!(snap.enemies.is_empty(), "Leftover enemies are cleared");
}

#[test]
fn test_heal_bonus_and_cap() {
    let mut engine = sandbox();
    let player = engine.player().unwrap();
    assert!(engine.apply_upgrade(UpgradeKind::HealRate));
    engine.world_mut().healths.get_mut(player).unwrap().current = 10;
    engine.advance_room();
    assert_eq!(engine.world().healths.get(player).unwrap().current, 40);

    engine.world_mut().healths.get_mut(player).unwrap().current = 95;
    engine.advance_room();
    assert_eq!(engine.world().healths.get(player).unwrap().current, 100);
}

#[test]
fn test_advance_room_skips_boss_depths() {
    let mut engine = SimulationEngine::new(SimConfig {
        starting_depth: 4,
        ..Default::default()
    });
    engine.advance_room();
    assert_eq!(engine.depth(), 6);
    for _ in 0..3 {
        engine.advance_room();
    }
    assert_eq!(engine.depth(), 9);
    engine.advance_room();
    assert_eq!(engine.depth(), 11);
}

#[test]
fn test_offer_upgrades_are_distinct() {
    let mut engine = sandbox();
    let offers = engine.offer_upgrades(3);
    assert_eq!(offers.len(), 3);
    assert_ne!(offers[0], offers[1]);
    assert_ne!(offers[1], offers[2]);
    assert_ne!(offers[0], offers[2]);
}

#[test]
fn test_max_hp_upgrade_raises_health() {
    let mut engine = sandbox();
    assert!(engine.apply_upgrade(UpgradeKind::MaxHp));
    let view = engine.snapshot().player.unwrap();
    assert_eq!(view.max_health, 120);
    assert_eq!(view.health, 120);
}

#[test]
fn test_attach_mod_respects_slots() {
    let mut engine = sandbox();
    assert!(engine.attach_mod(ModKind::Force));
    assert!(engine.attach_mod(ModKind::Cron));
    let mods = engine.snapshot().player.unwrap().mods;
    assert_eq!(mods, vec![ModKind::Force, ModKind::Cron]);

    // Full: the newest replaces the first slot.
    engine.attach_mod(ModKind::Grep);
    let mods = engine.snapshot().player.unwrap().mods;
    assert_eq!(mods, vec![ModKind::Grep, ModKind::Cron]);
}

#[test]
fn test_slash_evolves_after_attack_speed_stacks() {
    let mut engine = sandbox();
    assert!(engine.evolve_weapons().is_empty());
    for _ in 0..4 {
        assert!(engine.apply_upgrade(UpgradeKind::AtkSpeed));
    }
    assert_eq!(engine.evolve_weapons(), vec![WeaponKind::Quicksort]);
    assert_eq!(engine.snapshot().player.unwrap().weapon, Some(WeaponKind::Quicksort));
    assert!(engine.evolve_weapons().is_empty(), "Evolved weapons do not evolve again");
}

#[test]
fn test_offer_weapon_skips_held() {
    let mut engine = sandbox();
    for _ in 0..20 {
        assert_ne!(engine.offer_weapon(), Some(WeaponKind::Slash));
    }
}

// ---- Configuration ----

#[test]
fn test_config_from_json_defaults_missing_fields() {
    let config = SimConfig::from_json_str(r#"{"seed": 7}"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.arena, SimConfig::default().arena);
    assert_eq!(config.starting_depth, 1);
}

#[test]
fn test_config_rejects_tiny_arena() {
    let err = SimConfig::from_json_str(r#"{"arena": {"width": 3, "height": 3, "margin": 1}}"#);
    assert!(err.is_err());
}

#[test]
fn test_custom_templates_drive_rooms() {
    let templates = TemplateSet::from_json_str(
        r#"[{"name": "lone-sniper", "min_depth": 1, "max_depth": 99,
             "waves": [{"groups": [{"kind": "sniper", "count": 1, "pattern": "corners"}]}]}]"#,
    )
    .unwrap();
    let mut engine = SimulationEngine::with_templates(SimConfig::default(), templates);
    let snap = engine.tick();
    assert_eq!(snap.waves.template, "lone-sniper");
    assert_eq!(snap.telegraph_count, 1);
    assert_eq!(snap.waves.intro.as_deref(), Some("NEW THREAT DETECTED: | SNIPER"));
}
