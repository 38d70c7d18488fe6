//! Per-enemy parameters.
//!
//! Consolidates the stat block, drop rule and behavior archetype of every
//! enemy type that has a factory.

use signal_void_core::components::{
    AiBehavior, Archetype, ChargeAttack, RangedAttack, SniperState,
};
use signal_void_core::constants::*;
use signal_void_core::enums::{DropCondition, EnemyKind, Verb};

/// Stat block for an enemy type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub glyph: char,
    pub color: u8,
    pub friction: f64,
    pub max_speed: f64,
    pub health: i32,
    pub contact_damage: i32,
    pub contact_knockback: f64,
    pub move_speed: f64,
    pub attack_range: f64,
    /// Radians per tick; zero turns instantly.
    pub turn_speed: f64,
    /// Frontal shield knockback, if the type carries a shield.
    pub shield_knockback: Option<f64>,
    pub drop_verb: Verb,
    pub drop_condition: DropCondition,
    /// Range of the staggered first-shot timer in seconds (ranged types).
    pub initial_timer: Option<(f64, f64)>,
}

/// Profile for `kind`, or `None` for types without a factory.
pub fn get_profile(kind: EnemyKind) -> Option<EnemyProfile> {
    let profile = match kind {
        EnemyKind::BufferLeak => EnemyProfile {
            glyph: '&',
            color: NEON_GREEN,
            friction: 0.9,
            max_speed: 0.6,
            health: 1,
            contact_damage: 10,
            contact_knockback: 0.3,
            move_speed: 0.5,
            attack_range: 1.5,
            turn_speed: 0.0,
            shield_knockback: None,
            drop_verb: Verb::Recursive,
            drop_condition: DropCondition::Kill,
            initial_timer: None,
        },
        EnemyKind::Firewall => EnemyProfile {
            glyph: 'H',
            color: NEON_ORANGE,
            friction: 0.8,
            max_speed: 0.3,
            health: 6,
            contact_damage: 20,
            contact_knockback: 1.0,
            move_speed: 0.25,
            attack_range: 3.0,
            turn_speed: 0.05,
            shield_knockback: Some(1.5),
            drop_verb: Verb::Sudo,
            drop_condition: DropCondition::Backstab,
            initial_timer: None,
        },
        EnemyKind::Overclocker => EnemyProfile {
            glyph: '>',
            color: NEON_CYAN,
            friction: 0.85,
            max_speed: 0.4,
            health: 2,
            contact_damage: 15,
            contact_knockback: 0.8,
            move_speed: 0.3,
            attack_range: 10.0,
            turn_speed: 0.0,
            shield_knockback: None,
            drop_verb: Verb::Dash,
            drop_condition: DropCondition::Dodge,
            initial_timer: None,
        },
        EnemyKind::Spammer => EnemyProfile {
            glyph: '!',
            color: NEON_YELLOW,
            friction: 0.88,
            max_speed: 0.5,
            health: 2,
            contact_damage: 5,
            contact_knockback: 0.2,
            move_speed: 0.3,
            attack_range: 15.0,
            turn_speed: 0.0,
            shield_knockback: None,
            drop_verb: Verb::Recursive,
            drop_condition: DropCondition::Kill,
            initial_timer: Some((0.5, 1.5)),
        },
        EnemyKind::Sniper => EnemyProfile {
            glyph: '¦',
            color: NEON_RED,
            friction: 0.88,
            max_speed: 0.35,
            health: 3,
            contact_damage: 15,
            contact_knockback: 0.5,
            move_speed: 0.25,
            attack_range: 20.0,
            turn_speed: 0.0,
            shield_knockback: None,
            drop_verb: Verb::Dash,
            drop_condition: DropCondition::Kill,
            initial_timer: Some((1.0, 2.5)),
        },
        EnemyKind::Worm | EnemyKind::Daemon | EnemyKind::Trojan => return None,
    };
    Some(profile)
}

/// Build the behavior for `kind`. `initial_timer` seeds the first-shot
/// timer of ranged types and is ignored otherwise.
pub fn build_behavior(kind: EnemyKind, profile: &EnemyProfile, initial_timer: f64) -> AiBehavior {
    let archetype = match kind {
        EnemyKind::Firewall => Archetype::Guard,
        EnemyKind::Overclocker => Archetype::Charge(ChargeAttack {
            charge_time: 48,
            charge_speed: 2.0,
            trail_damage: 5,
            ..Default::default()
        }),
        EnemyKind::Spammer => Archetype::Spammer(RangedAttack {
            cooldown_timer: initial_timer,
            ..Default::default()
        }),
        EnemyKind::Sniper => Archetype::Sniper(SniperState {
            fire_cooldown_timer: initial_timer,
            ..Default::default()
        }),
        _ => Archetype::Chase,
    };
    let mut ai = AiBehavior::new(archetype, profile.move_speed, profile.attack_range);
    ai.turn_speed = profile.turn_speed;
    ai
}
