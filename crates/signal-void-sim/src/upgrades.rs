//! Micro-upgrades and weapon evolution.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use signal_void_core::components::{PlayerStats, Weapon, WeaponInventory};
use signal_void_core::constants::EVOLVED_MOD_SLOTS;
use signal_void_core::enums::{UpgradeCategory, UpgradeKind, WeaponKind};
use signal_void_core::types::EntityId;

use crate::ecs::World;

#[derive(Debug, Clone, Copy)]
pub struct UpgradeSpec {
    pub kind: UpgradeKind,
    pub name: &'static str,
    pub category: UpgradeCategory,
    pub per_level: f64,
    pub max_level: u32,
}

const fn upgrade(
    kind: UpgradeKind,
    name: &'static str,
    category: UpgradeCategory,
    per_level: f64,
    max_level: u32,
) -> UpgradeSpec {
    UpgradeSpec {
        kind,
        name,
        category,
        per_level,
        max_level,
    }
}

pub static UPGRADES: [UpgradeSpec; 15] = {
    use UpgradeCategory::*;
    use UpgradeKind::*;
    [
        upgrade(DmgUp, "+15% DMG", Offense, 0.15, 5),
        upgrade(AtkSpeed, "+12% ATK SPD", Offense, 0.12, 5),
        upgrade(AtkSize, "+20% ATK SIZE", Offense, 0.20, 3),
        upgrade(CritChance, "+8% CRIT", Offense, 0.08, 5),
        upgrade(CritDmg, "+50% CRIT DMG", Offense, 0.50, 3),
        upgrade(MaxHp, "+20 MAX HP", Defense, 20.0, 5),
        upgrade(DmgReduce, "+8% ARMOR", Defense, 0.08, 5),
        upgrade(Iframes, "+10 I-FRAMES", Defense, 10.0, 3),
        upgrade(DashCd, "-12% DASH CD", Defense, -0.12, 4),
        upgrade(HealRate, "+5% HEAL", Defense, 0.05, 3),
        upgrade(MoveSpeed, "+10% SPEED", Utility, 0.10, 5),
        upgrade(VerbDrop, "+10% VERB DROP", Utility, 0.10, 3),
        upgrade(BufferSlot, "+1 BUFFER SLOT", Utility, 1.0, 2),
        upgrade(BlastRadius, "+25% BLAST", Utility, 0.25, 3),
        upgrade(Projectile, "+1 PROJECTILE", Utility, 1.0, 2),
    ]
};

pub fn upgrade_spec(kind: UpgradeKind) -> &'static UpgradeSpec {
    UPGRADES.iter().find(|u| u.kind == kind).unwrap_or(&UPGRADES[0])
}

fn level(stats: &PlayerStats, kind: UpgradeKind) -> u32 {
    stats.upgrade_counts.get(&kind).copied().unwrap_or(0)
}

/// Up to `count` upgrades that are not maxed, one per category first.
pub fn select_upgrades(stats: &PlayerStats, count: usize, rng: &mut ChaCha8Rng) -> Vec<UpgradeKind> {
    let mut categories = [
        UpgradeCategory::Offense,
        UpgradeCategory::Defense,
        UpgradeCategory::Utility,
    ];
    categories.shuffle(rng);

    let mut pools: Vec<Vec<UpgradeKind>> = categories
        .iter()
        .map(|cat| {
            UPGRADES
                .iter()
                .filter(|u| u.category == *cat && level(stats, u.kind) < u.max_level)
                .map(|u| u.kind)
                .collect()
        })
        .collect();

    let mut chosen = Vec::with_capacity(count);
    for pool in pools.iter_mut() {
        if chosen.len() >= count {
            break;
        }
        if pool.is_empty() {
            continue;
        }
        let idx = rand::Rng::gen_range(rng, 0..pool.len());
        chosen.push(pool.swap_remove(idx));
    }

    let mut remaining: Vec<UpgradeKind> = pools.into_iter().flatten().collect();
    remaining.shuffle(rng);
    for kind in remaining {
        if chosen.len() >= count {
            break;
        }
        chosen.push(kind);
    }
    chosen.shuffle(rng);
    chosen
}

/// Apply one level of `kind`. Returns false when maxed or the player lacks stats.
pub fn apply_upgrade(world: &mut World, player: EntityId, kind: UpgradeKind) -> bool {
    let spec = upgrade_spec(kind);
    let Some(stats) = world.stats.get_mut(player) else {
        return false;
    };
    let current = level(stats, kind);
    if current >= spec.max_level {
        return false;
    }
    stats.upgrade_counts.insert(kind, current + 1);

    let step = spec.per_level;
    match kind {
        UpgradeKind::DmgUp => stats.damage_multiplier += step,
        UpgradeKind::AtkSpeed => stats.attack_speed_multiplier += step,
        UpgradeKind::AtkSize => stats.attack_size_multiplier += step,
        UpgradeKind::CritChance => stats.crit_chance += step,
        UpgradeKind::CritDmg => stats.crit_damage_multiplier += step,
        UpgradeKind::MaxHp => stats.bonus_max_hp += step as i32,
        UpgradeKind::DmgReduce => stats.damage_reduction += step,
        UpgradeKind::Iframes => stats.invincibility_frames += step as u32,
        UpgradeKind::DashCd => stats.dash_cooldown_multiplier += step,
        UpgradeKind::HealRate => stats.heal_bonus += step,
        UpgradeKind::MoveSpeed => stats.move_speed_multiplier += step,
        UpgradeKind::VerbDrop => stats.verb_drop_rate += step,
        UpgradeKind::BufferSlot => stats.bonus_buffer_slots += step as usize,
        UpgradeKind::BlastRadius => stats.logic_blast_radius_multiplier += step,
        UpgradeKind::Projectile => stats.bonus_projectile_count += step as u32,
    }

    match kind {
        UpgradeKind::MaxHp => {
            if let Some(health) = world.healths.get_mut(player) {
                health.maximum += step as i32;
                health.current += step as i32;
            }
        }
        UpgradeKind::BufferSlot => {
            if let Some(buffer) = world.syntax_buffers.get_mut(player) {
                buffer.max_verbs += 1;
            }
        }
        _ => {}
    }
    log::debug!("upgrade {} -> level {}", spec.name, current + 1);
    true
}

/// A base weapon's evolution and the upgrade stacks it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evolution {
    pub base: WeaponKind,
    pub evolved: WeaponKind,
    pub required_upgrade: UpgradeKind,
    pub required_stacks: u32,
    pub flavor: &'static str,
}

pub static EVOLUTIONS: [Evolution; 6] = [
    Evolution {
        base: WeaponKind::Slash,
        evolved: WeaponKind::Quicksort,
        required_upgrade: UpgradeKind::AtkSpeed,
        required_stacks: 4,
        flavor: "Attack speed threshold reached.",
    },
    Evolution {
        base: WeaponKind::Ping,
        evolved: WeaponKind::Segfault,
        required_upgrade: UpgradeKind::DmgUp,
        required_stacks: 4,
        flavor: "Damage threshold reached.",
    },
    Evolution {
        base: WeaponKind::Fork,
        evolved: WeaponKind::Ddos,
        required_upgrade: UpgradeKind::Projectile,
        required_stacks: 2,
        flavor: "Projectile saturation reached.",
    },
    Evolution {
        base: WeaponKind::Kill9,
        evolved: WeaponKind::KernelPanic,
        required_upgrade: UpgradeKind::CritChance,
        required_stacks: 3,
        flavor: "Critical mass reached.",
    },
    Evolution {
        base: WeaponKind::Rmrf,
        evolved: WeaponKind::FormatC,
        required_upgrade: UpgradeKind::AtkSize,
        required_stacks: 3,
        flavor: "Attack size threshold reached.",
    },
    Evolution {
        base: WeaponKind::Overflow,
        evolved: WeaponKind::StackOverflow,
        required_upgrade: UpgradeKind::MaxHp,
        required_stacks: 4,
        flavor: "Stability threshold reached.",
    },
];

/// Evolution `weapon` qualifies for under `stats`, if any.
pub fn check_evolution(weapon: &Weapon, stats: &PlayerStats) -> Option<&'static Evolution> {
    if weapon.is_evolved {
        return None;
    }
    EVOLUTIONS
        .iter()
        .find(|e| e.base == weapon.base_kind)
        .filter(|e| level(stats, e.required_upgrade) >= e.required_stacks)
}

/// `(inventory index, evolution)` for every weapon ready to evolve.
pub fn pending_evolutions(inv: &WeaponInventory, stats: &PlayerStats) -> Vec<(usize, &'static Evolution)> {
    inv.weapons
        .iter()
        .enumerate()
        .filter_map(|(i, w)| check_evolution(w, stats).map(|e| (i, e)))
        .collect()
}

pub fn evolve(weapon: &mut Weapon, evolution: &Evolution) {
    weapon.kind = evolution.evolved;
    weapon.is_evolved = true;
    weapon.mod_slots = EVOLVED_MOD_SLOTS;
}
