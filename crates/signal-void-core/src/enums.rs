//! Enumerations used across the simulation.

use serde::{Deserialize, Serialize};

/// Overall engine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Room in progress, full pipeline runs.
    #[default]
    Playing,
    /// Every wave resolved; only particles keep ticking until the next room.
    RoomCleared,
    /// Player health reached zero.
    GameOver,
}

/// Enemy types. Types without a factory are valid template data but never spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    BufferLeak,
    Firewall,
    Overclocker,
    Spammer,
    Sniper,
    Worm,
    Daemon,
    Trojan,
}

impl EnemyKind {
    /// Whether a factory exists for this type.
    pub fn is_spawnable(&self) -> bool {
        !matches!(self, EnemyKind::Worm | EnemyKind::Daemon | EnemyKind::Trojan)
    }

    /// Display name used in intro lines.
    pub fn label(&self) -> &'static str {
        match self {
            EnemyKind::BufferLeak => "& BUFFER-LEAK",
            EnemyKind::Firewall => "[H] FIREWALL",
            EnemyKind::Overclocker => ">> OVERCLOCKER",
            EnemyKind::Spammer => "! SPAMMER",
            EnemyKind::Sniper => "| SNIPER",
            EnemyKind::Worm => "~ WORM",
            EnemyKind::Daemon => "$ DAEMON",
            EnemyKind::Trojan => "% TROJAN",
        }
    }
}

/// Shared AI state vocabulary. Not every archetype reaches every state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Detect,
    Chase,
    Attack,
    Charge,
    Recover,
    Flee,
}

/// Sniper attack cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SniperPhase {
    #[default]
    Idle,
    Tracking,
    Locked,
    Firing,
    Cooldown,
}

/// Result of the most recent Overclocker dash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashOutcome {
    /// No dash has finished yet.
    #[default]
    None,
    /// The dash touched the player.
    Connected,
    /// The dash ended without touching the player.
    Dodged,
}

/// Syntax verbs collected into the player's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verb {
    Recursive,
    Sudo,
    Dash,
    Slice,
    Void,
    Null,
}

impl Verb {
    /// Pool for bonus drops.
    pub const ALL: [Verb; 6] = [
        Verb::Recursive,
        Verb::Sudo,
        Verb::Dash,
        Verb::Slice,
        Verb::Void,
        Verb::Null,
    ];
}

/// When an enemy's verb drop fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropCondition {
    #[default]
    Kill,
    Backstab,
    Dodge,
}

/// Cardinal attack directions accepted from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardinalDir {
    Up,
    Down,
    Left,
    Right,
}

impl CardinalDir {
    /// Unit vector in arena space (y grows downward).
    pub fn vector(&self) -> glam::DVec2 {
        match self {
            CardinalDir::Up => glam::DVec2::new(0.0, -1.0),
            CardinalDir::Down => glam::DVec2::new(0.0, 1.0),
            CardinalDir::Left => glam::DVec2::new(-1.0, 0.0),
            CardinalDir::Right => glam::DVec2::new(1.0, 0.0),
        }
    }
}

/// Weapons, base and evolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Slash,
    Ping,
    Fork,
    Kill9,
    Rmrf,
    Overflow,
    Quicksort,
    Segfault,
    Ddos,
    KernelPanic,
    FormatC,
    StackOverflow,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 12] = [
        WeaponKind::Slash,
        WeaponKind::Ping,
        WeaponKind::Fork,
        WeaponKind::Kill9,
        WeaponKind::Rmrf,
        WeaponKind::Overflow,
        WeaponKind::Quicksort,
        WeaponKind::Segfault,
        WeaponKind::Ddos,
        WeaponKind::KernelPanic,
        WeaponKind::FormatC,
        WeaponKind::StackOverflow,
    ];

    /// Parse a weapon id, falling back to Slash for unknown ids.
    pub fn parse(s: &str) -> Self {
        match s {
            "ping" => WeaponKind::Ping,
            "fork" => WeaponKind::Fork,
            "kill9" => WeaponKind::Kill9,
            "rmrf" => WeaponKind::Rmrf,
            "overflow" => WeaponKind::Overflow,
            "quicksort" => WeaponKind::Quicksort,
            "segfault" => WeaponKind::Segfault,
            "ddos" => WeaponKind::Ddos,
            "kernel_panic" => WeaponKind::KernelPanic,
            "format_c" => WeaponKind::FormatC,
            "stack_overflow" => WeaponKind::StackOverflow,
            _ => WeaponKind::Slash,
        }
    }
}

/// How a weapon's attack resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    MeleeArc,
    MeleeSlam,
    MeleeSlamShockwave,
    MeleeSweep,
    ProjectileSingle,
    ProjectileSpread,
    ProjectileRadial,
    BeamContinuous,
    BeamTriple,
}

impl AttackPattern {
    pub fn is_beam(&self) -> bool {
        matches!(self, AttackPattern::BeamContinuous | AttackPattern::BeamTriple)
    }

    pub fn is_melee(&self) -> bool {
        matches!(
            self,
            AttackPattern::MeleeArc
                | AttackPattern::MeleeSlam
                | AttackPattern::MeleeSlamShockwave
                | AttackPattern::MeleeSweep
        )
    }
}

/// Weapon modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModKind {
    Recursive,
    Force,
    Verbose,
    Async,
    Grep,
    Tee,
    Parallel,
    Cron,
    Sudo,
}

impl ModKind {
    pub const ALL: [ModKind; 9] = [
        ModKind::Recursive,
        ModKind::Force,
        ModKind::Verbose,
        ModKind::Async,
        ModKind::Grep,
        ModKind::Tee,
        ModKind::Parallel,
        ModKind::Cron,
        ModKind::Sudo,
    ];

    /// Parse a mod id, falling back to `--recursive` for unknown ids.
    pub fn parse(s: &str) -> Self {
        match s {
            "force" => ModKind::Force,
            "verbose" => ModKind::Verbose,
            "async" | "async_mod" => ModKind::Async,
            "grep" | "grep_mod" => ModKind::Grep,
            "tee" => ModKind::Tee,
            "parallel" => ModKind::Parallel,
            "cron" | "cron_mod" => ModKind::Cron,
            "sudo" | "sudo_mod" => ModKind::Sudo,
            _ => ModKind::Recursive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
}

/// Spatial layouts for a spawn group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPattern {
    Surround,
    Ring,
    Corners,
    LineTop,
    LineBottom,
    Pincer,
    BehindPlayer,
    Random,
}

/// Condition that releases a wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WaveTrigger {
    /// Fires as soon as the director reaches the wave.
    OnStart,
    /// Fires once killed / spawned reaches the fraction.
    OnKillPercent(f64),
    /// Fires once the room timer reaches the given seconds.
    OnTimer(f64),
}

/// Micro-upgrade identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    DmgUp,
    AtkSpeed,
    AtkSize,
    CritChance,
    CritDmg,
    MaxHp,
    DmgReduce,
    Iframes,
    DashCd,
    HealRate,
    MoveSpeed,
    VerbDrop,
    BufferSlot,
    BlastRadius,
    Projectile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeCategory {
    Offense,
    Defense,
    Utility,
}
