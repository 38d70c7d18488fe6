//! Component data attached to entities.
//!
//! Components are plain data. Cross-entity links are `EntityId`s and are
//! only ever looked up, never owned.

use std::collections::{BTreeMap, VecDeque};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{EntityId, Position};

// --- Physics ---

/// Per-tick velocity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Friction {
    pub factor: f64,
}

/// Speed cap in cells per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxSpeed {
    pub value: f64,
}

/// Decaying impulse added to velocity each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    pub x: f64,
    pub y: f64,
    pub decay: f64,
}

impl Knockback {
    pub fn new(impulse: DVec2) -> Self {
        Self {
            x: impulse.x,
            y: impulse.y,
            decay: KNOCKBACK_DECAY,
        }
    }

    pub fn with_decay(impulse: DVec2, decay: f64) -> Self {
        Self {
            x: impulse.x,
            y: impulse.y,
            decay,
        }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Axis-aligned box centred on position + offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBox {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Solid boxes block movement; non-solid ones only detect.
    pub solid: bool,
    pub trigger: bool,
}

impl CollisionBox {
    pub fn solid(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
            solid: true,
            trigger: false,
        }
    }

    pub fn trigger(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
            solid: false,
            trigger: true,
        }
    }
}

/// Constant downward acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    pub strength: f64,
}

// --- Presentation state ---

/// Glyph and colour hints for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub glyph: char,
    pub color: u8,
    pub layer: u8,
    pub visible: bool,
}

impl Renderable {
    pub fn new(glyph: char, color: u8, layer: u8) -> Self {
        Self {
            glyph,
            color,
            layer,
            visible: true,
        }
    }
}

/// Recent positions recorded while dashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostTrail {
    pub positions: VecDeque<Position>,
    pub max_echoes: usize,
}

impl Default for GhostTrail {
    fn default() -> Self {
        Self {
            positions: VecDeque::new(),
            max_echoes: GHOST_TRAIL_ECHOES,
        }
    }
}

/// Colour swap after taking damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitFlash {
    pub frames: u32,
    pub flash_color: u8,
    /// Colour to restore once the flash ends.
    pub stashed_color: Option<u8>,
}

impl Default for HitFlash {
    fn default() -> Self {
        Self {
            frames: 0,
            flash_color: WHITE,
            stashed_color: None,
        }
    }
}

// --- Health & status ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
}

impl Health {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Restore health without exceeding the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.maximum);
    }
}

/// Ticks of damage immunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invulnerable {
    pub frames: u32,
}

/// Ticks during which AI is suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stunned {
    pub frames: u32,
}

/// Frontal shield. Blocks melee arriving against the bearer's facing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub active: bool,
    pub blocks_damage: bool,
    pub causes_knockback: bool,
    pub knockback_force: f64,
}

/// Damage dealt to the player on body contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactDamage {
    pub amount: i32,
    pub knockback_force: f64,
}

// --- Player ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerControlled {
    pub acceleration: f64,
    pub last_move_x: f64,
    pub last_move_y: f64,
}

impl PlayerControlled {
    pub fn last_move(&self) -> DVec2 {
        DVec2::new(self.last_move_x, self.last_move_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashState {
    pub speed: f64,
    pub duration: u32,
    pub cooldown: u32,
    pub frames_remaining: u32,
    pub cooldown_remaining: u32,
    pub dir_x: f64,
    pub dir_y: f64,
}

impl DashState {
    pub fn is_dashing(&self) -> bool {
        self.frames_remaining > 0
    }
}

impl Default for DashState {
    fn default() -> Self {
        Self {
            speed: DASH_SPEED,
            duration: DASH_DURATION,
            cooldown: DASH_COOLDOWN,
            frames_remaining: 0,
            cooldown_remaining: 0,
            dir_x: 1.0,
            dir_y: 0.0,
        }
    }
}

/// The player's current swing or beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackState {
    pub active: bool,
    pub frames_remaining: u32,
    pub dir_x: f64,
    pub dir_y: f64,
    pub radius: f64,
    pub is_beam: bool,
    pub beam_range: f64,
    /// Consecutive ticks the beam has been held.
    pub beam_continuous_frames: u32,
}

impl AttackState {
    pub fn direction(&self) -> DVec2 {
        DVec2::new(self.dir_x, self.dir_y)
    }
}

impl Default for AttackState {
    fn default() -> Self {
        Self {
            active: false,
            frames_remaining: 0,
            dir_x: 1.0,
            dir_y: 0.0,
            radius: 3.0,
            is_beam: false,
            beam_range: 0.0,
            beam_continuous_frames: 0,
        }
    }
}

/// Temporary damage boost granted by verbs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackMultiplier {
    pub damage_multiplier: f64,
    pub hits: u32,
    pub uses_remaining: u32,
}

impl Default for AttackMultiplier {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            hits: 1,
            uses_remaining: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxBuffer {
    pub verbs: Vec<Verb>,
    pub max_verbs: usize,
}

impl SyntaxBuffer {
    pub fn new(max_verbs: usize) -> Self {
        Self {
            verbs: Vec::new(),
            max_verbs,
        }
    }

    pub fn is_full(&self) -> bool {
        self.verbs.len() >= self.max_verbs
    }
}

/// One weapon in the player's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub base_kind: WeaponKind,
    pub is_evolved: bool,
    pub mods: Vec<ModKind>,
    pub mod_slots: usize,
    /// Ticks until the next attack may start.
    pub attack_timer: u32,
    /// Hits counted toward `--cron`.
    pub hit_counter: u32,
    /// Attacks counted toward afterimages and radial offsets.
    pub attack_counter: u32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            base_kind: kind,
            is_evolved: false,
            mods: Vec::new(),
            mod_slots: BASE_MOD_SLOTS,
            attack_timer: 0,
            hit_counter: 0,
            attack_counter: 0,
        }
    }

    pub fn has_mod(&self, m: ModKind) -> bool {
        self.mods.contains(&m)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponInventory {
    pub weapons: Vec<Weapon>,
    pub active_index: usize,
}

impl WeaponInventory {
    pub fn active(&self) -> Option<&Weapon> {
        let idx = self.active_index.min(self.weapons.len().saturating_sub(1));
        self.weapons.get(idx)
    }

    pub fn active_mut(&mut self) -> Option<&mut Weapon> {
        let idx = self.active_index.min(self.weapons.len().saturating_sub(1));
        self.weapons.get_mut(idx)
    }
}

/// Run-long multipliers written only by the progression API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub attack_speed_multiplier: f64,
    pub damage_multiplier: f64,
    pub attack_size_multiplier: f64,
    pub move_speed_multiplier: f64,
    pub dash_cooldown_multiplier: f64,
    pub logic_blast_radius_multiplier: f64,
    pub crit_damage_multiplier: f64,
    pub crit_chance: f64,
    pub bonus_max_hp: i32,
    pub bonus_projectile_count: u32,
    pub bonus_buffer_slots: usize,
    pub damage_reduction: f64,
    pub invincibility_frames: u32,
    pub verb_drop_rate: f64,
    pub heal_bonus: f64,
    pub upgrade_counts: BTreeMap<UpgradeKind, u32>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            attack_speed_multiplier: 1.0,
            damage_multiplier: 1.0,
            attack_size_multiplier: 1.0,
            move_speed_multiplier: 1.0,
            dash_cooldown_multiplier: 1.0,
            logic_blast_radius_multiplier: 1.0,
            crit_damage_multiplier: 2.0,
            crit_chance: 0.05,
            bonus_max_hp: 0,
            bonus_projectile_count: 0,
            bonus_buffer_slots: 0,
            damage_reduction: 0.0,
            invincibility_frames: DEFAULT_IFRAMES,
            verb_drop_rate: 0.0,
            heal_bonus: 0.0,
            upgrade_counts: BTreeMap::new(),
        }
    }
}

impl PlayerStats {
    /// Apply armour to incoming damage. Armour never reduces a hit below 1.
    pub fn mitigate(&self, amount: i32) -> i32 {
        if self.damage_reduction > 0.0 {
            ((amount as f64 * (1.0 - self.damage_reduction)) as i32).max(1)
        } else {
            amount
        }
    }
}

/// `--async` auto-fire accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoFire {
    pub timer: u32,
}

// --- Enemies ---

/// Overclocker wind-up and dash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeAttack {
    pub charge_time: u32,
    pub charge_timer: u32,
    pub charging: bool,
    pub charge_speed: f64,
    pub trail_damage: i32,
    /// Point the dash is aimed through.
    pub target: Position,
    /// Set when the current dash touches the player.
    pub contact_this_dash: bool,
    pub last_dash: DashOutcome,
}

impl Default for ChargeAttack {
    fn default() -> Self {
        Self {
            charge_time: 60,
            charge_timer: 0,
            charging: false,
            charge_speed: 2.0,
            trail_damage: 5,
            target: Position::default(),
            contact_this_dash: false,
            last_dash: DashOutcome::None,
        }
    }
}

/// Spammer projectile timer. Timers are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedAttack {
    pub cooldown_secs: f64,
    pub cooldown_timer: f64,
    pub charge_timer: f64,
    pub charging: bool,
    pub projectile_speed: f64,
    pub projectile_damage: i32,
    pub telegraph_secs: f64,
}

impl Default for RangedAttack {
    fn default() -> Self {
        Self {
            cooldown_secs: 2.0,
            cooldown_timer: 0.0,
            charge_timer: 0.0,
            charging: false,
            projectile_speed: 0.5,
            projectile_damage: 1,
            telegraph_secs: 0.3,
        }
    }
}

/// Sniper aim cycle. Timers ending in `_timer`/`_duration`/`_time`/`_cooldown`
/// are seconds; `fire_frames`/`fire_duration` are ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SniperState {
    pub phase: SniperPhase,
    pub charge_timer: f64,
    pub charge_duration: f64,
    pub lock_time: f64,
    pub fire_frames: u32,
    pub fire_duration: u32,
    pub cooldown_timer: f64,
    pub cooldown_duration: f64,
    pub fire_cooldown: f64,
    pub fire_cooldown_timer: f64,
    pub aim_x: f64,
    pub aim_y: f64,
    pub beam_damage: i32,
}

impl SniperState {
    pub fn aim(&self) -> DVec2 {
        DVec2::new(self.aim_x, self.aim_y)
    }
}

impl Default for SniperState {
    fn default() -> Self {
        Self {
            phase: SniperPhase::Idle,
            charge_timer: 0.0,
            charge_duration: 1.5,
            lock_time: 0.5,
            fire_frames: 0,
            fire_duration: 4,
            cooldown_timer: 0.0,
            cooldown_duration: 1.0,
            fire_cooldown: 4.0,
            fire_cooldown_timer: 2.0,
            aim_x: 1.0,
            aim_y: 0.0,
            beam_damage: 3,
        }
    }
}

/// Behaviour archetype with its own state payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Archetype {
    Chase,
    Guard,
    Charge(ChargeAttack),
    Spammer(RangedAttack),
    Sniper(SniperState),
}

/// Enemy brain: shared state machine fields plus the archetype payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiBehavior {
    pub state: AiState,
    /// Ticks spent in the current state.
    pub state_timer: u32,
    pub detection_range: f64,
    pub attack_range: f64,
    pub move_speed: f64,
    pub facing_x: f64,
    pub facing_y: f64,
    /// Radians per tick; zero snaps facing instantly.
    pub turn_speed: f64,
    /// Ticks of frozen facing after a shield block.
    pub shield_stagger: u32,
    pub archetype: Archetype,
}

impl AiBehavior {
    pub fn new(archetype: Archetype, move_speed: f64, attack_range: f64) -> Self {
        Self {
            state: AiState::Chase,
            state_timer: 0,
            detection_range: 999.0,
            attack_range,
            move_speed,
            facing_x: 1.0,
            facing_y: 0.0,
            turn_speed: 0.0,
            shield_stagger: 0,
            archetype,
        }
    }

    pub fn facing(&self) -> DVec2 {
        DVec2::new(self.facing_x, self.facing_y)
    }

    pub fn set_facing(&mut self, v: DVec2) {
        self.facing_x = v.x;
        self.facing_y = v.y;
    }

    /// Switch state and reset the dwell timer.
    pub fn enter(&mut self, state: AiState) {
        self.state = state;
        self.state_timer = 0;
    }
}

/// Verb granted when the enemy dies under `condition`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntaxDrop {
    pub verb: Verb,
    pub condition: DropCondition,
    /// Set when a hit landed from outside the shield arc.
    pub backstabbed: bool,
}

impl SyntaxDrop {
    pub fn new(verb: Verb, condition: DropCondition) -> Self {
        Self {
            verb,
            condition,
            backstabbed: false,
        }
    }
}

// --- Transient entities ---

/// Ticks until the entity is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifetime {
    pub frames: u32,
}

/// Player projectile payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: i32,
    pub knockback: f64,
    pub owner: Option<EntityId>,
    pub max_range: f64,
    pub distance_traveled: f64,
    pub piercing: bool,
    pub stun_frames: u32,
    pub color: u8,
    /// Enemies already struck by a piercing projectile.
    pub hit_entities: Vec<EntityId>,
}

/// Enemy projectile payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub damage: i32,
    pub owner: Option<EntityId>,
    pub speed: f64,
}

/// Warning marker that becomes an enemy when the countdown ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTelegraph {
    pub kind: EnemyKind,
    pub frames_remaining: u32,
    pub total_frames: u32,
    pub depth: u32,
}

/// Delayed area damage resolved on the marker's last tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EchoStrike {
    pub damage: i32,
    pub dir_x: f64,
    pub dir_y: f64,
    pub radius: f64,
}

/// Ground tile that damages enemies standing on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundHazard {
    pub damage: i32,
    pub tick_rate: u32,
    pub tick_timer: u32,
}

/// Expanding damage ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shockwave {
    pub origin: Position,
    pub current_radius: f64,
    pub max_radius: f64,
    pub expand_speed: f64,
    pub damage: i32,
    pub hit_entities: Vec<EntityId>,
}

// --- Tags ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle;
