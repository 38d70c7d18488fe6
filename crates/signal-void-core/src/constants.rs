//! Simulation constants and tuning parameters.
//!
//! Distances are in arena cells, speeds in cells per tick, and timers in
//! ticks unless the name ends in `_SECS`.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const TICK_SECS: f64 = 1.0 / TICK_RATE as f64;

/// Integration step. Velocities are already per tick.
pub const DT: f64 = 1.0;

/// Default cap on ticks run per rendered frame.
pub const MAX_TICKS_PER_FRAME: u32 = 4;

/// Frame deltas are clamped to this many tick lengths before accumulation.
pub const MAX_FRAME_DELTA_TICKS: f64 = 5.0;

// --- Arena ---

pub const DEFAULT_ARENA_WIDTH: u32 = 79;
pub const DEFAULT_ARENA_HEIGHT: u32 = 23;
pub const DEFAULT_ARENA_MARGIN: u32 = 1;

// --- Physics ---

/// Knockback components below this are dropped.
pub const KNOCKBACK_EPSILON: f64 = 0.01;

/// Default geometric knockback decay per tick.
pub const KNOCKBACK_DECAY: f64 = 0.7;

/// Residual velocity components below this are zeroed.
pub const VELOCITY_EPSILON: f64 = 0.005;

/// Boundary impacts faster than this produce a wall hit event.
pub const WALL_HIT_MIN_SPEED: f64 = 0.3;

/// Default particle gravity (cells/tick²).
pub const PARTICLE_GRAVITY: f64 = 0.1;

// --- Player ---

pub const PLAYER_HEALTH: i32 = 100;
pub const PLAYER_FRICTION: f64 = 0.78;
pub const PLAYER_MAX_SPEED: f64 = 0.7;
pub const PLAYER_ACCELERATION: f64 = 0.20;
pub const PLAYER_BUFFER_SLOTS: usize = 3;
pub const DASH_SPEED: f64 = 2.5;
pub const DASH_DURATION: u32 = 8;
pub const DASH_COOLDOWN: u32 = 30;
/// Floor on the dash cooldown after stat scaling.
pub const DASH_COOLDOWN_MIN: u32 = 5;
/// Velocity above which a dash without input follows current motion.
pub const DASH_VELOCITY_THRESHOLD: f64 = 0.1;
pub const GHOST_TRAIL_ECHOES: usize = 5;
/// Invulnerability granted after taking a hit when no stat override exists.
pub const DEFAULT_IFRAMES: u32 = 45;

// --- Combat ---

/// Minimum forward dot for a melee hit.
pub const MELEE_CONE_DOT: f64 = 0.3;
/// Shield blocks attacks whose direction dotted with the defender's facing is below this.
pub const SHIELD_BLOCK_DOT: f64 = 0.3;
/// Ticks a blocking shield holds its facing.
pub const SHIELD_STAGGER_TICKS: u32 = 30;
/// Half width of a player beam.
pub const BEAM_HALF_WIDTH: f64 = 1.2;
pub const HIT_FLASH_TICKS: u32 = 4;
/// Hit radius for projectiles of either side.
pub const PROJECTILE_HIT_RADIUS: f64 = 1.2;
/// Player projectiles spawn this far ahead of the player.
pub const PROJECTILE_MUZZLE_OFFSET: f64 = 1.5;
/// Safety lifetime for player projectiles.
pub const PROJECTILE_LIFETIME: u32 = 600;
/// Melee swings destroy enemy projectiles inside this range.
pub const SWING_DEFLECT_RANGE: f64 = 3.0;
pub const ENEMY_PROJECTILE_LIFETIME: u32 = 150;
pub const ENEMY_PROJECTILE_KNOCKBACK: f64 = 0.3;

// --- AI ---

pub const CHASE_LUNGE_RANGE: f64 = 4.0;
pub const CHASE_LUNGE_DWELL: u32 = 30;
pub const CHASE_LUNGE_TICKS: u32 = 10;
pub const CHASE_LUNGE_IMPULSE: f64 = 0.8;
pub const CHASE_RECOVER_TICKS: u32 = 18;

pub const GUARD_PREDICT_TICKS: f64 = 10.0;
pub const GUARD_PREDICT_MIN_SPEED: f64 = 0.05;
pub const GUARD_BASH_FRONT_DOT: f64 = 0.5;
pub const GUARD_BASH_COOLDOWN: u32 = 180;
pub const GUARD_BASH_TICKS: u32 = 18;
pub const GUARD_BASH_SPEED: f64 = 0.6;
pub const GUARD_RECOVER_TICKS: u32 = 30;

pub const CHARGE_ORBIT_RADIUS: f64 = 7.0;
pub const CHARGE_ORBIT_DWELL: u32 = 180;
pub const CHARGE_STRAFE_PERIOD: u32 = 90;
/// Fraction of the wind-up during which the target point still tracks.
pub const CHARGE_TRACK_FRACTION: f64 = 0.6;
pub const CHARGE_DASH_TICKS: u32 = 20;
pub const CHARGE_RECOVER_TICKS: u32 = 30;

pub const SPAMMER_PREFERRED_RANGE: f64 = 12.0;
pub const SPAMMER_FLEE_RANGE: f64 = 5.0;
pub const SPAMMER_FLEE_TICKS: u32 = 60;
pub const SPAMMER_STRAFE_PERIOD: u32 = 60;

pub const SNIPER_PREFERRED_RANGE: f64 = 18.0;
pub const SNIPER_STRAFE_PERIOD: u32 = 90;
/// Half width of the sniper hitscan corridor.
pub const SNIPER_BEAM_HALF_WIDTH: f64 = 1.5;
pub const SNIPER_KNOCKBACK: f64 = 0.5;

/// Minimum per-axis offset before facing updates.
pub const FACING_MIN_COMPONENT: f64 = 0.1;

// --- Waves ---

pub const TELEGRAPH_TICKS: u32 = 30;
pub const SPAWN_IFRAMES: u32 = 12;
pub const SPAWN_MARGIN: f64 = 2.0;
pub const RANDOM_SPAWN_MIN_DISTANCE: f64 = 6.0;
pub const RANDOM_SPAWN_ATTEMPTS: u32 = 20;
pub const ANNOUNCEMENT_TICKS: u32 = 90;
pub const INTRO_TICKS: u32 = 120;
/// Depths reserved for boss rooms; regular rooms skip over them.
pub const BOSS_DEPTHS: [u32; 3] = [5, 10, 15];

// --- Progression ---

pub const KILL_STREAK_WINDOW: u32 = 30;
/// Fraction of max health restored when entering a new room.
pub const ROOM_HEAL_FRACTION: f64 = 0.25;
pub const LOGIC_BLAST_RADIUS: f64 = 15.0;
pub const LOGIC_BLAST_DAMAGE: i32 = 50;
pub const LOGIC_BLAST_KNOCKBACK: f64 = 2.0;
pub const VOID_VERB_DAMAGE: i32 = 25;
pub const SUDO_VERB_IFRAMES: u32 = 180;
pub const BASE_MOD_SLOTS: usize = 2;
pub const EVOLVED_MOD_SLOTS: usize = 3;
pub const TEE_MAX_CHAIN: u32 = 3;
pub const ECHO_DELAY_TICKS: u32 = 18;
pub const ECHO_RADIUS: f64 = 2.5;
pub const CRON_HIT_INTERVAL: u32 = 5;
pub const ASYNC_FIRE_INTERVAL: u32 = 90;
pub const GREP_RANGE: f64 = 10.0;
pub const GREP_MAX_TURN_DEG: f64 = 3.0;
pub const HAZARD_LIFETIME: u32 = 120;
pub const HAZARD_TICK_RATE: u32 = 60;

// --- Palette (xterm-256 indices) ---

pub const NEON_CYAN: u8 = 51;
pub const NEON_MAGENTA: u8 = 201;
pub const NEON_YELLOW: u8 = 226;
pub const NEON_GREEN: u8 = 46;
pub const NEON_RED: u8 = 196;
pub const NEON_ORANGE: u8 = 208;
pub const DIM_RED: u8 = 52;
pub const GRAY_LIGHT: u8 = 252;
pub const GRAY_MED: u8 = 245;
pub const GRAY_DARK: u8 = 238;
pub const WHITE: u8 = 255;
