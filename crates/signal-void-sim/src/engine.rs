//! Simulation engine.
//!
//! `SimulationEngine` owns the entity store and every piece of run state,
//! turns queued player commands into intents, runs the tick pipeline and
//! produces `SimSnapshot`s. Completely headless, so whole runs can be
//! replayed deterministically from a seed.

use std::collections::VecDeque;

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::commands::PlayerCommand;
use signal_void_core::constants::{BOSS_DEPTHS, ROOM_HEAL_FRACTION};
use signal_void_core::enums::{EnemyKind, GamePhase, ModKind, UpgradeKind, WeaponKind};
use signal_void_core::events::{FeedbackEvent, SimEvent};
use signal_void_core::state::SimSnapshot;
use signal_void_core::types::{EntityId, Position, SimTime};

use crate::config::{ArenaBounds, SimConfig};
use crate::ecs::World;
use crate::schedule::{self, TickContext, PIPELINE, RESIDUAL};
use crate::systems::input::Intents;
use crate::systems::snapshot::{build_snapshot, SnapshotInput};
use crate::systems::streak::KillStreak;
use crate::waves::{TemplateSet, WaveDirector};
use crate::{mods, upgrades, vfx, weapons, world_setup};

/// The simulation engine. Owns the world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    time: SimTime,
    phase: GamePhase,
    depth: u32,
    rng: ChaCha8Rng,
    player: Option<EntityId>,
    templates: TemplateSet,
    director: WaveDirector,
    streak: KillStreak,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
    feedback: Vec<FeedbackEvent>,
}

impl SimulationEngine {
    /// New run with the built-in templates: player at the arena center and
    /// the first room loaded at `starting_depth`.
    pub fn new(config: SimConfig) -> Self {
        Self::with_templates(config, TemplateSet::builtin())
    }

    /// New run drawing rooms from `templates`.
    pub fn with_templates(config: SimConfig, templates: TemplateSet) -> Self {
        let mut engine = Self::sandbox_with(config, templates);
        let depth = engine.depth;
        engine.director.start_room(&engine.templates, depth, &mut engine.rng);
        engine
    }

    /// A player in an empty arena with no room loaded. Nothing spawns unless
    /// placed by hand, and the room never counts as cleared.
    pub fn sandbox(config: SimConfig) -> Self {
        Self::sandbox_with(config, TemplateSet::builtin())
    }

    fn sandbox_with(config: SimConfig, templates: TemplateSet) -> Self {
        let mut world = World::new();
        let (cx, cy) = config.arena.center();
        let player = world_setup::spawn_player(&mut world, Position::new(cx, cy));
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            depth: config.starting_depth.max(1),
            config,
            world,
            time: SimTime::default(),
            phase: GamePhase::Playing,
            player: Some(player),
            templates,
            director: WaveDirector::new(),
            streak: KillStreak::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            feedback: Vec::new(),
        }
    }

    /// Queue a player command for the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick inside the configured arena.
    pub fn tick(&mut self) -> SimSnapshot {
        let arena = self.config.arena;
        self.tick_in(&arena)
    }

    /// Advance one tick inside `arena`. The room bounds are read fresh every
    /// tick, so a renderer that resizes the arena passes the new bounds here.
    pub fn tick_in(&mut self, arena: &ArenaBounds) -> SimSnapshot {
        let intents = self.process_commands();
        self.director.tick_intro();

        let stages: &[schedule::Stage] = match self.phase {
            GamePhase::Playing => &PIPELINE,
            GamePhase::RoomCleared | GamePhase::GameOver => &RESIDUAL,
        };
        let mut ctx = TickContext {
            world: &mut self.world,
            rng: &mut self.rng,
            arena,
            director: &mut self.director,
            streak: &mut self.streak,
            phase: &mut self.phase,
            player: self.player,
            intents: &intents,
            events: &mut self.events,
            feedback: &mut self.feedback,
        };
        schedule::run_pipeline(stages, &mut ctx);
        self.time.advance();

        let events = std::mem::take(&mut self.events);
        let feedback = std::mem::take(&mut self.feedback);
        self.build(&events, &feedback)
    }

    /// Snapshot of the current state without ticking. Event lists are empty.
    pub fn snapshot(&self) -> SimSnapshot {
        self.build(&[], &[])
    }

    fn build(&self, events: &[SimEvent], feedback: &[FeedbackEvent]) -> SimSnapshot {
        build_snapshot(
            &self.world,
            SnapshotInput {
                time: self.time,
                phase: self.phase,
                depth: self.depth,
                player: self.player,
                waves: self.director.view(&self.world),
                kill_streak: self.streak.count,
                events,
                feedback,
            },
        )
    }

    /// Fold every queued command into this tick's intents.
    fn process_commands(&mut self) -> Intents {
        let mut intents = Intents::default();
        if self.phase != GamePhase::Playing {
            self.command_queue.clear();
            return intents;
        }
        while let Some(command) = self.command_queue.pop_front() {
            intents.absorb(command);
        }
        intents
    }

    // --- Progression API, called between rooms ---

    /// Move to the next room: recenter and heal the player, step the depth
    /// past boss floors and load a fresh template. Ignored after game over.
    pub fn advance_room(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.clear_room();
        self.restore_player();

        self.depth += 1;
        if BOSS_DEPTHS.contains(&self.depth) {
            log::info!("depth {} is a boss floor, skipping", self.depth);
            self.depth += 1;
        }
        self.streak = KillStreak::default();
        self.phase = GamePhase::Playing;
        self.director.start_room(&self.templates, self.depth, &mut self.rng)
    }

    /// Destroy everything but the player.
    fn clear_room(&mut self) {
        let player = self.player;
        let leftovers: Vec<EntityId> = self
            .world
            .query(&[])
            .into_iter()
            .filter(|&id| Some(id) != player)
            .collect();
        for id in leftovers {
            self.world.destroy(id);
        }
        self.world.sweep();
    }

    fn restore_player(&mut self) {
        let Some(player) = self.player else {
            return;
        };
        let (cx, cy) = self.config.arena.center();
        let center = Position::new(cx, cy);
        if let Some(pos) = self.world.positions.get_mut(player) {
            *pos = center;
        }
        if let Some(vel) = self.world.velocities.get_mut(player) {
            vel.set(DVec2::ZERO);
        }
        self.world.knockbacks.remove(player);
        if let Some(trail) = self.world.ghost_trails.get_mut(player) {
            trail.positions.clear();
        }

        let heal_bonus = self.world.stats.get(player).map_or(0.0, |s| s.heal_bonus);
        if let Some(health) = self.world.healths.get_mut(player) {
            let amount = (health.maximum as f64 * (ROOM_HEAL_FRACTION + heal_bonus)) as i32;
            health.current = (health.current + amount).min(health.maximum);
            vfx::explosion(&mut self.world, &mut self.rng, center, &vfx::HEAL_BURST);
        }
    }

    /// Up to `count` distinct upgrades the player can still take.
    pub fn offer_upgrades(&mut self, count: usize) -> Vec<UpgradeKind> {
        let Some(stats) = self.player.and_then(|p| self.world.stats.get(p)) else {
            return Vec::new();
        };
        upgrades::select_upgrades(stats, count, &mut self.rng)
    }

    pub fn apply_upgrade(&mut self, kind: UpgradeKind) -> bool {
        match self.player {
            Some(player) => upgrades::apply_upgrade(&mut self.world, player, kind),
            None => false,
        }
    }

    /// A weapon kind the player does not hold yet.
    pub fn offer_weapon(&mut self) -> Option<WeaponKind> {
        let inv = self.world.inventories.get(self.player?)?;
        weapons::offer_weapon(inv, &mut self.rng)
    }

    /// Put `kind` into inventory `slot`.
    pub fn equip_weapon(&mut self, slot: usize, kind: WeaponKind) {
        let Some(inv) = self.player.and_then(|p| self.world.inventories.get_mut(p)) else {
            return;
        };
        weapons::replace_weapon(inv, slot, kind);
    }

    pub fn offer_mod(&mut self) -> ModKind {
        mods::offer_mod(&mut self.rng)
    }

    /// Attach `m` to the active weapon.
    pub fn attach_mod(&mut self, m: ModKind) -> bool {
        let Some(weapon) = self
            .player
            .and_then(|p| self.world.inventories.get_mut(p))
            .and_then(|inv| inv.active_mut())
        else {
            return false;
        };
        mods::attach(weapon, m);
        true
    }

    /// Evolve every weapon whose linked upgrade has enough stacks.
    /// Returns the new weapon kinds.
    pub fn evolve_weapons(&mut self) -> Vec<WeaponKind> {
        let Some(player) = self.player else {
            return Vec::new();
        };
        let (Some(inv), Some(stats)) = (self.world.inventories.get(player), self.world.stats.get(player)) else {
            return Vec::new();
        };
        let ready = upgrades::pending_evolutions(inv, stats);
        let mut evolved = Vec::with_capacity(ready.len());
        if let Some(inv) = self.world.inventories.get_mut(player) {
            for (index, evolution) in ready {
                if let Some(weapon) = inv.weapons.get_mut(index) {
                    upgrades::evolve(weapon, evolution);
                    log::info!("weapon evolved into {:?}", evolution.evolved);
                    evolved.push(evolution.evolved);
                }
            }
        }
        evolved
    }

    /// Place an enemy directly, bypassing telegraphs. Depth scaling applies.
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, pos: Position) -> Option<EntityId> {
        let id = world_setup::spawn_enemy(&mut self.world, &mut self.rng, kind, pos)?;
        world_setup::apply_depth_scaling(&mut self.world, id, self.depth);
        Some(id)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
