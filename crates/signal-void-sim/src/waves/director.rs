//! Wave director: releases a room template's waves as their triggers fire
//! and turns telegraphs into enemies.

use std::collections::BTreeSet;

use glam::DVec2;
use rand_chacha::ChaCha8Rng;

use signal_void_core::constants::*;
use signal_void_core::enums::{EnemyKind, WaveTrigger};
use signal_void_core::events::SimEvent;
use signal_void_core::state::WaveView;
use signal_void_core::types::Position;

use super::patterns::spawn_positions;
use super::templates::{RoomTemplate, SpawnGroup, TemplateSet};
use crate::config::ArenaBounds;
use crate::ecs::{ComponentKind as K, World};
use crate::world_setup::{materialize, spawn_telegraph};

/// Where the player stands this tick, for pattern placement.
#[derive(Debug, Clone, Copy)]
pub struct SpawnAnchor {
    pub position: Position,
    pub facing: DVec2,
}

#[derive(Debug, Clone)]
struct PendingGroup {
    group: SpawnGroup,
    frames: i64,
}

/// Per-run wave state. One room is active at a time.
#[derive(Debug, Clone)]
pub struct WaveDirector {
    template: Option<RoomTemplate>,
    depth: u32,
    current_wave: usize,
    room_ticks: u64,
    total_spawned: u32,
    total_killed: u32,
    pending: Vec<PendingGroup>,
    all_triggered: bool,
    announcement: Option<String>,
    announcement_timer: u32,
    intro: Option<String>,
    intro_timer: u32,
    introduced: BTreeSet<EnemyKind>,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveDirector {
    pub fn new() -> Self {
        Self {
            template: None,
            depth: 1,
            current_wave: 0,
            room_ticks: 0,
            total_spawned: 0,
            total_killed: 0,
            pending: Vec::new(),
            all_triggered: false,
            announcement: None,
            announcement_timer: 0,
            intro: None,
            intro_timer: 0,
            // The opening enemy needs no introduction.
            introduced: BTreeSet::from([EnemyKind::BufferLeak]),
        }
    }

    /// Load a fresh room for `depth`. Returns false when no template fits.
    pub fn start_room(&mut self, templates: &TemplateSet, depth: u32, rng: &mut ChaCha8Rng) -> bool {
        let Some(template) = templates.pick(depth, rng).cloned() else {
            log::warn!("no wave template available for depth {depth}");
            self.template = None;
            return false;
        };
        log::info!("depth {depth}: room '{}' with {} waves", template.name, template.waves.len());

        let fresh: Vec<EnemyKind> = template
            .kinds()
            .into_iter()
            .filter(|k| !self.introduced.contains(k))
            .collect();
        if fresh.is_empty() {
            self.intro = None;
            self.intro_timer = 0;
        } else {
            let labels: Vec<&str> = fresh.iter().map(|k| k.label()).collect();
            self.intro = Some(format!("NEW THREAT DETECTED: {}", labels.join(", ")));
            self.intro_timer = INTRO_TICKS;
            self.introduced.extend(template.kinds());
        }

        self.template = Some(template);
        self.depth = depth;
        self.current_wave = 0;
        self.room_ticks = 0;
        self.total_spawned = 0;
        self.total_killed = 0;
        self.pending.clear();
        self.all_triggered = false;
        self.announcement = None;
        self.announcement_timer = 0;
        true
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn total_spawned(&self) -> u32 {
        self.total_spawned
    }

    pub fn total_killed(&self) -> u32 {
        self.total_killed
    }

    pub fn record_kills(&mut self, count: u32) {
        self.total_killed += count;
    }

    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    pub fn intro(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn room_secs(&self) -> f64 {
        self.room_ticks as f64 * TICK_SECS
    }

    /// Advance the room timer, release due pending groups, and fire the
    /// current wave when its trigger holds. Consecutive immediate waves
    /// cascade within the same call.
    pub fn update(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        arena: &ArenaBounds,
        anchor: SpawnAnchor,
        events: &mut Vec<SimEvent>,
    ) {
        if self.template.is_none() {
            return;
        }
        self.room_ticks += 1;

        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            p.frames -= 1;
            if p.frames <= 0 {
                due.push(p.group.clone());
                false
            } else {
                true
            }
        });
        for group in &due {
            self.spawn_group(world, rng, arena, anchor, group);
        }

        while self.trigger_ready() {
            self.fire_wave(world, rng, arena, anchor, events);
            let next_is_immediate = self
                .wave_at(self.current_wave)
                .is_some_and(|w| w.trigger == WaveTrigger::OnStart);
            if !next_is_immediate {
                break;
            }
        }
        if self.current_wave >= self.wave_count() {
            self.all_triggered = true;
        }

        if self.announcement_timer > 0 {
            self.announcement_timer -= 1;
            if self.announcement_timer == 0 {
                self.announcement = None;
            }
        }
    }

    /// Count down the intro line. Runs every tick regardless of phase.
    pub fn tick_intro(&mut self) {
        if self.intro_timer > 0 {
            self.intro_timer -= 1;
            if self.intro_timer == 0 {
                self.intro = None;
            }
        }
    }

    fn wave_count(&self) -> usize {
        self.template.as_ref().map_or(0, |t| t.waves.len())
    }

    fn wave_at(&self, index: usize) -> Option<&super::templates::Wave> {
        self.template.as_ref()?.waves.get(index)
    }

    fn trigger_ready(&self) -> bool {
        let Some(wave) = self.wave_at(self.current_wave) else {
            return false;
        };
        match wave.trigger {
            WaveTrigger::OnStart => true,
            WaveTrigger::OnKillPercent(fraction) => {
                self.total_spawned > 0
                    && self.total_killed as f64 / self.total_spawned as f64 >= fraction
            }
            WaveTrigger::OnTimer(secs) => self.room_secs() >= secs,
        }
    }

    fn fire_wave(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        arena: &ArenaBounds,
        anchor: SpawnAnchor,
        events: &mut Vec<SimEvent>,
    ) {
        let Some(wave) = self.wave_at(self.current_wave).cloned() else {
            return;
        };
        for group in &wave.groups {
            let frames = (group.delay * TICK_RATE as f64) as i64;
            if frames <= 0 {
                self.spawn_group(world, rng, arena, anchor, group);
            } else {
                self.pending.push(PendingGroup {
                    group: group.clone(),
                    frames,
                });
            }
        }
        if let Some(text) = &wave.announcement {
            self.announcement = Some(text.clone());
            self.announcement_timer = ANNOUNCEMENT_TICKS;
        }
        log::info!("wave {} triggered at depth {}", self.current_wave + 1, self.depth);
        events.push(SimEvent::WaveTriggered {
            index: self.current_wave,
            announcement: wave.announcement.clone(),
        });
        self.current_wave += 1;
    }

    fn spawn_group(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        arena: &ArenaBounds,
        anchor: SpawnAnchor,
        group: &SpawnGroup,
    ) {
        if !group.kind.is_spawnable() {
            log::warn!("skipping {} {:?}: no factory", group.count, group.kind);
            return;
        }
        let spots = spawn_positions(group.pattern, group.count, arena, anchor.position, anchor.facing, rng);
        for pos in spots {
            spawn_telegraph(world, group.kind, pos, self.depth);
        }
        self.total_spawned += group.spawnable_count();
    }

    /// Whether the room is over: all waves fired and nothing left to fight.
    pub fn is_room_cleared(&self, world: &World) -> bool {
        self.template.is_some()
            && self.all_triggered
            && self.pending.is_empty()
            && world.query(&[K::SpawnTelegraph]).is_empty()
            && world.query(&[K::Enemy]).is_empty()
            && self.total_spawned > 0
    }

    pub fn view(&self, world: &World) -> WaveView {
        WaveView {
            template: self.template.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
            current_wave: self.current_wave,
            total_waves: self.wave_count(),
            total_spawned: self.total_spawned,
            total_killed: self.total_killed,
            announcement: self.announcement.clone(),
            intro: self.intro.clone(),
            room_cleared: self.is_room_cleared(world),
        }
    }
}

/// Count telegraphs down with an accelerating flicker; expired ones become
/// their enemy. Returns how many enemies materialized.
pub fn telegraph_system(world: &mut World, rng: &mut ChaCha8Rng) -> u32 {
    let mut spawned = 0;
    for id in world.query(&[K::SpawnTelegraph, K::Position]) {
        let (Some(&pos), Some(tele)) = (world.positions.get(id), world.telegraphs.get_mut(id)) else {
            continue;
        };
        tele.frames_remaining = tele.frames_remaining.saturating_sub(1);
        let (left, kind, depth) = (tele.frames_remaining, tele.kind, tele.depth);

        if let Some(render) = world.renderables.get_mut(id) {
            if left > 5 {
                render.visible = left % 4 < 3;
                render.color = if left % 6 < 3 { NEON_RED } else { DIM_RED };
            } else {
                render.visible = true;
                render.color = if left % 2 == 0 { NEON_YELLOW } else { WHITE };
            }
        }

        if left == 0 {
            if materialize(world, rng, kind, pos, depth).is_some() {
                spawned += 1;
            }
            world.destroy(id);
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use signal_void_core::enums::SpawnPattern;

    use super::*;
    use crate::waves::templates::Wave;

    fn anchor() -> SpawnAnchor {
        SpawnAnchor {
            position: Position::new(39.0, 11.0),
            facing: DVec2::X,
        }
    }

    fn single_room(waves: Vec<Wave>) -> TemplateSet {
        TemplateSet::new(vec![RoomTemplate {
            name: "test".into(),
            min_depth: 1,
            max_depth: 99,
            waves,
        }])
        .unwrap()
    }

    fn group(kind: EnemyKind, count: u32, delay: f64) -> SpawnGroup {
        SpawnGroup {
            kind,
            count,
            pattern: SpawnPattern::Corners,
            delay,
        }
    }

    #[test]
    fn test_immediate_waves_cascade() {
        let set = single_room(vec![
            Wave {
                groups: vec![group(EnemyKind::BufferLeak, 2, 0.0)],
                trigger: WaveTrigger::OnStart,
                announcement: None,
            },
            Wave {
                groups: vec![group(EnemyKind::Spammer, 1, 0.0)],
                trigger: WaveTrigger::OnStart,
                announcement: Some(">>> TWO <<<".into()),
            },
        ]);
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut director = WaveDirector::new();
        assert!(director.start_room(&set, 1, &mut rng));

        let mut events = Vec::new();
        director.update(&mut world, &mut rng, &ArenaBounds::default(), anchor(), &mut events);
        assert_eq!(director.total_spawned(), 3);
        assert_eq!(world.query(&[K::SpawnTelegraph]).len(), 3);
        assert_eq!(events.len(), 2);
        assert_eq!(director.announcement(), Some(">>> TWO <<<"));
    }

    #[test]
    fn test_delayed_group_waits_its_ticks() {
        let set = single_room(vec![Wave {
            groups: vec![group(EnemyKind::Firewall, 1, 0.1)],
            trigger: WaveTrigger::OnStart,
            announcement: None,
        }]);
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut director = WaveDirector::new();
        director.start_room(&set, 1, &mut rng);
        let arena = ArenaBounds::default();
        let mut events = Vec::new();

        director.update(&mut world, &mut rng, &arena, anchor(), &mut events);
        assert_eq!(director.total_spawned(), 0);
        for _ in 0..6 {
            director.update(&mut world, &mut rng, &arena, anchor(), &mut events);
        }
        assert_eq!(director.total_spawned(), 1);
    }

    #[test]
    fn test_kill_percent_gates_next_wave() {
        let set = single_room(vec![
            Wave {
                groups: vec![group(EnemyKind::BufferLeak, 4, 0.0)],
                trigger: WaveTrigger::OnStart,
                announcement: None,
            },
            Wave {
                groups: vec![group(EnemyKind::BufferLeak, 1, 0.0)],
                trigger: WaveTrigger::OnKillPercent(0.5),
                announcement: None,
            },
        ]);
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut director = WaveDirector::new();
        director.start_room(&set, 1, &mut rng);
        let arena = ArenaBounds::default();
        let mut events = Vec::new();

        director.update(&mut world, &mut rng, &arena, anchor(), &mut events);
        director.record_kills(1);
        director.update(&mut world, &mut rng, &arena, anchor(), &mut events);
        assert_eq!(director.total_spawned(), 4);
        director.record_kills(1);
        director.update(&mut world, &mut rng, &arena, anchor(), &mut events);
        assert_eq!(director.total_spawned(), 5);
    }

    #[test]
    fn test_unspawnable_groups_do_not_count() {
        let set = single_room(vec![Wave {
            groups: vec![group(EnemyKind::Worm, 3, 0.0)],
            trigger: WaveTrigger::OnStart,
            announcement: None,
        }]);
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut director = WaveDirector::new();
        director.start_room(&set, 1, &mut rng);
        let mut events = Vec::new();
        director.update(&mut world, &mut rng, &ArenaBounds::default(), anchor(), &mut events);

        assert_eq!(director.total_spawned(), 0);
        assert!(!director.is_room_cleared(&world), "nothing spawned means not cleared");
    }

    #[test]
    fn test_telegraph_materializes_after_countdown() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let marker = spawn_telegraph(&mut world, EnemyKind::Sniper, Position::new(10.0, 10.0), 1);
        for _ in 0..TELEGRAPH_TICKS - 1 {
            assert_eq!(telegraph_system(&mut world, &mut rng), 0);
        }
        assert_eq!(telegraph_system(&mut world, &mut rng), 1);
        assert!(!world.is_alive(marker));
        let enemy = world.query(&[K::Enemy])[0];
        assert_eq!(world.invulnerables.get(enemy).unwrap().frames, SPAWN_IFRAMES);
    }

    #[test]
    fn test_intro_names_new_threats_once() {
        let set = single_room(vec![Wave {
            groups: vec![group(EnemyKind::BufferLeak, 1, 0.0), group(EnemyKind::Sniper, 1, 0.0)],
            trigger: WaveTrigger::OnStart,
            announcement: None,
        }]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut director = WaveDirector::new();
        director.start_room(&set, 1, &mut rng);
        assert_eq!(director.intro(), Some("NEW THREAT DETECTED: | SNIPER"));
        director.start_room(&set, 2, &mut rng);
        assert_eq!(director.intro(), None);
    }
}
