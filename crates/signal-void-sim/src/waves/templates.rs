//! Room encounter templates.
//!
//! The built-in table covers five depth brackets with three templates each.
//! A replacement table can be loaded from JSON.

use std::path::Path;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use signal_void_core::enums::{EnemyKind, SpawnPattern, WaveTrigger};

use crate::error::{ConfigError, ConfigResult};

/// Enemies that spawn together in one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnGroup {
    pub kind: EnemyKind,
    pub count: u32,
    pub pattern: SpawnPattern,
    /// Seconds after the wave triggers.
    #[serde(default)]
    pub delay: f64,
}

impl SpawnGroup {
    /// Enemies this group contributes to the spawned total.
    pub fn spawnable_count(&self) -> u32 {
        if self.kind.is_spawnable() {
            self.count
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub groups: Vec<SpawnGroup>,
    #[serde(default = "default_trigger")]
    pub trigger: WaveTrigger,
    #[serde(default)]
    pub announcement: Option<String>,
}

fn default_trigger() -> WaveTrigger {
    WaveTrigger::OnStart
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub name: String,
    /// Inclusive depth bracket.
    pub min_depth: u32,
    pub max_depth: u32,
    pub waves: Vec<Wave>,
}

impl RoomTemplate {
    pub fn covers(&self, depth: u32) -> bool {
        (self.min_depth..=self.max_depth).contains(&depth)
    }

    /// Spawnable kinds appearing anywhere in the template, in first-seen order.
    pub fn kinds(&self) -> Vec<EnemyKind> {
        let mut kinds = Vec::new();
        for group in self.waves.iter().flat_map(|w| &w.groups) {
            if group.kind.is_spawnable() && !kinds.contains(&group.kind) {
                kinds.push(group.kind);
            }
        }
        kinds
    }

    fn validate(&self) -> ConfigResult<()> {
        let fail = |reason: String| ConfigError::Template {
            template: self.name.clone(),
            reason,
        };
        if self.waves.is_empty() {
            return Err(fail("no waves".into()));
        }
        if self.min_depth > self.max_depth {
            return Err(fail(format!(
                "depth range {}..={} is empty",
                self.min_depth, self.max_depth
            )));
        }
        for (i, wave) in self.waves.iter().enumerate() {
            if wave.groups.is_empty() {
                return Err(fail(format!("wave {i} has no spawn groups")));
            }
            if let Some(group) = wave.groups.iter().find(|g| g.count == 0) {
                return Err(fail(format!("wave {i} spawns zero {:?}", group.kind)));
            }
            if wave.groups.iter().any(|g| !(g.delay.is_finite() && g.delay >= 0.0)) {
                return Err(fail(format!("wave {i} has a negative delay")));
            }
            match wave.trigger {
                WaveTrigger::OnKillPercent(p) if !(p > 0.0 && p <= 1.0) => {
                    return Err(fail(format!("wave {i} kill percent {p} outside (0, 1]")));
                }
                WaveTrigger::OnTimer(t) if !(t.is_finite() && t >= 0.0) => {
                    return Err(fail(format!("wave {i} timer {t} is negative")));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// The set of templates the director draws rooms from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSet {
    templates: Vec<RoomTemplate>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Depth at or beyond which a template counts as open-ended.
const OPEN_ENDED_DEPTH: u32 = 99;

impl TemplateSet {
    pub fn new(templates: Vec<RoomTemplate>) -> ConfigResult<Self> {
        if templates.is_empty() {
            return Err(ConfigError::Template {
                template: "<set>".into(),
                reason: "no templates".into(),
            });
        }
        for template in &templates {
            template.validate()?;
        }
        Ok(Self { templates })
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let templates: Vec<RoomTemplate> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    pub fn get(&self, name: &str) -> Option<&RoomTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// A random template for `depth`, falling back to the open-ended ones.
    pub fn pick(&self, depth: u32, rng: &mut ChaCha8Rng) -> Option<&RoomTemplate> {
        let matching: Vec<&RoomTemplate> = self.templates.iter().filter(|t| t.covers(depth)).collect();
        if let Some(&t) = matching.choose(rng) {
            return Some(t);
        }
        log::warn!("no template covers depth {depth}; using an open-ended one");
        let open: Vec<&RoomTemplate> = self
            .templates
            .iter()
            .filter(|t| t.max_depth >= OPEN_ENDED_DEPTH)
            .collect();
        open.choose(rng).copied()
    }

    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }
}

fn g(kind: EnemyKind, count: u32, pattern: SpawnPattern, delay: f64) -> SpawnGroup {
    SpawnGroup {
        kind,
        count,
        pattern,
        delay,
    }
}

fn wave(groups: Vec<SpawnGroup>, trigger: WaveTrigger, announcement: Option<&str>) -> Wave {
    Wave {
        groups,
        trigger,
        announcement: announcement.map(|a| format!(">>> {a} <<<")),
    }
}

fn room(name: &str, depths: (u32, u32), waves: Vec<Wave>) -> RoomTemplate {
    RoomTemplate {
        name: name.into(),
        min_depth: depths.0,
        max_depth: depths.1,
        waves,
    }
}

fn builtin_templates() -> Vec<RoomTemplate> {
    use EnemyKind::{BufferLeak as BL, Firewall as FW, Overclocker as OC, Sniper as SN, Spammer as SP};
    use SpawnPattern::*;
    use WaveTrigger::{OnKillPercent as Kill, OnStart as Start, OnTimer as Timer};

    vec![
        // Tutorial
        room("tutorial_1", (1, 2), vec![
            wave(vec![g(BL, 4, Random, 0.0)], Start, None),
            wave(vec![g(BL, 3, BehindPlayer, 0.0)], Kill(0.75), None),
        ]),
        room("tutorial_2", (1, 2), vec![
            wave(vec![g(BL, 3, Surround, 0.0)], Start, None),
            wave(vec![g(BL, 4, Corners, 0.0)], Kill(0.60), None),
        ]),
        room("tutorial_3", (1, 2), vec![
            wave(vec![g(BL, 3, LineTop, 0.0)], Start, None),
            wave(vec![g(BL, 3, LineBottom, 0.0)], Kill(0.60), None),
        ]),
        // Early mix
        room("early_mixed_1", (3, 4), vec![
            wave(vec![g(BL, 4, Surround, 0.0), g(FW, 1, LineTop, 0.5)], Start, None),
            wave(vec![g(BL, 3, BehindPlayer, 0.0), g(SP, 2, Corners, 0.3)], Kill(0.60), Some("INCOMING")),
            wave(vec![g(FW, 2, Pincer, 0.0)], Kill(0.50), None),
        ]),
        room("early_mixed_2", (3, 4), vec![
            wave(vec![g(BL, 3, Corners, 0.0), g(SP, 1, LineTop, 0.3)], Start, None),
            wave(vec![g(BL, 4, Surround, 0.0), g(FW, 1, BehindPlayer, 0.5)], Kill(0.50), Some("WAVE 2")),
        ]),
        room("early_mixed_3", (3, 4), vec![
            wave(vec![g(FW, 2, Pincer, 0.0), g(BL, 2, Random, 0.3)], Start, None),
            wave(vec![g(BL, 3, Ring, 0.0), g(SP, 1, BehindPlayer, 0.3)], Kill(0.60), None),
        ]),
        // Mid pressure
        room("mid_pressure_1", (5, 7), vec![
            wave(vec![g(BL, 5, Surround, 0.0), g(SP, 3, Corners, 0.3)], Start, None),
            wave(vec![g(OC, 2, LineTop, 0.0), g(BL, 3, BehindPlayer, 0.5)], Kill(0.5), Some("WAVE 2")),
            wave(
                vec![g(FW, 2, Corners, 0.0), g(SP, 2, Random, 0.3), g(BL, 3, Surround, 0.5)],
                Kill(0.5),
                Some("WAVE 3"),
            ),
        ]),
        room("mid_pressure_2", (5, 7), vec![
            wave(
                vec![g(BL, 4, Corners, 0.0), g(SP, 2, LineTop, 0.3), g(FW, 1, Random, 0.5)],
                Start,
                None,
            ),
            wave(
                vec![g(OC, 2, Pincer, 0.0), g(SN, 1, Corners, 0.3), g(BL, 3, Ring, 0.3)],
                Kill(0.5),
                Some("WAVE 2"),
            ),
        ]),
        room("mid_pressure_3", (5, 7), vec![
            wave(
                vec![g(OC, 1, Random, 0.0), g(SP, 2, LineTop, 0.2), g(BL, 4, Surround, 0.3)],
                Start,
                None,
            ),
            wave(
                vec![g(FW, 1, BehindPlayer, 0.0), g(SN, 1, Corners, 0.3), g(BL, 3, LineBottom, 0.5)],
                Kill(0.6),
                Some("INCOMING"),
            ),
            wave(vec![g(OC, 2, Corners, 0.0), g(SP, 2, BehindPlayer, 0.3)], Kill(0.4), Some("FINAL WAVE")),
        ]),
        // Late intensity
        room("late_intense_1", (8, 10), vec![
            wave(
                vec![g(BL, 4, Surround, 0.0), g(SP, 3, LineTop, 0.2), g(SN, 2, Corners, 0.5)],
                Start,
                None,
            ),
            wave(vec![g(OC, 2, Pincer, 0.0), g(BL, 3, BehindPlayer, 0.3)], Timer(8.0), Some("REINFORCEMENTS")),
            wave(
                vec![g(FW, 2, Surround, 0.0), g(SP, 3, BehindPlayer, 0.3), g(BL, 4, Ring, 0.5)],
                Kill(0.4),
                Some("FINAL WAVE"),
            ),
        ]),
        room("late_intense_2", (8, 10), vec![
            wave(
                vec![g(OC, 2, LineTop, 0.0), g(SP, 2, Corners, 0.2), g(BL, 4, Surround, 0.3)],
                Start,
                None,
            ),
            wave(
                vec![g(FW, 2, Pincer, 0.0), g(SN, 1, Corners, 0.3), g(SP, 2, BehindPlayer, 0.3)],
                Kill(0.5),
                Some("WAVE 2"),
            ),
            wave(vec![g(OC, 2, BehindPlayer, 0.0), g(BL, 3, Surround, 0.3)], Timer(6.0), Some("FINAL WAVE")),
        ]),
        room("late_intense_3", (8, 10), vec![
            wave(
                vec![
                    g(BL, 3, Surround, 0.0),
                    g(SP, 2, LineBottom, 0.2),
                    g(SN, 1, Corners, 0.3),
                    g(FW, 2, Corners, 0.3),
                ],
                Start,
                None,
            ),
            wave(vec![g(OC, 3, Ring, 0.0), g(SP, 2, Random, 0.3)], Timer(6.0), Some("INCOMING")),
            wave(
                vec![g(BL, 5, BehindPlayer, 0.0), g(SN, 1, Random, 0.3), g(FW, 1, Random, 0.5)],
                Kill(0.4),
                Some("FINAL WAVE"),
            ),
        ]),
        // Endgame
        room("endgame_1", (11, OPEN_ENDED_DEPTH), vec![
            wave(
                vec![g(SP, 4, Corners, 0.0), g(SN, 2, LineTop, 0.2), g(BL, 5, Surround, 0.3)],
                Start,
                None,
            ),
            wave(
                vec![g(OC, 3, Pincer, 0.0), g(SP, 2, BehindPlayer, 0.3), g(FW, 1, Random, 0.5)],
                Timer(6.0),
                Some("WAVE 2"),
            ),
            wave(
                vec![g(BL, 4, BehindPlayer, 0.0), g(SN, 2, Corners, 0.3), g(SP, 3, LineBottom, 0.5)],
                Kill(0.4),
                Some("WAVE 3"),
            ),
            wave(vec![g(OC, 2, Corners, 0.0), g(BL, 6, Ring, 0.3)], Timer(5.0), Some("FINAL WAVE")),
        ]),
        room("endgame_2", (11, OPEN_ENDED_DEPTH), vec![
            wave(
                vec![
                    g(OC, 3, LineTop, 0.0),
                    g(SN, 3, Corners, 0.2),
                    g(SP, 3, LineBottom, 0.3),
                    g(BL, 4, Surround, 0.3),
                ],
                Start,
                None,
            ),
            wave(vec![g(FW, 2, Pincer, 0.0), g(BL, 3, BehindPlayer, 0.3)], Kill(0.5), Some("WAVE 2")),
            wave(
                vec![g(OC, 2, Ring, 0.0), g(SP, 3, BehindPlayer, 0.3), g(BL, 4, Corners, 0.5)],
                Timer(5.0),
                Some("WAVE 3"),
            ),
            wave(
                vec![g(FW, 3, Surround, 0.0), g(SN, 2, Corners, 0.2), g(OC, 2, BehindPlayer, 0.3)],
                Kill(0.3),
                Some("FINAL WAVE"),
            ),
        ]),
        room("endgame_3", (11, OPEN_ENDED_DEPTH), vec![
            wave(
                vec![
                    g(FW, 2, LineTop, 0.0),
                    g(SN, 2, Corners, 0.2),
                    g(SP, 3, LineBottom, 0.3),
                    g(BL, 5, Surround, 0.3),
                ],
                Start,
                None,
            ),
            wave(vec![g(OC, 3, BehindPlayer, 0.0), g(SP, 2, Random, 0.3)], Timer(7.0), Some("WAVE 2")),
            wave(
                vec![g(BL, 5, Ring, 0.0), g(SN, 1, Corners, 0.3), g(FW, 1, Random, 0.3)],
                Kill(0.4),
                Some("WAVE 3"),
            ),
            wave(
                vec![g(OC, 3, Pincer, 0.0), g(SP, 3, LineBottom, 0.3), g(BL, 4, Surround, 0.5)],
                Timer(5.0),
                Some("FINAL WAVE"),
            ),
        ]),
    ]
}
