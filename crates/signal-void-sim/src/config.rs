//! Simulation configuration.
//!
//! Every field has a default, so a partial JSON document is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use signal_void_core::constants::{
    DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_MARGIN, DEFAULT_ARENA_WIDTH, MAX_TICKS_PER_FRAME,
};

use crate::error::{ConfigError, ConfigResult};

/// Arena extent in cells plus the wall margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaBounds {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            margin: DEFAULT_ARENA_MARGIN,
        }
    }
}

impl ArenaBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn width_f(&self) -> f64 {
        self.width as f64
    }

    pub fn height_f(&self) -> f64 {
        self.height as f64
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width_f() / 2.0, self.height_f() / 2.0)
    }

    /// Clamp a point to `[margin, extent - margin - 1]` on each axis.
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        let m = self.margin as f64;
        (
            x.clamp(m, (self.width_f() - m - 1.0).max(m)),
            y.clamp(m, (self.height_f() - m - 1.0).max(m)),
        )
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let interior = |extent: u32| extent > 2 * self.margin + 2;
        if !interior(self.width) || !interior(self.height) {
            return Err(ConfigError::Arena {
                width: self.width,
                height: self.height,
                margin: self.margin,
            });
        }
        Ok(())
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub arena: ArenaBounds,
    /// Depth of the first room.
    pub starting_depth: u32,
    /// Catch-up cap for the fixed-step clock.
    pub max_ticks_per_frame: u32,
    /// Real-time multiplier applied by the fixed-step clock.
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: ArenaBounds::default(),
            starting_depth: 1,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
            time_scale: 1.0,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.arena.validate()?;
        if self.starting_depth == 0 {
            return Err(ConfigError::Setting("starting_depth must be at least 1".into()));
        }
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::Setting(
                "max_ticks_per_frame must be at least 1".into(),
            ));
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigError::Setting(format!(
                "time_scale {} is not a non-negative number",
                self.time_scale
            )));
        }
        Ok(())
    }
}
