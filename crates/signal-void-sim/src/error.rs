//! Errors raised while loading configuration and template data.
//!
//! Gameplay itself never fails: systems skip entities that lack a component
//! and unknown identifiers fall back to defaults.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config or template file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Arena too small to hold the margin plus a playable interior.
    #[error("invalid arena {width}x{height} with margin {margin}")]
    Arena { width: u32, height: u32, margin: u32 },

    #[error("invalid simulation setting: {0}")]
    Setting(String),

    /// Wave template data that cannot be played.
    #[error("template '{template}': {reason}")]
    Template { template: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
