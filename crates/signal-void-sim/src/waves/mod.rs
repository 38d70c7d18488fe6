//! Room encounters: templates, spawn geometry and the wave director.

pub mod director;
pub mod patterns;
pub mod templates;

pub use director::{telegraph_system, SpawnAnchor, WaveDirector};
pub use templates::{RoomTemplate, SpawnGroup, TemplateSet, Wave};
