//! Entity store: generational ids, per-kind component maps and deferred destruction.

pub mod entity;
pub mod store;

pub use entity::EntityAllocator;
pub use store::{Component, ComponentKind, ComponentMap, World};
