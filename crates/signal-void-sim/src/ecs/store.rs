//! Component storage and the entity store.
//!
//! Every component kind gets its own sparse map keyed by entity id. The set
//! of kinds is closed and generated by `define_components!`, so clearing an
//! entity and kind-indexed queries need no reflection.

use std::collections::{BTreeMap, BTreeSet};

use signal_void_core::components::*;
use signal_void_core::types::{EntityId, Position, Velocity};

use super::entity::EntityAllocator;

/// Sparse per-kind storage. Iteration is in ascending id order.
#[derive(Debug, Clone)]
pub struct ComponentMap<T> {
    items: BTreeMap<EntityId, T>,
}

impl<T> Default for ComponentMap<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<T> ComponentMap<T> {
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        self.items.insert(id, value)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.items.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.items.iter().map(|(id, v)| (*id, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.items.iter_mut().map(|(id, v)| (*id, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.items.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A type stored in one of the world's component maps.
pub trait Component: Sized {
    const KIND: ComponentKind;
    fn map(world: &World) -> &ComponentMap<Self>;
    fn map_mut(world: &mut World) -> &mut ComponentMap<Self>;
}

macro_rules! define_components {
    ($($field:ident: $ty:ident),* $(,)?) => {
        /// Every component kind the store knows about.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ComponentKind {
            $($ty,)*
        }

        /// Entity store: allocator, pending-destruction set and one map per kind.
        #[derive(Debug, Default)]
        pub struct World {
            allocator: EntityAllocator,
            pending: BTreeSet<EntityId>,
            $(pub $field: ComponentMap<$ty>,)*
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$ty;

                fn map(world: &World) -> &ComponentMap<Self> {
                    &world.$field
                }

                fn map_mut(world: &mut World) -> &mut ComponentMap<Self> {
                    &mut world.$field
                }
            }
        )*

        impl World {
            fn clear_entity(&mut self, id: EntityId) {
                $(self.$field.remove(id);)*
            }

            pub fn has_kind(&self, id: EntityId, kind: ComponentKind) -> bool {
                match kind {
                    $(ComponentKind::$ty => self.$field.contains(id),)*
                }
            }

            pub fn remove_kind(&mut self, id: EntityId, kind: ComponentKind) {
                match kind {
                    $(ComponentKind::$ty => {
                        self.$field.remove(id);
                    })*
                }
            }

            fn kind_len(&self, kind: ComponentKind) -> usize {
                match kind {
                    $(ComponentKind::$ty => self.$field.len(),)*
                }
            }

            fn kind_keys(&self, kind: ComponentKind) -> Vec<EntityId> {
                match kind {
                    $(ComponentKind::$ty => self.$field.keys().collect(),)*
                }
            }
        }
    };
}

define_components! {
    // Physics
    positions: Position,
    velocities: Velocity,
    frictions: Friction,
    max_speeds: MaxSpeed,
    knockbacks: Knockback,
    collision_boxes: CollisionBox,
    gravities: Gravity,
    // Presentation
    renderables: Renderable,
    ghost_trails: GhostTrail,
    hit_flashes: HitFlash,
    // Health & status
    healths: Health,
    invulnerables: Invulnerable,
    stuns: Stunned,
    shields: Shield,
    contact_damages: ContactDamage,
    // Player
    controls: PlayerControlled,
    dashes: DashState,
    attacks: AttackState,
    attack_multipliers: AttackMultiplier,
    syntax_buffers: SyntaxBuffer,
    inventories: WeaponInventory,
    stats: PlayerStats,
    auto_fires: AutoFire,
    // Enemies
    ais: AiBehavior,
    drops: SyntaxDrop,
    // Transient entities
    lifetimes: Lifetime,
    projectiles: Projectile,
    enemy_projectiles: EnemyProjectile,
    telegraphs: SpawnTelegraph,
    echo_strikes: EchoStrike,
    hazards: GroundHazard,
    shockwaves: Shockwave,
    // Tags
    players: Player,
    enemies: Enemy,
    particles: Particle,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> EntityId {
        self.allocator.allocate()
    }

    /// Flag `id` for destruction. It stops being alive immediately; its
    /// components stay until the next `sweep`.
    pub fn destroy(&mut self, id: EntityId) {
        if self.allocator.is_alive(id) {
            self.pending.insert(id);
        }
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id) && !self.pending.contains(&id)
    }

    /// Reap every flagged entity: clear all of its components, then free the id.
    pub fn sweep(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let reaped = pending.len();
        for id in pending {
            self.clear_entity(id);
            self.allocator.deallocate(id);
        }
        reaped
    }

    /// Number of alive entities.
    pub fn len(&self) -> usize {
        self.allocator.len() - self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add<T: Component>(&mut self, id: EntityId, component: T) {
        debug_assert!(self.allocator.is_alive(id), "add on stale entity {id}");
        if !self.allocator.is_alive(id) {
            return;
        }
        T::map_mut(self).insert(id, component);
    }

    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        T::map_mut(self).remove(id)
    }

    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        T::map(self).get(id)
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        T::map_mut(self).get_mut(id)
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        T::map(self).contains(id)
    }

    /// Alive entities holding every listed kind, in ascending id order.
    /// An empty list yields every alive entity.
    pub fn query(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        let Some(&driver) = kinds.iter().min_by_key(|k| self.kind_len(**k)) else {
            return self
                .allocator
                .iter()
                .filter(|id| !self.pending.contains(id))
                .collect();
        };
        self.kind_keys(driver)
            .into_iter()
            .filter(|&id| self.is_alive(id) && kinds.iter().all(|&k| self.has_kind(id, k)))
            .collect()
    }
}
