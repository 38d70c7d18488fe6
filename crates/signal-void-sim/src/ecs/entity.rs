use signal_void_core::types::EntityId;

/// Generational index allocator. Freed indices are reused with a bumped
/// generation so stale ids never alias a new entity.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_indices: Vec<u32>,
    next_index: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> EntityId {
        if let Some(index) = self.free_indices.pop() {
            let idx = index as usize;
            self.alive[idx] = true;
            EntityId {
                index,
                generation: self.generations[idx],
            }
        } else {
            let index = self.next_index;
            self.next_index += 1;
            self.generations.push(0);
            self.alive.push(true);
            EntityId {
                index,
                generation: 0,
            }
        }
    }

    /// Release `id`. Returns false when the id was already stale.
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let idx = id.index as usize;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_indices.push(id.index);
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        let idx = id.index as usize;
        idx < self.generations.len() && self.alive[idx] && self.generations[idx] == id.generation
    }

    /// Number of live ids.
    pub fn len(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All live ids in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(|(i, _)| EntityId {
                index: i as u32,
                generation: self.generations[i],
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_deallocate() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert_eq!((e0.index, e0.generation), (0, 0));
        assert!(alloc.is_alive(e0));

        assert!(alloc.deallocate(e0));
        assert!(!alloc.is_alive(e0));
        assert!(!alloc.deallocate(e0), "double free is ignored");

        let reused = alloc.allocate();
        assert_eq!((reused.index, reused.generation), (0, 1));
        assert!(alloc.is_alive(reused));
        assert!(!alloc.is_alive(e0));
    }

    #[test]
    fn test_freed_slot_is_not_alive_before_reuse() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        alloc.deallocate(e0);
        let stale_next_gen = EntityId {
            index: 0,
            generation: 1,
        };
        assert!(!alloc.is_alive(stale_next_gen));
        assert!(alloc.is_empty());
    }

    #[test]
    fn test_iteration_is_ascending() {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<_> = (0..4).map(|_| alloc.allocate()).collect();
        alloc.deallocate(ids[1]);
        let live: Vec<u32> = alloc.iter().map(|e| e.index).collect();
        assert_eq!(live, vec![0, 2, 3]);
    }
}
