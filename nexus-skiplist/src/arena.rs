//! Generation-tagged slot arena owning skip list nodes.
//!
//! Nodes live in a growable vector of slots. Links between nodes are bare slot
//! indices (`u32`, with [`NIL`] as the null link), while the [`Handle`]s given
//! to callers also carry the slot generation and the arena id. Releasing a slot
//! bumps its generation, so a handle to a removed node stops resolving instead
//! of aliasing whatever node reuses the slot later.
//!
//! ```text
//! slots:  [ g0 | A ] [ g3 | - ] [ g1 | C ] [ g0 | D ]
//! free:   [ 1 ]
//!
//! Handle { slot: 1, generation: 2 }  ->  None   (slot released since)
//! Handle { slot: 2, generation: 1 }  ->  C
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

/// Null link. In a search trail it stands for the header sentinel.
pub(crate) const NIL: u32 = u32::MAX;

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(0);

// =============================================================================
// Handle
// =============================================================================

/// Opaque reference to a node of a [`SkipList`](crate::SkipList).
///
/// Handles are `Copy` and cheap to keep around. A handle resolves only while
/// its node is alive in the list that returned it. Once the node is removed or
/// the list is cleared, every operation taking the handle returns `None`.
/// Handles from one list never resolve in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    arena: u32,
    slot: u32,
    generation: u32,
}

impl Handle {
    /// Returns the arena slot this handle points at.
    ///
    /// Slots are reused after removal, so the slot alone does not identify a
    /// node.
    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }
}

// =============================================================================
// Arena
// =============================================================================

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Growable slot storage with stable indices and LIFO slot reuse.
pub(crate) struct Arena<T> {
    id: u32,
    slots: Vec<Slot<T>>,
    /// Vacant slot indices. The last entry is reused first.
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    /// Creates an arena with room for `capacity` nodes before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of slots allocated so far, occupied or not.
    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` and returns its slot.
    ///
    /// # Panics
    ///
    /// Panics if the arena would need more than `u32::MAX - 1` slots.
    pub(crate) fn insert(&mut self, value: T) -> u32 {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize].value = Some(value);
                slot
            }
            None => {
                let slot = self.slots.len();
                assert!(slot < NIL as usize, "arena slot index space exhausted");
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                slot as u32
            }
        };
        self.len += 1;
        slot
    }

    /// Takes the value out of an occupied slot and retires the slot's generation.
    pub(crate) fn remove(&mut self, slot: u32) -> T {
        let entry = &mut self.slots[slot as usize];
        let value = entry.value.take().expect("removed a vacant slot");
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);
        self.len -= 1;
        value
    }

    #[inline]
    pub(crate) fn get(&self, slot: u32) -> &T {
        self.slots[slot as usize]
            .value
            .as_ref()
            .expect("link to a vacant slot")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, slot: u32) -> &mut T {
        self.slots[slot as usize]
            .value
            .as_mut()
            .expect("link to a vacant slot")
    }

    /// Stamps a handle for an occupied slot.
    #[inline]
    pub(crate) fn handle(&self, slot: u32) -> Handle {
        Handle {
            arena: self.id,
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    /// Maps a handle back to its slot, or `None` if it is stale or foreign.
    #[inline]
    pub(crate) fn resolve(&self, handle: Handle) -> Option<u32> {
        if handle.arena != self.id {
            return None;
        }
        let entry = self.slots.get(handle.slot as usize)?;
        (entry.generation == handle.generation && entry.value.is_some()).then_some(handle.slot)
    }

    /// Drops every value and retires every occupied generation.
    ///
    /// Slots stay allocated for reuse. Returns how many values were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let released = self.len;
        self.free.clear();
        for (i, entry) in self.slots.iter_mut().enumerate().rev() {
            if entry.value.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
            }
            self.free.push(i as u32);
        }
        self.len = 0;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut arena: Arena<u64> = Arena::with_capacity(4);

        let slot = arena.insert(42);
        assert_eq!(arena.len(), 1);
        assert_eq!(*arena.get(slot), 42);

        *arena.get_mut(slot) = 43;
        assert_eq!(arena.remove(slot), 43);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn handle_resolves_while_live() {
        let mut arena: Arena<u64> = Arena::with_capacity(4);

        let slot = arena.insert(7);
        let handle = arena.handle(slot);
        assert_eq!(handle.slot(), slot);
        assert_eq!(arena.resolve(handle), Some(slot));

        arena.remove(slot);
        assert_eq!(arena.resolve(handle), None);
    }

    #[test]
    fn slot_reuse_retires_old_handle() {
        let mut arena: Arena<u64> = Arena::with_capacity(4);

        let first = arena.insert(1);
        let stale = arena.handle(first);
        arena.remove(first);

        // LIFO reuse hands back the same slot with a new generation
        let second = arena.insert(2);
        assert_eq!(second, first);

        let fresh = arena.handle(second);
        assert_ne!(fresh, stale);
        assert_eq!(arena.resolve(stale), None);
        assert_eq!(arena.resolve(fresh), Some(second));
    }

    #[test]
    fn foreign_handle_never_resolves() {
        let mut a: Arena<u64> = Arena::with_capacity(4);
        let mut b: Arena<u64> = Arena::with_capacity(4);

        let slot_a = a.insert(1);
        let slot_b = b.insert(1);
        assert_eq!(slot_a, slot_b);

        assert_eq!(b.resolve(a.handle(slot_a)), None);
        assert_eq!(a.resolve(b.handle(slot_b)), None);
    }

    #[test]
    fn out_of_range_handle() {
        let mut arena: Arena<u64> = Arena::with_capacity(4);
        let slot = arena.insert(1);
        let mut handle = arena.handle(slot);
        handle.slot = 99;

        assert_eq!(arena.resolve(handle), None);
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut arena: Arena<u64> = Arena::with_capacity(4);

        let mut handles = Vec::new();
        for v in 0..3 {
            let slot = arena.insert(v);
            handles.push(arena.handle(slot));
        }
        assert_eq!(arena.clear(), 3);
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.slot_count(), 3);

        for handle in handles {
            assert_eq!(arena.resolve(handle), None);
        }

        // Slots are reused lowest first after a clear
        assert_eq!(arena.insert(10), 0);
        assert_eq!(arena.insert(11), 1);
        assert_eq!(arena.slot_count(), 3);
    }

    #[test]
    fn clear_drops_values() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

        struct DropCounter;
        impl Drop for DropCounter {
            fn drop(&mut self) {
                DROP_COUNT.fetch_add(1, Ordering::SeqCst);
            }
        }

        DROP_COUNT.store(0, Ordering::SeqCst);

        let mut arena: Arena<DropCounter> = Arena::with_capacity(8);
        arena.insert(DropCounter);
        arena.insert(DropCounter);
        let slot = arena.insert(DropCounter);
        drop(arena.remove(slot));
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 1);

        arena.clear();
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 3);

        arena.insert(DropCounter);
        drop(arena);
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 4);
    }
}
