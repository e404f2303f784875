//! Skip list - a probabilistic ordered multiset.
//!
//! A skip list keeps values sorted in a base linked chain (level 0) and lays
//! randomly chosen "express lanes" over it. Searches start on the highest
//! lane and drop down whenever the next hop would overshoot, giving O(log n)
//! expected insert, lookup and removal with no rebalancing.
//!
//! ```text
//! Level 2:  HEAD ─────────────────────► 30 ─────────────────► NIL
//!             │                          │
//! Level 1:  HEAD ──────► 10 ──────────► 30 ──────► 50 ──────► NIL
//!             │           │              │          │
//! Level 0:  HEAD ──► 5 ──► 10 ──► 20 ──► 30 ──► 40 ──► 50 ──► NIL
//!                 ◄──   ◄──    ◄──    ◄──    ◄──    ◄──
//! ```
//!
//! # Design
//!
//! - **Multiset**: equal values are kept, in insertion order. [`find`] and
//!   [`delete`] always reach the earliest inserted one.
//! - **Header**: the header sentinel is the `head` array of lane entry points.
//!   `NIL` in a search trail stands for it.
//! - **Handles**: nodes live in a generation-tagged arena. [`insert`], [`find`],
//!   [`front`] and friends return [`Handle`]s that stop resolving once their
//!   node is removed, so stepping from a stale handle yields `None`.
//! - **Level 0 is doubly linked**: every node keeps one backward link, which
//!   makes [`prev`] and reverse iteration O(1) per step.
//! - **Active level only grows**: removing the tallest nodes leaves empty upper
//!   lanes in place until [`clear`]. An empty lane costs one header slot.
//!
//! [`find`]: SkipList::find
//! [`delete`]: SkipList::delete
//! [`insert`]: SkipList::insert
//! [`front`]: SkipList::front
//! [`prev`]: SkipList::prev
//! [`clear`]: SkipList::clear
//!
//! # Example
//!
//! ```
//! use nexus_skiplist::SkipList;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut list = SkipList::with_rng(SmallRng::seed_from_u64(12345));
//! list.insert(30);
//! list.insert(10);
//! let twenty = list.insert(20);
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
//!
//! let next = list.next(twenty).unwrap();
//! assert_eq!(list.get(next), Some(&30));
//!
//! assert_eq!(list.remove(twenty), Some(20));
//! assert_eq!(list.get(twenty), None);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_core::RngCore;
use smallvec::SmallVec;

use crate::arena::{Arena, Handle, NIL};
use crate::level::{DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, LevelGenerator};

/// Predecessor at each level, recorded on the way down. `NIL` is the header.
type Trail = SmallVec<[u32; DEFAULT_MAX_LEVEL]>;

// ============================================================================
// Node
// ============================================================================

struct Node<T> {
    value: T,
    /// `forward[i]` is the next node on level `i`. Length is the node's height.
    forward: Box<[u32]>,
    /// Previous node on level 0, `NIL` for the first node.
    backward: u32,
}

// ============================================================================
// SkipList
// ============================================================================

/// A probabilistic ordered multiset.
///
/// # Type Parameters
///
/// - `T`: Value type, ordered by its [`Ord`] impl. Wrap it in a newtype or
///   [`core::cmp::Reverse`] for a different order.
/// - `R`: Random number generator used for level assignment. Each list owns
///   its own, so lists are seeded independently.
///
/// Construct with [`SkipList::new`], [`SkipList::with_rng`], or
/// [`SkipListBuilder`](crate::SkipListBuilder) to tune the promotion
/// probability and level ceiling.
pub struct SkipList<T, R = SmallRng> {
    nodes: Arena<Node<T>>,
    /// Header forward links, one per level up to the ceiling.
    head: Box<[u32]>,
    /// Last node on level 0, for O(1) `back()`.
    tail: u32,
    /// Number of levels in use. `head[i]` is `NIL` for every `i >= level`.
    level: usize,
    levels: LevelGenerator<R>,
}

impl<T: Ord> SkipList<T, SmallRng> {
    /// Creates an empty list with default parameters and an OS-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }
}

impl<T: Ord> Default for SkipList<T, SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord, R: RngCore> SkipList<T, R> {
    /// Creates an empty list with default parameters (p = 0.25, 32 levels).
    pub fn with_rng(rng: R) -> Self {
        let levels = LevelGenerator::new(rng, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY)
            .expect("default level parameters are valid");
        Self::from_parts(levels, 0)
    }

    pub(crate) fn from_parts(levels: LevelGenerator<R>, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            head: vec![NIL; levels.max_level()].into_boxed_slice(),
            tail: NIL,
            level: 1,
            levels,
        }
    }

    /// Inserts a value and returns a handle to its node.
    ///
    /// Equal values are allowed. The new node goes after every value already
    /// equal to it, so equal values iterate in insertion order.
    pub fn insert(&mut self, value: T) -> Handle {
        let update = self.trail(&value, true);

        let height = self.levels.random_level();
        if height > self.level {
            // update[self.level..height] is NIL already: the header is the
            // predecessor on lanes nothing has reached yet
            log::trace!("skip list active level {} -> {}", self.level, height);
            self.level = height;
        }

        let forward: Box<[u32]> = (0..height).map(|i| self.forward(update[i], i)).collect();
        let backward = update[0];
        let next = forward[0];

        let slot = self.nodes.insert(Node {
            value,
            forward,
            backward,
        });

        for (i, &prev) in update.iter().take(height).enumerate() {
            self.set_forward(prev, i, slot);
        }

        if next == NIL {
            self.tail = slot;
        } else {
            self.nodes.get_mut(next).backward = slot;
        }

        self.nodes.handle(slot)
    }

    /// Returns the earliest inserted node equal to `value`, or `None`.
    ///
    /// Iterating forward from it visits the remaining equal values before any
    /// greater one.
    pub fn find(&self, value: &T) -> Option<Handle> {
        let mut current = NIL;

        for i in (0..self.level).rev() {
            let mut next = self.forward(current, i);
            while next != NIL {
                let node = self.nodes.get(next);
                if node.value >= *value {
                    break;
                }
                current = next;
                next = node.forward[i];
            }
        }

        let candidate = self.forward(current, 0);
        if candidate != NIL && self.nodes.get(candidate).value.cmp(value).is_eq() {
            Some(self.nodes.handle(candidate))
        } else {
            None
        }
    }

    /// Returns `true` if some value equal to `value` is stored.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Removes the earliest inserted value equal to `value` and returns it.
    ///
    /// Returns `None`, leaving the list untouched, if there is no match.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        let update = self.trail(value, false);

        let candidate = self.forward(update[0], 0);
        if candidate == NIL || self.nodes.get(candidate).value.cmp(value).is_ne() {
            return None;
        }

        Some(self.unlink(candidate, &update))
    }

    /// Removes the node behind `handle` and returns its value.
    ///
    /// Unlike [`delete`](Self::delete), this removes that exact node even
    /// when it sits in the middle of a run of equal values. Returns `None` if
    /// the handle is stale or came from another list.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.nodes.resolve(handle)?;
        let update = self.trail_to(slot);
        Some(self.unlink(slot, &update))
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Descends from the top active level, recording the last node visited on
    /// each level.
    ///
    /// Advances past values less than `value`, and past equal values too when
    /// `past_equal` is set. Entries above the active level stay `NIL`.
    fn trail(&self, value: &T, past_equal: bool) -> Trail {
        let mut update: Trail = SmallVec::from_elem(NIL, self.levels.max_level());
        let mut current = NIL;

        for i in (0..self.level).rev() {
            let mut next = self.forward(current, i);
            while next != NIL {
                let node = self.nodes.get(next);
                let advance = match node.value.cmp(value) {
                    Ordering::Less => true,
                    Ordering::Equal => past_equal,
                    Ordering::Greater => false,
                };
                if !advance {
                    break;
                }
                current = next;
                next = node.forward[i];
            }
            update[i] = current;
        }

        update
    }

    /// Predecessors of one specific node on every level it occupies.
    ///
    /// The value search lands in front of the first equal node; from there
    /// each upper lane is walked across the equal run to this node. Level 0
    /// comes straight from the backward link.
    fn trail_to(&self, slot: u32) -> Trail {
        let node = self.nodes.get(slot);
        let mut update = self.trail(&node.value, false);
        update[0] = node.backward;

        for i in 1..node.forward.len() {
            let mut prev = update[i];
            loop {
                let next = self.forward(prev, i);
                assert!(next != NIL, "node missing from level {i}");
                if next == slot {
                    break;
                }
                prev = next;
            }
            update[i] = prev;
        }

        update
    }
}

impl<T, R> SkipList<T, R> {
    /// Returns the number of values in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the list holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Returns the number of levels currently in use (at least 1).
    ///
    /// Grows as taller nodes arrive and only resets on [`clear`](Self::clear).
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the ceiling on node height.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.head.len()
    }

    /// Returns the promotion probability.
    #[inline]
    pub fn probability(&self) -> f64 {
        self.levels.probability()
    }

    /// Returns how many nodes are linked on the given level.
    ///
    /// Walks the lane, so this is O(nodes on the lane).
    pub fn level_len(&self, level: usize) -> usize {
        if level >= self.head.len() {
            return 0;
        }
        let mut count = 0;
        let mut next = self.head[level];
        while next != NIL {
            count += 1;
            next = self.nodes.get(next).forward[level];
        }
        count
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Returns the first (smallest) node, or `None` if empty.
    #[inline]
    pub fn front(&self) -> Option<Handle> {
        self.handle_of(self.head[0])
    }

    /// Returns the last (largest) node, or `None` if empty.
    ///
    /// O(1) via the cached tail.
    #[inline]
    pub fn back(&self) -> Option<Handle> {
        self.handle_of(self.tail)
    }

    /// Returns the node after `handle` on the base level.
    ///
    /// `None` at the end, or if the handle is stale or foreign.
    #[inline]
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        let slot = self.nodes.resolve(handle)?;
        self.handle_of(self.nodes.get(slot).forward[0])
    }

    /// Returns the node before `handle` on the base level.
    ///
    /// `None` at the start, or if the handle is stale or foreign.
    #[inline]
    pub fn prev(&self, handle: Handle) -> Option<Handle> {
        let slot = self.nodes.resolve(handle)?;
        self.handle_of(self.nodes.get(slot).backward)
    }

    /// Returns the value behind `handle`, or `None` if it is stale or foreign.
    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.nodes.resolve(handle)?;
        Some(&self.nodes.get(slot).value)
    }

    /// Returns the smallest value, or `None` if empty.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        (self.head[0] != NIL).then(|| &self.nodes.get(self.head[0]).value)
    }

    /// Returns the largest value, or `None` if empty.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        (self.tail != NIL).then(|| &self.nodes.get(self.tail).value)
    }

    /// Removes every value and returns the list, empty, for reuse.
    ///
    /// Every handle issued before the call stops resolving.
    pub fn clear(&mut self) -> &mut Self {
        let released = self.nodes.clear();
        self.head.fill(NIL);
        self.tail = NIL;
        self.level = 1;
        log::debug!(
            "skip list cleared, {released} nodes released, {} slots kept",
            self.nodes.slot_count()
        );
        self
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns a double-ended iterator over the values in order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, R> {
        Iter {
            list: self,
            front: self.head[0],
            back: self.tail,
        }
    }

    /// Returns an iterator from the node behind `handle` to the end.
    ///
    /// Empty if the handle is stale or foreign.
    pub fn iter_from(&self, handle: Handle) -> Iter<'_, T, R> {
        match self.nodes.resolve(handle) {
            Some(slot) => Iter {
                list: self,
                front: slot,
                back: self.tail,
            },
            None => Iter {
                list: self,
                front: NIL,
                back: NIL,
            },
        }
    }

    /// Returns a [`Display`](fmt::Display) adapter that prints every active
    /// lane, one per line.
    ///
    /// ```text
    /// LEVEL[0]: 1 -> 2 -> 3 -> NULL
    /// LEVEL[1]: 2 -> NULL
    /// ```
    #[inline]
    pub fn levels(&self) -> Levels<'_, T, R> {
        Levels { list: self }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    #[inline]
    fn handle_of(&self, slot: u32) -> Option<Handle> {
        (slot != NIL).then(|| self.nodes.handle(slot))
    }

    /// Forward link of `slot` on `level`, where `NIL` means the header.
    #[inline]
    fn forward(&self, slot: u32, level: usize) -> u32 {
        if slot == NIL {
            self.head[level]
        } else {
            self.nodes.get(slot).forward[level]
        }
    }

    #[inline]
    fn set_forward(&mut self, slot: u32, level: usize, to: u32) {
        if slot == NIL {
            self.head[level] = to;
        } else {
            self.nodes.get_mut(slot).forward[level] = to;
        }
    }

    /// Splices `slot` out of every level using its predecessors and frees it.
    fn unlink(&mut self, slot: u32, update: &[u32]) -> T {
        let node = self.nodes.remove(slot);

        for (i, &next) in node.forward.iter().enumerate() {
            self.set_forward(update[i], i, next);
        }

        let next = node.forward[0];
        if next == NIL {
            self.tail = node.backward;
        } else {
            self.nodes.get_mut(next).backward = node.backward;
        }

        node.value
    }
}

impl<T: fmt::Debug, R> fmt::Debug for SkipList<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Ord, R: RngCore> Extend<T> for SkipList<T, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T, SmallRng> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<'a, T, R> IntoIterator for &'a SkipList<T, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, R>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// An iterator over values in order.
///
/// Walks the base level in either direction. The two ends meet without
/// revisiting a node.
pub struct Iter<'a, T, R> {
    list: &'a SkipList<T, R>,
    front: u32,
    back: u32,
}

impl<'a, T, R> Iterator for Iter<'a, T, R> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == NIL {
            return None;
        }
        let list = self.list;
        let node = list.nodes.get(self.front);
        if self.front == self.back {
            self.front = NIL;
            self.back = NIL;
        } else {
            self.front = node.forward[0];
        }
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.front == NIL {
            (0, Some(0))
        } else {
            (1, Some(self.list.len()))
        }
    }
}

impl<T, R> DoubleEndedIterator for Iter<'_, T, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back == NIL {
            return None;
        }
        let list = self.list;
        let node = list.nodes.get(self.back);
        if self.front == self.back {
            self.front = NIL;
            self.back = NIL;
        } else {
            self.back = node.backward;
        }
        Some(&node.value)
    }
}

impl<T, R> FusedIterator for Iter<'_, T, R> {}

/// Lane-by-lane dump of a list. See [`SkipList::levels`].
pub struct Levels<'a, T, R> {
    list: &'a SkipList<T, R>,
}

impl<T: fmt::Display, R> fmt::Display for Levels<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in 0..self.list.level {
            write!(f, "LEVEL[{level}]: ")?;
            let mut next = self.list.head[level];
            while next != NIL {
                let node = self.list.nodes.get(next);
                write!(f, "{} -> ", node.value)?;
                next = node.forward[level];
            }
            writeln!(f, "NULL")?;
        }
        Ok(())
    }
}
