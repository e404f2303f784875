//! Probabilistic ordered multiset with stable handles.
//!
//! A skip list keeps values sorted in a linked chain and overlays randomly
//! chosen express lanes, so insert, lookup and removal take expected
//! O(log n) time without any rebalancing. Once positioned, stepping to the
//! next or previous value is O(1).
//!
//! # Design Philosophy
//!
//! The list owns its nodes in a slot arena and hands out [`Handle`]s instead
//! of references:
//!
//! ```text
//! SkipList      - header lanes, active level, level generator
//!     │
//!     └── Arena - owns every node, stable slots, generation per slot
//!
//! Handle { arena, slot, generation }  - Copy, checked on every use
//! ```
//!
//! Benefits:
//! - **Stable positions**: a handle keeps naming its node while other nodes
//!   come and go
//! - **Checked staleness**: a handle to a removed node resolves to `None`,
//!   never to whatever reuses its slot
//! - **Exact removal**: [`SkipList::remove`] takes out one specific node,
//!   even inside a run of equal values
//! - **Slot reuse**: freed slots are recycled, so steady-state churn does not
//!   grow the arena
//!
//! # Quick Start
//!
//! ```
//! use nexus_skiplist::SkipList;
//!
//! let mut list = SkipList::new();
//! for v in [5, 1, 4, 1, 3] {
//!     list.insert(v);
//! }
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 1, 3, 4, 5]);
//!
//! // Position with find, then walk
//! let four = list.find(&4).unwrap();
//! assert_eq!(list.next(four).and_then(|h| list.get(h)), Some(&5));
//! assert_eq!(list.prev(four).and_then(|h| list.get(h)), Some(&3));
//!
//! // Delete by value takes the earliest equal value
//! assert_eq!(list.delete(&1), Some(1));
//! assert_eq!(list.len(), 4);
//! ```
//!
//! # Tuning
//!
//! ```
//! use nexus_skiplist::SkipListBuilder;
//!
//! let mut list = SkipListBuilder::default()
//!     .max_level(16)
//!     .probability(0.5)
//!     .capacity(1024)
//!     .seed(42)
//!     .build::<u32>()
//!     .unwrap();
//!
//! list.insert(7);
//! assert_eq!(list.max_level(), 16);
//! ```
//!
//! | Parameter | Default | Effect |
//! |-----------|---------|--------|
//! | `probability` | 0.25 | Share of nodes promoted one more level |
//! | `max_level` | 32 | Ceiling on node height, at most [`LEVEL_LIMIT`] |
//! | `capacity` | 0 | Node slots allocated up front |
//! | `seed` | OS | Seed of the list's own RNG |
//!
//! # Ordering
//!
//! Values are ordered by their [`Ord`] impl. Use a newtype or
//! [`core::cmp::Reverse`] for any other order. Equal values are all kept and
//! iterate in insertion order.

#![warn(missing_docs)]

mod arena;
pub mod builder;
mod level;
pub mod skiplist;

pub use arena::Handle;
pub use builder::{ConfigError, SkipListBuilder};
pub use level::{DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, LEVEL_LIMIT};
pub use skiplist::{Iter, Levels, SkipList};
