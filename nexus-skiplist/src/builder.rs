//! Construction parameters for [`SkipList`].

use core::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_core::RngCore;

use crate::level::{DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, LevelGenerator};
use crate::skiplist::SkipList;

// =============================================================================
// Errors
// =============================================================================

/// Error returned when a skip list is built with invalid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The ceiling must allow at least the base level.
    ZeroMaxLevel,
    /// The ceiling exceeds [`LEVEL_LIMIT`](crate::LEVEL_LIMIT).
    MaxLevelTooLarge {
        /// Requested ceiling.
        max_level: usize,
        /// Largest accepted ceiling.
        limit: usize,
    },
    /// The promotion probability is not within `0.0..=1.0`.
    InvalidProbability(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMaxLevel => write!(f, "max level must be at least 1"),
            ConfigError::MaxLevelTooLarge { max_level, limit } => {
                write!(f, "max level ({max_level}) exceeds limit ({limit})")
            }
            ConfigError::InvalidProbability(p) => {
                write!(f, "promotion probability ({p}) must be within 0.0..=1.0")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`SkipList`].
///
/// # Example
///
/// ```
/// use nexus_skiplist::SkipListBuilder;
///
/// let mut list = SkipListBuilder::default()
///     .max_level(16)
///     .probability(0.5)
///     .seed(7)
///     .build::<u64>()
///     .unwrap();
///
/// list.insert(3);
/// list.insert(1);
/// assert_eq!(list.first(), Some(&1));
/// ```
#[derive(Debug, Clone)]
pub struct SkipListBuilder {
    max_level: usize,
    probability: f64,
    capacity: usize,
    seed: Option<u64>,
}

impl Default for SkipListBuilder {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            capacity: 0,
            seed: None,
        }
    }
}

impl SkipListBuilder {
    /// Ceiling on node height. Default: 32.
    ///
    /// Choose it so that `p^max_level * n` stays well below 1 for the largest
    /// expected `n`.
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Probability of promoting a node one more level. Default: 0.25.
    ///
    /// `1.0` sends every node to the ceiling and `0.0` keeps the list flat.
    /// Both are accepted, mostly for testing.
    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Pre-allocate node slots. Default: 0 (grow on demand).
    pub fn capacity(mut self, nodes: usize) -> Self {
        self.capacity = nodes;
        self
    }

    /// Seed the list's RNG for reproducible layouts. Default: seeded from the OS.
    ///
    /// Only used by [`build`](Self::build).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds a list driven by its own [`SmallRng`].
    pub fn build<T: Ord>(self) -> Result<SkipList<T, SmallRng>, ConfigError> {
        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.build_with_rng(rng)
    }

    /// Builds a list driven by the given RNG.
    pub fn build_with_rng<T: Ord, R: RngCore>(self, rng: R) -> Result<SkipList<T, R>, ConfigError> {
        let levels = LevelGenerator::new(rng, self.max_level, self.probability)
            .inspect_err(|err| log::debug!("rejected skip list config: {err}"))?;
        Ok(SkipList::from_parts(levels, self.capacity))
    }
}
