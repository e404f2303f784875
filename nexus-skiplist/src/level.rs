//! Random level assignment for new nodes.
//!
//! Every node starts at level 1 and is promoted one level at a time with
//! probability `p` until a trial fails or the ceiling is reached. The expected
//! population of level `i` is `n * p^(i-1)`, which is what gives the skip list
//! its expected O(log n) search path.
//!
//! | p    | ~links per node | typical ceiling |
//! |------|-----------------|-----------------|
//! | 0.5  | 2.0             | log2(max n)     |
//! | 0.25 | 1.33            | 32 (Redis)      |

use rand::Rng;
use rand::distr::Bernoulli;
use rand_core::RngCore;

use crate::builder::ConfigError;

/// Default ceiling on node height.
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// Default promotion probability.
pub const DEFAULT_PROBABILITY: f64 = 0.25;

/// Largest ceiling accepted at construction.
pub const LEVEL_LIMIT: usize = 64;

/// Geometric level generator driven by a caller-supplied RNG.
#[derive(Debug, Clone)]
pub(crate) struct LevelGenerator<R> {
    rng: R,
    promote: Bernoulli,
    probability: f64,
    max_level: usize,
}

impl<R: RngCore> LevelGenerator<R> {
    /// Validates the parameters and wraps `rng`.
    pub(crate) fn new(rng: R, max_level: usize, probability: f64) -> Result<Self, ConfigError> {
        if max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        if max_level > LEVEL_LIMIT {
            return Err(ConfigError::MaxLevelTooLarge {
                max_level,
                limit: LEVEL_LIMIT,
            });
        }
        let promote =
            Bernoulli::new(probability).map_err(|_| ConfigError::InvalidProbability(probability))?;

        Ok(Self {
            rng,
            promote,
            probability,
            max_level,
        })
    }

    /// Draws a height in `1..=max_level`.
    #[inline]
    pub(crate) fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.sample(self.promote) {
            level += 1;
        }
        level
    }
}

impl<R> LevelGenerator<R> {
    #[inline]
    pub(crate) fn max_level(&self) -> usize {
        self.max_level
    }

    #[inline]
    pub(crate) fn probability(&self) -> f64 {
        self.probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn make_rng() -> SmallRng {
        SmallRng::seed_from_u64(12345)
    }

    #[test]
    fn levels_stay_in_range() {
        let mut levels = LevelGenerator::new(make_rng(), 8, 0.5).unwrap();

        for _ in 0..10_000 {
            let level = levels.random_level();
            assert!((1..=8).contains(&level));
        }
    }

    #[test]
    fn geometric_decay() {
        let mut levels = LevelGenerator::new(make_rng(), 32, 0.5).unwrap();
        let mut counts = [0usize; 33];

        const DRAWS: usize = 100_000;
        for _ in 0..DRAWS {
            counts[levels.random_level()] += 1;
        }

        // About half of all nodes stop at level 1, a quarter at level 2
        let level1 = counts[1] as f64 / DRAWS as f64;
        let level2 = counts[2] as f64 / DRAWS as f64;
        assert!((0.48..0.52).contains(&level1), "level 1 share {level1}");
        assert!((0.23..0.27).contains(&level2), "level 2 share {level2}");
    }

    #[test]
    fn quarter_probability_is_sparser() {
        let mut levels = LevelGenerator::new(make_rng(), 32, 0.25).unwrap();

        const DRAWS: usize = 100_000;
        let promoted = (0..DRAWS).filter(|_| levels.random_level() > 1).count();

        let share = promoted as f64 / DRAWS as f64;
        assert!((0.23..0.27).contains(&share), "promoted share {share}");
    }

    #[test]
    fn certain_promotion_hits_ceiling() {
        let mut levels = LevelGenerator::new(make_rng(), 12, 1.0).unwrap();

        for _ in 0..100 {
            assert_eq!(levels.random_level(), 12);
        }
    }

    #[test]
    fn zero_probability_stays_flat() {
        let mut levels = LevelGenerator::new(make_rng(), 12, 0.0).unwrap();

        for _ in 0..100 {
            assert_eq!(levels.random_level(), 1);
        }
    }

    #[test]
    fn single_level_ceiling() {
        let mut levels = LevelGenerator::new(make_rng(), 1, 1.0).unwrap();
        assert_eq!(levels.random_level(), 1);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            LevelGenerator::new(make_rng(), 0, 0.5).unwrap_err(),
            ConfigError::ZeroMaxLevel
        );
        assert_eq!(
            LevelGenerator::new(make_rng(), LEVEL_LIMIT + 1, 0.5).unwrap_err(),
            ConfigError::MaxLevelTooLarge {
                max_level: LEVEL_LIMIT + 1,
                limit: LEVEL_LIMIT,
            }
        );
        assert_eq!(
            LevelGenerator::new(make_rng(), 16, 1.5).unwrap_err(),
            ConfigError::InvalidProbability(1.5)
        );
        assert!(matches!(
            LevelGenerator::new(make_rng(), 16, f64::NAN).unwrap_err(),
            ConfigError::InvalidProbability(p) if p.is_nan()
        ));
    }

    #[test]
    fn accessors() {
        let levels = LevelGenerator::new(make_rng(), 20, 0.5).unwrap();
        assert_eq!(levels.max_level(), 20);
        assert_eq!(levels.probability(), 0.5);
    }
}
