//! Adaptive filter configuration and validation
//!
//! # Example
//!
//! ```
//! use adaptive_bloom::{AdaptiveConfigBuilder, ResizeMode};
//!
//! let config = AdaptiveConfigBuilder::new()
//!     .initial_capacity(256)
//!     .hash_count(3)
//!     .fullness_threshold(0.5)
//!     .growth_factor(2.0)
//!     .resize_mode(ResizeMode::Inline)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.initial_capacity, 256);
//! ```

use serde::{Deserialize, Serialize};

use super::hash_functions::{default_seeds, HashAlgorithm};
use super::parameters::calculate_optimal_parameters;
use crate::error::FilterError;

/// Where a threshold-triggered rebuild runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// On the thread whose `add` crossed the threshold; that `add` returns
    /// only once the filter is below the threshold again
    Inline,
    /// On a dedicated worker thread; the triggering `add` returns immediately
    #[default]
    Background,
}

/// Adaptive Bloom filter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Bits in the first generation
    pub initial_capacity: usize,
    /// Hash functions per key (k), constant across generations
    pub hash_count: usize,
    /// Fullness at or above which a resize is triggered, in (0, 1]
    pub fullness_threshold: f64,
    /// Capacity multiplier per resize, > 1
    pub growth_factor: f64,
    /// Upper bound on capacity; growth stops here
    pub max_capacity: Option<usize>,
    /// Explicit hash seeds, one per hash function
    pub seeds: Option<Vec<u32>>,
    pub hash_algorithm: HashAlgorithm,
    pub resize_mode: ResizeMode,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            hash_count: 3,
            fullness_threshold: 0.5,
            growth_factor: 2.0,
            max_capacity: None,
            seeds: None,
            hash_algorithm: HashAlgorithm::Polynomial,
            resize_mode: ResizeMode::Background,
        }
    }
}

impl AdaptiveConfig {
    /// Create a validated configuration from the four core parameters
    pub fn new(
        initial_capacity: usize,
        hash_count: usize,
        fullness_threshold: f64,
        growth_factor: f64,
    ) -> Result<Self, FilterError> {
        let config = Self {
            initial_capacity,
            hash_count,
            fullness_threshold,
            growth_factor,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Size the first generation for `expected_keys` at `target_fpr`.
    ///
    /// The filter still grows past this if more keys arrive.
    pub fn for_expected_keys(expected_keys: usize, target_fpr: f64) -> Result<Self, FilterError> {
        if !(target_fpr > 0.0 && target_fpr < 1.0) {
            return Err(FilterError::InvalidParameters(format!(
                "target_fpr must be in (0, 1), got {}",
                target_fpr
            )));
        }
        let params = calculate_optimal_parameters(expected_keys, target_fpr);
        Self::new(params.size_bits, params.hash_count, 0.5, 2.0)
    }

    /// Validate every field
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.initial_capacity == 0 {
            return Err(FilterError::InvalidCapacity {
                capacity: self.initial_capacity,
            });
        }

        if self.hash_count == 0 {
            return Err(FilterError::InvalidHashCount {
                hash_count: self.hash_count,
            });
        }

        // Written so that NaN fails too
        if !(self.fullness_threshold > 0.0 && self.fullness_threshold <= 1.0) {
            return Err(FilterError::InvalidThreshold {
                threshold: self.fullness_threshold,
            });
        }

        if !(self.growth_factor > 1.0) || !self.growth_factor.is_finite() {
            return Err(FilterError::InvalidGrowthFactor {
                factor: self.growth_factor,
            });
        }

        if let Some(seeds) = &self.seeds {
            if seeds.len() != self.hash_count {
                return Err(FilterError::SeedCountMismatch {
                    expected: self.hash_count,
                    actual: seeds.len(),
                });
            }
        }

        if let Some(max) = self.max_capacity {
            if max < self.initial_capacity {
                return Err(FilterError::InvalidParameters(format!(
                    "max_capacity {} is below initial_capacity {}",
                    max, self.initial_capacity
                )));
            }
        }

        Ok(())
    }

    /// Seeds to hash with: the explicit ones, or the deterministic defaults
    pub fn effective_seeds(&self) -> Vec<u32> {
        self.seeds
            .clone()
            .unwrap_or_else(|| default_seeds(self.hash_count))
    }
}

/// Builder for AdaptiveConfig with validation
#[derive(Default)]
pub struct AdaptiveConfigBuilder {
    initial_capacity: Option<usize>,
    hash_count: Option<usize>,
    fullness_threshold: Option<f64>,
    growth_factor: Option<f64>,
    max_capacity: Option<usize>,
    seeds: Option<Vec<u32>>,
    hash_algorithm: Option<HashAlgorithm>,
    resize_mode: Option<ResizeMode>,
}

impl AdaptiveConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, bits: usize) -> Self {
        self.initial_capacity = Some(bits);
        self
    }

    pub fn hash_count(mut self, k: usize) -> Self {
        self.hash_count = Some(k);
        self
    }

    pub fn fullness_threshold(mut self, threshold: f64) -> Self {
        self.fullness_threshold = Some(threshold);
        self
    }

    pub fn growth_factor(mut self, factor: f64) -> Self {
        self.growth_factor = Some(factor);
        self
    }

    pub fn max_capacity(mut self, bits: usize) -> Self {
        self.max_capacity = Some(bits);
        self
    }

    /// Set explicit seeds; the count must match `hash_count`
    pub fn seeds(mut self, seeds: Vec<u32>) -> Self {
        self.seeds = Some(seeds);
        self
    }

    pub fn hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = Some(algorithm);
        self
    }

    pub fn resize_mode(mut self, mode: ResizeMode) -> Self {
        self.resize_mode = Some(mode);
        self
    }

    /// Build the AdaptiveConfig, validating all parameters
    pub fn build(self) -> Result<AdaptiveConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for internal use only)
    pub fn build_unchecked(self) -> AdaptiveConfig {
        let defaults = AdaptiveConfig::default();

        AdaptiveConfig {
            initial_capacity: self.initial_capacity.unwrap_or(defaults.initial_capacity),
            hash_count: self.hash_count.unwrap_or(defaults.hash_count),
            fullness_threshold: self.fullness_threshold.unwrap_or(defaults.fullness_threshold),
            growth_factor: self.growth_factor.unwrap_or(defaults.growth_factor),
            max_capacity: self.max_capacity.or(defaults.max_capacity),
            seeds: self.seeds.or(defaults.seeds),
            hash_algorithm: self.hash_algorithm.unwrap_or(defaults.hash_algorithm),
            resize_mode: self.resize_mode.unwrap_or(defaults.resize_mode),
        }
    }
}
