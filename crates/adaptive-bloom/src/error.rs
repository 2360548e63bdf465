//! Error types for the adaptive Bloom filter

use thiserror::Error;

/// Errors that can occur while configuring or growing a filter
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid capacity: {capacity} (must be > 0)")]
    InvalidCapacity { capacity: usize },

    #[error("Invalid hash count: {hash_count} (must be > 0)")]
    InvalidHashCount { hash_count: usize },

    #[error("Invalid fullness threshold: {threshold} (must be in (0, 1])")]
    InvalidThreshold { threshold: f64 },

    #[error("Invalid growth factor: {factor} (must be > 1)")]
    InvalidGrowthFactor { factor: f64 },

    #[error("Seed count mismatch: expected {expected}, got {actual}")]
    SeedCountMismatch { expected: usize, actual: usize },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to allocate bit store of {bits} bits")]
    AllocationFailure { bits: usize },

    #[error("Failed to spawn rebuild worker: {0}")]
    RebuildSpawn(String),
}

impl FilterError {
    /// Whether this error was raised by configuration validation
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidCapacity { .. }
                | FilterError::InvalidHashCount { .. }
                | FilterError::InvalidThreshold { .. }
                | FilterError::InvalidGrowthFactor { .. }
                | FilterError::SeedCountMismatch { .. }
                | FilterError::InvalidParameters(_)
        )
    }
}
