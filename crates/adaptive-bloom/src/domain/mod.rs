//! Domain Layer - filter data structures
//!
//! This layer contains:
//! - Concurrent bit array
//! - Seeded hash family
//! - Fixed-capacity Bloom filter (one generation)
//! - Append-only key log
//! - Parameter calculations
//! - Configuration
//!
//! RULES:
//! - No threads spawned here
//! - No I/O operations

pub mod bit_store;
pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod key_log;
pub mod parameters;

pub use bit_store::BitStore;
pub use bloom_filter::FixedBloomFilter;
pub use config::{AdaptiveConfig, AdaptiveConfigBuilder, ResizeMode};
pub use hash_functions::{HashAlgorithm, HashFamily};
pub use key_log::KeyLog;
pub use parameters::{calculate_fpr, calculate_optimal_parameters, fpr_from_fullness, BloomFilterParams};
