//! # Adaptive Bloom
//!
//! A self-resizing, thread-safe Bloom filter. Keys are byte slices. The filter
//! grows geometrically whenever its fullness reaches a configured threshold,
//! which keeps the false positive rate bounded as the key set grows.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): pure data structures
//!   - `BitStore`: fixed-size bit array behind a reader/writer lock
//!   - `HashFamily`: k seeded, deterministic hash functions
//!   - `FixedBloomFilter`: one fixed-capacity generation
//!   - `KeyLog`: append-only record of every added key
//!   - `AdaptiveConfig`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): trait definitions
//!   - `MembershipFilter`: driving port shared by both filter kinds
//!
//! - **Service Layer** (`service/`): orchestration
//!   - `AdaptiveBloomFilter`: grow-and-swap control loop
//!
//! ## Invariants
//!
//! - **No false negatives**: once `add(x)` returns, `contains(x)` is true
//!   forever, including during and after any number of resizes
//! - **Monotonic capacity**: each generation is strictly larger than the last
//! - **Single active generation**: exactly one generation answers lookups
//!
//! A resize replays the key log into the new generation. The old bit pattern
//! is never re-hashed, because a set bit does not identify the keys that set it.
//! By default the rebuild runs on a worker thread and the triggering `add`
//! returns at once; `wait_for_rebuild` blocks until growth has settled.
//!
//! ## Usage Example
//!
//! ```
//! use adaptive_bloom::AdaptiveBloomFilter;
//!
//! let filter = AdaptiveBloomFilter::configure(64, 3, 0.5, 2.0)?;
//! for i in 0..500 {
//!     filter.add(format!("key-{}", i).as_bytes());
//! }
//! filter.wait_for_rebuild();
//!
//! assert!(filter.contains(b"key-42"));
//! assert!(filter.current_capacity() > 64);
//! assert!(filter.current_fullness() < 0.5);
//! # Ok::<(), adaptive_bloom::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    AdaptiveConfig, AdaptiveConfigBuilder, FixedBloomFilter, HashAlgorithm, HashFamily, KeyLog,
    ResizeMode,
};
pub use error::FilterError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::MembershipFilter;
pub use service::{AdaptiveBloomFilter, FilterState, FilterStats};
