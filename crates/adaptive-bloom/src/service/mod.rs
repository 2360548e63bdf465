//! Service Layer - the self-resizing filter
//!
//! Owns the generation swap protocol and the rebuild worker.

pub mod adaptive_filter;

pub use adaptive_filter::{AdaptiveBloomFilter, FilterState, FilterStats};
