//! Metrics hooks for adaptive filter operations
//!
//! Counts inserts, lookups and generation churn. Attach a custom
//! `MetricsRecorder` to forward the same events to an external system.
//!
//! ## Usage
//!
//! ```
//! use adaptive_bloom::{AdaptiveBloomFilter, AdaptiveConfig};
//!
//! let filter = AdaptiveBloomFilter::new(AdaptiveConfig::default()).unwrap();
//! filter.add(b"key");
//! filter.contains(b"key");
//!
//! let snapshot = filter.metrics().snapshot();
//! assert_eq!(snapshot.inserts, 1);
//! assert_eq!(snapshot.lookups_positive, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Built-in metrics collector
///
/// Thread-safe counters for monitoring filter behavior.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total `add` calls
    pub inserts: AtomicU64,
    /// Total `contains` calls
    pub lookups: AtomicU64,
    /// `contains` calls that answered true
    pub lookups_positive: AtomicU64,
    /// Generations built and swapped in (excluding the initial one)
    pub generations_built: AtomicU64,
    /// Resize attempts abandoned after a failure
    pub resizes_abandoned: AtomicU64,
    /// Keys replayed into new generations, across all rebuilds
    pub keys_replayed: AtomicU64,
    /// Bits held by the live generation
    pub bits_allocated: AtomicU64,
    /// Cumulative rebuild time in nanoseconds
    pub rebuild_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup(&self, found: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a generation swap
    ///
    /// # Arguments
    /// * `old_bits` - Capacity of the generation being retired
    /// * `new_bits` - Capacity of the generation now live
    /// * `keys_replayed` - Keys added to the new generation during the rebuild
    /// * `duration` - Wall time of the rebuild
    pub fn record_generation_built(
        &self,
        _old_bits: usize,
        new_bits: usize,
        keys_replayed: usize,
        duration: Duration,
    ) {
        self.generations_built.fetch_add(1, Ordering::Relaxed);
        self.keys_replayed.fetch_add(keys_replayed as u64, Ordering::Relaxed);
        self.bits_allocated.store(new_bits as u64, Ordering::Relaxed);
        self.rebuild_time_ns.fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_resize_abandoned(&self) {
        self.resizes_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the allocation of the initial generation
    pub fn record_initial_generation(&self, bits: usize) {
        self.bits_allocated.store(bits as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            generations_built: self.generations_built.load(Ordering::Relaxed),
            resizes_abandoned: self.resizes_abandoned.load(Ordering::Relaxed),
            keys_replayed: self.keys_replayed.load(Ordering::Relaxed),
            bits_allocated: self.bits_allocated.load(Ordering::Relaxed),
            avg_rebuild_ns: self.avg_rebuild_time_ns(),
        }
    }

    pub fn avg_rebuild_time_ns(&self) -> u64 {
        let total = self.rebuild_time_ns.load(Ordering::Relaxed);
        let count = self.generations_built.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Ratio of positive lookups to total lookups.
    ///
    /// Includes true positives, so this is an upper bound on the observed
    /// false positive rate only when lookups are for absent keys.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters except `bits_allocated`, which is a gauge
    pub fn reset(&self) {
        self.inserts.store(0, Ordering::Relaxed);
        self.lookups.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
        self.generations_built.store(0, Ordering::Relaxed);
        self.resizes_abandoned.store(0, Ordering::Relaxed);
        self.keys_replayed.store(0, Ordering::Relaxed);
        self.rebuild_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub lookups: u64,
    pub lookups_positive: u64,
    pub generations_built: u64,
    pub resizes_abandoned: u64,
    pub keys_replayed: u64,
    pub bits_allocated: u64,
    pub avg_rebuild_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus, StatsD, or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    fn record_insert(&self);

    fn record_lookup(&self, found: bool);

    fn record_generation_built(
        &self,
        old_bits: usize,
        new_bits: usize,
        keys_replayed: usize,
        duration: Duration,
    );

    fn record_resize_abandoned(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_insert(&self) {}
    fn record_lookup(&self, _: bool) {}
    fn record_generation_built(&self, _: usize, _: usize, _: usize, _: Duration) {}
    fn record_resize_abandoned(&self) {}
}
