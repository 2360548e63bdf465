//! Adaptive Bloom filter: fixed generations plus a grow-and-swap control loop
//!
//! INVARIANTS:
//! - No false negatives: once `add(key)` returns, `contains(key)` is true at
//!   every later point, across any number of resizes
//! - Monotonic capacity: each generation is strictly larger than the last
//! - Single active generation: exactly one generation answers queries
//!
//! ## Swap protocol
//!
//! `add` holds the shared side of the `active` lock while it appends to the
//! key log and sets bits, so the pair is atomic with respect to a swap. A
//! rebuild replays a snapshot of the log into a new generation, rescans the
//! keys appended meanwhile, then takes the exclusive side only to replay the
//! final tail and replace the pointer. `contains` clones the active `Arc`
//! and releases the lock before probing.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use parking_lot::{Condvar, Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::domain::parameters::{fpr_from_fullness, next_capacity};
use crate::domain::{AdaptiveConfig, FixedBloomFilter, HashFamily, KeyLog, ResizeMode};
use crate::error::FilterError;
use crate::metrics::{Metrics, MetricsRecorder, NoOpMetrics};
use crate::ports::MembershipFilter;

/// Name given to background rebuild threads
const REBUILD_THREAD_NAME: &str = "adaptive-bloom-rebuild";

/// Resize state of the filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterState {
    /// Serving adds and lookups from the active generation
    Normal,
    /// A larger generation is being built; the old one still serves
    Rebuilding,
}

/// Point-in-time view of the filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub generation: u64,
    pub capacity: usize,
    pub hash_count: usize,
    pub bits_set: usize,
    pub fullness: f64,
    pub keys_logged: usize,
    pub estimated_fpr: f64,
    pub state: FilterState,
}

/// One numbered generation
#[derive(Debug)]
struct Generation {
    number: u64,
    filter: FixedBloomFilter,
}

struct Inner {
    config: AdaptiveConfig,
    hashes: Arc<HashFamily>,
    active: RwLock<Arc<Generation>>,
    key_log: KeyLog,
    state: Mutex<FilterState>,
    state_changed: Condvar,
    metrics: Metrics,
    recorder: Arc<dyn MetricsRecorder>,
}

/// Self-resizing, thread-safe Bloom filter
///
/// Cloning yields another handle to the same filter.
///
/// # Example
///
/// ```
/// use adaptive_bloom::AdaptiveBloomFilter;
///
/// let filter = AdaptiveBloomFilter::configure(16, 2, 0.75, 2.0).unwrap();
/// filter.add(b"a");
/// filter.add(b"b");
/// assert!(filter.contains(b"a"));
/// assert!(filter.contains(b"b"));
/// ```
#[derive(Clone)]
pub struct AdaptiveBloomFilter {
    inner: Arc<Inner>,
}

impl AdaptiveBloomFilter {
    /// Create a filter from a configuration
    pub fn new(config: AdaptiveConfig) -> Result<Self, FilterError> {
        Self::with_recorder(config, Arc::new(NoOpMetrics))
    }

    /// Create a filter from the four core parameters, with defaults elsewhere
    pub fn configure(
        initial_capacity: usize,
        hash_count: usize,
        fullness_threshold: f64,
        growth_factor: f64,
    ) -> Result<Self, FilterError> {
        Self::new(AdaptiveConfig::new(
            initial_capacity,
            hash_count,
            fullness_threshold,
            growth_factor,
        )?)
    }

    /// Create a filter that also reports events to `recorder`
    pub fn with_recorder(
        config: AdaptiveConfig,
        recorder: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, FilterError> {
        config.validate()?;

        let hashes = Arc::new(HashFamily::new(
            config.effective_seeds(),
            config.hash_algorithm,
        )?);
        let initial = FixedBloomFilter::try_new(config.initial_capacity, Arc::clone(&hashes))?;

        let metrics = Metrics::new();
        metrics.record_initial_generation(config.initial_capacity);

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                hashes,
                active: RwLock::new(Arc::new(Generation {
                    number: 0,
                    filter: initial,
                })),
                key_log: KeyLog::new(),
                state: Mutex::new(FilterState::Normal),
                state_changed: Condvar::new(),
                metrics,
                recorder,
            }),
        })
    }

    /// Add a key.
    ///
    /// Returns once the key is logged and its bits are set. If the add pushes
    /// fullness to the threshold a resize is started; in background mode the
    /// call does not wait for it.
    pub fn add(&self, key: &[u8]) {
        let inner = &self.inner;
        let fullness = {
            let active = inner.active.read();
            inner.key_log.append(key);
            active.filter.add(key);
            active.filter.fullness()
        };

        inner.metrics.record_insert();
        inner.recorder.record_insert();

        if fullness >= inner.config.fullness_threshold {
            self.start_resize();
        }
    }

    /// Test membership against the active generation.
    ///
    /// May return a false positive, never a false negative.
    pub fn contains(&self, key: &[u8]) -> bool {
        let active = self.inner.current();
        let found = active.filter.contains(key);

        self.inner.metrics.record_lookup(found);
        self.inner.recorder.record_lookup(found);
        found
    }

    pub fn current_capacity(&self) -> usize {
        self.inner.current().filter.capacity()
    }

    pub fn current_fullness(&self) -> f64 {
        self.inner.current().filter.fullness()
    }

    /// Number of the active generation; 0 before the first resize
    pub fn generation(&self) -> u64 {
        self.inner.current().number
    }

    pub fn hash_count(&self) -> usize {
        self.inner.hashes.k()
    }

    pub fn bits_set(&self) -> usize {
        self.inner.current().filter.bits_set()
    }

    /// Keys recorded in the log, duplicates included
    pub fn keys_logged(&self) -> usize {
        self.inner.key_log.len()
    }

    /// False positive rate implied by the active generation's fullness
    pub fn estimated_false_positive_rate(&self) -> f64 {
        fpr_from_fullness(self.current_fullness(), self.hash_count())
    }

    pub fn state(&self) -> FilterState {
        *self.inner.state.lock()
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.inner.config
    }

    /// Built-in counters
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    pub fn stats(&self) -> FilterStats {
        let active = self.inner.current();
        let fullness = active.filter.fullness();
        FilterStats {
            generation: active.number,
            capacity: active.filter.capacity(),
            hash_count: active.filter.hash_count(),
            bits_set: active.filter.bits_set(),
            fullness,
            keys_logged: self.inner.key_log.len(),
            estimated_fpr: fpr_from_fullness(fullness, active.filter.hash_count()),
            state: self.state(),
        }
    }

    /// Block until no rebuild is in progress
    pub fn wait_for_rebuild(&self) {
        let mut state = self.inner.state.lock();
        while *state == FilterState::Rebuilding {
            self.inner.state_changed.wait(&mut state);
        }
    }

    fn start_resize(&self) {
        let inner = &self.inner;
        let current = inner.current();
        if inner.resize_target(&current).is_none() {
            trace!(
                capacity = current.filter.capacity(),
                "[adaptive-bloom] No larger generation needed or allowed"
            );
            return;
        }

        if !inner.try_begin_rebuild() {
            return;
        }

        match inner.config.resize_mode {
            ResizeMode::Inline => inner.run_rebuild(),
            ResizeMode::Background => {
                let worker = Arc::clone(inner);
                let spawned = thread::Builder::new()
                    .name(REBUILD_THREAD_NAME.to_string())
                    .spawn(move || worker.run_rebuild());

                if let Err(e) = spawned {
                    inner.abandon(&FilterError::RebuildSpawn(e.to_string()));
                    inner.finish_rebuild();
                }
            }
        }
    }
}

impl Inner {
    fn current(&self) -> Arc<Generation> {
        Arc::clone(&*self.active.read())
    }

    /// Claim the single rebuild slot. Returns false if already taken.
    fn try_begin_rebuild(&self) -> bool {
        let mut state = self.state.lock();
        if *state == FilterState::Rebuilding {
            return false;
        }
        *state = FilterState::Rebuilding;
        true
    }

    fn finish_rebuild(&self) {
        *self.state.lock() = FilterState::Normal;
        self.state_changed.notify_all();
    }

    fn abandon(&self, error: &FilterError) {
        warn!(error = %error, "[adaptive-bloom] Resize abandoned, keeping current generation");
        self.metrics.record_resize_abandoned();
        self.recorder.record_resize_abandoned();
    }

    /// Capacity to grow `current` into, if it is at or over the threshold
    /// and below the ceiling
    fn resize_target(&self, current: &Generation) -> Option<usize> {
        if current.filter.fullness() < self.config.fullness_threshold {
            return None;
        }
        next_capacity(
            current.filter.capacity(),
            self.config.growth_factor,
            self.config.max_capacity,
        )
    }

    /// Grow until the active generation is below the threshold, the ceiling
    /// is reached, or a build fails.
    fn run_rebuild(&self) {
        let mut slot = RebuildSlot::claimed(self);

        loop {
            let current = self.current();
            let Some(target) = self.resize_target(&current) else {
                if slot.release_if_settled() {
                    return;
                }
                continue;
            };

            if let Err(e) = self.rebuild(&current, target) {
                self.abandon(&e);
                return;
            }
        }
    }

    /// Build a generation of `target` bits from the key log and swap it in
    fn rebuild(&self, current: &Arc<Generation>, target: usize) -> Result<(), FilterError> {
        let started = Instant::now();
        debug!(
            from = current.filter.capacity(),
            to = target,
            keys = self.key_log.len(),
            "[adaptive-bloom] Building new generation"
        );

        let next = FixedBloomFilter::try_new(target, Arc::clone(&self.hashes))?;

        let snapshot = self.key_log.snapshot();
        for key in &snapshot {
            next.add(key);
        }
        let cursor = snapshot.len();
        drop(snapshot);

        // Keys appended while the snapshot was replayed
        let (appended, cursor) = self.key_log.since(cursor);
        for key in &appended {
            next.add(key);
        }

        let mut active = self.active.write();
        debug_assert!(Arc::ptr_eq(&*active, current), "only one rebuild may swap");

        // No append can run while the write guard is held
        let (appended, replayed) = self.key_log.since(cursor);
        for key in &appended {
            next.add(key);
        }

        let number = active.number + 1;
        let fullness = next.fullness();
        let retired = std::mem::replace(
            &mut *active,
            Arc::new(Generation {
                number,
                filter: next,
            }),
        );
        drop(active);

        let elapsed = started.elapsed();
        info!(
            generation = number,
            capacity = target,
            fullness,
            replayed,
            elapsed_us = elapsed.as_micros() as u64,
            "[adaptive-bloom] Swapped in new generation"
        );

        let old_bits = retired.filter.capacity();
        self.metrics
            .record_generation_built(old_bits, target, replayed, elapsed);
        self.recorder
            .record_generation_built(old_bits, target, replayed, elapsed);
        Ok(())
    }
}

/// The claimed rebuild slot. Released when the rebuild settles, or on drop
/// if the rebuild ends early, including by panic.
struct RebuildSlot<'a> {
    inner: &'a Inner,
    held: bool,
}

impl<'a> RebuildSlot<'a> {
    fn claimed(inner: &'a Inner) -> Self {
        Self { inner, held: true }
    }

    /// Release the slot unless the active generation is over the threshold.
    ///
    /// Checked under the state lock: an `add` that crossed the threshold
    /// while the slot was held either lands before this check and is seen
    /// here, or finds the slot free and claims it.
    fn release_if_settled(&mut self) -> bool {
        let mut state = self.inner.state.lock();
        if self.inner.resize_target(&self.inner.current()).is_some() {
            return false;
        }
        *state = FilterState::Normal;
        self.held = false;
        drop(state);
        self.inner.state_changed.notify_all();
        true
    }
}

impl Drop for RebuildSlot<'_> {
    fn drop(&mut self) {
        if self.held {
            self.inner.finish_rebuild();
        }
    }
}

impl MembershipFilter for AdaptiveBloomFilter {
    fn add(&self, key: &[u8]) {
        AdaptiveBloomFilter::add(self, key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        AdaptiveBloomFilter::contains(self, key)
    }

    fn capacity(&self) -> usize {
        self.current_capacity()
    }
}

impl fmt::Debug for AdaptiveBloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("AdaptiveBloomFilter")
            .field("generation", &stats.generation)
            .field("capacity", &stats.capacity)
            .field("hash_count", &stats.hash_count)
            .field("fullness", &stats.fullness)
            .field("keys_logged", &stats.keys_logged)
            .field("state", &stats.state)
            .finish()
    }
}
