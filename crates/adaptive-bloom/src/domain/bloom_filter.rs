//! Fixed-capacity Bloom filter generation
//!
//! INVARIANTS:
//! - No false negatives: once `add(key)` returns, `contains(key)` is true
//! - Capacity and hash count never change for the lifetime of a generation

use std::sync::Arc;

use super::bit_store::BitStore;
use super::hash_functions::HashFamily;
use super::parameters::fpr_from_fullness;
use crate::error::FilterError;

/// One generation of the adaptive filter: a bit store plus a shared hash family
#[derive(Debug)]
pub struct FixedBloomFilter {
    bits: BitStore,
    hashes: Arc<HashFamily>,
}

impl FixedBloomFilter {
    /// Allocate a filter of `capacity` bits using the given hash family
    pub fn try_new(capacity: usize, hashes: Arc<HashFamily>) -> Result<Self, FilterError> {
        Ok(Self {
            bits: BitStore::try_new(capacity)?,
            hashes,
        })
    }

    /// Insert a key. Idempotent.
    ///
    /// Returns the number of bits this call flipped from clear to set.
    pub fn add(&self, key: &[u8]) -> usize {
        let capacity = self.capacity();
        self.hashes
            .indices(key, capacity)
            .filter(|&index| self.bits.set(index))
            .count()
    }

    /// Test membership, stopping at the first clear bit
    ///
    /// Returns:
    /// - `true` if the key might be in the set (could be false positive)
    /// - `false` if the key is definitely NOT in the set
    pub fn contains(&self, key: &[u8]) -> bool {
        let capacity = self.capacity();
        self.hashes
            .indices(key, capacity)
            .all(|index| self.bits.get(index))
    }

    /// Size in bits
    pub fn capacity(&self) -> usize {
        self.bits.size()
    }

    pub fn hash_count(&self) -> usize {
        self.hashes.k()
    }

    pub fn bits_set(&self) -> usize {
        self.bits.ones()
    }

    /// Fraction of bits set across the whole store
    pub(crate) fn fullness(&self) -> f64 {
        self.bits.fullness()
    }

    /// Probability that an absent key tests positive at the current fullness
    pub fn estimated_false_positive_rate(&self) -> f64 {
        fpr_from_fullness(self.fullness(), self.hash_count())
    }
}
