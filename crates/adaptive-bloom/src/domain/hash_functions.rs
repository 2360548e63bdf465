//! Seeded hash family for Bloom filter indexing
//!
//! A `HashFamily` derives `k` hash functions from one base algorithm by
//! seeding it with `k` fixed seeds. Hashing is a pure function of
//! `(key, seed_i)`, so a key produces the same raw hashes in every filter
//! generation; only the final reduction modulo capacity differs.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Multiplier for the rolling polynomial hash
const POLY_MULTIPLIER: u64 = 31;

/// Base algorithm used by every function of a family
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// Seeded rolling hash `h = h * 31 + b`, followed by a 64-bit finalizer
    #[default]
    Polynomial,
    /// MurmurHash3 x64/128, lower 64 bits
    Murmur3,
}

/// Seeded rolling polynomial hash.
///
/// The raw polynomial only shifts by a constant when the seed changes, so
/// the murmur3 finalizer is applied to decorrelate functions of one family.
pub fn polynomial_hash(key: &[u8], seed: u32) -> u64 {
    let mut h = seed as u64;
    for &b in key {
        h = h.wrapping_mul(POLY_MULTIPLIER).wrapping_add(b as u64);
    }
    fmix64(h)
}

/// Hash with MurmurHash3 under the given seed
pub fn murmur_hash(key: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(key);
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    hash as u64
}

/// MurmurHash3 64-bit finalizer
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

/// Deterministic default seeds: odd multiples of the 32-bit golden ratio
pub fn default_seeds(k: usize) -> Vec<u32> {
    (0..k as u32)
        .map(|i| 0x9E37_79B9u32.wrapping_mul(i.wrapping_add(1)) | 1)
        .collect()
}

/// `k` independent, deterministic hash functions over byte keys
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashFamily {
    seeds: Vec<u32>,
    algorithm: HashAlgorithm,
}

impl HashFamily {
    /// Create a family with one function per seed
    pub fn new(seeds: Vec<u32>, algorithm: HashAlgorithm) -> Result<Self, FilterError> {
        if seeds.is_empty() {
            return Err(FilterError::InvalidHashCount { hash_count: 0 });
        }
        Ok(Self { seeds, algorithm })
    }

    /// Create a family of `k` functions using `default_seeds`
    pub fn with_default_seeds(k: usize, algorithm: HashAlgorithm) -> Result<Self, FilterError> {
        Self::new(default_seeds(k), algorithm)
    }

    /// Number of hash functions
    pub fn k(&self) -> usize {
        self.seeds.len()
    }

    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw hash of `key` under the i-th function.
    ///
    /// # Panics
    /// Panics if `i >= k`.
    pub fn hash(&self, key: &[u8], i: usize) -> u64 {
        let seed = self.seeds[i];
        match self.algorithm {
            HashAlgorithm::Polynomial => polynomial_hash(key, seed),
            HashAlgorithm::Murmur3 => murmur_hash(key, seed),
        }
    }

    /// Bit index of `key` under the i-th function for a given capacity
    pub fn index_for(&self, key: &[u8], i: usize, capacity: usize) -> usize {
        (self.hash(key, i) % capacity as u64) as usize
    }

    /// All `k` bit indices of `key`, in function order
    pub fn indices<'a>(&'a self, key: &'a [u8], capacity: usize) -> impl Iterator<Item = usize> + 'a {
        (0..self.k()).map(move |i| self.index_for(key, i, capacity))
    }
}
