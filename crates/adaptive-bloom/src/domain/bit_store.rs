//! Fixed-capacity bit array shared by concurrent readers and writers
//!
//! The whole array sits behind one reader/writer lock. Point writes take the
//! exclusive side, point reads the shared side. A separate counter of set
//! bits is maintained on the write path so fullness never needs a full scan.

use std::sync::atomic::{AtomicUsize, Ordering};

use bitvec::prelude::*;
use parking_lot::RwLock;

use crate::error::FilterError;

/// Concurrent bit array of fixed size
#[derive(Debug)]
pub struct BitStore {
    bits: RwLock<BitVec<u8, Lsb0>>,
    size: usize,
    ones: AtomicUsize,
}

impl BitStore {
    /// Allocate a zeroed store of `size` bits.
    ///
    /// Allocation is fallible: a size the allocator refuses yields
    /// `FilterError::AllocationFailure` instead of aborting the process.
    pub fn try_new(size: usize) -> Result<Self, FilterError> {
        if size == 0 {
            return Err(FilterError::InvalidCapacity { capacity: size });
        }

        let bytes = size.div_ceil(8);
        let mut raw: Vec<u8> = Vec::new();
        raw.try_reserve_exact(bytes)
            .map_err(|_| FilterError::AllocationFailure { bits: size })?;
        raw.resize(bytes, 0);

        let mut bits = BitVec::<u8, Lsb0>::from_vec(raw);
        bits.truncate(size);

        Ok(Self {
            bits: RwLock::new(bits),
            size,
            ones: AtomicUsize::new(0),
        })
    }

    /// Mark a bit as set. Returns `true` if the bit was previously clear.
    pub fn set(&self, index: usize) -> bool {
        let index = index % self.size;
        let mut bits = self.bits.write();
        let was_set = bits.replace(index, true);
        if !was_set {
            self.ones.fetch_add(1, Ordering::Relaxed);
        }
        !was_set
    }

    /// Read a single bit
    pub fn get(&self, index: usize) -> bool {
        let index = index % self.size;
        self.bits.read()[index]
    }

    /// Number of bits in the store
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bits currently set
    pub fn ones(&self) -> usize {
        self.ones.load(Ordering::Relaxed)
    }

    /// Fraction of bits set, in `[0, 1]`
    pub fn fullness(&self) -> f64 {
        self.ones() as f64 / self.size as f64
    }

    /// Recount set bits by scanning the array
    pub fn count_ones(&self) -> usize {
        self.bits.read().count_ones()
    }
}
