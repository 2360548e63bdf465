//! Inbound Ports (Driving Ports)

use crate::domain::FixedBloomFilter;

/// Probabilistic set membership over byte keys
///
/// Implementations never return a false negative: once `add(key)` has
/// returned, `contains(key)` is true.
pub trait MembershipFilter: Send + Sync {
    /// Record a key as present
    fn add(&self, key: &[u8]);

    /// Whether `key` may have been added
    fn contains(&self, key: &[u8]) -> bool;

    /// Current size in bits
    fn capacity(&self) -> usize;

    /// Add every key of an iterator
    fn add_all<'a, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'a [u8]>,
        Self: Sized,
    {
        for key in keys {
            self.add(key);
        }
    }
}

impl MembershipFilter for FixedBloomFilter {
    fn add(&self, key: &[u8]) {
        FixedBloomFilter::add(self, key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        FixedBloomFilter::contains(self, key)
    }

    fn capacity(&self) -> usize {
        FixedBloomFilter::capacity(self)
    }
}
