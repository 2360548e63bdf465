//! Bloom filter parameter math
//!
//! Formulas:
//! - FPR = (1 - e^(-kn/m))^k       -- false positive rate after n keys
//! - FPR ≈ fullness^k              -- same, from the observed bit density
//! - m = -n*ln(fpr) / (ln(2)^2)    -- optimal bits
//! - k = (m/n) * ln(2)             -- optimal hash functions

use std::f64::consts::LN_2;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter
    pub size_bits: usize,
    /// Number of hash functions
    pub hash_count: usize,
    /// Expected false positive rate with these parameters
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters for `num_elements` keys at `target_fpr`
pub fn calculate_optimal_parameters(num_elements: usize, target_fpr: f64) -> BloomFilterParams {
    if num_elements == 0 {
        return BloomFilterParams {
            size_bits: 1,
            hash_count: 1,
            expected_fpr: 1.0,
        };
    }

    let n = num_elements as f64;
    let m = minimum_bits(num_elements, target_fpr).max(1);
    let k = ((m as f64 / n) * LN_2).round() as usize;
    let k = k.clamp(1, 32);

    BloomFilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, num_elements, k),
    }
}

/// Theoretical false positive rate: (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    expected_fullness(m, n, k).powi(k as i32)
}

/// Expected fraction of set bits after n keys: 1 - e^(-kn/m)
pub fn expected_fullness(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    1.0 - exponent.exp()
}

/// False positive rate implied by an observed fullness
pub fn fpr_from_fullness(fullness: f64, k: usize) -> f64 {
    fullness.clamp(0.0, 1.0).powi(k as i32)
}

/// Minimum m for n keys at the target FPR
pub fn minimum_bits(n: usize, target_fpr: f64) -> usize {
    let ln2_squared = LN_2 * LN_2;
    (-(n as f64) * target_fpr.ln() / ln2_squared).ceil() as usize
}

/// Capacity of the next generation: `ceil(current * growth_factor)`,
/// capped at `max_capacity`.
///
/// Returns `None` when the result would not be strictly larger than
/// `current`, i.e. the filter cannot grow any further.
pub fn next_capacity(current: usize, growth_factor: f64, max_capacity: Option<usize>) -> Option<usize> {
    // Float-to-int `as` saturates at usize::MAX
    let grown = (current as f64 * growth_factor).ceil() as usize;
    let grown = grown.max(current.saturating_add(1));
    let target = match max_capacity {
        Some(max) => grown.min(max),
        None => grown,
    };
    (target > current).then_some(target)
}
