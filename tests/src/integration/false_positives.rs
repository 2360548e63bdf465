//! # False Positive Bound
//!
//! Holding fullness below the threshold bounds the false positive rate by
//! roughly threshold^k. These scenarios measure the empirical rate against
//! keys that were never added.

#[cfg(test)]
mod tests {
    use adaptive_bloom::{AdaptiveBloomFilter, AdaptiveConfigBuilder, HashAlgorithm};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::distinct_keys;

    const PROBES: usize = 20_000;

    /// Fraction of random 16-byte probes (never added: all added keys are ASCII
    /// text of another length) that test positive
    fn measured_fpr(filter: &AdaptiveBloomFilter, seed: u64) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let positives = (0..PROBES)
            .filter(|_| {
                let probe: [u8; 16] = rng.gen();
                filter.contains(&probe)
            })
            .count();
        positives as f64 / PROBES as f64
    }

    fn filled(algorithm: HashAlgorithm, trial: usize, n: usize) -> AdaptiveBloomFilter {
        let config = AdaptiveConfigBuilder::new()
            .initial_capacity(64)
            .hash_count(3)
            .fullness_threshold(0.5)
            .growth_factor(2.0)
            .hash_algorithm(algorithm)
            .build()
            .unwrap();
        let filter = AdaptiveBloomFilter::new(config).unwrap();
        for key in distinct_keys(&format!("trial-{}", trial), n) {
            filter.add(key.as_bytes());
        }
        filter.wait_for_rebuild();
        filter
    }

    #[test]
    fn test_fpr_bounded_across_trials() {
        let mut rates = Vec::new();
        for trial in 0..5 {
            let filter = filled(HashAlgorithm::Polynomial, trial, 2000);
            let rate = measured_fpr(&filter, trial as u64);
            assert!(
                rate < 0.2,
                "Trial {} FPR {} exceeds bound (fullness {})",
                trial,
                rate,
                filter.current_fullness()
            );
            rates.push(rate);
        }

        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        assert!(mean < 0.15, "Mean FPR {} over trials exceeds 0.15", mean);
    }

    #[test]
    fn test_fpr_bounded_with_murmur3() {
        let filter = filled(HashAlgorithm::Murmur3, 0, 3000);
        let rate = measured_fpr(&filter, 99);
        assert!(rate < 0.2, "FPR {} exceeds bound", rate);
    }

    #[test]
    fn test_estimate_tracks_measurement() {
        let filter = filled(HashAlgorithm::Polynomial, 7, 1500);
        let measured = measured_fpr(&filter, 7);
        let estimated = filter.estimated_false_positive_rate();

        assert!(estimated <= 0.125 + 1e-9, "Fullness below 0.5 implies estimate below 0.5^3");
        assert!(
            (measured - estimated).abs() < 0.05,
            "Measured {} should be near estimate {}",
            measured,
            estimated
        );
    }

    #[test]
    fn test_growth_restores_accuracy() {
        // Same keys, one filter allowed to grow and one pinned at its first size
        let keys = distinct_keys("accuracy", 1000);
        let growing = AdaptiveBloomFilter::configure(64, 3, 0.5, 2.0).unwrap();
        let pinned = AdaptiveBloomFilter::new(
            AdaptiveConfigBuilder::new()
                .initial_capacity(64)
                .hash_count(3)
                .max_capacity(64)
                .build()
                .unwrap(),
        )
        .unwrap();

        for key in &keys {
            growing.add(key.as_bytes());
            pinned.add(key.as_bytes());
        }
        growing.wait_for_rebuild();
        pinned.wait_for_rebuild();

        assert_eq!(pinned.current_capacity(), 64);
        assert!(measured_fpr(&growing, 1) < measured_fpr(&pinned, 1));
    }
}
