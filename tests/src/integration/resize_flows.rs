//! # Resize Flows
//!
//! Drives the adaptive filter through repeated growth and checks that
//! membership survives every generation swap.

#[cfg(test)]
mod tests {
    use adaptive_bloom::{
        AdaptiveBloomFilter, AdaptiveConfig, AdaptiveConfigBuilder, FilterState, HashAlgorithm,
        MembershipFilter,
    };

    use crate::{distinct_keys, init_tracing};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Add keys one by one, recording every distinct capacity observed
    fn add_tracking_capacity(filter: &AdaptiveBloomFilter, keys: &[String]) -> Vec<usize> {
        let mut capacities = vec![filter.current_capacity()];
        for key in keys {
            filter.add(key.as_bytes());
            filter.wait_for_rebuild();
            let capacity = filter.current_capacity();
            if capacity != *capacities.last().unwrap() {
                capacities.push(capacity);
            }
        }
        capacities
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_500_keys_force_three_resizes() {
        init_tracing();
        let filter = AdaptiveBloomFilter::configure(64, 3, 0.5, 2.0).unwrap();
        let keys = distinct_keys("churn", 500);

        let capacities = add_tracking_capacity(&filter, &keys);

        assert!(
            capacities.len() >= 4,
            "Capacity should increase at least 3 times, saw {:?}",
            capacities
        );
        assert!(capacities.windows(2).all(|w| w[1] > w[0]));
        for key in &keys {
            assert!(filter.contains(key.as_bytes()), "Lost {} across resizes", key);
        }
    }

    #[test]
    fn test_membership_checked_after_every_add() {
        let filter = AdaptiveBloomFilter::configure(32, 4, 0.4, 1.5).unwrap();
        let keys = distinct_keys("each", 2000);

        for (i, key) in keys.iter().enumerate() {
            filter.add(key.as_bytes());
            // Spot-check the whole prefix every 100 adds
            if i % 100 == 0 {
                for earlier in &keys[..=i] {
                    assert!(filter.contains(earlier.as_bytes()));
                }
            }
            assert!(filter.contains(key.as_bytes()));
        }
        filter.wait_for_rebuild();

        assert!(filter.generation() >= 5);
        assert!(filter.current_fullness() < 0.4);
    }

    #[test]
    fn test_example_configuration() {
        let filter = AdaptiveBloomFilter::configure(16, 2, 0.75, 2.0).unwrap();
        filter.add(b"a");
        filter.add(b"b");

        assert!(filter.contains(b"a"));
        assert!(filter.contains(b"b"));
        // At most 4 of 16 bits set: "z" is not forced positive by construction
        assert!(filter.bits_set() <= 4);
        assert!(filter.current_fullness() < 1.0);
    }

    #[test]
    fn test_murmur3_family_resizes_correctly() {
        let config = AdaptiveConfigBuilder::new()
            .initial_capacity(64)
            .hash_count(5)
            .fullness_threshold(0.5)
            .hash_algorithm(HashAlgorithm::Murmur3)
            .build()
            .unwrap();
        let filter = AdaptiveBloomFilter::new(config).unwrap();
        let keys = distinct_keys("murmur", 800);

        for key in &keys {
            filter.add(key.as_bytes());
        }
        filter.wait_for_rebuild();

        assert!(filter.current_capacity() > 64);
        assert!(keys.iter().all(|k| filter.contains(k.as_bytes())));
    }

    #[test]
    fn test_same_seeds_same_filter() {
        let build = || {
            let config = AdaptiveConfigBuilder::new()
                .initial_capacity(128)
                .hash_count(3)
                .seeds(vec![17, 29, 43])
                .build()
                .unwrap();
            AdaptiveBloomFilter::new(config).unwrap()
        };
        let first = build();
        let second = build();

        for key in distinct_keys("seeded", 300) {
            first.add(key.as_bytes());
            second.add(key.as_bytes());
        }
        first.wait_for_rebuild();
        second.wait_for_rebuild();

        assert_eq!(first.stats(), second.stats(), "Hashing must be deterministic");
        let probes = distinct_keys("probe", 1000);
        for probe in &probes {
            assert_eq!(first.contains(probe.as_bytes()), second.contains(probe.as_bytes()));
        }
    }

    #[test]
    fn test_config_loaded_from_json() {
        let config: AdaptiveConfig = serde_json::from_str(
            r#"{
                "initial_capacity": 48,
                "hash_count": 2,
                "fullness_threshold": 0.6,
                "growth_factor": 3.0,
                "max_capacity": 1000
            }"#,
        )
        .unwrap();
        let filter = AdaptiveBloomFilter::new(config).unwrap();

        let keys = distinct_keys("json", 600);
        for key in &keys {
            filter.add(key.as_bytes());
        }
        filter.wait_for_rebuild();

        // 48 -> 144 -> 432 -> 1000 (capped)
        assert_eq!(filter.current_capacity(), 1000);
        assert!(keys.iter().all(|k| filter.contains(k.as_bytes())));
    }

    #[test]
    fn test_invalid_json_config_rejected_at_construction() {
        let config: AdaptiveConfig =
            serde_json::from_str(r#"{ "fullness_threshold": 1.5 }"#).unwrap();
        let err = AdaptiveBloomFilter::new(config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_port_generic_over_filter_kinds() {
        fn load<F: MembershipFilter>(filter: &F, keys: &[String]) {
            filter.add_all(keys.iter().map(|k| k.as_bytes()));
        }

        let filter = AdaptiveBloomFilter::configure(64, 3, 0.5, 2.0).unwrap();
        let keys = distinct_keys("port", 200);
        load(&filter, &keys);
        filter.wait_for_rebuild();

        let port: &dyn MembershipFilter = &filter;
        assert!(keys.iter().all(|k| port.contains(k.as_bytes())));
        assert_eq!(port.capacity(), filter.current_capacity());
        assert_eq!(filter.state(), FilterState::Normal);
    }

    #[test]
    fn test_metrics_account_for_replay() {
        let filter = AdaptiveBloomFilter::configure(64, 3, 0.5, 2.0).unwrap();
        let keys = distinct_keys("metrics", 300);
        for key in &keys {
            filter.add(key.as_bytes());
        }
        filter.wait_for_rebuild();

        let snapshot = filter.metrics().snapshot();
        assert_eq!(snapshot.inserts, 300);
        assert_eq!(snapshot.generations_built, filter.generation());
        assert_eq!(snapshot.bits_allocated, filter.current_capacity() as u64);
        // Every rebuild replays the whole log so far
        assert!(snapshot.keys_replayed >= snapshot.generations_built);
        assert!(snapshot.keys_replayed > 100);
    }
}
