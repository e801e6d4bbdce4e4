//! Property-Based Tests for Cache Module
//!
//! Uses proptest against the in-memory backend through the cache manager.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};
use tokio_test::block_on;

use crate::cache::{CacheManager, CacheMetrics, InMemoryBackend, ManualClock};

// == Test Configuration ==
const TEST_TTL: u64 = 300;

fn manager_with_clock() -> (CacheManager, ManualClock) {
    let clock = ManualClock::new(1_000_000);
    let backend = InMemoryBackend::with_clock(Arc::new(clock.clone()));
    (
        CacheManager::new(Arc::new(backend), Arc::new(CacheMetrics::new())),
        clock,
    )
}

// == Strategies ==
/// Generates key ids without separators
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}"
}

/// Generates JSON values of a shape the application actually caches
fn value_strategy() -> impl Strategy<Value = Value> {
    (
        any::<u32>(),
        "[a-zA-Z0-9 ]{0,64}",
        prop::collection::vec("[a-z]{1,8}", 0..5),
        prop::option::of(any::<i64>()),
    )
        .prop_map(|(id, title, tags, price)| {
            json!({ "id": id, "title": title, "tags": tags, "price": price })
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a value and reading it back before expiry returns an equal value.
    #[test]
    fn prop_roundtrip_storage(id in id_strategy(), value in value_strategy()) {
        let (cache, _) = manager_with_clock();
        let key = format!("artwork:{}", id);

        let retrieved: Option<Value> = block_on(async {
            prop_assert!(cache.set(&key, &value, TEST_TTL).await);
            Ok(cache.get::<Value>(&key).await)
        })?;

        prop_assert_eq!(retrieved, Some(value));
    }

    // After a delete, the key reads as absent.
    #[test]
    fn prop_delete_removes_entry(id in id_strategy(), value in value_strategy()) {
        let (cache, _) = manager_with_clock();
        let key = format!("gallery:{}", id);

        let after: Option<Value> = block_on(async {
            cache.set(&key, &value, TEST_TTL).await;
            prop_assert!(cache.delete(&key).await);
            Ok(cache.get::<Value>(&key).await)
        })?;

        prop_assert!(after.is_none());
    }

    // The second write to a key wins.
    #[test]
    fn prop_overwrite_semantics(
        id in id_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let (cache, _) = manager_with_clock();

        let retrieved: Option<Value> = block_on(async {
            cache.set(&id, &value1, TEST_TTL).await;
            cache.set(&id, &value2, TEST_TTL).await;
            cache.get::<Value>(&id).await
        });

        prop_assert_eq!(retrieved, Some(value2));
    }

    // Invalidating one family removes exactly its keys and nothing else.
    #[test]
    fn prop_invalidation_scope(
        artwork_ids in prop::collection::hash_set(id_strategy(), 0..20),
        user_ids in prop::collection::hash_set(id_strategy(), 0..20)
    ) {
        let (cache, _) = manager_with_clock();

        let (removed, survivors) = block_on(async {
            for id in &artwork_ids {
                cache.set(&format!("artwork:{}", id), id, TEST_TTL).await;
            }
            for id in &user_ids {
                cache.set(&format!("user:{}", id), id, TEST_TTL).await;
            }

            let removed = cache.invalidate_pattern("artwork:*").await;
            let mut survivors = HashSet::new();
            for id in &user_ids {
                if cache.get::<String>(&format!("user:{}", id)).await.is_some() {
                    survivors.insert(id.clone());
                }
            }
            for id in &artwork_ids {
                assert!(cache.get::<String>(&format!("artwork:{}", id)).await.is_none());
            }
            (removed, survivors)
        });

        prop_assert_eq!(removed, artwork_ids.len());
        prop_assert_eq!(survivors, user_ids);
    }

    // An entry is readable until its TTL elapses and never after.
    #[test]
    fn prop_ttl_expiration_behavior(
        id in id_strategy(),
        value in value_strategy(),
        ttl in 1u64..3600
    ) {
        let (cache, clock) = manager_with_clock();

        let (before, after): (Option<Value>, Option<Value>) = block_on(async {
            cache.set(&id, &value, ttl).await;
            clock.advance_ms(ttl * 1000 - 1);
            let before = cache.get::<Value>(&id).await;
            clock.advance_ms(1);
            (before, cache.get::<Value>(&id).await)
        });

        prop_assert_eq!(before, Some(value));
        prop_assert!(after.is_none());
    }

    // The hit rate is a rounded percentage of recorded lookups.
    #[test]
    fn prop_hit_rate_bounds(hits in 0u64..500, misses in 0u64..500) {
        let metrics = CacheMetrics::new();
        for _ in 0..hits {
            metrics.record_hit();
        }
        for _ in 0..misses {
            metrics.record_miss();
        }

        let stats = metrics.stats();
        prop_assert_eq!(stats.total, hits + misses);
        prop_assert!((0.0..=100.0).contains(&stats.hit_rate));
        if stats.total > 0 {
            let exact = hits as f64 / stats.total as f64 * 100.0;
            prop_assert!((stats.hit_rate - exact).abs() <= 0.005 + f64::EPSILON * 100.0);
        } else {
            prop_assert_eq!(stats.hit_rate, 0.0);
        }
    }
}
