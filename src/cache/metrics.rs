//! Cache Metrics Module
//!
//! Process-wide hit/miss counters, safe under concurrent increment.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Metrics Snapshot ==
/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    /// Percentage, rounded to 2 decimals
    pub hit_rate: f64,
    pub total: u64,
}

// == Cache Metrics ==
/// Tracks cache hits and misses.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates a new CacheMetrics with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Hit Rate ==
    /// Hit rate as a percentage rounded to 2 decimals, 0 when nothing was recorded.
    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate
    }

    // == Stats ==
    pub fn stats(&self) -> MetricsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64 * 10_000.0).round() / 100.0
        };

        MetricsSnapshot {
            hits,
            misses,
            hit_rate,
            total,
        }
    }

    // == Reset ==
    /// Zeroes both counters.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_metrics_new() {
        let metrics = CacheMetrics::new();
        let stats = metrics.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheMetrics::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let metrics = CacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.hit_rate(), 100.0);
    }

    #[test]
    fn test_stats_mixed_and_reset() {
        let metrics = CacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        assert_eq!(
            metrics.stats(),
            MetricsSnapshot {
                hits: 2,
                misses: 1,
                hit_rate: 66.67,
                total: 3
            }
        );

        metrics.reset();
        assert_eq!(
            metrics.stats(),
            MetricsSnapshot {
                hits: 0,
                misses: 0,
                hit_rate: 0.0,
                total: 0
            }
        );
    }

    #[test]
    fn test_concurrent_increments() {
        let metrics = Arc::new(CacheMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.record_hit();
                        metrics.record_miss();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = metrics.stats();
        assert_eq!(stats.hits, 8000);
        assert_eq!(stats.misses, 8000);
        assert_eq!(stats.hit_rate, 50.0);
    }
}
