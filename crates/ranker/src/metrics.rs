//! Process-wide ranker counters, held behind `parking_lot` in a
//! lazily-initialized static — cheap to read from every request without
//! threading a counters handle through the call chain.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

#[derive(Debug, Clone, Default)]
pub struct AlgorithmStats {
    pub invocations: u64,
    pub total_time_ms: u64,
}

impl AlgorithmStats {
    pub fn mean_latency_ms(&self) -> f64 {
        if self.invocations == 0 {
            0.0
        } else {
            self.total_time_ms as f64 / self.invocations as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RankerMetrics {
    pub total_rankings: u64,
    pub total_time_ms: u64,
    pub total_duplicates_removed: u64,
    pub per_algorithm: HashMap<String, AlgorithmStats>,
}

impl RankerMetrics {
    fn record(&mut self, algorithm_id: &str, time_ms: u64, duplicates_removed: usize) {
        self.total_rankings += 1;
        self.total_time_ms += time_ms;
        self.total_duplicates_removed += duplicates_removed as u64;
        let stats = self.per_algorithm.entry(algorithm_id.to_string()).or_default();
        stats.invocations += 1;
        stats.total_time_ms += time_ms;
    }
}

static METRICS: Lazy<Mutex<RankerMetrics>> = Lazy::new(|| Mutex::new(RankerMetrics::default()));

pub fn record_ranking(algorithm_id: &str, time_ms: u64, duplicates_removed: usize) {
    METRICS.lock().record(algorithm_id, time_ms, duplicates_removed);
}

pub fn snapshot() -> RankerMetrics {
    METRICS.lock().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_accumulates_per_algorithm_latency() {
        let mut metrics = RankerMetrics::default();
        metrics.record("weighted_score", 10, 0);
        metrics.record("weighted_score", 20, 2);
        let stats = &metrics.per_algorithm["weighted_score"];
        assert_eq!(stats.invocations, 2);
        assert_eq!(stats.mean_latency_ms(), 15.0);
        assert_eq!(metrics.total_duplicates_removed, 2);
    }
}
