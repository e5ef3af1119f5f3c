//! Per-endpoint latency and error aggregation.
//!
//! Requests are recorded under a normalized name template (the literal
//! stream id, slug, or query value never appears in the metric name) so
//! that statistics aggregate per endpoint shape rather than per value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Shared recorder that sessions report every request outcome into.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    endpoints: Mutex<HashMap<String, Samples>>,
}

#[derive(Debug, Default)]
struct Samples {
    latencies_ms: Vec<u64>,
    errors: u64,
}

impl StatsRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful request under its normalized name.
    pub fn record_success(&self, name: &str, latency: Duration) {
        let mut endpoints = self.lock();
        endpoints
            .entry(name.to_string())
            .or_default()
            .latencies_ms
            .push(latency.as_millis() as u64);
    }

    /// Record a failed request (transport error or non-success status).
    pub fn record_failure(&self, name: &str) {
        let mut endpoints = self.lock();
        endpoints.entry(name.to_string()).or_default().errors += 1;
    }

    /// Names recorded so far, sorted.
    #[must_use]
    pub fn endpoint_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot the recorded samples into a run summary.
    #[must_use]
    pub fn summarize(&self, elapsed: Duration, concurrency: u32) -> RunSummary {
        let endpoints = self.lock();
        let mut stats: Vec<EndpointStats> = endpoints
            .iter()
            .map(|(name, samples)| {
                EndpointStats::from_samples(name, &samples.latencies_ms, samples.errors)
            })
            .collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));

        let successful: u64 = stats.iter().map(|s| s.count).sum();
        let failed: u64 = stats.iter().map(|s| s.errors).sum();
        let elapsed_secs = elapsed.as_secs_f64();
        let throughput_rps = if elapsed_secs > 0.0 {
            successful as f64 / elapsed_secs
        } else {
            0.0
        };

        RunSummary {
            timestamp: chrono::Utc::now().to_rfc3339(),
            elapsed_secs,
            concurrency,
            total_requests: successful + failed,
            successful_requests: successful,
            failed_requests: failed,
            throughput_rps,
            endpoints: stats,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Samples>> {
        self.endpoints
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Aggregated statistics for one normalized endpoint name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointStats {
    /// Normalized endpoint name (e.g. `/detail/<id>`)
    pub name: String,
    /// Successful request count
    pub count: u64,
    /// Failed request count
    pub errors: u64,
    /// Min latency in ms
    pub min_ms: u64,
    /// Max latency in ms
    pub max_ms: u64,
    /// Avg latency in ms
    pub avg_ms: u64,
    /// p50 latency in ms
    pub p50_ms: u64,
    /// p95 latency in ms
    pub p95_ms: u64,
    /// p99 latency in ms
    pub p99_ms: u64,
}

impl EndpointStats {
    /// Create from raw latency samples.
    #[must_use]
    pub fn from_samples(name: &str, samples: &[u64], errors: u64) -> Self {
        if samples.is_empty() {
            return Self {
                name: name.to_string(),
                count: 0,
                errors,
                min_ms: 0,
                max_ms: 0,
                avg_ms: 0,
                p50_ms: 0,
                p95_ms: 0,
                p99_ms: 0,
            };
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();
        let count = sorted.len() as u64;
        let sum: u64 = sorted.iter().sum();

        Self {
            name: name.to_string(),
            count,
            errors,
            min_ms: sorted[0],
            max_ms: sorted[sorted.len() - 1],
            avg_ms: sum / count,
            p50_ms: percentile(&sorted, 50),
            p95_ms: percentile(&sorted, 95),
            p99_ms: percentile(&sorted, 99),
        }
    }
}

/// Results of one load run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// ISO 8601 timestamp of the run
    pub timestamp: String,
    /// Total elapsed wall time (seconds)
    pub elapsed_secs: f64,
    /// Number of concurrent sessions
    pub concurrency: u32,
    /// Total requests issued
    pub total_requests: u64,
    /// Successful requests
    pub successful_requests: u64,
    /// Failed requests
    pub failed_requests: u64,
    /// Successful requests per second
    pub throughput_rps: f64,
    /// Per-endpoint statistics, sorted by name
    pub endpoints: Vec<EndpointStats>,
}

impl RunSummary {
    /// Error rate as a percentage of all requests.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.failed_requests as f64 / self.total_requests as f64) * 100.0
        }
    }

    /// Serialize to pretty-printed JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Percentile from sorted samples. Returns 0 for empty slices.
fn percentile(sorted: &[u64], p: u8) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = ((f64::from(p) / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
