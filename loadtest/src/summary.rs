//! Run summary
//!
//! Aggregates goose's per-request metrics into the totals printed by the stop
//! hook, plus the WebSocket handshake tally goose does not see.

use goose::metrics::GooseMetrics;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Response-time histogram: milliseconds -> number of samples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencyHistogram {
    buckets: BTreeMap<u64, u64>,
    count: u64,
}

impl LatencyHistogram {
    pub fn record(&mut self, millis: u64) {
        self.record_many(millis, 1);
    }

    pub fn record_many(&mut self, millis: u64, samples: u64) {
        if samples == 0 {
            return;
        }
        *self.buckets.entry(millis).or_insert(0) += samples;
        self.count += samples;
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Value at quantile `q` in [0, 1], using the rounded-rank method
    pub fn percentile(&self, q: f64) -> Option<u64> {
        if self.count == 0 {
            return None;
        }

        let q = q.clamp(0.0, 1.0);
        let rank = (q * (self.count - 1) as f64).round() as u64;

        let mut seen = 0;
        for (&millis, &samples) in &self.buckets {
            seen += samples;
            if seen > rank {
                return Some(millis);
            }
        }
        self.buckets.keys().next_back().copied()
    }
}

/// WebSocket handshake counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandshakeTally {
    pub attempts: u64,
    pub failures: u64,
}

static HANDSHAKE_ATTEMPTS: AtomicU64 = AtomicU64::new(0);
static HANDSHAKE_FAILURES: AtomicU64 = AtomicU64::new(0);

/// Count one handshake attempt
pub fn record_handshake(success: bool) {
    HANDSHAKE_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
    if !success {
        HANDSHAKE_FAILURES.fetch_add(1, Ordering::Relaxed);
    }
}

/// Take the process-wide handshake counts, resetting them to zero
pub fn take_handshakes() -> HandshakeTally {
    HandshakeTally {
        attempts: HANDSHAKE_ATTEMPTS.swap(0, Ordering::Relaxed),
        failures: HANDSHAKE_FAILURES.swap(0, Ordering::Relaxed),
    }
}

/// Aggregate statistics of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_requests: u64,
    pub total_failures: u64,
    /// Sum of all response times
    pub total_time_ms: u64,
    pub latency: LatencyHistogram,
    pub handshakes: HandshakeTally,
}

impl RunSummary {
    /// Fold one request aggregate into the totals
    pub fn absorb<'a>(
        &mut self,
        success_count: u64,
        fail_count: u64,
        total_time_ms: u64,
        times: impl IntoIterator<Item = (&'a usize, &'a usize)>,
    ) {
        self.total_requests += success_count + fail_count;
        self.total_failures += fail_count;
        self.total_time_ms += total_time_ms;
        for (&millis, &samples) in times {
            self.latency.record_many(millis as u64, samples as u64);
        }
    }

    /// Build from goose's end-of-run metrics
    pub fn from_metrics(metrics: &GooseMetrics, handshakes: HandshakeTally) -> Self {
        let mut summary = Self {
            handshakes,
            ..Self::default()
        };

        for aggregate in metrics.requests.values() {
            summary.absorb(
                aggregate.success_count as u64,
                aggregate.fail_count as u64,
                aggregate.raw_data.total_time as u64,
                &aggregate.raw_data.times,
            );
        }

        summary
    }

    pub fn average_response_time_ms(&self) -> f64 {
        if self.latency.is_empty() {
            0.0
        } else {
            self.total_time_ms as f64 / self.latency.len() as f64
        }
    }

    pub fn failure_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_failures as f64 / self.total_requests as f64
        }
    }
}
