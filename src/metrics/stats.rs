use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use super::histogram::LatencyHistogram;
use super::latency::LatencyBuckets;
use crate::bench::Outcome;
use crate::error::MetricsError;

/// Shared counters for one run.
///
/// Every counter only grows, except the in-flight gauge. Snapshots derive
/// `requests` from the three outcome counters they read, so a snapshot always
/// satisfies `requests == success + timeouts + rejected`.
#[derive(Debug)]
pub struct Stats {
    success: AtomicU64,
    timeouts: AtomicU64,
    rejected: AtomicU64,
    in_flight: AtomicU64,
    traffic_bytes: AtomicU64,
    latency_sum_ms: AtomicU64,
    buckets: LatencyBuckets,
    histogram: Mutex<LatencyHistogram>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requests: u64,
    pub success: u64,
    pub timeouts: u64,
    pub rejected: u64,
    pub in_flight: u64,
    pub traffic_bytes: u64,
    pub latency_buckets: Vec<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencySummary {
    pub count: u64,
    pub min_ms: u64,
    pub avg_ms: u64,
    pub max_ms: u64,
    pub p50_ms: u64,
    pub p90_ms: u64,
    pub p99_ms: u64,
}

impl Stats {
    /// Creates empty stats with the given latency bucket limits.
    ///
    /// # Errors
    ///
    /// Returns an error when the latency histogram cannot be created.
    pub fn new(latency_limits: &[Duration]) -> Result<Self, MetricsError> {
        Ok(Self {
            success: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),
            traffic_bytes: AtomicU64::new(0),
            latency_sum_ms: AtomicU64::new(0),
            buckets: LatencyBuckets::new(latency_limits),
            histogram: Mutex::new(LatencyHistogram::new()?),
        })
    }

    /// Marks one operation as in flight until the guard drops.
    #[must_use]
    pub fn begin(&self) -> InFlightGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard {
            in_flight: &self.in_flight,
        }
    }

    pub fn add_traffic(&self, bytes: u64) {
        self.traffic_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record(&self, outcome: &Outcome) {
        let elapsed = outcome.elapsed();
        self.buckets.record(elapsed);
        let latency_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.latency_sum_ms.fetch_add(latency_ms, Ordering::Relaxed);
        {
            let mut histogram = self
                .histogram
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Err(err) = histogram.record(latency_ms) {
                debug!("{}", err);
            }
        }

        let counter = match outcome {
            Outcome::Success { .. } => &self.success,
            Outcome::Timeout { .. } => &self.timeouts,
            Outcome::Rejected { .. } => &self.rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        let success = self.success.load(Ordering::Relaxed);
        let timeouts = self.timeouts.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        StatsSnapshot {
            requests: success.saturating_add(timeouts).saturating_add(rejected),
            success,
            timeouts,
            rejected,
            in_flight: self.in_flight.load(Ordering::Relaxed),
            traffic_bytes: self.traffic_bytes.load(Ordering::Relaxed),
            latency_buckets: self.buckets.counts(),
        }
    }

    #[must_use]
    pub fn latency_labels(&self) -> Vec<String> {
        self.buckets.labels()
    }

    #[must_use]
    pub fn latency_summary(&self) -> LatencySummary {
        let histogram = self
            .histogram
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let count = histogram.count();
        let (p50_ms, p90_ms, p99_ms) = histogram.percentiles();
        let avg_ms = self
            .latency_sum_ms
            .load(Ordering::Relaxed)
            .checked_div(count)
            .unwrap_or(0);
        LatencySummary {
            count,
            min_ms: histogram.min(),
            avg_ms,
            max_ms: histogram.max(),
            p50_ms,
            p90_ms,
            p99_ms,
        }
    }
}

/// Decrements the in-flight gauge when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'stats> {
    in_flight: &'stats AtomicU64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut current = self.in_flight.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_sub(1);
            match self.in_flight.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}
