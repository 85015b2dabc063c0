use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Upper bounds of the latency buckets; one more bucket counts the rest.
pub const LATENCY_LIMITS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(5),
];

/// Counts operations into fixed `<= limit` buckets plus an overflow bucket.
#[derive(Debug)]
pub struct LatencyBuckets {
    limits: Vec<Duration>,
    counts: Vec<AtomicU64>,
}

impl LatencyBuckets {
    #[must_use]
    pub fn new(limits: &[Duration]) -> Self {
        let mut limits = limits.to_vec();
        limits.sort_unstable();
        limits.dedup();
        let counts = limits
            .iter()
            .map(|_limit| AtomicU64::new(0))
            .chain(std::iter::once(AtomicU64::new(0)))
            .collect();
        Self { limits, counts }
    }

    pub fn record(&self, elapsed: Duration) {
        let index = self
            .limits
            .iter()
            .position(|limit| elapsed <= *limit)
            .unwrap_or(self.limits.len());
        if let Some(count) = self.counts.get(index) {
            count.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn counts(&self) -> Vec<u64> {
        self.counts
            .iter()
            .map(|count| count.load(Ordering::Relaxed))
            .collect()
    }

    /// Column labels, e.g. `<=1s`, `<=2s`, `<=5s`, `>5s`.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .limits
            .iter()
            .map(|limit| format!("<={}", format_limit(*limit)))
            .collect();
        match self.limits.last() {
            Some(last) => labels.push(format!(">{}", format_limit(*last))),
            None => labels.push("all".to_owned()),
        }
        labels
    }
}

fn format_limit(limit: Duration) -> String {
    if limit.subsec_millis() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{}ms", limit.as_millis())
    }
}
