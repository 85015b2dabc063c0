use tokio::time::Instant;

use super::stats::StatsSnapshot;

/// Per-second rates between the last fixed tick and now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rates {
    pub requests_per_sec: u64,
    pub success_per_sec: u64,
    pub traffic_per_sec: u64,
}

/// Baseline for rate computation.
///
/// Intermediate ticks compute rates against the baseline without moving it;
/// a fixed tick computes its rates and then becomes the new baseline.
#[derive(Debug, Clone)]
pub struct RateWindow {
    baseline: StatsSnapshot,
    baseline_at: Instant,
}

impl RateWindow {
    #[must_use]
    pub fn new(started_at: Instant) -> Self {
        Self {
            baseline: StatsSnapshot::default(),
            baseline_at: started_at,
        }
    }

    pub fn observe(&mut self, snapshot: &StatsSnapshot, now: Instant, fixed: bool) -> Rates {
        let elapsed_ms =
            u64::try_from(now.saturating_duration_since(self.baseline_at).as_millis())
                .unwrap_or(u64::MAX);
        let rates = Rates {
            requests_per_sec: per_second(
                snapshot.requests.saturating_sub(self.baseline.requests),
                elapsed_ms,
            ),
            success_per_sec: per_second(
                snapshot.success.saturating_sub(self.baseline.success),
                elapsed_ms,
            ),
            traffic_per_sec: per_second(
                snapshot
                    .traffic_bytes
                    .saturating_sub(self.baseline.traffic_bytes),
                elapsed_ms,
            ),
        };
        if fixed {
            self.baseline = snapshot.clone();
            self.baseline_at = now;
        }
        rates
    }
}

fn per_second(delta: u64, elapsed_ms: u64) -> u64 {
    let scaled = u128::from(delta).saturating_mul(1000);
    let rate = scaled.checked_div(u128::from(elapsed_ms)).unwrap_or(0);
    u64::try_from(rate).unwrap_or(u64::MAX)
}
