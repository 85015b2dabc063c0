//! Shared run statistics, rate computation, and the periodic stats ticker.
mod histogram;
mod latency;
mod stats;
mod ticker;
mod window;


pub use histogram::LatencyHistogram;
pub use latency::{LATENCY_LIMITS, LatencyBuckets};
pub use stats::{InFlightGuard, LatencySummary, Stats, StatsSnapshot};
pub use ticker::{StatsRow, TickerReport, spawn_stats_ticker};
pub use window::{RateWindow, Rates};
