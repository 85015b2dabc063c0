use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::stats::{Stats, StatsSnapshot};
use super::window::{RateWindow, Rates};
use crate::bench::TargetSelector;
use crate::sinks::StatsSink;

/// One stats line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRow {
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    /// Fixed rows are committed; the others are overwritten by the next row.
    pub fixed: bool,
    pub snapshot: StatsSnapshot,
    pub rates: Rates,
    /// Selections per host, in host order, when more than one host is used.
    pub hosts: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickerReport {
    pub ticks: u64,
    pub fixed_ticks: u64,
}

/// Spawns the stats ticker.
///
/// The first tick fires one `period` after the ticker starts; every
/// `fixevery`-th tick is fixed. The task ends when `stop_rx` fires or its
/// sender is dropped, then flushes the sink.
#[must_use]
pub fn spawn_stats_ticker(
    stats: Arc<Stats>,
    selector: Arc<TargetSelector>,
    mut sink: StatsSink,
    period: Duration,
    fixevery: u64,
    mut stop_rx: oneshot::Receiver<()>,
) -> JoinHandle<TickerReport> {
    tokio::spawn(async move {
        let started_at = Instant::now();
        let first_tick = started_at.checked_add(period).unwrap_or(started_at);
        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut window = RateWindow::new(started_at);
        let mut report = TickerReport::default();

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                now = ticker.tick() => {
                    report.ticks = report.ticks.saturating_add(1);
                    let fixed = report
                        .ticks
                        .checked_rem(fixevery)
                        .is_none_or(|remainder| remainder == 0);
                    if fixed {
                        report.fixed_ticks = report.fixed_ticks.saturating_add(1);
                    }

                    let snapshot = stats.snapshot();
                    let rates = window.observe(&snapshot, now, fixed);
                    let row = StatsRow {
                        time: chrono::Local::now().format("%H:%M:%S").to_string(),
                        fixed,
                        snapshot,
                        rates,
                        hosts: selector.selection_counts(),
                    };
                    sink.write(&row).await;
                }
            }
        }

        sink.finish();
        report
    })
}
