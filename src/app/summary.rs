use crate::bench::StopReason;
use crate::sinks::{format_bytes, format_duration, format_x100};

use super::runner::RunReport;

pub(crate) struct SummaryStats {
    pub(crate) success_rate_x100: u64,
    pub(crate) avg_ops_x100: u64,
    pub(crate) avg_traffic_per_sec: u64,
}

pub(crate) fn compute_summary_stats(report: &RunReport) -> SummaryStats {
    let duration_ms = report.run.elapsed.as_millis().max(1);
    let total = report.snapshot.requests;
    let success = report.snapshot.success;

    let success_rate_x100 = if total > 0 {
        let scaled = u128::from(success)
            .saturating_mul(10_000)
            .checked_div(u128::from(total))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    } else {
        0
    };

    let avg_ops_x100 = u128::from(total)
        .saturating_mul(100_000)
        .checked_div(duration_ms)
        .unwrap_or(0);
    let avg_traffic_per_sec = u128::from(report.snapshot.traffic_bytes)
        .saturating_mul(1000)
        .checked_div(duration_ms)
        .unwrap_or(0);

    SummaryStats {
        success_rate_x100,
        avg_ops_x100: u64::try_from(avg_ops_x100).unwrap_or(u64::MAX),
        avg_traffic_per_sec: u64::try_from(avg_traffic_per_sec).unwrap_or(u64::MAX),
    }
}

/// Final report lines, printed after cleanup.
pub(crate) fn summary_lines(report: &RunReport) -> Vec<String> {
    let stats = compute_summary_stats(report);
    let snapshot = &report.snapshot;
    let latency = &report.latency;
    let stopped_by = match report.run.stop_reason {
        StopReason::Deadline => "maxrun reached",
        StopReason::Interrupted => "interrupted",
    };

    let mut lines = vec![
        format!("Mode: {}", report.mode.name()),
        format!(
            "Duration: {} ({})",
            format_duration(report.run.elapsed),
            stopped_by
        ),
        format!("Operations: {} ({}/s)", snapshot.requests, format_x100(stats.avg_ops_x100)),
        format!(
            "Successful: {} ({}%)",
            snapshot.success,
            format_x100(stats.success_rate_x100)
        ),
        format!("Timeouts: {}", snapshot.timeouts),
        format!("Rejected: {}", snapshot.rejected),
    ];
    if report.mode.transfers_files() {
        lines.push(format!(
            "Traffic: {} ({}/s)",
            format_bytes(snapshot.traffic_bytes),
            format_bytes(stats.avg_traffic_per_sec)
        ));
    }
    lines.push(format!(
        "Latency min/avg/max: {}ms / {}ms / {}ms",
        latency.min_ms, latency.avg_ms, latency.max_ms
    ));
    lines.push(format!(
        "Latency p50/p90/p99: {}ms / {}ms / {}ms",
        latency.p50_ms, latency.p90_ms, latency.p99_ms
    ));
    for (host, count) in &report.hosts {
        lines.push(format!("Server {}: {} selections", host, count));
    }
    if let Some(cleanup) = report.cleanup {
        lines.push(format!(
            "Cleanup: {} of {} files deleted ({} failed)",
            cleanup.deleted, cleanup.attempted, cleanup.failed
        ));
    }
    lines
}

pub(crate) fn print_summary(report: &RunReport) {
    for line in summary_lines(report) {
        println!("{}", line);
    }
}
