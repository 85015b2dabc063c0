use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::args::{Mode, expand_dns_round_robin};
use crate::bench::{
    CleanupReport, DownloadOperation, FtpClientAdapter, LoginOperation, Operation,
    RoundRobin, RunSummary, Runner, StopReason, TargetSelector, UploadOperation,
    UploadedFiles, cleanup_files, prepare_download_files,
};
use crate::config::BenchConfig;
use crate::error::{AppResult, BenchError};
use crate::metrics::{
    LATENCY_LIMITS, LatencySummary, Stats, StatsSnapshot, TickerReport, spawn_stats_ticker,
};
use crate::shutdown::ShutdownReceiver;
use crate::sinks::{StatsLayout, StatsSink, format_duration};

/// Interval between stats rows.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Everything known about a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: Mode,
    pub run: RunSummary,
    pub snapshot: StatsSnapshot,
    pub latency: LatencySummary,
    pub ticks: TickerReport,
    pub cleanup: Option<CleanupReport>,
    /// `(address, selections)` per host when more than one host is used.
    pub hosts: Vec<(String, u64)>,
}

fn banner(config: &BenchConfig) -> String {
    let mut parts = vec![
        format!("Start {} benchmark:", config.mode.name()),
        format!("concurrent={}", config.concurrent),
        format!("timeout={}", format_duration(config.timeout)),
    ];
    if config.mode.transfers_files() {
        parts.push(format!("size={}MB", config.size_mb()));
    }
    if matches!(config.mode, Mode::Download { .. }) {
        parts.push(format!("filecount={}", config.files));
    }
    parts.join(" ")
}

fn say(config: &BenchConfig, line: &str) {
    if config.console {
        println!("{}", line);
    } else {
        info!("{}", line);
    }
}

struct RunContext {
    config: BenchConfig,
    selector: Arc<TargetSelector>,
    stats: Arc<Stats>,
    client: Arc<FtpClientAdapter>,
}

impl RunContext {
    fn report(
        &self,
        run: RunSummary,
        ticks: TickerReport,
        cleanup: Option<CleanupReport>,
    ) -> RunReport {
        let counts = self.selector.selection_counts().unwrap_or_default();
        let hosts = self
            .selector
            .host_labels()
            .into_iter()
            .zip(counts)
            .collect();
        RunReport {
            mode: self.config.mode.clone(),
            run,
            snapshot: self.stats.snapshot(),
            latency: self.stats.latency_summary(),
            ticks,
            cleanup,
            hosts,
        }
    }

    async fn cleanup(&self) -> Option<CleanupReport> {
        if !self.config.mode.transfers_files() {
            return None;
        }
        let paths = self.client.uploads().take();
        say(&self.config, &format!("Cleaning {} files...", paths.len()));
        let concurrency = usize::try_from(self.config.concurrent).unwrap_or(usize::MAX);
        let report = cleanup_files(
            &self.client,
            paths,
            self.config.cleanup_timeout,
            concurrency,
        )
        .await;
        debug!("Cleanup finished: {:?}", report);
        Some(report)
    }
}

enum Prepared {
    Ready(RoundRobin<String>),
    Interrupted,
}

/// Seeds the download directory with the files the run reads from.
async fn prepare(
    ctx: &RunContext,
    workdir: &str,
    shutdown_rx: &mut ShutdownReceiver,
) -> Result<Prepared, BenchError> {
    say(&ctx.config, "Preparing for testing...");
    let prepared = prepare_download_files(
        &ctx.client,
        workdir,
        ctx.config.file_size,
        ctx.config.files,
        ctx.config.cleanup_timeout,
        shutdown_rx,
    )
    .await;

    if prepared.interrupted {
        return Ok(Prepared::Interrupted);
    }
    RoundRobin::new(prepared.paths)
        .map(Prepared::Ready)
        .ok_or(BenchError::NoFilesPrepared {
            requested: ctx.config.files,
        })
}

/// Runs one benchmark: optional download seeding, the timed run with the
/// stats ticker, then cleanup of every file the run created.
///
/// Cleanup also runs when the run itself fails; the run error is returned
/// afterwards.
///
/// `shutdown_rx` must be subscribed before anything can signal shutdown. A
/// signal already queued on it stops the run as soon as it starts.
///
/// # Errors
///
/// Returns an error when no download file could be prepared, the stats
/// output cannot be opened, or the worker pool fails.
pub async fn run_bench(
    mut config: BenchConfig,
    mut shutdown_rx: ShutdownReceiver,
) -> AppResult<RunReport> {
    if config.dns_round_robin {
        config.targets = expand_dns_round_robin(std::mem::take(&mut config.targets)).await;
    }
    let selector = Arc::new(TargetSelector::new(config.targets.clone())?);
    let stats = Arc::new(Stats::new(&LATENCY_LIMITS)?);
    let client = Arc::new(FtpClientAdapter::new(
        Arc::clone(&selector),
        config.credentials.clone(),
        Arc::new(UploadedFiles::default()),
    ));
    let ctx = RunContext {
        config,
        selector,
        stats,
        client,
    };

    let client = Arc::clone(&ctx.client);
    let stats = Arc::clone(&ctx.stats);
    let operation: Arc<dyn Operation> = match &ctx.config.mode {
        Mode::Login => Arc::new(LoginOperation::new(client)),
        Mode::Upload { workdir } => Arc::new(UploadOperation::new(
            client,
            workdir.clone(),
            ctx.config.file_size,
            stats,
        )),
        Mode::Download { workdir } => match prepare(&ctx, workdir, &mut shutdown_rx).await {
            Ok(Prepared::Ready(files)) => Arc::new(DownloadOperation::new(client, files, stats)),
            Ok(Prepared::Interrupted) => {
                let cleanup = ctx.cleanup().await;
                let run = RunSummary {
                    launched: 0,
                    stop_reason: StopReason::Interrupted,
                    elapsed: Duration::ZERO,
                };
                return Ok(ctx.report(run, TickerReport::default(), cleanup));
            }
            Err(err) => {
                drop(ctx.cleanup().await);
                return Err(err.into());
            }
        },
    };

    say(&ctx.config, &banner(&ctx.config));
    let layout = StatsLayout::new(
        &ctx.config.mode,
        ctx.stats.latency_labels(),
        ctx.selector.host_labels(),
    );
    let sink = StatsSink::open(layout, ctx.config.console, ctx.config.csv.as_deref()).await?;

    let (stop_tx, stop_rx) = oneshot::channel();
    let ticker = spawn_stats_ticker(
        Arc::clone(&ctx.stats),
        Arc::clone(&ctx.selector),
        sink,
        TICK_PERIOD,
        ctx.config.fixevery,
        stop_rx,
    );

    let mut runner = Runner::new(ctx.config.concurrent, ctx.config.timeout, ctx.config.maxrun);
    let run_result = runner
        .run(operation, Arc::clone(&ctx.stats), &mut shutdown_rx)
        .await;

    drop(stop_tx.send(()));
    let ticks = ticker.await?;
    if ctx.config.console {
        println!();
    }

    let cleanup = ctx.cleanup().await;
    let run = run_result?;
    info!(
        "Run stopped ({:?}) after {}",
        run.stop_reason,
        format_duration(run.elapsed)
    );
    Ok(ctx.report(run, ticks, cleanup))
}
