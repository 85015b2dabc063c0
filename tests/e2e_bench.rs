
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use ftpbench::app::{RunReport, run_bench};
use ftpbench::args::{Mode, Target};
use ftpbench::bench::StopReason;
use ftpbench::config::BenchConfig;
use ftpbench::error::{AppError, BenchError};
use ftpbench::ftp::Credentials;
use ftpbench::shutdown::shutdown_channel;

use support_ftp::{FtpBehavior, FtpServerHandle, spawn_ftp_server};

const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

fn run_async<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = Result<T, String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn config(servers: &[&FtpServerHandle], mode: Mode) -> BenchConfig {
    BenchConfig {
        mode,
        targets: servers
            .iter()
            .map(|server| Target::new("127.0.0.1", server.port()))
            .collect(),
        credentials: Credentials::new("bench", "secret"),
        timeout: Duration::from_secs(2),
        maxrun: Some(Duration::from_millis(300)),
        fixevery: 1,
        concurrent: 4,
        csv: None,
        file_size: 100_000,
        files: 2,
        cleanup_timeout: Duration::from_secs(2),
        dns_round_robin: false,
        console: false,
    }
}

fn upload(workdir: &str) -> Mode {
    Mode::Upload {
        workdir: workdir.to_owned(),
    }
}

fn download(workdir: &str) -> Mode {
    Mode::Download {
        workdir: workdir.to_owned(),
    }
}

fn bench(config: BenchConfig) -> Result<RunReport, String> {
    run_async(async move {
        let (_shutdown_tx, shutdown_rx) = shutdown_channel();
        run_bench(config, shutdown_rx)
            .await
            .map_err(|err| format!("run failed: {}", err))
    })
}

fn check_totals(report: &RunReport) -> Result<(), String> {
    let snapshot = &report.snapshot;
    let total = snapshot
        .success
        .saturating_add(snapshot.timeouts)
        .saturating_add(snapshot.rejected);
    if snapshot.requests != total || snapshot.requests != report.run.launched {
        return Err(format!("Inconsistent totals: {:?}", report));
    }
    if snapshot.in_flight != 0 {
        return Err("Operations still in flight after the run".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_login_counts_successes() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior::default())?;
    let report = bench(config(&[&server], Mode::Login))?;
    check_totals(&report)?;

    let snapshot = &report.snapshot;
    if snapshot.success == 0 || snapshot.success != snapshot.requests {
        return Err(format!("Expected only successes: {:?}", snapshot));
    }
    if report.run.stop_reason != StopReason::Deadline || report.cleanup.is_some() {
        return Err(format!("Unexpected run summary: {:?}", report));
    }
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;
    if state.logins < snapshot.success || state.max_open_connections > 4 {
        return Err(format!("Unexpected server state: {:?}", state));
    }
    Ok(())
}

#[test]
fn e2e_rejected_login_is_not_a_timeout() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior {
        reject_login: true,
        ..FtpBehavior::default()
    })?;
    let report = bench(config(&[&server], Mode::Login))?;
    check_totals(&report)?;
    let snapshot = &report.snapshot;
    if snapshot.rejected == 0 || snapshot.rejected != snapshot.requests {
        return Err(format!("Expected only rejections: {:?}", snapshot));
    }
    server.wait_for_idle(IDLE_TIMEOUT)?;
    Ok(())
}

#[test]
fn e2e_upload_cleans_every_file_once() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior::default())?;
    let report = bench(config(&[&server], upload("/incoming")))?;
    check_totals(&report)?;
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;

    let snapshot = &report.snapshot;
    if snapshot.success == 0 || snapshot.success != snapshot.requests {
        return Err(format!("Expected only completed uploads: {:?}", snapshot));
    }
    if snapshot.traffic_bytes != snapshot.success.saturating_mul(100_000) {
        return Err(format!("Unexpected traffic: {:?}", snapshot));
    }
    if state.stored.values().any(|bytes| *bytes != 100_000) {
        return Err("Server received a short file".to_owned());
    }
    if state
        .stored
        .keys()
        .any(|path| !path.starts_with("/incoming/bench_write-"))
    {
        return Err(format!("Unexpected paths: {:?}", state.stored.keys()));
    }

    let deleted: BTreeSet<&String> = state.deleted.iter().collect();
    let stored: BTreeSet<&String> = state.stored.keys().collect();
    if deleted.len() != state.deleted.len() || deleted != stored {
        return Err(format!(
            "Expected one DELE per stored file: stored {:?}, deleted {:?}",
            stored, state.deleted
        ));
    }
    let cleanup = report.cleanup.ok_or("Missing cleanup report")?;
    if cleanup.deleted != snapshot.success || cleanup.failed != 0 {
        return Err(format!("Unexpected cleanup: {:?}", cleanup));
    }
    Ok(())
}

#[test]
fn e2e_rejected_upload_leaves_nothing_to_clean() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior {
        reject_stor: true,
        ..FtpBehavior::default()
    })?;
    let report = bench(config(&[&server], upload("/incoming")))?;
    check_totals(&report)?;
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;

    if report.snapshot.rejected == 0 || report.snapshot.rejected != report.snapshot.requests {
        return Err(format!("Expected only rejections: {:?}", report.snapshot));
    }
    if !state.deleted.is_empty() || report.snapshot.traffic_bytes != 0 {
        return Err(format!("Nothing should be deleted: {:?}", state));
    }
    let cleanup = report.cleanup.ok_or("Missing cleanup report")?;
    if cleanup.attempted != 0 {
        return Err(format!("Unexpected cleanup: {:?}", cleanup));
    }
    Ok(())
}

#[test]
fn e2e_download_reads_prepared_files() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior {
        retr_bytes: 4096,
        ..FtpBehavior::default()
    })?;
    let report = bench(config(&[&server], download("/pub")))?;
    check_totals(&report)?;
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;

    let snapshot = &report.snapshot;
    if snapshot.success == 0 || snapshot.traffic_bytes != snapshot.success.saturating_mul(4096) {
        return Err(format!("Unexpected download stats: {:?}", snapshot));
    }
    if state.stored.len() != 2
        || state
            .stored
            .keys()
            .any(|path| !path.starts_with("/pub/bench_read-"))
    {
        return Err(format!("Expected two prepared files: {:?}", state.stored));
    }
    if state.deleted.len() != 2 {
        return Err(format!("Expected prepared files to be cleaned: {:?}", state));
    }
    Ok(())
}

#[test]
fn e2e_stalled_download_times_out() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior {
        stall_retr: true,
        ..FtpBehavior::default()
    })?;
    let mut config = config(&[&server], download("/pub"));
    config.timeout = Duration::from_millis(200);
    config.maxrun = Some(Duration::from_millis(500));
    let report = bench(config)?;
    check_totals(&report)?;

    let snapshot = &report.snapshot;
    if snapshot.timeouts == 0 || snapshot.timeouts != snapshot.requests {
        return Err(format!("Expected only timeouts: {:?}", snapshot));
    }
    if report.run.elapsed > Duration::from_millis(1700) {
        return Err(format!("Run overran its bound: {:?}", report.run));
    }
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;
    if state.deleted.len() != 2 {
        return Err(format!("Expected prepared files to be cleaned: {:?}", state));
    }
    Ok(())
}

#[test]
fn e2e_download_without_files_fails() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior {
        reject_stor: true,
        ..FtpBehavior::default()
    })?;
    let result = run_async(async {
        let (_shutdown_tx, shutdown_rx) = shutdown_channel();
        Ok(run_bench(config(&[&server], download("/pub")), shutdown_rx).await)
    })?;
    match result {
        Err(AppError::Bench(BenchError::NoFilesPrepared { requested: 2 })) => Ok(()),
        other => Err(format!("Expected NoFilesPrepared, got {:?}", other)),
    }
}

#[test]
fn e2e_hosts_share_selections() -> Result<(), String> {
    let first = spawn_ftp_server(FtpBehavior::default())?;
    let second = spawn_ftp_server(FtpBehavior::default())?;
    let report = bench(config(&[&first, &second], Mode::Login))?;
    check_totals(&report)?;

    let counts: Vec<u64> = report.hosts.iter().map(|(_, count)| *count).collect();
    let [left, right] = counts.as_slice() else {
        return Err(format!("Expected two host counts: {:?}", report.hosts));
    };
    if left.abs_diff(*right) > 1 || left.saturating_add(*right) != report.run.launched {
        return Err(format!("Unbalanced selections: {:?}", report.hosts));
    }
    let first_state = first.wait_for_idle(IDLE_TIMEOUT)?;
    let second_state = second.wait_for_idle(IDLE_TIMEOUT)?;
    if first_state.logins == 0 || second_state.logins == 0 {
        return Err("Both servers should see logins".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_interrupt_stops_unbounded_run() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior::default())?;
    let mut config = config(&[&server], upload("/incoming"));
    config.maxrun = None;
    let report = run_async(async move {
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            drop(shutdown_tx.send(()));
        });
        run_bench(config, shutdown_rx)
            .await
            .map_err(|err| format!("run failed: {}", err))
    })?;
    check_totals(&report)?;
    if report.run.stop_reason != StopReason::Interrupted {
        return Err(format!("Expected an interrupted run: {:?}", report.run));
    }
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;
    if state.deleted.len() != state.stored.len() {
        return Err(format!("Interrupted run must still clean up: {:?}", state));
    }
    Ok(())
}

fn bench_after_early_interrupt(config: BenchConfig) -> Result<RunReport, String> {
    run_async(async move {
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        shutdown_tx
            .send(())
            .map_err(|err| format!("send failed: {}", err))?;
        tokio::time::timeout(Duration::from_secs(5), run_bench(config, shutdown_rx))
            .await
            .map_err(|_elapsed| "Run ignored a shutdown sent before it started".to_owned())?
            .map_err(|err| format!("run failed: {}", err))
    })
}

#[test]
fn e2e_interrupt_before_start_stops_run() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior::default())?;
    let mut config = config(&[&server], Mode::Login);
    config.maxrun = None;
    let report = bench_after_early_interrupt(config)?;
    check_totals(&report)?;
    if report.run.stop_reason != StopReason::Interrupted {
        return Err(format!("Expected an interrupted run: {:?}", report.run));
    }
    server.wait_for_idle(IDLE_TIMEOUT)?;
    Ok(())
}

#[test]
fn e2e_interrupt_before_start_skips_preparation() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior::default())?;
    let mut config = config(&[&server], download("/pub"));
    config.maxrun = None;
    let report = bench_after_early_interrupt(config)?;
    if report.run.stop_reason != StopReason::Interrupted || report.run.launched != 0 {
        return Err(format!("Expected no launches: {:?}", report.run));
    }
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;
    if !state.stored.is_empty() || state.retrieved != 0 {
        return Err(format!("Nothing should reach the server: {:?}", state));
    }
    Ok(())
}

#[test]
fn e2e_failed_deletes_do_not_fail_the_run() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior {
        reject_dele: true,
        ..FtpBehavior::default()
    })?;
    let report = bench(config(&[&server], upload("/incoming")))?;
    check_totals(&report)?;
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;

    let cleanup = report.cleanup.ok_or("Missing cleanup report")?;
    if cleanup.attempted == 0
        || cleanup.failed != cleanup.attempted
        || cleanup.deleted != 0
    {
        return Err(format!("Expected every delete to fail: {:?}", cleanup));
    }
    if state.rejected_deletes != cleanup.attempted || !state.deleted.is_empty() {
        return Err(format!("Unexpected server state: {:?}", state));
    }
    if report.snapshot.success != report.snapshot.requests {
        return Err(format!("Uploads themselves should succeed: {:?}", report.snapshot));
    }
    Ok(())
}

#[test]
fn e2e_unanswered_quit_still_cleans_stored_files() -> Result<(), String> {
    let server = spawn_ftp_server(FtpBehavior {
        stall_quit: true,
        ..FtpBehavior::default()
    })?;
    let mut config = config(&[&server], upload("/incoming"));
    config.timeout = Duration::from_millis(300);
    config.cleanup_timeout = Duration::from_millis(300);
    let report = bench(config)?;
    check_totals(&report)?;
    let state = server.wait_for_idle(IDLE_TIMEOUT)?;

    if state.stored.is_empty() {
        return Err(format!("Expected stored files: {:?}", report.snapshot));
    }
    let deleted: BTreeSet<&String> = state.deleted.iter().collect();
    let stored: BTreeSet<&String> = state.stored.keys().collect();
    if deleted != stored {
        return Err(format!(
            "Every stored file must be cleaned: stored {:?}, deleted {:?}",
            stored, state.deleted
        ));
    }
    Ok(())
}
