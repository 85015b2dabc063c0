use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{debug, error};

use crate::app::{self, RunReport};
use crate::args::BenchArgs;
use crate::config::{BenchConfig, apply_config, load_config};
use crate::error::AppResult;
use crate::shutdown::shutdown_channel;
use crate::shutdown_handlers::setup_signal_shutdown_handler;

/// Process entry point used by the binary.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, the runtime cannot
/// start, or the run fails. An interrupted run is not an error.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    let config = build_config(args, &matches).inspect_err(|err| error!("{}", err))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let report = runtime
        .block_on(run_async(config))
        .inspect_err(|err| error!("{}", err))?;
    app::summary::print_summary(&report);
    Ok(())
}

fn parse_args() -> AppResult<Option<(BenchArgs, ArgMatches)>> {
    let mut cmd = BenchArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = BenchArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--")
}

fn build_config(mut args: BenchArgs, matches: &ArgMatches) -> AppResult<BenchConfig> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }
    debug!("Resolved arguments: {:?}", args);
    BenchConfig::from_args(&args)
}

async fn run_async(config: BenchConfig) -> AppResult<RunReport> {
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let result = app::run_bench(config, shutdown_rx).await;

    drop(shutdown_tx.send(()));
    if let Err(err) = signal_handle.await {
        debug!("Signal handler task failed: {}", err);
    }
    result
}
