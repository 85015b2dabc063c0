use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable checked before `RUST_LOG`.
const LOG_ENV: &str = "FTPBENCH_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn build_filter(verbose: bool, configured: Option<&str>) -> EnvFilter {
    configured.map_or_else(
        || EnvFilter::new(default_directive(verbose)),
        |value| EnvFilter::try_new(value).unwrap_or_else(|_err| EnvFilter::new("info")),
    )
}

/// Installs the global subscriber. Log lines go to stderr so the stats
/// table on stdout stays readable.
pub fn init_logging(verbose: bool) {
    let configured = std::env::var(LOG_ENV)
        .or_else(|_err| std::env::var("RUST_LOG"))
        .ok();
    let filter = build_filter(verbose, configured.as_deref());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
