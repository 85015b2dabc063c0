use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{BenchArgs, PositiveU64, PositiveUsize, parse_targets};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue};

/// Values set on the command line or through an environment variable are
/// left alone; everything else may come from the config file.
fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: u64, field: &'static str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive { field, source: err })
    })
}

fn ensure_positive_usize(value: usize, field: &'static str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive { field, source: err })
    })
}

fn config_duration(
    value: &DurationValue,
    field: &'static str,
) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|err| invalid_duration(field, err))
}

fn invalid_duration(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidDuration { field, source })
}

/// Applies configuration values to CLI arguments.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "hosts")
        && let Some(hosts) = config.host.as_ref()
    {
        args.hosts = parse_targets(&hosts.joined())
            .map_err(|err| AppError::config(ConfigError::InvalidHost { source: err }))?;
    }

    if !is_explicit(matches, "user")
        && let Some(user) = config.user.clone()
    {
        args.user = Some(user);
    }

    if !is_explicit(matches, "password")
        && let Some(password) = config.password.clone()
    {
        args.password = Some(password);
    }

    if !is_explicit(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = config_duration(timeout, "timeout")?;
    }

    if !is_explicit(matches, "maxrun")
        && let Some(maxrun) = config.maxrun.as_ref()
    {
        args.maxrun = maxrun
            .to_run_limit()
            .map_err(|err| invalid_duration("maxrun", err))?;
    }

    if !is_explicit(matches, "cleanup_timeout")
        && let Some(timeout) = config.cleanup_timeout.as_ref()
    {
        args.cleanup_timeout = config_duration(timeout, "cleanup_timeout")?;
    }

    if !is_explicit(matches, "fixevery")
        && let Some(fixevery) = config.fixevery
    {
        args.fixevery = ensure_positive_u64(fixevery, "fixevery")?;
    }

    if !is_explicit(matches, "concurrent")
        && let Some(concurrent) = config.concurrent
    {
        args.concurrent = ensure_positive_usize(concurrent, "concurrent")?;
    }

    if !is_explicit(matches, "size")
        && let Some(size) = config.size
    {
        args.size = ensure_positive_u64(size, "size")?;
    }

    if !is_explicit(matches, "files")
        && let Some(files) = config.files
    {
        args.files = ensure_positive_u64(files, "files")?;
    }

    if !is_explicit(matches, "csv")
        && let Some(csv) = config.csv.as_ref()
    {
        args.csv = Some(PathBuf::from(csv));
    }

    if !is_explicit(matches, "dns_round_robin")
        && let Some(enabled) = config.dns_round_robin
    {
        args.dns_round_robin = enabled;
    }

    Ok(())
}
