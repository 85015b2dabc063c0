//! Thin wrappers over internal parsers for the `fuzz/` targets.
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{
    BenchArgs, PositiveU64, PositiveUsize, RunLimit, Target, TargetList, parse_duration_arg,
    parse_maxrun, parse_target, parse_targets,
};
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult};

thread_local! {
    static BASE_MATCHES: ArgMatches = BenchArgs::command().get_matches_from(["ftpbench", "login"]);
}

/// Parses one `host[:port]` entry.
///
/// # Errors
///
/// Returns an error when the entry is malformed.
pub fn parse_target_input(input: &str) -> AppResult<Target> {
    parse_target(input).map_err(AppError::from)
}

/// Parses a comma separated host list.
///
/// # Errors
///
/// Returns an error when the list is empty or an entry is malformed.
pub fn parse_targets_input(input: &str) -> AppResult<TargetList> {
    parse_targets(input).map_err(AppError::from)
}

/// Parses a `--maxrun` value.
///
/// # Errors
///
/// Returns an error when the value is neither minutes nor a duration.
pub fn parse_maxrun_input(input: &str) -> AppResult<RunLimit> {
    parse_maxrun(input).map_err(AppError::from)
}

/// Parses a duration argument (e.g. `10`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input)
}

/// Parses a positive u64 string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_u64_input(input: &str) -> AppResult<u64> {
    let value: PositiveU64 = input.parse()?;
    Ok(value.get())
}

/// Parses a positive usize string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_usize_input(input: &str) -> AppResult<usize> {
    let value: PositiveUsize = input.parse()?;
    Ok(value.get())
}

/// Parses TOML config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<BenchArgs> {
    let config: ConfigFile = toml::from_str(input)?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<BenchArgs> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<BenchArgs> {
    BASE_MATCHES.with(|matches| {
        let mut args = BenchArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(args)
    })
}
