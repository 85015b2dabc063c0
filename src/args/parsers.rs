use std::time::Duration;

use super::types::{DEFAULT_FTP_PORT, PositiveU64, PositiveUsize, RunLimit, Target, TargetList};
use crate::error::{AppError, AppResult, ValidationError};

const MILLIS_PER_MINUTE: u64 = 60_000;
/// Fractional minute digits beyond this are ignored (sub-millisecond).
const MAX_FRACTION_DIGITS: usize = 9;

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

/// Parses `host`, `host:port`, `[v6]`, `[v6]:port` or a bare IPv6 literal.
///
/// # Errors
///
/// Returns an error when the host is empty or the port is not a valid
/// non-zero `u16`.
pub fn parse_target(s: &str) -> Result<Target, ValidationError> {
    let value = s.trim();
    let invalid = || ValidationError::InvalidTarget {
        value: value.to_owned(),
    };
    if value.is_empty() {
        return Err(invalid());
    }

    if let Some(rest) = value.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = if tail.is_empty() {
            DEFAULT_FTP_PORT
        } else {
            parse_port(tail.strip_prefix(':').ok_or_else(invalid)?, value)?
        };
        return Ok(Target::new(host, port));
    }

    if value.matches(':').count() > 1 {
        return Ok(Target::new(value, DEFAULT_FTP_PORT));
    }

    match value.split_once(':') {
        Some((host, port)) => {
            if host.is_empty() {
                return Err(invalid());
            }
            Ok(Target::new(host, parse_port(port, value)?))
        }
        None => Ok(Target::new(value, DEFAULT_FTP_PORT)),
    }
}

fn parse_port(port: &str, value: &str) -> Result<u16, ValidationError> {
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|err| ValidationError::InvalidPort {
            value: value.to_owned(),
            source: err,
        })?;
    if port == 0 {
        return Err(ValidationError::PortZero {
            value: value.to_owned(),
        });
    }
    Ok(port)
}

/// Parses a comma separated host list.
///
/// # Errors
///
/// Returns an error when any entry is invalid or the list is empty.
pub fn parse_targets(s: &str) -> Result<TargetList, ValidationError> {
    let targets = s
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_target)
        .collect::<Result<Vec<_>, _>>()?;
    TargetList::new(targets)
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration(s).map_err(AppError::validation)
}

pub(crate) fn parse_duration(s: &str) -> Result<Duration, ValidationError> {
    let duration = parse_duration_with_unit(s)?;
    if duration.as_millis() == 0 {
        return Err(ValidationError::DurationZero);
    }
    Ok(duration)
}

fn parse_duration_with_unit(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = leading_digits(value);
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    Ok(duration)
}

fn leading_digits(value: &str) -> usize {
    value.chars().take_while(char::is_ascii_digit).count()
}

/// Parses the run limit.
///
/// A bare number is minutes and may carry a decimal fraction (`0.5` is thirty
/// seconds). A value with a unit suffix (`ms`, `s`, `m`, `h`) is read as a
/// duration. Zero in either form means the run has no time limit.
///
/// # Errors
///
/// Returns an error when the value is neither a decimal number nor a
/// duration with a known unit.
pub fn parse_maxrun(s: &str) -> Result<RunLimit, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    if value.ends_with(|ch: char| ch.is_ascii_alphabetic()) {
        let duration = parse_duration_with_unit(value)?;
        return Ok(limit_from_millis(duration.as_millis()));
    }

    let invalid = || ValidationError::InvalidMaxrun {
        value: value.to_owned(),
    };
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let whole_minutes: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_err| invalid())?
    };
    let whole_ms = whole_minutes
        .checked_mul(MILLIS_PER_MINUTE)
        .ok_or(ValidationError::DurationOverflow)?;

    let fraction = fraction.get(..MAX_FRACTION_DIGITS).unwrap_or(fraction);
    let fraction_ms = if fraction.is_empty() {
        0
    } else {
        let numerator: u64 = fraction.parse().map_err(|_err| invalid())?;
        let digits = u32::try_from(fraction.len()).map_err(|_err| invalid())?;
        let denominator = 10u64.checked_pow(digits).ok_or_else(invalid)?;
        numerator
            .checked_mul(MILLIS_PER_MINUTE)
            .and_then(|scaled| scaled.checked_div(denominator))
            .ok_or(ValidationError::DurationOverflow)?
    };

    let total_ms = whole_ms
        .checked_add(fraction_ms)
        .ok_or(ValidationError::DurationOverflow)?;
    Ok(limit_from_millis(u128::from(total_ms)))
}

fn limit_from_millis(millis: u128) -> RunLimit {
    if millis == 0 {
        return RunLimit::UNBOUNDED;
    }
    let millis = u64::try_from(millis).unwrap_or(u64::MAX);
    RunLimit::new(Some(Duration::from_millis(millis)))
}
