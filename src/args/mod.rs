//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod resolve;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::{BenchArgs, Mode};
pub use parsers::{parse_maxrun, parse_target, parse_targets};
pub use resolve::expand_dns_round_robin;
pub use types::{DEFAULT_FTP_PORT, PositiveU64, PositiveUsize, RunLimit, Target, TargetList};

pub(crate) use parsers::{parse_duration, parse_duration_arg};
