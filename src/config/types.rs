use std::time::Duration;

use serde::Deserialize;

use crate::args::{RunLimit, parse_maxrun};
use crate::error::ValidationError;

/// Settings read from `ftpbench.toml` / `ftpbench.json`.
///
/// Every field is optional; values given on the command line win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(alias = "hosts")]
    pub host: Option<HostList>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<DurationValue>,
    pub maxrun: Option<DurationValue>,
    pub fixevery: Option<u64>,
    #[serde(alias = "concurrency")]
    pub concurrent: Option<usize>,
    pub csv: Option<String>,
    pub size: Option<u64>,
    pub files: Option<u64>,
    pub cleanup_timeout: Option<DurationValue>,
    pub dns_round_robin: Option<bool>,
}

/// `host = "a:21,b"` or `host = ["a:21", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HostList {
    One(String),
    Many(Vec<String>),
}

impl HostList {
    /// Joins the entries into the comma-separated form the CLI accepts.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::One(value) => value.clone(),
            Self::Many(values) => values.join(","),
        }
    }
}

/// A bare number, or a string with an optional unit suffix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Number(u64),
    Text(String),
}

impl DurationValue {
    /// Numbers are seconds.
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            Self::Number(0) => Err(ValidationError::DurationZero),
            Self::Number(secs) => Ok(Duration::from_secs(*secs)),
            Self::Text(text) => crate::args::parse_duration(text),
        }
    }

    /// Numbers are whole minutes and `0` means no limit; strings follow
    /// the `--maxrun` syntax.
    pub(crate) fn to_run_limit(&self) -> Result<RunLimit, ValidationError> {
        match self {
            Self::Number(0) => Ok(RunLimit::UNBOUNDED),
            Self::Number(minutes) => minutes
                .checked_mul(60)
                .map(|secs| RunLimit::new(Some(Duration::from_secs(secs))))
                .ok_or(ValidationError::DurationOverflow),
            Self::Text(text) => parse_maxrun(text),
        }
    }
}
