use std::fmt;
use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

use crate::error::ValidationError;

pub const DEFAULT_FTP_PORT: u16 = 21;

/// One FTP server address.
///
/// IPv6 hosts are stored without brackets; [`Target::address`] adds them back
/// when building a socket address string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

impl std::str::FromStr for Target {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parsers::parse_target(s)
    }
}

/// Non-empty, ordered host list as given on the command line or in config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetList(Vec<Target>);

impl TargetList {
    /// Builds a list, rejecting an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyHostList`] when `targets` is empty.
    pub fn new(targets: Vec<Target>) -> Result<Self, ValidationError> {
        if targets.is_empty() {
            return Err(ValidationError::EmptyHostList);
        }
        Ok(Self(targets))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Target] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Target> {
        self.0
    }
}

/// Wall-clock limit for a run; `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimit(Option<Duration>);

impl RunLimit {
    pub const UNBOUNDED: Self = Self(None);

    #[must_use]
    pub const fn new(limit: Option<Duration>) -> Self {
        Self(limit)
    }

    #[must_use]
    pub const fn duration(self) -> Option<Duration> {
        self.0
    }
}

impl std::str::FromStr for RunLimit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parsers::parse_maxrun(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

impl From<PositiveU64> for u64 {
    fn from(value: PositiveU64) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}
