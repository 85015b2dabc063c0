use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::operation::Operation;
use crate::error::{FtpError, FtpStep};
use crate::ftp::Deadline;
use crate::metrics::Stats;

/// Result of one operation attempt. Every attempt ends in exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { elapsed: Duration, bytes: u64 },
    Timeout { elapsed: Duration },
    Rejected { elapsed: Duration, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Timeout,
    Rejected,
}

impl Outcome {
    /// Deadline expiry is a timeout; everything else the server or the
    /// network did wrong is a rejection.
    #[must_use]
    pub fn from_error(error: &FtpError, elapsed: Duration) -> Self {
        match error {
            FtpError::Timeout { .. } => Self::Timeout { elapsed },
            FtpError::Client { .. } | FtpError::Io { .. } => Self::Rejected {
                elapsed,
                reason: error.to_string(),
            },
        }
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Success { elapsed, .. }
            | Self::Timeout { elapsed }
            | Self::Rejected { elapsed, .. } => *elapsed,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::Timeout { .. } => OutcomeKind::Timeout,
            Self::Rejected { .. } => OutcomeKind::Rejected,
        }
    }
}

/// Runs one attempt of `operation` and records its outcome in `stats`.
///
/// The whole attempt shares one deadline `timeout` from now. The deadline
/// also bounds the attempt from the outside, so an operation that ignores
/// it still ends as a timeout.
pub async fn execute(operation: &dyn Operation, timeout: Duration, stats: &Stats) -> Outcome {
    let _in_flight = stats.begin();
    let started = Instant::now();
    let deadline = Deadline::after(timeout);
    let result = deadline
        .guard(FtpStep::Operation, operation.perform(deadline))
        .await;
    let elapsed = started.elapsed();

    let outcome = match result {
        Ok(bytes) => Outcome::Success { elapsed, bytes },
        Err(err) => {
            debug!("{} failed after {:?}: {}", operation.kind().as_str(), elapsed, err);
            Outcome::from_error(&err, elapsed)
        }
    };
    stats.record(&outcome);
    outcome
}
