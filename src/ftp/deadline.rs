use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use crate::error::{FtpError, FtpResult, FtpStep};

/// Fallback horizon when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(946_080_000);

/// Absolute point in time shared by every step of one operation.
///
/// Each network step is bounded by the same instant, so the operation as a
/// whole never outlives its timeout no matter how many round trips it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self { at }
    }

    #[must_use]
    pub const fn instant(self) -> Instant {
        self.at
    }

    #[must_use]
    pub fn remaining(self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    #[must_use]
    pub fn is_expired(self) -> bool {
        Instant::now() >= self.at
    }

    /// Runs `future` until it completes or the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns [`FtpError::Timeout`] tagged with `step` when the deadline
    /// passes first, otherwise whatever `future` returns.
    pub async fn guard<F, T>(self, step: FtpStep, future: F) -> FtpResult<T>
    where
        F: Future<Output = FtpResult<T>>,
    {
        timeout_at(self.at, future)
            .await
            .map_err(|_elapsed| FtpError::Timeout { step })?
    }

    /// Like [`Deadline::guard`] for calls into the FTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FtpError::Timeout`] or [`FtpError::Client`] tagged with
    /// `step`.
    pub async fn guard_client<F, T>(self, step: FtpStep, future: F) -> FtpResult<T>
    where
        F: Future<Output = suppaftp::FtpResult<T>>,
    {
        self.guard(step, async move {
            future.await.map_err(|err| FtpError::client(step, err))
        })
        .await
    }

    /// Like [`Deadline::guard`] for plain socket futures.
    ///
    /// # Errors
    ///
    /// Returns [`FtpError::Timeout`] or [`FtpError::Io`] tagged with `step`.
    pub async fn guard_io<F, T>(self, step: FtpStep, future: F) -> FtpResult<T>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        self.guard(step, async move {
            future.await.map_err(|err| FtpError::io(step, err))
        })
        .await
    }
}
