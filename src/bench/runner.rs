use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::debug;

use super::executor::execute;
use super::operation::Operation;
use crate::error::BenchError;
use crate::metrics::Stats;
use crate::shutdown::ShutdownReceiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Draining,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The run limit elapsed.
    Deadline,
    /// A shutdown signal arrived.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub launched: u64,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

/// Keeps exactly `concurrency` operations in flight until the run limit
/// passes or shutdown is requested, then waits for the in-flight ones.
///
/// Each launched task owns a semaphore permit for its whole lifetime, so the
/// number of concurrent operations never exceeds `concurrency`, and draining
/// is reclaiming every permit.
#[derive(Debug)]
pub struct Runner {
    concurrency: u32,
    timeout: Duration,
    maxrun: Option<Duration>,
    state: RunState,
}

impl Runner {
    #[must_use]
    pub fn new(concurrency: u32, timeout: Duration, maxrun: Option<Duration>) -> Self {
        Self {
            concurrency: concurrency.max(1),
            timeout,
            maxrun,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug!("Runner state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs `operation` repeatedly until the run limit or a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error when the worker pool is closed underneath the run.
    pub async fn run(
        &mut self,
        operation: Arc<dyn Operation>,
        stats: Arc<Stats>,
        shutdown_rx: &mut ShutdownReceiver,
    ) -> Result<RunSummary, BenchError> {
        let permits = usize::try_from(self.concurrency).unwrap_or(usize::MAX);
        let pool = Arc::new(Semaphore::new(permits));
        let started = Instant::now();
        let run_limit = self.maxrun;
        let limit_reached = async move {
            match run_limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(limit_reached);

        self.transition(RunState::Running);
        let mut launched: u64 = 0;
        let stop_reason = loop {
            let permit = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break StopReason::Interrupted,
                () = &mut limit_reached => break StopReason::Deadline,
                permit = Arc::clone(&pool).acquire_owned() => permit?,
            };

            let operation = Arc::clone(&operation);
            let stats = Arc::clone(&stats);
            let timeout = self.timeout;
            tokio::spawn(async move {
                let _permit = permit;
                drop(execute(operation.as_ref(), timeout, &stats).await);
            });
            launched = launched.saturating_add(1);
        };

        self.transition(RunState::Draining);
        debug!(
            "Stopping ({:?}) after {} launches; waiting for in-flight operations",
            stop_reason, launched
        );
        let _drained = pool.acquire_many(self.concurrency).await?;
        self.transition(RunState::Stopped);

        Ok(RunSummary {
            launched,
            stop_reason,
            elapsed: started.elapsed(),
        })
    }
}
