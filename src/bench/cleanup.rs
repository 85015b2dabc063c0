use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tracing::warn;

use super::adapter::FtpClientAdapter;
use crate::ftp::Deadline;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub attempted: u64,
    pub deleted: u64,
    pub failed: u64,
}

/// Deletes every path once, at most `concurrency` at a time, each on its own
/// connection with its own `timeout`. Failures are logged and counted.
pub async fn cleanup_files(
    client: &FtpClientAdapter,
    paths: Vec<String>,
    timeout: Duration,
    concurrency: usize,
) -> CleanupReport {
    let attempted = u64::try_from(paths.len()).unwrap_or(u64::MAX);
    let deleted = AtomicU64::new(0);
    let failed = AtomicU64::new(0);
    let deleted_ref = &deleted;
    let failed_ref = &failed;

    stream::iter(paths)
        .for_each_concurrent(concurrency.max(1), |path| async move {
            match client.delete(&path, Deadline::after(timeout)).await {
                Ok(()) => {
                    deleted_ref.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    warn!("Failed to delete {}: {}", path, err);
                    failed_ref.fetch_add(1, Ordering::Relaxed);
                }
            }
        })
        .await;

    CleanupReport {
        attempted,
        deleted: deleted.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    }
}
