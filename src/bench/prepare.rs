use std::time::Duration;

use tracing::{debug, warn};

use super::adapter::FtpClientAdapter;
use super::operation::{READ_PREFIX, remote_path};
use super::payload::TestData;
use crate::ftp::Deadline;
use crate::shutdown::ShutdownReceiver;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedFiles {
    pub paths: Vec<String>,
    pub interrupted: bool,
}

/// Uploads `count` files of `file_size` bytes for the download benchmark.
///
/// Uploads run one after another with `timeout` each and do not count as
/// benchmark traffic. Failed uploads are skipped. A shutdown signal stops
/// preparation early.
pub async fn prepare_download_files(
    client: &FtpClientAdapter,
    workdir: &str,
    file_size: u64,
    count: u64,
    timeout: Duration,
    shutdown_rx: &mut ShutdownReceiver,
) -> PreparedFiles {
    let mut prepared = PreparedFiles::default();
    for _ in 0..count {
        let path = remote_path(workdir, READ_PREFIX);
        let finished = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => None,
            result = client.upload(
                &path,
                TestData::new(file_size),
                Deadline::after(timeout),
                |_bytes| {},
            ) => Some(result),
        };
        let Some(result) = finished else {
            prepared.interrupted = true;
            break;
        };
        match result {
            Ok(bytes) => {
                debug!("Prepared {} ({} bytes)", path, bytes);
                prepared.paths.push(path);
            }
            Err(err) => warn!("Failed to prepare {}: {}", path, err),
        }
    }
    prepared
}
