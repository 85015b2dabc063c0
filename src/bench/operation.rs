use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::adapter::FtpClientAdapter;
use super::payload::TestData;
use super::selector::RoundRobin;
use crate::error::FtpResult;
use crate::ftp::Deadline;
use crate::metrics::Stats;

pub const WRITE_PREFIX: &str = "bench_write";
pub const READ_PREFIX: &str = "bench_read";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Login,
    Upload,
    Download,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Upload => "upload",
            Self::Download => "download",
        }
    }
}

/// One unit of benchmark work.
#[async_trait]
pub trait Operation: Send + Sync {
    fn kind(&self) -> OperationKind;

    /// Runs one attempt bounded by `deadline` and returns the payload bytes
    /// moved.
    async fn perform(&self, deadline: Deadline) -> FtpResult<u64>;
}

/// Fresh remote path `<workdir>/<prefix>-<uuid>`.
#[must_use]
pub fn remote_path(workdir: &str, prefix: &str) -> String {
    let name = format!("{}-{}", prefix, Uuid::new_v4().simple());
    if workdir.is_empty() {
        return name;
    }
    format!("{}/{}", workdir.trim_end_matches('/'), name)
}

#[derive(Debug)]
pub struct LoginOperation {
    client: Arc<FtpClientAdapter>,
}

impl LoginOperation {
    #[must_use]
    pub const fn new(client: Arc<FtpClientAdapter>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Operation for LoginOperation {
    fn kind(&self) -> OperationKind {
        OperationKind::Login
    }

    async fn perform(&self, deadline: Deadline) -> FtpResult<u64> {
        self.client.login(deadline).await?;
        Ok(0)
    }
}

#[derive(Debug)]
pub struct UploadOperation {
    client: Arc<FtpClientAdapter>,
    workdir: String,
    file_size: u64,
    stats: Arc<Stats>,
}

impl UploadOperation {
    #[must_use]
    pub const fn new(
        client: Arc<FtpClientAdapter>,
        workdir: String,
        file_size: u64,
        stats: Arc<Stats>,
    ) -> Self {
        Self {
            client,
            workdir,
            file_size,
            stats,
        }
    }
}

#[async_trait]
impl Operation for UploadOperation {
    fn kind(&self) -> OperationKind {
        OperationKind::Upload
    }

    async fn perform(&self, deadline: Deadline) -> FtpResult<u64> {
        let path = remote_path(&self.workdir, WRITE_PREFIX);
        let stats = &self.stats;
        self.client
            .upload(&path, TestData::new(self.file_size), deadline, |bytes| {
                stats.add_traffic(bytes);
            })
            .await
    }
}

#[derive(Debug)]
pub struct DownloadOperation {
    client: Arc<FtpClientAdapter>,
    files: RoundRobin<String>,
    stats: Arc<Stats>,
}

impl DownloadOperation {
    #[must_use]
    pub const fn new(
        client: Arc<FtpClientAdapter>,
        files: RoundRobin<String>,
        stats: Arc<Stats>,
    ) -> Self {
        Self {
            client,
            files,
            stats,
        }
    }
}

#[async_trait]
impl Operation for DownloadOperation {
    fn kind(&self) -> OperationKind {
        OperationKind::Download
    }

    async fn perform(&self, deadline: Deadline) -> FtpResult<u64> {
        let (_, path) = self.files.next_item();
        let stats = &self.stats;
        self.client
            .download(path, deadline, |bytes| stats.add_traffic(bytes))
            .await
    }
}
