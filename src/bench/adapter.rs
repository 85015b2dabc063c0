use std::sync::Arc;

use tracing::debug;

use super::payload::TestData;
use super::selector::TargetSelector;
use super::uploads::UploadedFiles;
use crate::error::FtpResult;
use crate::ftp::{Credentials, Deadline, FtpSession};

/// The four FTP actions the benchmark performs, each on a fresh connection
/// to the next selected host.
#[derive(Debug)]
pub struct FtpClientAdapter {
    selector: Arc<TargetSelector>,
    credentials: Credentials,
    uploads: Arc<UploadedFiles>,
}

impl FtpClientAdapter {
    #[must_use]
    pub const fn new(
        selector: Arc<TargetSelector>,
        credentials: Credentials,
        uploads: Arc<UploadedFiles>,
    ) -> Self {
        Self {
            selector,
            credentials,
            uploads,
        }
    }

    #[must_use]
    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    #[must_use]
    pub fn uploads(&self) -> &UploadedFiles {
        &self.uploads
    }

    async fn connect(&self, deadline: Deadline) -> FtpResult<FtpSession> {
        let target = self.selector.next_target();
        FtpSession::login(target, &self.credentials, deadline).await
    }

    /// Connects, logs in and disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or logging in fails.
    pub async fn login(&self, deadline: Deadline) -> FtpResult<()> {
        let session = self.connect(deadline).await?;
        session.quit(deadline).await;
        Ok(())
    }

    /// Stores `data` at `path`, calling `on_chunk` with the size of every
    /// chunk the data connection accepted. The path is recorded for cleanup
    /// as soon as the server confirms the transfer.
    ///
    /// # Errors
    ///
    /// Returns an error when any step of the transfer fails.
    pub async fn upload<F>(
        &self,
        path: &str,
        data: TestData,
        deadline: Deadline,
        on_chunk: F,
    ) -> FtpResult<u64>
    where
        F: FnMut(u64) + Send,
    {
        let mut session = self.connect(deadline).await?;
        session.binary_mode(deadline).await?;
        let sent = session.store(path, data, deadline, on_chunk).await?;
        self.uploads.record(path.to_owned());
        debug!("Stored {} ({} bytes)", path, sent);
        session.quit(deadline).await;
        Ok(sent)
    }

    /// Retrieves `path`, calling `on_chunk` with the size of every read.
    ///
    /// # Errors
    ///
    /// Returns an error when any step of the transfer fails.
    pub async fn download<F>(&self, path: &str, deadline: Deadline, on_chunk: F) -> FtpResult<u64>
    where
        F: FnMut(u64) + Send,
    {
        let mut session = self.connect(deadline).await?;
        session.binary_mode(deadline).await?;
        let received = session.retrieve(path, deadline, on_chunk).await?;
        session.quit(deadline).await;
        Ok(received)
    }

    /// Deletes `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting, logging in or `DELE` fails.
    pub async fn delete(&self, path: &str, deadline: Deadline) -> FtpResult<()> {
        let mut session = self.connect(deadline).await?;
        session.delete(path, deadline).await?;
        session.quit(deadline).await;
        Ok(())
    }
}
