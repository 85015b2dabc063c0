use std::fmt;

use futures_util::io::{AsyncReadExt, AsyncWriteExt};
use suppaftp::AsyncFtpStream;
use suppaftp::types::FileType;
use tracing::trace;

use super::credentials::Credentials;
use super::deadline::Deadline;
use crate::args::Target;
use crate::error::{FtpResult, FtpStep};

const READ_BUFFER: usize = 65_536;

/// A logged-in control connection.
///
/// Dropping the session closes the control socket together with any data
/// socket a failed transfer left behind.
pub struct FtpSession {
    stream: AsyncFtpStream,
}

impl fmt::Debug for FtpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpSession").finish_non_exhaustive()
    }
}

impl FtpSession {
    /// Connects, reads the greeting and authenticates.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection fails, the deadline passes, or
    /// the server rejects the greeting or credentials.
    pub async fn login(
        target: &Target,
        credentials: &Credentials,
        deadline: Deadline,
    ) -> FtpResult<Self> {
        let mut stream = deadline
            .guard_client(FtpStep::Connect, AsyncFtpStream::connect(target.address()))
            .await?;
        deadline
            .guard_client(
                FtpStep::Login,
                stream.login(credentials.user(), credentials.password()),
            )
            .await?;
        trace!("Logged in to {} as {}", target, credentials.user());
        Ok(Self { stream })
    }

    /// Switches to binary transfers.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects `TYPE I` or the deadline
    /// passes.
    pub async fn binary_mode(&mut self, deadline: Deadline) -> FtpResult<()> {
        deadline
            .guard_client(
                FtpStep::TransferMode,
                self.stream.transfer_type(FileType::Binary),
            )
            .await
    }

    /// Stores `chunks` at `path` and waits for the server to confirm the
    /// transfer. `on_chunk` sees the size of every chunk once it is written.
    ///
    /// # Errors
    ///
    /// Returns an error when the data channel cannot be opened, a write
    /// fails, the server rejects the transfer, or the deadline passes.
    pub async fn store<I, F>(
        &mut self,
        path: &str,
        chunks: I,
        deadline: Deadline,
        mut on_chunk: F,
    ) -> FtpResult<u64>
    where
        I: IntoIterator<Item = &'static [u8]> + Send,
        I::IntoIter: Send,
        F: FnMut(u64) + Send,
    {
        let mut data = deadline
            .guard_client(FtpStep::DataChannel, self.stream.put_with_stream(path))
            .await?;
        let mut sent: u64 = 0;
        for chunk in chunks {
            deadline.guard_io(FtpStep::Send, data.write_all(chunk)).await?;
            let bytes = u64::try_from(chunk.len()).unwrap_or(u64::MAX);
            sent = sent.saturating_add(bytes);
            on_chunk(bytes);
        }
        deadline.guard_io(FtpStep::Send, data.flush()).await?;
        deadline
            .guard_client(FtpStep::Complete, self.stream.finalize_put_stream(data))
            .await?;
        Ok(sent)
    }

    /// Reads `path` to the end and waits for the completion reply.
    /// `on_chunk` sees the size of every read.
    ///
    /// # Errors
    ///
    /// Returns an error when the data channel cannot be opened, a read
    /// fails, the server rejects the transfer, or the deadline passes.
    pub async fn retrieve<F>(
        &mut self,
        path: &str,
        deadline: Deadline,
        mut on_chunk: F,
    ) -> FtpResult<u64>
    where
        F: FnMut(u64) + Send,
    {
        let mut data = deadline
            .guard_client(FtpStep::DataChannel, self.stream.retr_as_stream(path))
            .await?;
        let mut buffer = vec![0u8; READ_BUFFER];
        let mut received: u64 = 0;
        loop {
            let read = deadline
                .guard_io(FtpStep::Receive, data.read(&mut buffer))
                .await?;
            if read == 0 {
                break;
            }
            let bytes = u64::try_from(read).unwrap_or(u64::MAX);
            received = received.saturating_add(bytes);
            on_chunk(bytes);
        }
        deadline
            .guard_client(FtpStep::Complete, self.stream.finalize_retr_stream(data))
            .await?;
        Ok(received)
    }

    /// Deletes `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects `DELE` or the deadline
    /// passes.
    pub async fn delete(&mut self, path: &str, deadline: Deadline) -> FtpResult<()> {
        deadline
            .guard_client(FtpStep::Delete, self.stream.rm(path))
            .await
    }

    /// Says goodbye. Failures only matter for logging; the connection is
    /// closed when the session drops either way.
    pub async fn quit(mut self, deadline: Deadline) {
        if let Err(err) = deadline
            .guard_client(FtpStep::Quit, self.stream.quit())
            .await
        {
            trace!("{}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult, FtpError};
    use std::future::Future;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt as _, BufReader};
    use tokio::net::TcpListener;

    fn run_async_test<F>(future: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<()>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
        runtime.block_on(future)
    }

    /// Serves one connection: writes `greeting`, then answers each received
    /// line with the next scripted reply.
    async fn scripted_server(
        greeting: Option<&'static str>,
        replies: Vec<&'static str>,
    ) -> AppResult<(Target, tokio::task::JoinHandle<Vec<String>>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let handle = tokio::spawn(async move {
            let mut received = Vec::new();
            let Ok((stream, _)) = listener.accept().await else {
                return received;
            };
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);
            match greeting {
                Some(greeting) => {
                    if writer.write_all(greeting.as_bytes()).await.is_err() {
                        return received;
                    }
                }
                None => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    return received;
                }
            }
            for reply in replies {
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) | Err(_) => return received,
                    Ok(_) => received.push(line.trim_end().to_owned()),
                }
                if writer.write_all(reply.as_bytes()).await.is_err() {
                    return received;
                }
            }
            received
        });
        Ok((Target::new("127.0.0.1", port), handle))
    }

    #[test]
    fn login_sends_user_and_pass() -> AppResult<()> {
        run_async_test(async {
            let (target, server) = scripted_server(
                Some("220-Welcome\r\n220 ready\r\n"),
                vec!["331 Password please\r\n", "230 Logged in\r\n"],
            )
            .await?;
            let credentials = Credentials::new("bench", "secret");
            let session =
                FtpSession::login(&target, &credentials, Deadline::after(Duration::from_secs(2)))
                    .await
                    .map_err(|err| AppError::validation(err.to_string()))?;
            session.quit(Deadline::after(Duration::from_secs(1))).await;
            let received = server.await?;
            if received != ["USER bench", "PASS secret"] {
                return Err(AppError::validation(format!(
                    "Unexpected commands: {:?}",
                    received
                )));
            }
            Ok(())
        })
    }

    #[test]
    fn login_rejection_is_a_client_error() -> AppResult<()> {
        run_async_test(async {
            let (target, server) = scripted_server(
                Some("220 ready\r\n"),
                vec!["331 Password please\r\n", "530 Login incorrect\r\n"],
            )
            .await?;
            let credentials = Credentials::new("bench", "wrong");
            let result =
                FtpSession::login(&target, &credentials, Deadline::after(Duration::from_secs(2)))
                    .await;
            drop(server.await?);
            match result {
                Err(FtpError::Client {
                    step: FtpStep::Login,
                    ..
                }) => Ok(()),
                Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
                Ok(_) => Err(AppError::validation("Expected login to fail")),
            }
        })
    }

    #[test]
    fn silent_server_times_out_while_connecting() -> AppResult<()> {
        run_async_test(async {
            let (target, server) = scripted_server(None, Vec::new()).await?;
            let credentials = Credentials::new("bench", "secret");
            let started = tokio::time::Instant::now();
            let result = FtpSession::login(
                &target,
                &credentials,
                Deadline::after(Duration::from_millis(200)),
            )
            .await;
            server.abort();
            if started.elapsed() > Duration::from_secs(2) {
                return Err(AppError::validation("Login overran its deadline"));
            }
            match result {
                Err(FtpError::Timeout {
                    step: FtpStep::Connect,
                }) => Ok(()),
                Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
                Ok(_) => Err(AppError::validation("Expected timeout")),
            }
        })
    }

    #[test]
    fn closed_connection_fails_login() -> AppResult<()> {
        run_async_test(async {
            let (target, server) = scripted_server(Some("220 ready\r\n"), Vec::new()).await?;
            let credentials = Credentials::new("bench", "secret");
            let result =
                FtpSession::login(&target, &credentials, Deadline::after(Duration::from_secs(2)))
                    .await;
            drop(server.await?);
            match result {
                Err(FtpError::Client {
                    step: FtpStep::Login,
                    ..
                }) => Ok(()),
                Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
                Ok(_) => Err(AppError::validation("Expected login to fail")),
            }
        })
    }
}
