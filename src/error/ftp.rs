use std::fmt;

use thiserror::Error;

/// Stage of an FTP exchange, carried by every [`FtpError`] so failures can be
/// traced back to the command that caused them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpStep {
    Connect,
    Login,
    TransferMode,
    DataChannel,
    Send,
    Receive,
    Complete,
    Delete,
    Quit,
    Operation,
}

impl FtpStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Login => "login",
            Self::TransferMode => "transfer mode",
            Self::DataChannel => "data channel",
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Complete => "transfer completion",
            Self::Delete => "delete",
            Self::Quit => "quit",
            Self::Operation => "operation",
        }
    }
}

impl fmt::Display for FtpStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FtpError {
    #[error("Timed out during {step}.")]
    Timeout { step: FtpStep },
    #[error("FTP {step} failed: {source}")]
    Client {
        step: FtpStep,
        #[source]
        source: suppaftp::FtpError,
    },
    #[error("I/O error during {step}: {source}")]
    Io {
        step: FtpStep,
        #[source]
        source: std::io::Error,
    },
}

pub type FtpResult<T> = Result<T, FtpError>;

impl FtpError {
    pub const fn client(step: FtpStep, source: suppaftp::FtpError) -> Self {
        Self::Client { step, source }
    }

    pub const fn io(step: FtpStep, source: std::io::Error) -> Self {
        Self::Io { step, source }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    #[must_use]
    pub const fn step(&self) -> FtpStep {
        match self {
            Self::Timeout { step } | Self::Client { step, .. } | Self::Io { step, .. } => *step,
        }
    }
}
