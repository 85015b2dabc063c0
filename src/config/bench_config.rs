use std::path::PathBuf;
use std::time::Duration;

use crate::args::{BenchArgs, Mode, Target};
use crate::error::{AppError, AppResult, ValidationError};
use crate::ftp::Credentials;

const BYTES_PER_MB: u64 = 1_048_576;

/// Validated run settings. Built once before any network activity.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub mode: Mode,
    pub targets: Vec<Target>,
    pub credentials: Credentials,
    pub timeout: Duration,
    /// `None` runs until interrupted.
    pub maxrun: Option<Duration>,
    pub fixevery: u64,
    pub concurrent: u32,
    pub csv: Option<PathBuf>,
    /// Bytes per uploaded or seeded file.
    pub file_size: u64,
    pub files: u64,
    pub cleanup_timeout: Duration,
    pub dns_round_robin: bool,
    /// Render the stats table on stdout.
    pub console: bool,
}

impl BenchConfig {
    /// Validates parsed arguments (after any config file overlay).
    ///
    /// # Errors
    ///
    /// Returns an error when credentials are missing, the workdir is empty,
    /// the concurrency does not fit a semaphore, or the file size overflows.
    pub fn from_args(args: &BenchArgs) -> AppResult<Self> {
        let user = args
            .user
            .clone()
            .ok_or_else(|| AppError::validation(ValidationError::MissingUser))?;
        let password = args
            .password
            .clone()
            .ok_or_else(|| AppError::validation(ValidationError::MissingPassword))?;

        if let Some(workdir) = args.mode.workdir()
            && workdir.trim().is_empty()
        {
            return Err(AppError::validation(ValidationError::MissingWorkdir));
        }

        let concurrent = args.concurrent.get();
        let concurrent = u32::try_from(concurrent).map_err(|_err| {
            AppError::validation(ValidationError::ConcurrencyTooLarge {
                value: concurrent,
                max: u32::MAX,
            })
        })?;

        let size_mb = args.size.get();
        let file_size = size_mb
            .checked_mul(BYTES_PER_MB)
            .ok_or_else(|| AppError::validation(ValidationError::SizeOverflow { size_mb }))?;

        Ok(Self {
            mode: args.mode.clone(),
            targets: args.hosts.as_slice().to_vec(),
            credentials: Credentials::new(user, password),
            timeout: args.timeout,
            maxrun: args.maxrun.duration(),
            fixevery: args.fixevery.get(),
            concurrent,
            csv: args.csv.clone(),
            file_size,
            files: args.files.get(),
            cleanup_timeout: args.cleanup_timeout,
            dns_round_robin: args.dns_round_robin,
            console: true,
        })
    }

    /// File size in whole MB, as shown in the banner.
    #[must_use]
    pub const fn size_mb(&self) -> u64 {
        self.file_size / BYTES_PER_MB
    }
}
