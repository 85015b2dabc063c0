use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use super::parsers::{
    parse_duration_arg, parse_maxrun, parse_positive_u64, parse_positive_usize, parse_targets,
};
use super::types::{PositiveU64, PositiveUsize, RunLimit, TargetList};

/// Benchmark mode, chosen by subcommand.
#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Connect and log in, nothing else
    Login,
    /// Store generated files in a remote directory
    Upload {
        /// Remote directory that receives the benchmark files
        workdir: String,
    },
    /// Seed a remote directory with files, then retrieve them repeatedly
    Download {
        /// Remote directory used for the seeded files
        workdir: String,
    },
}

impl Mode {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Upload { .. } => "upload",
            Self::Download { .. } => "download",
        }
    }

    #[must_use]
    pub fn workdir(&self) -> Option<&str> {
        match self {
            Self::Login => None,
            Self::Upload { workdir } | Self::Download { workdir } => Some(workdir),
        }
    }

    #[must_use]
    pub const fn transfers_files(&self) -> bool {
        matches!(self, Self::Upload { .. } | Self::Download { .. })
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "ftpbench",
    version,
    disable_help_flag = true,
    about = "Async FTP load generator - bounded concurrent login/upload/download runs with per-operation deadlines and periodic aggregate stats."
)]
pub struct BenchArgs {
    #[command(subcommand)]
    pub mode: Mode,

    /// FTP host list, comma separated, each 'host' or 'host:port'
    #[arg(
        short = 'h',
        long = "host",
        default_value = "127.0.0.1:21",
        value_parser = parse_targets,
        global = true,
        help_heading = "Connection"
    )]
    pub hosts: TargetList,

    /// FTP user
    #[arg(short = 'u', long = "user", env = "FTPBENCH_USER", global = true, help_heading = "Connection")]
    pub user: Option<String>,

    /// FTP password
    #[arg(
        short = 'p',
        long = "password",
        env = "FTPBENCH_PASSWORD",
        hide_env_values = true,
        global = true,
        help_heading = "Connection"
    )]
    pub password: Option<String>,

    /// Per-operation timeout (supports ms/s/m/h, default unit s)
    #[arg(
        short = 't',
        long = "timeout",
        default_value = "10",
        value_parser = parse_duration_arg,
        global = true,
        help_heading = "Connection"
    )]
    pub timeout: Duration,

    /// Expand a single host into all of its IPv4 A records
    #[arg(long = "dns-round-robin", global = true, help_heading = "Connection")]
    pub dns_round_robin: bool,

    /// Maximum run time in minutes (decimals allowed) or a duration like 30s; 0 runs until interrupted
    #[arg(
        long = "maxrun",
        default_value = "5",
        value_parser = parse_maxrun,
        global = true,
        help_heading = "Run"
    )]
    pub maxrun: RunLimit,

    /// Number of concurrent operations
    #[arg(
        short = 'c',
        long = "concurrent",
        default_value = "10",
        value_parser = parse_positive_usize,
        global = true,
        help_heading = "Run"
    )]
    pub concurrent: PositiveUsize,

    /// Upload/download file size in MB
    #[arg(
        short = 's',
        long = "size",
        default_value = "10",
        value_parser = parse_positive_u64,
        global = true,
        help_heading = "Run"
    )]
    pub size: PositiveU64,

    /// Number of files seeded for download mode
    #[arg(
        long = "files",
        default_value = "10",
        value_parser = parse_positive_u64,
        global = true,
        help_heading = "Run"
    )]
    pub files: PositiveU64,

    /// Timeout per delete during cleanup and per upload during download seeding
    #[arg(
        long = "cleanup-timeout",
        default_value = "60",
        value_parser = parse_duration_arg,
        global = true,
        help_heading = "Run"
    )]
    pub cleanup_timeout: Duration,

    /// Commit a stats line every N seconds; lines in between are rewritten in place
    #[arg(
        long = "fixevery",
        default_value = "5",
        value_parser = parse_positive_u64,
        global = true,
        help_heading = "Output"
    )]
    pub fixevery: PositiveU64,

    /// Also write every stats line to this CSV file
    #[arg(long = "csv", global = true, help_heading = "Output")]
    pub csv: Option<PathBuf>,

    /// Enable verbose logging (sets log level to debug unless overridden by FTPBENCH_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true, help_heading = "Common Options")]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./ftpbench.toml or ./ftpbench.json if present.
    #[arg(long, global = true, help_heading = "Common Options")]
    pub config: Option<String>,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help, global = true, help_heading = "Common Options")]
    pub help: Option<bool>,
}
