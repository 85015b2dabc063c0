//! Benchmark engine: target selection, payloads, operations, and the
//! bounded-concurrency runner with its cleanup phase.
mod adapter;
mod cleanup;
mod executor;
mod operation;
mod payload;
mod prepare;
mod runner;
mod selector;
mod uploads;


pub use adapter::FtpClientAdapter;
pub use cleanup::{CleanupReport, cleanup_files};
pub use executor::{Outcome, OutcomeKind, execute};
pub use operation::{
    DownloadOperation, LoginOperation, Operation, OperationKind, READ_PREFIX, UploadOperation,
    WRITE_PREFIX, remote_path,
};
pub use payload::{CHUNK_SIZE, TestData};
pub use prepare::{PreparedFiles, prepare_download_files};
pub use runner::{RunState, RunSummary, Runner, StopReason};
pub use selector::{RoundRobin, TargetSelector};
pub use uploads::UploadedFiles;
