//! Core library for the `ftpbench` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration loading, a small async FTP client, the
//! bounded-concurrency benchmark runner, statistics aggregation, and the
//! console/CSV stats output. The primary user-facing interface is the
//! `ftpbench` command-line application; library APIs may evolve with it.
pub mod app;
pub mod args;
pub mod bench;
pub mod config;
pub mod entry;
pub mod error;
pub mod ftp;
pub mod logger;
pub mod metrics;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod sinks;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
