//! Per-mode orchestration of a benchmark run and its final summary.
mod runner;
pub(crate) mod summary;

pub use runner::{RunReport, run_bench};
