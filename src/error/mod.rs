mod app;
mod bench;
mod config;
mod ftp;
mod metrics;
mod sink;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use bench::BenchError;
pub use config::ConfigError;
pub use ftp::{FtpError, FtpResult, FtpStep};
pub use metrics::MetricsError;
pub use sink::SinkError;
pub use validation::ValidationError;
