use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create CSV file '{path}': {source}")]
    CreateCsv {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV file '{path}': {source}")]
    WriteCsv {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write console output: {source}")]
    Console {
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
