use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("At least one host is required.")]
    EmptyHostList,
    #[error("Invalid host '{value}'. Expected 'host' or 'host:port'.")]
    InvalidTarget { value: String },
    #[error("Invalid port in '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Port must be > 0 in '{value}'.")]
    PortZero { value: String },
    #[error("Missing user (set --user, FTPBENCH_USER, or provide in config).")]
    MissingUser,
    #[error("Missing password (set --password, FTPBENCH_PASSWORD, or provide in config).")]
    MissingPassword,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Invalid maxrun '{value}'. Use minutes (e.g. 5 or 0.5) or a duration (e.g. 30s).")]
    InvalidMaxrun { value: String },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("File size of {size_mb} MB does not fit in 64 bits.")]
    SizeOverflow { size_mb: u64 },
    #[error("Concurrency {value} exceeds the maximum of {max}.")]
    ConcurrencyTooLarge { value: usize, max: u32 },
    #[error("Upload and download modes require a remote working directory.")]
    MissingWorkdir,
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
