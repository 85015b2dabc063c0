use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("No download files could be prepared ({requested} requested).")]
    NoFilesPrepared { requested: u64 },
    #[error("Worker pool closed unexpectedly: {source}")]
    PoolClosed {
        #[from]
        source: tokio::sync::AcquireError,
    },
}
