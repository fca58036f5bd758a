use thiserror::Error;

/// Failure reported by the object store or the log backend.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid S3 notification: {0}")]
    Event(String),

    #[error("failed to fetch s3://{bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        source: BackendError,
    },

    #[error("failed to decode object: {0}")]
    Decode(#[source] std::io::Error),

    #[error("failed to parse log record: {0}")]
    Parse(String),

    #[error("timestamp {0:?} does not match format YYYY-MM-DDTHH:MM:SS.ffffffZ")]
    TimestampFormat(String),

    #[error("failed to create log group {group}: {source}")]
    GroupCreate { group: String, source: BackendError },

    #[error("failed to create log stream {stream} in {group}: {source}")]
    StreamCreate {
        group: String,
        stream: String,
        source: BackendError,
    },

    #[error("failed to append to {group}/{stream}: {source}")]
    Append {
        group: String,
        stream: String,
        source: BackendError,
    },
}
