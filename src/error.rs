//! Error types for the buzz-consumer library.
//!
//! Per-record failures are kept apart from failures of the record source so the
//! consume loop can skip the former and stop on the latter.

use thiserror::Error;

/// Reasons a single record could not be stored.
///
/// These are recoverable: the consume loop logs them and moves on.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The record carried no payload at all
    #[error("Record has no payload")]
    EmptyPayload,

    /// The payload was not JSON, or a field had the wrong type
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload was valid JSON but not an object
    #[error("Payload is not a JSON object")]
    NotAnObject,

    /// The row insert failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No connection could be checked out of the pool
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl ProcessError {
    /// True when the failure came from the store rather than the payload
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Pool(_))
    }
}

/// Failures of the record source itself.
///
/// These end the consume loop and are returned to the caller.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The broker client hit an unrecoverable error while fetching
    #[error("Kafka error: {0}")]
    Kafka(String),

    /// The consumer could not be created or subscribed
    #[error("Failed to subscribe: {0}")]
    Subscribe(String),
}

#[cfg(feature = "kafka")]
impl From<rdkafka::error::KafkaError> for SourceError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::Kafka(err.to_string())
    }
}

/// Convenience type alias for per-record results
pub type Result<T> = std::result::Result<T, ProcessError>;
