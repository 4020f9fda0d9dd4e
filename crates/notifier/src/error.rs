use rdkafka::error::KafkaError;
use thiserror::Error;

/// Errors that can occur when publishing a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The broker rejected or timed out the message.
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    /// The event could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The notifier is not able to accept messages.
    #[error("Notifier unavailable: {0}")]
    Unavailable(String),
}

/// Result type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
