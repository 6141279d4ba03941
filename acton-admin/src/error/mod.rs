//! Error types and error handling

use thiserror::Error;

/// Result alias used throughout the crate
pub type AdminResult<T> = Result<T, AdminError>;

/// Framework error type
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration error (missing parent resource, unregistered relation, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The store has no data for the requested entity
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Cache backend error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Cached payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Redis error
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl AdminError {
    /// Shorthand for [`AdminError::Configuration`]
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error was raised by a misconfigured field or resource
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
