use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Storage read error: {message}")]
    StorageRead { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::StorageRead {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message without the error kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::Upstream { message, .. }
            | Self::StorageRead { message }
            | Self::Storage { message }
            | Self::Validation { message }
            | Self::Configuration { message }
            | Self::Internal { message } => message,
        }
    }
}
