use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "message")]
pub enum SyncError {
    /// A platform record lacked `name` or `artist`
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Transport failure, timeout or non-2xx response
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("At least 2 sources are required, got {0}")]
    InsufficientSources(usize),

    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("Platform not registered: {0}")]
    PlatformNotRegistered(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// Implement From traits for common error types to simplify conversion

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Upstream(format!("request timed out: {}", e))
        } else {
            SyncError::Upstream(e.to_string())
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(e: std::io::Error) -> Self {
        SyncError::FileSystem(e.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for SyncError {
    fn from(e: csv::Error) -> Self {
        SyncError::Serialization(e.to_string())
    }
}
