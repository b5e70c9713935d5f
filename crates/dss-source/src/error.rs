//! Error types for dss-source

use thiserror::Error;

/// Snapshot and credential retrieval errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Source does not exist (S001)
    #[error("[S001] Source not found: {location}")]
    NotFound { location: String },

    /// Local read failed (S002)
    #[error("[S002] Failed to read '{location}': {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },

    /// Object store answered with a non-success status (S003)
    #[error("[S003] Object store returned {status} for '{location}'")]
    Http { location: String, status: u16 },

    /// Request could not be sent or the body could not be read (S004)
    #[error("[S004] Request for '{location}' failed: {message}")]
    Request { location: String, message: String },

    /// No credential provider produced credentials (S005)
    #[error("[S005] Credentials unavailable: {0}")]
    CredentialsUnavailable(String),

    /// Secret is not valid JSON or lacks required keys (S006)
    #[error("[S006] Invalid secret '{name}': {message}")]
    SecretParse { name: String, message: String },

    /// Object store endpoint cannot be turned into a request URL (S007)
    #[error("[S007] Invalid object store endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

impl SourceError {
    /// Whether the failure means the source does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            SourceError::NotFound { .. } => true,
            SourceError::Http { status, .. } => *status == 404,
            _ => false,
        }
    }
}

/// Result type alias for SourceError
pub type SourceResult<T> = Result<T, SourceError>;
