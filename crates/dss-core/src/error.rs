//! Error types for dss-core

use thiserror::Error;

/// Core error type for the comparison pipeline
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// P001: Snapshot has no header row
    #[error("[P001] {source_name} has no header row")]
    MissingHeader { source_name: String },

    /// P002: Required column absent from the header
    #[error("[P002] {source_name} is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    /// P003: Row could not be read as a well-formed record
    #[error("[P003] Malformed row in {source_name} at line {line}: {message}")]
    MalformedRow {
        source_name: String,
        line: u64,
        message: String,
    },

    /// P004: Entity or period field is empty
    #[error("[P004] Empty '{column}' in {source_name} at line {line}")]
    EmptyKeyField {
        source_name: String,
        column: String,
        line: u64,
    },

    /// X001: Requested period is not part of the result
    #[error("[X001] Unknown period '{period}'")]
    UnknownPeriod { period: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error with file path context
    #[error("Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV write error: {0}")]
    CsvWrite(#[from] csv::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether the error came from reading tabular input
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CoreError::MissingHeader { .. }
                | CoreError::MissingColumn { .. }
                | CoreError::MalformedRow { .. }
                | CoreError::EmptyKeyField { .. }
        )
    }
}
