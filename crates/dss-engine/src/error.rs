//! Error types for dss-engine

use dss_core::CoreError;
use dss_source::SourceError;
use thiserror::Error;

/// Which of the two snapshots an error concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotRole {
    Prior,
    Latest,
}

impl std::fmt::Display for SnapshotRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotRole::Prior => write!(f, "prior"),
            SnapshotRole::Latest => write!(f, "latest"),
        }
    }
}

/// Comparison run errors. Any of these aborts the run without a result.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Snapshot could not be fetched (R001)
    #[error("[R001] The {role} snapshot is unavailable: {source}")]
    SourceUnavailable {
        role: SnapshotRole,
        source: SourceError,
    },

    /// Snapshot is structurally invalid (R002)
    #[error("[R002] The {role} snapshot could not be parsed: {source}")]
    Parse { role: SnapshotRole, source: CoreError },

    /// Inputs cannot be built from the configuration (R003)
    #[error("[R003] Invalid comparison configuration: {0}")]
    Config(String),

    /// Result document could not be written (R004)
    #[error("[R004] Failed to write result to '{path}': {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// Role of the snapshot that caused the failure, if any
    pub fn role(&self) -> Option<SnapshotRole> {
        match self {
            EngineError::SourceUnavailable { role, .. } | EngineError::Parse { role, .. } => {
                Some(*role)
            }
            _ => None,
        }
    }
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
