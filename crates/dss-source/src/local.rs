//! Local filesystem reader

use crate::error::{SourceError, SourceResult};
use crate::traits::SnapshotReader;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reads files, resolving relative locations against a root directory
#[derive(Debug, Clone)]
pub struct LocalFileReader {
    root: PathBuf,
}

impl LocalFileReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path for a location
    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl SnapshotReader for LocalFileReader {
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>> {
        let path = self.resolve(location);
        log::debug!("Reading {}", path.display());
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    location: path.display().to_string(),
                }
            } else {
                SourceError::Io {
                    location: path.display().to_string(),
                    source: e,
                }
            }
        })
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
