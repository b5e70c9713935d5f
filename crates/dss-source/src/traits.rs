//! Snapshot reader trait definition

use crate::error::SourceResult;
use async_trait::async_trait;

/// Byte-fetch capability for snapshot and mapping sources.
///
/// The engine only sees this trait; whether the bytes come from disk or an
/// object store is decided when the reader is constructed. Implementations
/// must be Send + Sync so both snapshots can be read concurrently.
#[async_trait]
pub trait SnapshotReader: Send + Sync {
    /// Read the full contents at `location` (a path or an object key)
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>>;

    /// Reader type identifier for logging
    fn kind(&self) -> &'static str;
}
