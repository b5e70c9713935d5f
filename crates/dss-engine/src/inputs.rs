//! Engine inputs and their construction from dss.yml

use crate::error::{EngineError, EngineResult};
use dss_core::config::{MappingSourceConfig, ObjectStoreConfig};
use dss_core::{ColumnMapping, Config, MappingColumns, SourceConfig};
use dss_source::{
    ChainedCredentialProvider, CredentialCache, CredentialProvider, EnvCredentialProvider,
    LocalFileReader, ObjectStoreReader, SecretFileProvider, SecretsManagerProvider,
    SnapshotReader,
};
use std::path::Path;
use std::sync::Arc;

/// A location and the reader that can fetch it
#[derive(Clone)]
pub struct SnapshotSource {
    pub reader: Arc<dyn SnapshotReader>,
    pub location: String,
}

impl SnapshotSource {
    pub fn new(reader: Arc<dyn SnapshotReader>, location: impl Into<String>) -> Self {
        Self {
            reader,
            location: location.into(),
        }
    }

    /// Name used in log lines and error messages
    pub fn describe(&self) -> String {
        format!("{}:{}", self.reader.kind(), self.location)
    }
}

impl std::fmt::Debug for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotSource")
            .field("reader", &self.reader.kind())
            .field("location", &self.location)
            .finish()
    }
}

/// A mapping table source and its header names
#[derive(Debug, Clone)]
pub struct MappingSource {
    pub source: SnapshotSource,
    pub columns: MappingColumns,
}

/// Everything one comparison run needs
#[derive(Debug, Clone)]
pub struct ComparisonInputs {
    pub prior: SnapshotSource,
    pub latest: SnapshotSource,
    pub primary_mapping: Option<MappingSource>,
    pub fallback_mapping: Option<MappingSource>,
    pub columns: ColumnMapping,
    pub delimiter: u8,
}

impl ComparisonInputs {
    /// Inputs with default columns, a comma delimiter and no mapping tables
    pub fn new(prior: SnapshotSource, latest: SnapshotSource) -> Self {
        Self {
            prior,
            latest,
            primary_mapping: None,
            fallback_mapping: None,
            columns: ColumnMapping::default(),
            delimiter: b',',
        }
    }

    /// Same columns, delimiter and mappings, but both snapshots read from
    /// local files resolved against `root`
    pub fn with_local_snapshots(&self, root: &Path, prior: &str, latest: &str) -> Self {
        let reader: Arc<dyn SnapshotReader> = Arc::new(LocalFileReader::new(root));
        Self {
            prior: SnapshotSource::new(reader.clone(), prior),
            latest: SnapshotSource::new(reader, latest),
            ..self.clone()
        }
    }

    /// Build readers for every configured source.
    ///
    /// Local sources and mapping tables resolve against `root`. When either
    /// snapshot lives in the object store, one object store reader is built
    /// with a credential cache over the configured provider chain; the cache
    /// lives as long as the returned inputs, so reuse them across runs.
    pub fn from_config(config: &Config, root: &Path) -> EngineResult<Self> {
        let local: Arc<dyn SnapshotReader> = Arc::new(LocalFileReader::new(root));
        let object: Option<Arc<dyn SnapshotReader>> = match &config.object_store {
            Some(store) if config.uses_object_store() => {
                Some(Arc::new(object_store_reader(config, store, root)?))
            }
            Some(_) => None,
            None if config.uses_object_store() => {
                return Err(EngineError::Config(
                    "object sources require an object_store section".to_string(),
                ))
            }
            None => None,
        };

        let snapshot = |source: &SourceConfig| -> EngineResult<SnapshotSource> {
            let reader = match source {
                SourceConfig::Local(_) => local.clone(),
                SourceConfig::Object(_) => object.clone().ok_or_else(|| {
                    EngineError::Config("object store reader is not configured".to_string())
                })?,
            };
            Ok(SnapshotSource::new(reader, source.location()))
        };

        let mapping = |source: &Option<MappingSourceConfig>| {
            source.as_ref().map(|m| MappingSource {
                source: SnapshotSource::new(local.clone(), m.path.clone()),
                columns: m.columns(),
            })
        };

        Ok(Self {
            prior: snapshot(&config.prior)?,
            latest: snapshot(&config.latest)?,
            primary_mapping: mapping(&config.mappings.primary),
            fallback_mapping: mapping(&config.mappings.fallback),
            columns: config.columns.clone(),
            delimiter: config.delimiter_byte(),
        })
    }
}

fn object_store_reader(
    config: &Config,
    store: &ObjectStoreConfig,
    root: &Path,
) -> EngineResult<ObjectStoreReader> {
    let mut providers: Vec<Box<dyn CredentialProvider>> = Vec::new();
    if config.credentials.from_env {
        providers.push(Box::new(EnvCredentialProvider));
    }
    if let Some(secret_id) = &config.credentials.secret_id {
        providers.push(Box::new(SecretsManagerProvider::new(
            secret_id.clone(),
            store.region.clone(),
        )));
    }
    if let Some(secret_file) = &config.credentials.secret_file {
        providers.push(Box::new(SecretFileProvider::new(Config::resolve_path(
            root,
            secret_file,
        ))));
    }
    if providers.is_empty() {
        return Err(EngineError::Config(
            "object sources need credentials.from_env, credentials.secret_id or credentials.secret_file".to_string(),
        ));
    }

    let ttl = chrono::Duration::from_std(std::time::Duration::from_secs(
        config.credentials.ttl_seconds,
    ))
    .map_err(|e| EngineError::Config(format!("credentials.ttl_seconds out of range: {}", e)))?;

    let cache = CredentialCache::new(Box::new(ChainedCredentialProvider::new(providers)), ttl);
    log::debug!(
        "Object store reader for bucket '{}' at {}",
        store.bucket,
        store.endpoint_url()
    );
    ObjectStoreReader::new(
        store.endpoint_url(),
        store.bucket.clone(),
        store.region.clone(),
        Arc::new(cache),
    )
    .map_err(|e| EngineError::Config(e.to_string()))
}

#[cfg(test)]
#[path = "inputs_test.rs"]
mod tests;
