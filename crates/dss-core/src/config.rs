//! Configuration types and parsing for dss.yml

use crate::error::{CoreError, CoreResult};
use crate::mapping::MappingColumns;
use crate::record::ColumnMapping;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names searched for in a project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["dss.yml", "dss.yaml"];

/// Comparison project configuration from dss.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Field delimiter for snapshots and mapping tables
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Snapshot column names
    #[serde(default)]
    pub columns: ColumnMapping,

    /// The older snapshot
    pub prior: SourceConfig,

    /// The newer snapshot
    pub latest: SourceConfig,

    /// Object store holding `object` sources
    #[serde(default)]
    pub object_store: Option<ObjectStoreConfig>,

    /// Where object store credentials come from
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Region/planner mapping tables
    #[serde(default)]
    pub mappings: MappingsConfig,

    /// Path of the JSON result document
    #[serde(default = "default_output")]
    pub output: String,
}

/// Location of one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceConfig {
    /// File path, relative to the project directory unless absolute
    Local(String),
    /// Object key in the configured bucket
    Object(String),
}

impl SourceConfig {
    /// The path or object key
    pub fn location(&self) -> &str {
        match self {
            SourceConfig::Local(path) => path,
            SourceConfig::Object(key) => key,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, SourceConfig::Object(_))
    }
}

impl std::fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceConfig::Local(path) => write!(f, "{}", path),
            SourceConfig::Object(key) => write!(f, "object:{}", key),
        }
    }
}

/// S3-compatible object store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectStoreConfig {
    /// Bucket name
    pub bucket: String,

    /// Signing region
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint URL; defaults to the regional AWS endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ObjectStoreConfig {
    /// Endpoint without a trailing slash
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://s3.{}.amazonaws.com", self.region),
        }
    }
}

/// Credential sources for the object store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Read `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY` from the environment first
    #[serde(default = "default_true")]
    pub from_env: bool,

    /// Secrets Manager secret holding the same keys as a JSON string
    /// (the portal stores them under `DSSAccess`)
    #[serde(default)]
    pub secret_id: Option<String>,

    /// JSON secret document on disk with the same keys
    #[serde(default)]
    pub secret_file: Option<String>,

    /// How long fetched credentials are reused
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            from_env: true,
            secret_id: None,
            secret_file: None,
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

/// Primary and fallback mapping tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingsConfig {
    #[serde(default)]
    pub primary: Option<MappingSourceConfig>,

    #[serde(default)]
    pub fallback: Option<MappingSourceConfig>,
}

/// One mapping table file and its header names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingSourceConfig {
    pub path: String,

    #[serde(default = "default_entity_column")]
    pub entity_column: String,

    #[serde(default = "default_region_column")]
    pub region_column: String,

    #[serde(default = "default_planner_column")]
    pub planner_column: String,
}

impl MappingSourceConfig {
    pub fn columns(&self) -> MappingColumns {
        MappingColumns {
            entity_column: self.entity_column.clone(),
            region_column: self.region_column.clone(),
            planner_column: self.planner_column.clone(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_output() -> String {
    "data/dss-comparison.json".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_entity_column() -> String {
    MappingColumns::default().entity_column
}

fn default_region_column() -> String {
    MappingColumns::default().region_column
}

fn default_planner_column() -> String {
    MappingColumns::default().planner_column
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a project directory
    /// Looks for dss.yml or dss.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees an ASCII delimiter
        self.delimiter as u8
    }

    /// Resolve a configured path against the project root
    pub fn resolve_path(root: &Path, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Absolute path of the JSON result document
    pub fn output_path(&self, root: &Path) -> PathBuf {
        Self::resolve_path(root, &self.output)
    }

    /// Whether any snapshot is fetched from the object store
    pub fn uses_object_store(&self) -> bool {
        self.prior.is_object() || self.latest.is_object()
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let invalid = |message: &str| {
            Err(CoreError::ConfigInvalid {
                message: message.to_string(),
            })
        };

        if self.name.trim().is_empty() {
            return invalid("Project name cannot be empty");
        }
        if !self.delimiter.is_ascii() || self.delimiter == '"' {
            return invalid("delimiter must be a single ASCII character other than '\"'");
        }
        if [&self.columns.entity, &self.columns.period, &self.columns.metric]
            .iter()
            .any(|c| c.trim().is_empty())
        {
            return invalid("column names cannot be empty");
        }
        if self.prior.location().trim().is_empty() || self.latest.location().trim().is_empty() {
            return invalid("prior and latest sources need a path or object key");
        }
        if self.uses_object_store() {
            match &self.object_store {
                None => return invalid("object sources require an 'object_store' section"),
                Some(store) if store.bucket.trim().is_empty() => {
                    return invalid("object_store.bucket cannot be empty")
                }
                Some(_) => {}
            }
        }
        if self.credentials.ttl_seconds == 0 {
            return invalid("credentials.ttl_seconds must be greater than zero");
        }
        for mapping in [&self.mappings.primary, &self.mappings.fallback]
            .into_iter()
            .flatten()
        {
            if mapping.path.trim().is_empty() || mapping.entity_column.trim().is_empty() {
                return invalid("mapping tables need a path and an entity_column");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
