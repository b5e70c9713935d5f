//! Entity metadata (region/planner) mapping tables
//!
//! Two mapping tables may be configured. The primary table always wins for an
//! entity it contains; the fallback table is only consulted for entities the
//! primary table lacks. Entities found in neither get `Unknown`/`Unknown`.

use crate::error::CoreResult;
use crate::ids::EntityId;
use crate::tabular;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label used when no mapping table knows an entity
pub const UNKNOWN: &str = "Unknown";

/// Region and planner assigned to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub region: String,
    pub planner: String,
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self {
            region: UNKNOWN.to_string(),
            planner: UNKNOWN.to_string(),
        }
    }
}

/// Header names of a mapping table.
///
/// Primary and fallback tables in the wild disagree on case (`node` vs
/// `Node`), so each table carries its own column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingColumns {
    #[serde(default = "default_entity_column")]
    pub entity_column: String,

    #[serde(default = "default_region_column")]
    pub region_column: String,

    #[serde(default = "default_planner_column")]
    pub planner_column: String,
}

fn default_entity_column() -> String {
    "node".to_string()
}

fn default_region_column() -> String {
    "Region".to_string()
}

fn default_planner_column() -> String {
    "Planner".to_string()
}

impl Default for MappingColumns {
    fn default() -> Self {
        Self {
            entity_column: default_entity_column(),
            region_column: default_region_column(),
            planner_column: default_planner_column(),
        }
    }
}

impl MappingColumns {
    /// Columns with a custom entity header and the default `Region`/`Planner`
    pub fn with_entity_column(entity_column: impl Into<String>) -> Self {
        Self {
            entity_column: entity_column.into(),
            ..Self::default()
        }
    }
}

/// Entity id → metadata, parsed from one mapping CSV
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<EntityId, EntityMetadata>,
}

impl MappingTable {
    /// Parse a mapping table.
    ///
    /// The entity column is required. Missing region/planner columns or cells
    /// become empty strings; rows with an empty entity are skipped. A repeated
    /// entity keeps its last row.
    pub fn parse(
        bytes: &[u8],
        columns: &MappingColumns,
        delimiter: u8,
        source_name: &str,
    ) -> CoreResult<Self> {
        let mut reader = tabular::reader(bytes, delimiter);
        let headers = tabular::headers(&mut reader, source_name)?;

        let entity_idx = tabular::require_column(&headers, &columns.entity_column, source_name)?;
        let region_idx = tabular::column_index(&headers, &columns.region_column);
        let planner_idx = tabular::column_index(&headers, &columns.planner_column);

        let cell = |row: &csv::StringRecord, idx: Option<usize>| -> String {
            idx.and_then(|i| row.get(i)).unwrap_or_default().to_string()
        };

        let mut entries = HashMap::new();
        for row in reader.records() {
            let row = row.map_err(|e| tabular::malformed(e, source_name))?;
            let Some(entity) = row.get(entity_idx).and_then(EntityId::try_new) else {
                continue;
            };
            entries.insert(
                entity,
                EntityMetadata {
                    region: cell(&row, region_idx),
                    planner: cell(&row, planner_idx),
                },
            );
        }

        log::debug!("Loaded {} entities from {}", entries.len(), source_name);
        Ok(Self { entries })
    }

    /// Build a table directly from entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (EntityId, EntityMetadata)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, entity: &str) -> Option<&EntityMetadata> {
        self.entries.get(entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Primary-then-fallback metadata lookup
#[derive(Debug, Clone, Default)]
pub struct MetadataResolver {
    primary: MappingTable,
    fallback: MappingTable,
}

impl MetadataResolver {
    pub fn new(primary: MappingTable, fallback: MappingTable) -> Self {
        Self { primary, fallback }
    }

    /// Metadata from the first table that knows the entity, if any
    pub fn lookup(&self, entity: &str) -> Option<&EntityMetadata> {
        self.primary
            .get(entity)
            .or_else(|| self.fallback.get(entity))
    }

    /// Metadata for the entity, defaulting to `Unknown`/`Unknown`
    pub fn resolve(&self, entity: &str) -> EntityMetadata {
        self.lookup(entity).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "mapping_test.rs"]
mod tests;
