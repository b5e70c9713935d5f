//! dss-core - Core library for the DSS snapshot comparison
//!
//! This crate provides the identifier types, configuration parsing, snapshot
//! parsing, aggregation, join/percent-change computation, cell classification,
//! filtering and CSV export. It performs no network or snapshot I/O; callers
//! hand it bytes.

pub mod aggregate;
pub mod classification;
pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod ids;
pub mod mapping;
mod newtype_string;
pub mod record;
mod tabular;

pub use aggregate::{AggregatedRow, SnapshotMap};
pub use classification::{classify, display_text, export_text, is_significant, ChangeClass};
pub use compare::{compare, percent_change, round2, ComparisonResult};
pub use config::{Config, SourceConfig};
pub use error::{CoreError, CoreResult};
pub use export::{write_csv, ExportMode};
pub use filter::{select_periods, EntityFilter};
pub use ids::{EntityId, PeriodId};
pub use mapping::{EntityMetadata, MappingColumns, MappingTable, MetadataResolver};
pub use record::{parse_snapshot, ColumnMapping, RawRecord};
