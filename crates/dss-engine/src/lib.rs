//! dss-engine - Runs a DSS snapshot comparison end to end
//!
//! Wires [`dss_source`] readers to the [`dss_core`] pipeline: both snapshots
//! are fetched concurrently, parsed, aggregated, joined and annotated with
//! region/planner metadata.

pub mod error;
pub mod inputs;
pub mod pipeline;

pub use error::{EngineError, EngineResult, SnapshotRole};
pub use inputs::{ComparisonInputs, MappingSource, SnapshotSource};
pub use pipeline::{run_comparison, write_result, ComparisonRun, RunStats};
