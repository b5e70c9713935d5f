//! Export command implementation

use anyhow::{Context, Result};
use dss_core::{write_csv, ExportMode};
use std::io::Write;

use crate::cli::{ExportArgs, GlobalArgs};
use crate::commands::common::{apply_selection, load_result};

/// Execute the export command
pub async fn execute(args: &ExportArgs, global: &GlobalArgs) -> Result<()> {
    let result = load_result(global, args.selection.input.as_deref())?;
    let selection = apply_selection(&result, &args.selection)?;
    let mode = ExportMode::from(args.mode);

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path))?;
            write_csv(
                &result,
                &selection.entities,
                &selection.periods,
                mode,
                std::io::BufWriter::new(file),
            )?;
            eprintln!(
                "Exported {} stations x {} weeks ({}) to {}",
                selection.entities.len(),
                selection.periods.len(),
                mode,
                path
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_csv(
                &result,
                &selection.entities,
                &selection.periods,
                mode,
                &mut lock,
            )?;
            lock.flush()?;
        }
    }
    Ok(())
}
