//! Compare command implementation

use anyhow::{Context, Result};
use dss_engine::{run_comparison, write_result, ComparisonInputs};

use crate::cli::{CompareArgs, GlobalArgs};
use crate::commands::common::ProjectContext;

/// Execute the compare command
pub async fn execute(args: &CompareArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let inputs = ComparisonInputs::from_config(&ctx.config, &ctx.root)
        .context("Failed to set up snapshot sources")?;

    let run = run_comparison(&inputs)
        .await
        .context("Comparison failed")?;

    if args.stdout {
        println!("{}", run.result.to_json_pretty()?);
        return Ok(());
    }

    let path = ctx.output_path(args.output.as_deref());
    write_result(&run.result, &path)?;

    println!(
        "Compared {} stations across {} weeks ({} records prior, {} latest)",
        run.stats.entities, run.stats.periods, run.stats.prior_records, run.stats.latest_records
    );
    println!("Wrote {}", path.display());
    Ok(())
}
