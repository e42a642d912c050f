//! Run command implementation: extract, then visualize.

use crate::cli::RunArgs;
use crate::commands::{execute_extract, execute_visualize};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tracing::warn;

/// Execute both stages on one input.
///
/// Charts are still attempted when some chunks failed; the table holds
/// whatever the other chunks produced.
pub fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (extract, visualize) = args.into_stages();

    let report = execute_extract(extract, config, formatter)?;
    if !report.is_complete() {
        warn!(
            "{} of {} chunks failed, charts cover the rest",
            report.failures.len(),
            report.metadata.total_chunks
        );
    }

    execute_visualize(visualize, config, formatter)?;
    Ok(())
}
