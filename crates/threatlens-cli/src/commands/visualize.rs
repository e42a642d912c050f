//! Visualize command implementation.

use crate::cli::VisualizeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use threatlens_report::{load_normalized, ReportConfig, VisualizationReport, Visualizer};

/// Execute the visualize command.
pub fn execute_visualize(
    args: VisualizeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<VisualizationReport> {
    let input = args.input.unwrap_or_else(|| config.paths.table.clone());
    let mut report_config = config.report.clone();
    if let Some(dir) = args.output_dir {
        report_config.output_dir = dir;
    }
    visualize_table(&input, &report_config, formatter)
}

/// Load, clean and chart a persisted table, printing progress.
pub fn visualize_table(
    input: &Path,
    report_config: &ReportConfig,
    formatter: &Formatter,
) -> Result<VisualizationReport> {
    let visualizer = Visualizer::from_config(report_config)?;
    let normalized = load_normalized(input)?;

    if let Some(note) = formatter.reconciliation(&normalized.reconciliation) {
        println!("{}", note);
    }
    println!("{}", formatter.frame_overview(&normalized.frame));

    let report = visualizer.generate(&normalized.frame)?;
    println!("{}", formatter.chart_outcomes(&report));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let result = visualize_table(
            &dir.path().join("missing.csv"),
            &config,
            &Formatter::new(false, 5),
        );
        assert!(matches!(result, Err(CliError::Report(_))));
    }
}
